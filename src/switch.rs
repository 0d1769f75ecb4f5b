use embedded_hal::digital::v2::InputPin;

use crate::clock::Clock;

/// Which raw pin level counts as "on".
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// The switch is on while the pin reads high.
    ActiveHigh,
    /// The switch is on while the pin reads low (pulled-up input wired to ground).
    ActiveLow,
}

impl Polarity {
    fn active_level(self) -> bool {
        matches!(self, Polarity::ActiveHigh)
    }
}

/// Timing configuration for a [`Switch`].
///
/// All delays are in clock ticks and share the unit of the [`Clock`] the
/// switch is constructed with (usually milliseconds).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchConfig {
    pub polarity: Polarity,
    /// Minimum quiet time after an accepted level change before the next
    /// change is accepted.
    pub debounce_delay: u32,
    /// Hold time after which a long press fires.
    pub long_press_delay: u32,
    /// Maximum push-to-push time that still counts as a double click.
    pub double_click_delay: u32,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        SwitchConfig {
            polarity: Polarity::ActiveLow,
            debounce_delay: 50,
            long_press_delay: 400,
            double_click_delay: 250,
        }
    }
}

/// A registered event handler slot. `None` means no handler.
///
/// Context goes into the closure's captures; there is no separate context
/// parameter.
pub type SwitchCallback<'a> = Option<&'a mut dyn FnMut()>;

/// A single debounced switch with gesture detection.
///
/// The switch owns an input pin (the level source) and a [`Clock`] (the tick
/// source) and is driven entirely by calling [`poll`](Switch::poll) from the
/// application's control loop. Each poll samples the pin once, filters bounce
/// with a quiet-time window and derives push, release, long-press and
/// double-click events from the debounced level.
///
/// The debounce filter only sees the pin at poll granularity, so the loop
/// must poll much more often than `debounce_delay` ticks for bounce to be
/// rejected reliably.
///
/// `poll()` is not reentrant and the switch holds no locks; one instance
/// belongs to one control loop. Separate instances are fully independent.
///
/// # Example - push and long press on a pulled-up button, polled every loop pass
/// ```no_run
/// # struct ButtonPin;
/// # impl embedded_hal::digital::v2::InputPin for ButtonPin {
/// #     type Error = core::convert::Infallible;
/// #     fn is_high(&self) -> Result<bool, Self::Error> { Ok(true) }
/// #     fn is_low(&self) -> Result<bool, Self::Error> { Ok(false) }
/// # }
/// # fn millis() -> u32 { 0 }
/// # fn button_pin() -> ButtonPin { ButtonPin }
/// # fn do_work() {}
/// use polled_switch::Switch;
///
/// // The pin is already configured as a pulled-up input by the HAL,
/// // the clock is the platform's millisecond counter.
/// let mut button = Switch::new(button_pin(), || millis()).unwrap();
///
/// let mut on_push = || { /* toggle something */ };
/// button.set_pushed_callback(Some(&mut on_push));
///
/// loop {
///     button.poll().unwrap();
///     if button.long_press() {
///         // fires once, while the button is still held
///     }
///     do_work();
/// }
/// ```
pub struct Switch<'a, Pin, Clk>
where
    Pin: InputPin,
    Clk: Clock,
{
    pin: Pin,
    clock: Clk,
    config: SwitchConfig,

    // Debounced state.
    level: bool,
    switched_time: u32,
    pushed_time: u32,

    // Pulse flags, valid for one poll cycle.
    switched: bool,
    long_press: bool,
    double_click: bool,
    // Latch, held until the next accepted transition.
    long_press_latch: bool,

    pushed_cb: SwitchCallback<'a>,
    released_cb: SwitchCallback<'a>,
    long_press_cb: SwitchCallback<'a>,
    double_click_cb: SwitchCallback<'a>,
}

impl<'a, Pin, Clk> Switch<'a, Pin, Clk>
where
    Pin: InputPin,
    Clk: Clock,
{
    /// Create a switch with the default configuration: active low,
    /// `debounce_delay` 50, `long_press_delay` 400, `double_click_delay` 250.
    pub fn new(pin: Pin, clock: Clk) -> Result<Self, Pin::Error> {
        Self::with_config(pin, clock, SwitchConfig::default())
    }

    /// Create a switch with an explicit configuration.
    ///
    /// The current raw level is taken as the initial debounced level, so a
    /// switch that is already held at startup does not report a push.
    pub fn with_config(pin: Pin, mut clock: Clk, config: SwitchConfig) -> Result<Self, Pin::Error> {
        let level = pin.is_high()?;
        let switched_time = clock.now();

        Ok(Switch {
            pin,
            clock,
            config,
            level,
            switched_time,
            pushed_time: 0,
            switched: false,
            long_press: false,
            double_click: false,
            long_press_latch: false,
            pushed_cb: None,
            released_cb: None,
            long_press_cb: None,
            double_click_cb: None,
        })
    }

    /// Sample the pin once and advance the state machine.
    ///
    /// Returns `Ok(true)` iff a debounced transition was accepted during this
    /// call. Registered callbacks run synchronously before this returns:
    /// the long-press callback first (it can fire while the level is steady),
    /// then on an accepted transition either the pushed or the released
    /// callback, then the double-click callback.
    pub fn poll(&mut self) -> Result<bool, Pin::Error> {
        self.long_press = false;
        self.double_click = false;

        let new_level = self.pin.is_high()?;
        let now = self.clock.now();

        if !self.long_press_latch {
            // Signed comparison: right after a counter wrap the held time
            // reads negative instead of huge, deferring the long press
            // instead of firing it early.
            self.long_press = self.on()
                && (now.wrapping_sub(self.pushed_time) as i32) > self.config.long_press_delay as i32;
            // Stays latched until the next accepted transition.
            self.long_press_latch = self.long_press;
        }
        if self.long_press {
            if let Some(cb) = self.long_press_cb.as_mut() {
                cb();
            }
        }

        if new_level != self.level
            && now.wrapping_sub(self.switched_time) >= self.config.debounce_delay
        {
            self.switched_time = now;
            self.level = new_level;
            self.switched = true;
            self.long_press_latch = false;

            if self.on() {
                // Must read the previous push time before overwriting it.
                self.double_click = (now.wrapping_sub(self.pushed_time) as i32)
                    < self.config.double_click_delay as i32;
                self.pushed_time = now;
            }

            if self.on() {
                if let Some(cb) = self.pushed_cb.as_mut() {
                    cb();
                }
            } else if let Some(cb) = self.released_cb.as_mut() {
                cb();
            }

            if self.double_click {
                if let Some(cb) = self.double_click_cb.as_mut() {
                    cb();
                }
            }
            return Ok(true);
        }

        self.switched = false;
        Ok(false)
    }

    /// True for exactly one poll cycle after a debounced transition.
    pub fn switched(&self) -> bool {
        self.switched
    }

    /// True while the debounced level matches the configured polarity.
    pub fn on(&self) -> bool {
        self.level == self.config.polarity.active_level()
    }

    /// True for exactly one poll cycle after a debounced off-to-on transition.
    pub fn pushed(&self) -> bool {
        self.switched && self.on()
    }

    /// True for exactly one poll cycle after a debounced on-to-off transition.
    pub fn released(&self) -> bool {
        self.switched && !self.on()
    }

    /// True for exactly one poll cycle when the switch has been held on for
    /// longer than `long_press_delay`.
    pub fn long_press(&self) -> bool {
        self.long_press
    }

    /// True from the moment a long press fires until the next debounced
    /// transition. Unlike [`long_press`](Switch::long_press) this is
    /// meaningful between polls.
    pub fn long_press_latch(&self) -> bool {
        self.long_press_latch
    }

    /// True for exactly one poll cycle when a push was accepted less than
    /// `double_click_delay` ticks after the previous push.
    pub fn double_click(&self) -> bool {
        self.double_click
    }

    /// Ticks since the last accepted push, or 0 when the switch is off.
    ///
    /// While on, never reports less than 1, so callers can tell "just
    /// pushed" apart from "not pushed".
    pub fn pushed_duration(&mut self) -> u32 {
        if self.on() {
            self.clock.now().wrapping_sub(self.pushed_time).max(1)
        } else {
            0
        }
    }

    /// Store the callback run on an accepted push. `None` unregisters.
    pub fn set_pushed_callback(&mut self, cb: SwitchCallback<'a>) {
        self.pushed_cb = cb;
    }

    /// Store the callback run on an accepted release. `None` unregisters.
    pub fn set_released_callback(&mut self, cb: SwitchCallback<'a>) {
        self.released_cb = cb;
    }

    /// Store the callback run when a long press fires. `None` unregisters.
    pub fn set_long_press_callback(&mut self, cb: SwitchCallback<'a>) {
        self.long_press_cb = cb;
    }

    /// Store the callback run when a double click fires. `None` unregisters.
    pub fn set_double_click_callback(&mut self, cb: SwitchCallback<'a>) {
        self.double_click_cb = cb;
    }
}
