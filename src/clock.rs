/// A source of monotonically increasing tick counts, e.g. a millisecond counter.
///
/// The count is allowed to wrap around at `u32::MAX`; all elapsed-time
/// arithmetic in this crate is performed with wrapping subtraction, so a
/// wrapped counter still yields correct (small, positive) durations as long
/// as the measured interval itself is short compared to the counter range.
///
/// The tick unit is arbitrary, but it must match the unit of the configured
/// delays. Most platforms will use their millisecond uptime counter.
pub trait Clock {
    /// Returns the current tick count.
    fn now(&mut self) -> u32;
}

/// Any `FnMut() -> u32` is a valid clock, so a closure over the platform's
/// tick counter can be passed directly.
///
/// ```
/// use polled_switch::Clock;
///
/// fn millis() -> u32 {
///     0 // read the hardware counter here
/// }
///
/// let mut clock = || millis();
/// let _ = clock.now();
/// ```
impl<F: FnMut() -> u32> Clock for F {
    fn now(&mut self) -> u32 {
        self()
    }
}
