#![cfg_attr(not(test), no_std)]

mod clock;
mod switch;

pub use clock::*;
pub use switch::*;


// A simple crate that debounces a polled switch and derives gesture events from it
// (push, release, long press, double click), with no interrupts, timers or allocation.
// The caller drives everything by calling poll() from its control loop.
