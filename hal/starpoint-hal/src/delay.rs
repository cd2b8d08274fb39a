//! Blocking delay abstraction
//!
//! Step pulses are timed by busy waits between pin edges. The motion code
//! only ever asks for a fixed wait; it never reads a clock.

/// Blocking delay provider
pub trait Delay {
    /// Wait for the given number of milliseconds
    fn delay_ms(&mut self, ms: u32);

    /// Wait for the given number of microseconds
    fn delay_us(&mut self, us: u32);
}

impl<T: Delay + ?Sized> Delay for &mut T {
    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms);
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us);
    }
}
