//! UART serial receive abstraction
//!
//! Only the receive side is needed by the mount core: while jogging, the
//! operator's `stop` command arrives on the serial line and must be picked
//! up without blocking the step loop.

/// Non-blocking UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read one byte if one is waiting
    ///
    /// Returns `Ok(None)` immediately when the receive buffer is empty.
    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error>;
}
