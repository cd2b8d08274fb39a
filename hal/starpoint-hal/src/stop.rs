//! Cooperative stop request
//!
//! Manual jogging runs until a limit sensor trips or the operator asks it
//! to stop. The jog loop polls a [`StopSignal`] once per step; the poll must
//! never block.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::uart::UartRx;

/// Serial command that ends a jog
pub const STOP_COMMAND: &[u8; 4] = b"stop";

/// Non-blocking stop request poll
pub trait StopSignal {
    /// Check whether a stop has been requested since the last poll
    fn stop_requested(&mut self) -> bool;

    /// Forget anything left over from an earlier jog
    fn reset(&mut self) {}
}

impl StopSignal for &AtomicBool {
    fn stop_requested(&mut self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<T: StopSignal + ?Sized> StopSignal for &mut T {
    fn stop_requested(&mut self) -> bool {
        (**self).stop_requested()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Stop signal fed by a serial receive channel
///
/// Bytes are collected into a four byte command buffer. The signal fires
/// when the buffer holds `stop`. Overflowing the buffer with anything else,
/// or a receive error, also fires it: a jog that cannot hear the operator
/// must not keep running.
pub struct SerialStop<R> {
    rx: R,
    buffer: [u8; 4],
    len: usize,
}

impl<R: UartRx> SerialStop<R> {
    /// Wrap a UART receiver
    pub fn new(rx: R) -> Self {
        Self {
            rx,
            buffer: [0; 4],
            len: 0,
        }
    }

    /// Give back the UART receiver
    pub fn into_inner(self) -> R {
        self.rx
    }

    fn clear(&mut self) {
        self.buffer = [0; 4];
        self.len = 0;
    }

    fn fire(&mut self) -> bool {
        self.clear();
        true
    }
}

impl<R: UartRx> StopSignal for SerialStop<R> {
    fn stop_requested(&mut self) -> bool {
        loop {
            match self.rx.try_read_byte() {
                Ok(Some(byte)) => {
                    if self.len == self.buffer.len() {
                        return self.fire();
                    }
                    self.buffer[self.len] = byte;
                    self.len += 1;
                    if &self.buffer == STOP_COMMAND {
                        return self.fire();
                    }
                }
                Ok(None) => return false,
                Err(_) => return self.fire(),
            }
        }
    }

    /// Discard any partially received command
    fn reset(&mut self) {
        self.clear();
    }
}
