//! Goto and CurrentPosition messages
//!
//! Both messages carry type 0 and are told apart by their length field.

use heapless::Vec;

use crate::angle::{dec_from_wire, dec_to_wire, ra_from_wire, ra_to_wire};

/// Length of a Goto message in bytes
pub const GOTO_LENGTH: u16 = 20;

/// Length of a CurrentPosition message in bytes
pub const POSITION_LENGTH: u16 = 24;

/// Largest message the parser buffers
pub const MAX_MESSAGE_SIZE: usize = POSITION_LENGTH as usize;

/// The only message type of protocol version 0
pub const MESSAGE_TYPE: u16 = 0;

/// Status reported with a position when the mount is healthy
pub const STATUS_OK: i32 = 0;

const HEADER_SIZE: usize = 4;

/// Errors from encoding or decoding messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageError {
    /// Output buffer cannot hold the message
    BufferTooSmall,
    /// Input ends before the message does
    Truncated,
    /// Length field is not a known message length
    InvalidLength,
    /// Type field is not zero
    InvalidType,
}

/// Goto request from the planetarium
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GotoMessage {
    /// Client timestamp in microseconds since the Unix epoch
    pub time_us: i64,
    /// Right ascension in wire units
    pub ra: u32,
    /// Declination in wire units
    pub dec: i32,
}

impl GotoMessage {
    pub fn from_radians(time_us: i64, ra: f64, dec: f64) -> Self {
        Self {
            time_us,
            ra: ra_to_wire(ra),
            dec: dec_to_wire(dec),
        }
    }

    pub fn ra_radians(&self) -> f64 {
        ra_from_wire(self.ra)
    }

    pub fn dec_radians(&self) -> f64 {
        dec_from_wire(self.dec)
    }

    /// Encode into `buffer`, returning the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, MessageError> {
        let out = body(buffer, GOTO_LENGTH)?;
        out[4..12].copy_from_slice(&self.time_us.to_le_bytes());
        out[12..16].copy_from_slice(&self.ra.to_le_bytes());
        out[16..20].copy_from_slice(&self.dec.to_le_bytes());
        Ok(out.len())
    }

    /// Decode a complete message
    pub fn decode(bytes: &[u8]) -> Result<Self, MessageError> {
        let bytes = checked(bytes, GOTO_LENGTH)?;
        Ok(Self {
            time_us: i64::from_le_bytes(field(bytes, 4)),
            ra: u32::from_le_bytes(field(bytes, 12)),
            dec: i32::from_le_bytes(field(bytes, 16)),
        })
    }
}

/// Position report sent back to the planetarium
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CurrentPosition {
    pub time_us: i64,
    pub ra: u32,
    pub dec: i32,
    /// Zero when healthy
    pub status: i32,
}

impl CurrentPosition {
    /// Healthy position report for an equatorial direction in radians
    pub fn from_radians(time_us: i64, ra: f64, dec: f64) -> Self {
        Self {
            time_us,
            ra: ra_to_wire(ra),
            dec: dec_to_wire(dec),
            status: STATUS_OK,
        }
    }

    pub fn ra_radians(&self) -> f64 {
        ra_from_wire(self.ra)
    }

    pub fn dec_radians(&self) -> f64 {
        dec_from_wire(self.dec)
    }

    /// Encode into `buffer`, returning the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, MessageError> {
        let out = body(buffer, POSITION_LENGTH)?;
        out[4..12].copy_from_slice(&self.time_us.to_le_bytes());
        out[12..16].copy_from_slice(&self.ra.to_le_bytes());
        out[16..20].copy_from_slice(&self.dec.to_le_bytes());
        out[20..24].copy_from_slice(&self.status.to_le_bytes());
        Ok(out.len())
    }

    /// Decode a complete message
    pub fn decode(bytes: &[u8]) -> Result<Self, MessageError> {
        let bytes = checked(bytes, POSITION_LENGTH)?;
        Ok(Self {
            time_us: i64::from_le_bytes(field(bytes, 4)),
            ra: u32::from_le_bytes(field(bytes, 12)),
            dec: i32::from_le_bytes(field(bytes, 16)),
            status: i32::from_le_bytes(field(bytes, 20)),
        })
    }
}

/// A decoded message of either kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message {
    Goto(GotoMessage),
    CurrentPosition(CurrentPosition),
}

impl Message {
    /// Decode a complete message, choosing the kind by its length field
    pub fn decode(bytes: &[u8]) -> Result<Self, MessageError> {
        if bytes.len() < 2 {
            return Err(MessageError::Truncated);
        }
        match u16::from_le_bytes([bytes[0], bytes[1]]) {
            GOTO_LENGTH => GotoMessage::decode(bytes).map(Message::Goto),
            POSITION_LENGTH => CurrentPosition::decode(bytes).map(Message::CurrentPosition),
            _ => Err(MessageError::InvalidLength),
        }
    }
}

/// Header-filled slice of `buffer` for a message of `length` bytes
fn body(buffer: &mut [u8], length: u16) -> Result<&mut [u8], MessageError> {
    let out = buffer
        .get_mut(..usize::from(length))
        .ok_or(MessageError::BufferTooSmall)?;
    out[0..2].copy_from_slice(&length.to_le_bytes());
    out[2..4].copy_from_slice(&MESSAGE_TYPE.to_le_bytes());
    Ok(out)
}

/// Validate the header of `bytes` against `length` and return the message
fn checked(bytes: &[u8], length: u16) -> Result<&[u8], MessageError> {
    if bytes.len() < HEADER_SIZE {
        return Err(MessageError::Truncated);
    }
    if u16::from_le_bytes([bytes[0], bytes[1]]) != length {
        return Err(MessageError::InvalidLength);
    }
    if u16::from_le_bytes([bytes[2], bytes[3]]) != MESSAGE_TYPE {
        return Err(MessageError::InvalidType);
    }
    bytes
        .get(..usize::from(length))
        .ok_or(MessageError::Truncated)
}

fn field<const N: usize>(bytes: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[offset..offset + N]);
    out
}

/// Check what is known of a partial message
fn check_prefix(bytes: &[u8]) -> Result<(), MessageError> {
    if let Some(&first) = bytes.first() {
        if u16::from(first) != GOTO_LENGTH && u16::from(first) != POSITION_LENGTH {
            return Err(MessageError::InvalidLength);
        }
    }
    if bytes.len() >= 2 {
        let length = u16::from_le_bytes([bytes[0], bytes[1]]);
        if length != GOTO_LENGTH && length != POSITION_LENGTH {
            return Err(MessageError::InvalidLength);
        }
    }
    if bytes.len() >= HEADER_SIZE && u16::from_le_bytes([bytes[2], bytes[3]]) != MESSAGE_TYPE {
        return Err(MessageError::InvalidType);
    }
    Ok(())
}

/// Streaming parser for messages arriving over a byte stream
///
/// Bytes that cannot start a message are skipped. A bad header drops
/// bytes from the front of the buffer until what remains could start a
/// valid message, so the parser finds the next message boundary on its own.
#[derive(Debug, Clone, Default)]
pub struct MessageParser {
    buffer: Vec<u8, MAX_MESSAGE_SIZE>,
}

impl MessageParser {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Discard any partial message
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Bytes held from a partial message
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(message))` when a message completes, `Ok(None)` when
    /// more bytes are needed, or `Err` when the byte broke the header. The
    /// parser has already resynchronized when it reports an error.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Message>, MessageError> {
        if self.buffer.is_empty() && check_prefix(&[byte]).is_err() {
            // Silently skip bytes that cannot start a message
            return Ok(None);
        }
        if self.buffer.push(byte).is_err() {
            self.reset();
            return Err(MessageError::InvalidLength);
        }

        if let Err(e) = check_prefix(&self.buffer) {
            self.resync();
            return Err(e);
        }

        if self.buffer.len() < HEADER_SIZE {
            return Ok(None);
        }
        let length = usize::from(u16::from_le_bytes([self.buffer[0], self.buffer[1]]));
        if self.buffer.len() < length {
            return Ok(None);
        }

        let message = Message::decode(&self.buffer);
        self.reset();
        message.map(Some)
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete message found, if any. Bytes after a
    /// complete message or an error are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Message>, MessageError> {
        for &byte in bytes {
            if let Some(message) = self.feed(byte)? {
                return Ok(Some(message));
            }
        }
        Ok(None)
    }

    fn resync(&mut self) {
        while !self.buffer.is_empty() {
            let remaining = self.buffer.len() - 1;
            self.buffer.copy_within(1.., 0);
            self.buffer.truncate(remaining);
            if check_prefix(&self.buffer).is_ok() {
                break;
            }
        }
    }
}
