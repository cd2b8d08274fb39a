//! Stellarium Telescope Protocol
//!
//! Planetarium software drives the mount over a TCP stream of small
//! fixed-size little-endian messages:
//! ```text
//! Goto (client -> mount), 20 bytes
//! ┌────────┬────────┬──────────┬────────┬────────┐
//! │ LENGTH │ TYPE   │ TIME     │ RA     │ DEC    │
//! │ u16    │ u16=0  │ i64 (µs) │ u32    │ i32    │
//! └────────┴────────┴──────────┴────────┴────────┘
//!
//! CurrentPosition (mount -> client), 24 bytes
//! the same fields followed by STATUS: i32
//! ```
//!
//! Right ascension uses the full `u32` range for 24 hours and declination
//! maps `0x4000_0000` to 90°. The crate also formats and parses the
//! sexagesimal text used when angles are shown to or typed by an operator.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod angle;
pub mod format;
pub mod message;

pub use angle::{dec_from_wire, dec_to_wire, ra_from_wire, ra_to_wire};
pub use format::{
    format_degrees, format_hours, parse_degrees, parse_hours, AngleText, FormatError,
};
pub use message::{
    CurrentPosition, GotoMessage, Message, MessageError, MessageParser, GOTO_LENGTH,
    MAX_MESSAGE_SIZE, POSITION_LENGTH,
};
