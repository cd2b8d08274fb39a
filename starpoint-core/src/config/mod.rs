//! Configuration types
//!
//! Board-agnostic configuration structures, a parser for the TOML subset
//! used by mount configuration files, and the persisted calibration record.

pub mod hardware;
pub mod record;
pub mod toml;
pub mod types;

pub use hardware::*;
pub use record::{CalibrationRecord, RecordError};
pub use toml::{parse_config, ParseError};
pub use types::*;
