//! Persisted calibration record
//!
//! Stores the sensor-to-sensor spans of a completed calibration so the
//! mount can re-home against its zero sensors after power-up instead of
//! sweeping both axes end to end again. The record is serialized with
//! postcard and protected by a magic number, a version and a CRC32.

use serde::{Deserialize, Serialize};

use crate::motion::MountCalibration;

/// Magic number to identify a valid record
pub const RECORD_MAGIC: u32 = 0x5350_4D43; // "SPMC"

/// Current record format version
pub const RECORD_VERSION: u8 = 1;

/// Upper bound on the encoded size of a record
pub const RECORD_MAX_SIZE: usize = 24;

/// Calibration record errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// Output buffer too small or serialization failed
    Encode,
    /// Bytes do not decode as a record
    Decode,
    /// Magic number mismatch
    BadMagic,
    /// Written by an incompatible version
    VersionMismatch,
    /// Checksum does not match contents
    CrcMismatch,
    /// A span of zero steps cannot be used
    EmptySpan,
}

/// Calibration data stored in non-volatile memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationRecord {
    /// Magic number for validation
    pub magic: u32,
    /// Data format version
    pub version: u8,
    /// Steps between the azimuth sensors
    pub azimuth_span: u32,
    /// Steps between the altitude sensors
    pub altitude_span: u32,
    /// CRC32 checksum (calculated over magic..altitude_span)
    pub crc: u32,
}

impl CalibrationRecord {
    /// Create a record for a completed calibration
    pub fn from_calibration(calibration: &MountCalibration) -> Self {
        let mut record = Self {
            magic: RECORD_MAGIC,
            version: RECORD_VERSION,
            azimuth_span: calibration.azimuth.span_steps(),
            altitude_span: calibration.altitude.span_steps(),
            crc: 0,
        };
        record.update_crc();
        record
    }

    /// Validate the record and rebuild the calibration it describes
    pub fn to_calibration(&self) -> Result<MountCalibration, RecordError> {
        self.validate()?;
        if self.azimuth_span == 0 || self.altitude_span == 0 {
            return Err(RecordError::EmptySpan);
        }
        Ok(MountCalibration::from_spans(
            self.azimuth_span,
            self.altitude_span,
        ))
    }

    /// Check magic, version and checksum
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.magic != RECORD_MAGIC {
            return Err(RecordError::BadMagic);
        }
        if self.version != RECORD_VERSION {
            return Err(RecordError::VersionMismatch);
        }
        if !self.verify_crc() {
            return Err(RecordError::CrcMismatch);
        }
        Ok(())
    }

    /// Serialize into `buf`, returning the used portion
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], RecordError> {
        postcard::to_slice(self, buf).map_err(|_| RecordError::Encode)
    }

    /// Deserialize and validate a record
    pub fn decode(bytes: &[u8]) -> Result<Self, RecordError> {
        let record: Self = postcard::from_bytes(bytes).map_err(|_| RecordError::Decode)?;
        record.validate()?;
        Ok(record)
    }

    /// Calculate CRC32 for the record (excluding the crc field itself)
    pub fn calculate_crc(&self) -> u32 {
        let mut crc: u32 = 0xFFFFFFFF;
        crc = crc32_update(crc, &self.magic.to_le_bytes());
        crc = crc32_update(crc, &[self.version]);
        crc = crc32_update(crc, &self.azimuth_span.to_le_bytes());
        crc = crc32_update(crc, &self.altitude_span.to_le_bytes());
        !crc
    }

    /// Update the CRC field
    pub fn update_crc(&mut self) {
        self.crc = self.calculate_crc();
    }

    /// Verify the CRC is correct
    pub fn verify_crc(&self) -> bool {
        self.crc == self.calculate_crc()
    }
}

/// Simple CRC32 update function (IEEE 802.3 polynomial)
fn crc32_update(crc: u32, data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB88320;
    let mut crc = crc;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    crc
}
