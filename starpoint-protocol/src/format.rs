//! Sexagesimal angle text
//!
//! Right ascension is written as hours `HhMmS.Ss` and declination or
//! altitude as degrees `DºM'S''`. Rounding happens on the smallest shown
//! unit first so a value never prints as `60` seconds or minutes.
//!
//! Parsing accepts:
//! - hours: `HhMmSs` (seconds may carry a fraction)
//! - degrees: `DºM'S''` with an optional leading `-` that applies to every
//!   component, or `"` in place of `''`
//! - decimal degrees: `D.dº`, where a negative value is read as `360 - |D|`
//!
//! The degree mark may be `º`, `ᵒ` or `°`.

use core::f64::consts::PI;
use core::fmt::Write;
use heapless::String;

use crate::angle::{hours_to_radians, radians_to_hours};

/// Formatted angle text
pub type AngleText = String<20>;

/// Accepted degree marks
const DEGREE_MARKS: [char; 3] = ['º', 'ᵒ', '°'];

/// Errors from formatting or parsing angle text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FormatError {
    /// Text does not match any accepted layout
    Malformed,
    /// Minutes or seconds of 60 or more, or hours past 24
    OutOfRange,
    /// Angle is NaN or infinite
    NotFinite,
    /// Output does not fit the text buffer
    Capacity,
}

impl From<core::fmt::Error> for FormatError {
    fn from(_: core::fmt::Error) -> Self {
        FormatError::Capacity
    }
}

/// Split a non-negative value into whole units, minutes and seconds,
/// rounding to `1 / scale` of a second
fn split(value: f64, scale: u64) -> (u64, u64, f64) {
    let total = libm::rint(value * 3600.0 * scale as f64) as u64;
    let whole = total / (3600 * scale);
    let rest = total % (3600 * scale);
    let minutes = rest / (60 * scale);
    let seconds = (rest % (60 * scale)) as f64 / scale as f64;
    (whole, minutes, seconds)
}

/// Format a right ascension (radians) as `HhMmS.Ss`
pub fn format_hours(ra: f64) -> Result<AngleText, FormatError> {
    if !ra.is_finite() {
        return Err(FormatError::NotFinite);
    }

    let mut hours = libm::fmod(radians_to_hours(ra), 24.0);
    if hours < 0.0 {
        hours += 24.0;
    }
    let (h, m, s) = split(hours, 10);

    let mut text = AngleText::new();
    write!(text, "{}h{}m{:.1}s", h % 24, m, s)?;
    Ok(text)
}

/// Format an angle (radians) as signed `DºM'S''`
pub fn format_degrees(angle: f64) -> Result<AngleText, FormatError> {
    if !angle.is_finite() {
        return Err(FormatError::NotFinite);
    }

    let degrees = angle * 180.0 / PI;
    let (d, m, s) = split(libm::fabs(degrees), 1);
    let negative = degrees < 0.0 && (d, m, s) != (0, 0, 0.0);

    let mut text = AngleText::new();
    if negative {
        text.push('-').map_err(|_| FormatError::Capacity)?;
    }
    write!(text, "{}º{}'{}''", d, m, s as u64)?;
    Ok(text)
}

/// Parse `HhMmSs` into radians
pub fn parse_hours(text: &str) -> Result<f64, FormatError> {
    let text = text.trim();
    let (hours, rest) = text.split_once('h').ok_or(FormatError::Malformed)?;
    let (minutes, rest) = rest.split_once('m').ok_or(FormatError::Malformed)?;
    let seconds = rest.strip_suffix('s').ok_or(FormatError::Malformed)?;

    let hours = whole_number(hours)?;
    let minutes = whole_number(minutes)?;
    let seconds = decimal(seconds)?;
    if hours >= 24 {
        return Err(FormatError::OutOfRange);
    }

    let value = sexagesimal(hours, minutes, seconds)?;
    Ok(hours_to_radians(value))
}

/// Parse `DºM'S''` or `D.dº` into radians
pub fn parse_degrees(text: &str) -> Result<f64, FormatError> {
    let text = text.trim();

    if let Some(body) = text.strip_suffix("''").or_else(|| text.strip_suffix('"')) {
        let (negative, body) = match body.strip_prefix('-') {
            Some(body) => (true, body),
            None => (false, body),
        };
        let (degrees, rest) = body
            .split_once(&DEGREE_MARKS[..])
            .ok_or(FormatError::Malformed)?;
        let (minutes, seconds) = rest.split_once('\'').ok_or(FormatError::Malformed)?;

        let value = sexagesimal(
            whole_number(degrees)?,
            whole_number(minutes)?,
            decimal(seconds)?,
        )?;
        let value = if negative { -value } else { value };
        return Ok(value * PI / 180.0);
    }

    let body = text
        .strip_suffix(&DEGREE_MARKS[..])
        .ok_or(FormatError::Malformed)?;
    let (negative, magnitude) = match body.strip_prefix('-') {
        Some(magnitude) => (true, decimal(magnitude)?),
        None => (false, decimal(body)?),
    };
    let value = if negative { 360.0 - magnitude } else { magnitude };
    Ok(value * PI / 180.0)
}

fn sexagesimal(whole: u32, minutes: u32, seconds: f64) -> Result<f64, FormatError> {
    if minutes >= 60 || seconds >= 60.0 {
        return Err(FormatError::OutOfRange);
    }
    Ok(f64::from(whole) + f64::from(minutes) / 60.0 + seconds / 3600.0)
}

/// One to three decimal digits
fn whole_number(text: &str) -> Result<u32, FormatError> {
    if text.is_empty() || text.len() > 3 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatError::Malformed);
    }
    text.parse().map_err(|_| FormatError::Malformed)
}

/// Digits with at most one decimal point
fn decimal(text: &str) -> Result<f64, FormatError> {
    let digits = text.bytes().filter(u8::is_ascii_digit).count();
    let points = text.bytes().filter(|&b| b == b'.').count();
    if digits == 0 || points > 1 || digits + points != text.len() {
        return Err(FormatError::Malformed);
    }
    text.parse().map_err(|_| FormatError::Malformed)
}
