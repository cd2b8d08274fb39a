//! Mount configuration file reader
//!
//! Reads the small TOML subset mount files use: `key = value` lines with
//! integers, floats, booleans and quoted or bare strings, `#` comments, and
//! the sections `[pins]`, `[motion]`, `[jog]` and `[coords]`. Arrays,
//! tables inside values and multi-line strings are not understood.
//!
//! Keys left out keep their default values. Unknown keys are ignored so
//! older firmware can read newer files.

use super::hardware::{MountPins, PinConfig};
use super::types::{CoordsConfig, JogConfig, MotionConfig, MountConfig};

/// Configuration file errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Section name is not one of the known sections
    InvalidSection,
    /// Value does not parse as the key's type
    InvalidValue,
    /// Pin is not written as `gpioN` with optional `!`/`^` marks
    InvalidPin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Pins,
    Motion,
    Jog,
    Coords,
}

/// Read a mount configuration, starting from the defaults
pub fn parse_config(input: &str) -> Result<MountConfig, ParseError> {
    let mut config = MountConfig::new();
    let mut section = Section::Root;

    for line in input.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            Some(name) => section = parse_section_header(name)?,
            None => {
                if let Some((key, value)) = parse_key_value(line) {
                    apply_value(section, key, value, &mut config)?;
                }
            }
        }
    }

    Ok(config)
}

fn parse_section_header(name: &str) -> Result<Section, ParseError> {
    match name.trim() {
        "pins" => Ok(Section::Pins),
        "motion" => Ok(Section::Motion),
        "jog" => Ok(Section::Jog),
        "coords" => Ok(Section::Coords),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Split `key = value`, dropping a trailing comment outside quotes
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, rest) = line.split_once('=')?;

    let mut in_quotes = false;
    let mut end = rest.len();
    for (i, c) in rest.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '#' if !in_quotes => {
                end = i;
                break;
            }
            _ => {}
        }
    }

    let (key, value) = (key.trim(), rest[..end].trim());
    (!key.is_empty() && !value.is_empty()).then_some((key, value))
}

/// Strip surrounding quotes; bare words are taken as they are
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_float(value: &str) -> Result<f64, ParseError> {
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Read `gpioN`, where a leading `!` marks the line active-low and `^`
/// enables the pull-up, in any order
fn parse_pin(value: &str) -> Result<PinConfig, ParseError> {
    let text = unquote(value);
    let name = text.trim_start_matches(['!', '^']);
    let marks = &text[..text.len() - name.len()];

    let pin = name
        .strip_prefix("gpio")
        .and_then(|n| n.parse::<u8>().ok())
        .ok_or(ParseError::InvalidPin)?;

    Ok(PinConfig {
        pin,
        inverted: marks.contains('!'),
        pull_up: marks.contains('^'),
    })
}

/// `none` leaves an optional pin unassigned
fn parse_optional_pin(value: &str) -> Result<Option<PinConfig>, ParseError> {
    if unquote(value) == "none" {
        Ok(None)
    } else {
        parse_pin(value).map(Some)
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut MountConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => {
            if key == "version" {
                config.version = parse_int(value)?;
            }
        }
        Section::Pins => apply_pin(key, value, &mut config.pins)?,
        Section::Motion => apply_motion(key, value, &mut config.motion)?,
        Section::Jog => apply_jog(key, value, &mut config.motion.jog)?,
        Section::Coords => apply_coords(key, value, &mut config.coords)?,
    }
    Ok(())
}

fn apply_pin(key: &str, value: &str, pins: &mut MountPins) -> Result<(), ParseError> {
    match key {
        "step_azimuth" => pins.step_azimuth = parse_pin(value)?,
        "step_altitude" => pins.step_altitude = parse_pin(value)?,
        "direction" => pins.direction = parse_pin(value)?,
        "altitude_direction_flipped" => pins.altitude_direction_flipped = parse_bool(value)?,
        "enable_azimuth" => pins.enable_azimuth = parse_pin(value)?,
        "enable_altitude" => pins.enable_altitude = parse_pin(value)?,
        "azimuth_zero" => pins.azimuth_zero = parse_pin(value)?,
        "azimuth_full" => pins.azimuth_full = parse_pin(value)?,
        "altitude_bottom" => pins.altitude_bottom = parse_pin(value)?,
        "altitude_top" => pins.altitude_top = parse_pin(value)?,
        "laser" => pins.laser = parse_optional_pin(value)?,
        _ => {}
    }
    Ok(())
}

fn apply_motion(key: &str, value: &str, motion: &mut MotionConfig) -> Result<(), ParseError> {
    match key {
        "pulse_half_period_us" => motion.timing.pulse_half_period_us = parse_int(value)?,
        "settle_ms" => motion.timing.settle_ms = parse_int(value)?,
        "probe_step_cap" => motion.timing.probe_step_cap = parse_int(value)?,
        "azimuth_inverted" => motion.azimuth_inverted = parse_bool(value)?,
        _ => {}
    }
    Ok(())
}

fn apply_jog(key: &str, value: &str, jog: &mut JogConfig) -> Result<(), ParseError> {
    match key {
        "start_half_period_us" => jog.start_half_period_us = parse_int(value)?,
        "floor_half_period_us" => jog.floor_half_period_us = parse_int(value)?,
        "decrement_us" => jog.decrement_us = parse_int(value)?,
        "steps_per_increment" => jog.steps_per_increment = parse_int(value)?,
        _ => {}
    }
    Ok(())
}

fn apply_coords(key: &str, value: &str, coords: &mut CoordsConfig) -> Result<(), ParseError> {
    if key == "sidereal_rate" {
        coords.sidereal_rate = parse_float(value)?;
    }
    Ok(())
}
