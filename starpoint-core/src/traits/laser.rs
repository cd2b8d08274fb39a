//! Pointing laser output trait

/// Trait for the pointing laser
///
/// The laser is switched independently of motor power; a move does not
/// change its state.
pub trait LaserOutput {
    /// Switch the laser on or off
    fn set_on(&mut self, on: bool);

    /// Check if the laser is on
    fn is_on(&self) -> bool;
}
