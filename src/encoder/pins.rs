//! Sampling the A/B lines through embedded-hal.

use embedded_hal::digital::InputPin;

use crate::error::{PinError, Result};

use super::quadrature::Phase;

/// The encoder's A and B input pins.
pub struct EncoderPins<A, B>
where
    A: InputPin,
    B: InputPin,
{
    a: A,
    b: B,
}

impl<A, B> EncoderPins<A, B>
where
    A: InputPin,
    B: InputPin,
{
    /// Wrap the two input pins.
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }

    /// Read both levels as a phase.
    pub fn sample(&mut self) -> Result<Phase> {
        let a = self.a.is_high().map_err(|_| PinError::Input)?;
        let b = self.b.is_high().map_err(|_| PinError::Input)?;
        Ok(Phase::from_levels(a, b))
    }

    /// Give the pins back.
    pub fn release(self) -> (A, B) {
        (self.a, self.b)
    }
}
