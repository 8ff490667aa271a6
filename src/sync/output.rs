//! STEP/DIR pulse output.
//!
//! Generic over embedded-hal 1.0 pin and delay types.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::LeadscrewConfig;
use crate::error::{PinError, Result};

use super::carriage::Side;

/// Stepper driver interface.
///
/// Generic over:
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `DELAY`: Delay provider for the pulse width (must implement `DelayNs`)
pub struct PulseOutput<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    step_pin: STEP,
    dir_pin: DIR,
    delay: DELAY,

    /// STEP high time and DIR setup time in microseconds.
    pulse_width_us: u32,

    /// DIR low means right instead of left.
    invert_direction: bool,

    /// Cached to avoid unnecessary pin writes.
    current_side: Option<Side>,

    pulses: u32,
}

impl<STEP, DIR, DELAY> PulseOutput<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Wrap the pins with the drive timing from `config`.
    pub fn new(step_pin: STEP, dir_pin: DIR, delay: DELAY, config: &LeadscrewConfig) -> Self {
        Self {
            step_pin,
            dir_pin,
            delay,
            pulse_width_us: config.min_pulse_width,
            invert_direction: config.invert_direction,
            current_side: None,
            pulses: 0,
        }
    }

    /// Emit one step toward `side`.
    ///
    /// Blocks for the pulse width, plus the setup time when DIR changes.
    pub fn pulse(&mut self, side: Side) -> Result<()> {
        self.set_direction(side)?;

        self.step_pin.set_high().map_err(|_| PinError::Step)?;
        self.delay.delay_us(self.pulse_width_us);
        self.step_pin.set_low().map_err(|_| PinError::Step)?;

        self.pulses = self.pulses.wrapping_add(1);
        Ok(())
    }

    /// Pulses emitted so far.
    #[inline]
    pub fn pulses(&self) -> u32 {
        self.pulses
    }

    /// Give the pins back.
    pub fn release(self) -> (STEP, DIR, DELAY) {
        (self.step_pin, self.dir_pin, self.delay)
    }

    fn set_direction(&mut self, side: Side) -> Result<()> {
        if self.current_side == Some(side) {
            return Ok(());
        }

        let pin_high = match side {
            Side::Right => !self.invert_direction,
            Side::Left => self.invert_direction,
        };

        if pin_high {
            self.dir_pin.set_high().map_err(|_| PinError::Dir)?;
        } else {
            self.dir_pin.set_low().map_err(|_| PinError::Dir)?;
        }
        self.delay.delay_us(self.pulse_width_us);

        self.current_side = Some(side);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};

    #[test]
    fn test_direction_written_once_per_change() {
        let step = PinMock::new(&[
            PinTransaction::set(State::High),
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
            PinTransaction::set(State::Low),
            PinTransaction::set(State::High),
            PinTransaction::set(State::Low),
        ]);
        let dir = PinMock::new(&[
            PinTransaction::set(State::High),
            PinTransaction::set(State::Low),
        ]);

        let mut output = PulseOutput::new(step, dir, NoopDelay::new(), &LeadscrewConfig::default());
        output.pulse(Side::Right).unwrap();
        output.pulse(Side::Right).unwrap();
        output.pulse(Side::Left).unwrap();
        assert_eq!(output.pulses(), 3);

        let (mut step, mut dir, _) = output.release();
        step.done();
        dir.done();
    }

    #[test]
    fn test_inverted_direction() {
        let step = PinMock::new(&[
            PinTransaction::set(State::High),
            PinTransaction::set(State::Low),
        ]);
        let dir = PinMock::new(&[PinTransaction::set(State::Low)]);
        let config = LeadscrewConfig {
            invert_direction: true,
            ..LeadscrewConfig::default()
        };

        let mut output = PulseOutput::new(step, dir, NoopDelay::new(), &config);
        output.pulse(Side::Right).unwrap();

        let (mut step, mut dir, _) = output.release();
        step.done();
        dir.done();
    }
}
