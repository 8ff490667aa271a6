//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::encoder::{EncoderConfig, MAX_CALIBRATION_SAMPLES};
use super::leadscrew::LeadscrewConfig;
use super::pins::PinAssignments;
use super::SystemConfig;

/// Validate a system configuration.
///
/// Checks:
/// - Encoder resolution and margin percentages are usable
/// - Calibration window fits the ring buffer
/// - Leadscrew geometry and pulse timing are consistent
/// - No pin is assigned twice
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    validate_encoder(&config.encoder)?;
    validate_leadscrew(&config.leadscrew)?;
    validate_pins(&config.pins)?;
    Ok(())
}

fn validate_encoder(config: &EncoderConfig) -> Result<()> {
    // Each quadrature cycle has two edges per channel
    if config.counts_per_revolution < 4 || config.counts_per_revolution % 2 != 0 {
        return Err(Error::Config(ConfigError::InvalidCountsPerRevolution(
            config.counts_per_revolution,
        )));
    }

    if config.acceptable_margin_percent == 0 || config.acceptable_margin_percent > 100 {
        return Err(Error::Config(ConfigError::InvalidAcceptableMargin(
            config.acceptable_margin_percent,
        )));
    }

    if config.settle_margin_percent == 0 || config.settle_margin_percent > 100 {
        return Err(Error::Config(ConfigError::InvalidSettleMargin(
            config.settle_margin_percent,
        )));
    }

    if config.calibration_samples == 0 || config.window_len() > MAX_CALIBRATION_SAMPLES {
        return Err(Error::Config(ConfigError::InvalidCalibrationSamples {
            requested: config.calibration_samples,
            max: MAX_CALIBRATION_SAMPLES,
        }));
    }

    Ok(())
}

fn validate_leadscrew(config: &LeadscrewConfig) -> Result<()> {
    if matches!(config.checked_steps_per_inch(), None | Some(0)) {
        return Err(Error::Config(ConfigError::InvalidLeadscrewGeometry));
    }

    if config.step_limit_per_minute < 60 {
        return Err(Error::Config(ConfigError::InvalidStepLimit(
            config.step_limit_per_minute,
        )));
    }

    if config.min_pulse_width == 0 || config.min_pulse_width >= config.min_pulse_period {
        return Err(Error::Config(ConfigError::InvalidPulseTiming {
            width: config.min_pulse_width,
            period: config.min_pulse_period,
        }));
    }

    Ok(())
}

fn validate_pins(pins: &PinAssignments) -> Result<()> {
    let all = pins.all();
    for (i, pin) in all.iter().enumerate() {
        if all[i + 1..].contains(pin) {
            return Err(Error::Config(ConfigError::DuplicatePin(*pin)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SystemConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_calibration_window() {
        let mut config = SystemConfig::default();
        config.encoder.calibration_samples = 64;

        let result = validate_config(&config);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidCalibrationSamples { requested: 64, .. }))
        ));
    }

    #[test]
    fn test_pulse_width_must_fit_period() {
        let mut config = SystemConfig::default();
        config.leadscrew.min_pulse_width = 30;

        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidPulseTiming { width: 30, period: 30 }))
        ));
    }

    #[test]
    fn test_overflowing_geometry_rejected() {
        let mut config = SystemConfig::default();
        config.leadscrew.threads_per_inch = 1000;
        config.leadscrew.driver_steps_per_revolution = 10_000_000;

        assert_eq!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidLeadscrewGeometry))
        );
    }

    #[test]
    fn test_duplicate_pin_rejected() {
        let mut config = SystemConfig::default();
        config.pins.z = config.pins.a;

        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::DuplicatePin(3)))
        ));
    }
}
