//! Unit tests for configuration validation.

use els_sync::config::{validate_config, SystemConfig, MAX_CALIBRATION_SAMPLES};
use els_sync::error::{ConfigError, Error};

fn config_error(config: &SystemConfig) -> Option<ConfigError> {
    match validate_config(config) {
        Err(Error::Config(e)) => Some(e),
        _ => None,
    }
}

/// Test that the default configuration passes.
#[test]
fn test_default_is_valid() {
    assert!(validate_config(&SystemConfig::default()).is_ok());
}

/// Test encoder resolution bounds.
#[test]
fn test_counts_per_revolution() {
    for bad in [0, 2, 3, 799] {
        let mut config = SystemConfig::default();
        config.encoder.counts_per_revolution = bad;
        assert_eq!(
            config_error(&config),
            Some(ConfigError::InvalidCountsPerRevolution(bad))
        );
    }

    let mut config = SystemConfig::default();
    config.encoder.counts_per_revolution = 4;
    assert!(validate_config(&config).is_ok());
}

/// Test margin percentage bounds.
#[test]
fn test_margin_percentages() {
    let mut config = SystemConfig::default();
    config.encoder.acceptable_margin_percent = 0;
    assert_eq!(config_error(&config), Some(ConfigError::InvalidAcceptableMargin(0)));

    config.encoder.acceptable_margin_percent = 100;
    assert!(validate_config(&config).is_ok());

    config.encoder.settle_margin_percent = 101;
    assert_eq!(config_error(&config), Some(ConfigError::InvalidSettleMargin(101)));
}

/// Test calibration window bounds.
#[test]
fn test_calibration_samples() {
    let mut config = SystemConfig::default();
    config.encoder.calibration_samples = MAX_CALIBRATION_SAMPLES as u8;
    assert!(validate_config(&config).is_ok());

    config.encoder.calibration_samples = 0;
    assert_eq!(
        config_error(&config),
        Some(ConfigError::InvalidCalibrationSamples {
            requested: 0,
            max: MAX_CALIBRATION_SAMPLES,
        })
    );
}

/// Test leadscrew geometry and drive limits.
#[test]
fn test_leadscrew_limits() {
    let mut config = SystemConfig::default();
    config.leadscrew.step_ratio = 0;
    assert_eq!(config_error(&config), Some(ConfigError::InvalidLeadscrewGeometry));

    let mut config = SystemConfig::default();
    config.leadscrew.step_limit_per_minute = 59;
    assert_eq!(config_error(&config), Some(ConfigError::InvalidStepLimit(59)));

    let mut config = SystemConfig::default();
    config.leadscrew.min_pulse_width = 0;
    assert_eq!(
        config_error(&config),
        Some(ConfigError::InvalidPulseTiming { width: 0, period: 30 })
    );
}

/// Test that shared pin numbers are rejected.
#[test]
fn test_duplicate_pins() {
    let mut config = SystemConfig::default();
    config.pins.dir = config.pins.step;
    assert_eq!(config_error(&config), Some(ConfigError::DuplicatePin(6)));
}
