//! Unit tests for TOML configuration parsing.

use els_sync::config::{load_config, parse_config, SystemConfig, Verbosity};
use els_sync::error::{ConfigError, Error};

/// Test parsing a full lathe configuration from TOML.
#[test]
fn test_parse_full_config() {
    let toml_str = r#"
[encoder]
counts_per_revolution = 1000
acceptable_margin_percent = 12
settle_margin_percent = 4
calibration_samples = 8
verbosity = "minimal"

[leadscrew]
threads_per_inch = 10
driver_steps_per_revolution = 1600
step_ratio = 2
step_limit_per_minute = 1200000
min_pulse_width_us = 5
min_pulse_period_us = 40
invert_direction = true

[pins]
a = 20
b = 21
z = 22
step = 4
dir = 5
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.encoder.counts_per_revolution, 1000);
    assert_eq!(config.encoder.acceptable_margin_percent, 12);
    assert_eq!(config.encoder.settle_margin_percent, 4);
    assert_eq!(config.encoder.calibration_samples, 8);
    assert_eq!(config.encoder.verbosity, Verbosity::Minimal);

    assert_eq!(config.leadscrew.threads_per_inch, 10);
    assert_eq!(config.steps_per_inch(), 32_000);
    assert_eq!(config.leadscrew.min_pulse_width, 5);
    assert_eq!(config.leadscrew.min_pulse_period, 40);
    assert!(config.leadscrew.invert_direction);
    // 1.2M/min is 20 kHz, the 40us period allows 25 kHz
    assert_eq!(config.leadscrew.max_step_rate_hz(), 20_000);

    assert_eq!(config.pins.all(), [20, 21, 22, 4, 5]);
}

/// Test that omitted tables fall back to the reference lathe.
#[test]
fn test_partial_config_uses_defaults() {
    let toml_str = r#"
[leadscrew]
threads_per_inch = 4
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");
    let defaults = SystemConfig::default();

    assert_eq!(config.encoder, defaults.encoder);
    assert_eq!(config.pins, defaults.pins);
    assert_eq!(config.leadscrew.threads_per_inch, 4);
    assert_eq!(config.steps_per_inch(), 12_800);
    assert_eq!(config.counts_per_revolution(), 800);
}

/// Test that an unknown verbosity is a parse error.
#[test]
fn test_unknown_verbosity_rejected() {
    let toml_str = r#"
[encoder]
verbosity = "chatty"
"#;

    assert!(matches!(
        parse_config(toml_str),
        Err(Error::Config(ConfigError::ParseError(_)))
    ));
}

/// Test that parsed values are validated.
#[test]
fn test_parsed_values_are_validated() {
    let toml_str = r#"
[encoder]
counts_per_revolution = 801
"#;

    assert_eq!(
        parse_config(toml_str),
        Err(Error::Config(ConfigError::InvalidCountsPerRevolution(801)))
    );
}

/// Test that a leadscrew product past u32 is a geometry error.
#[test]
fn test_overflowing_geometry_is_an_error() {
    let toml_str = r#"
[leadscrew]
threads_per_inch = 1000
driver_steps_per_revolution = 10000000
step_ratio = 1
"#;

    assert_eq!(
        parse_config(toml_str),
        Err(Error::Config(ConfigError::InvalidLeadscrewGeometry))
    );
}

/// Test loading configuration from a file.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join(format!("els-sync-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        "[encoder]\ncalibration_samples = 20\n\n[leadscrew]\nstep_ratio = 4\n",
    )
    .expect("Failed to write config file");

    let result = load_config(&path);
    let _ = std::fs::remove_file(&path);

    let config = result.expect("Failed to load config");
    assert_eq!(config.encoder.calibration_samples, 20);
    assert_eq!(config.steps_per_inch(), 12_800);
}

/// Test that a missing file is reported as an I/O error.
#[test]
fn test_load_missing_file() {
    let path = std::env::temp_dir().join("els-sync-does-not-exist.toml");

    assert!(matches!(
        load_config(path),
        Err(Error::Config(ConfigError::IoError(_)))
    ));
}
