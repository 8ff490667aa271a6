//! Spindle encoder configuration from TOML.

use serde::Deserialize;

/// Upper bound on the calibration window (ring buffer capacity).
pub const MAX_CALIBRATION_SAMPLES: usize = 32;

/// How much of the diagnostic stream the consumer reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// Faults only.
    Minimal,
    /// Faults, diagnostics and calibration progress.
    #[default]
    Medium,
    /// Every snapshot, including clean revolutions.
    All,
}

/// Spindle encoder and signal-integrity configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderConfig {
    /// Encoder counts per spindle revolution on each of the A and B channels.
    #[serde(default = "default_counts_per_revolution")]
    pub counts_per_revolution: u16,

    /// Allowed deviation of an A/B edge interval, in percent of the expected interval.
    #[serde(default = "default_acceptable_margin_percent")]
    pub acceptable_margin_percent: u8,

    /// Allowed deviation of a revolution period from the baseline, in percent.
    ///
    /// Also the window every calibration sample must fall in.
    #[serde(default = "default_settle_margin_percent")]
    pub settle_margin_percent: u8,

    /// Number of revolutions averaged to establish the baseline.
    #[serde(default = "default_calibration_samples")]
    pub calibration_samples: u8,

    /// Diagnostic verbosity.
    #[serde(default)]
    pub verbosity: Verbosity,
}

fn default_counts_per_revolution() -> u16 {
    800
}

fn default_acceptable_margin_percent() -> u8 {
    10
}

fn default_settle_margin_percent() -> u8 {
    5
}

fn default_calibration_samples() -> u8 {
    10
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            counts_per_revolution: default_counts_per_revolution(),
            acceptable_margin_percent: default_acceptable_margin_percent(),
            settle_margin_percent: default_settle_margin_percent(),
            calibration_samples: default_calibration_samples(),
            verbosity: Verbosity::default(),
        }
    }
}

impl EncoderConfig {
    /// Calibration window length as a buffer size.
    #[inline]
    pub fn window_len(&self) -> usize {
        self.calibration_samples as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_firmware_constants() {
        let config = EncoderConfig::default();
        assert_eq!(config.counts_per_revolution, 800);
        assert_eq!(config.acceptable_margin_percent, 10);
        assert_eq!(config.settle_margin_percent, 5);
        assert_eq!(config.window_len(), 10);
        assert_eq!(config.verbosity, Verbosity::Medium);
    }

    #[test]
    fn test_verbosity_ordering() {
        assert!(Verbosity::Minimal < Verbosity::Medium);
        assert!(Verbosity::Medium < Verbosity::All);
    }
}
