//! System configuration - root configuration structure.

use serde::Deserialize;

use super::encoder::EncoderConfig;
use super::leadscrew::LeadscrewConfig;
use super::pins::PinAssignments;

/// Root configuration structure from TOML.
///
/// Every table is optional; missing values take the defaults of the reference
/// lathe (800-count encoder, 8 TPI leadscrew driven at 3200 steps per turn).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemConfig {
    /// Spindle encoder and diagnostics.
    #[serde(default)]
    pub encoder: EncoderConfig,

    /// Leadscrew geometry and stepper drive.
    #[serde(default)]
    pub leadscrew: LeadscrewConfig,

    /// Pin numbers.
    #[serde(default)]
    pub pins: PinAssignments,
}

impl SystemConfig {
    /// Encoder counts per revolution.
    #[inline]
    pub fn counts_per_revolution(&self) -> u16 {
        self.encoder.counts_per_revolution
    }

    /// Leadscrew steps per inch of travel.
    #[inline]
    pub fn steps_per_inch(&self) -> u32 {
        self.leadscrew.steps_per_inch()
    }
}
