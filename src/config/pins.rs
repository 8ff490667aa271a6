//! Pin assignments.
//!
//! Carried as data for the board-support layer; the core never touches pins by
//! number.

use serde::Deserialize;

/// Board pin numbers for the encoder inputs and stepper outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinAssignments {
    /// Encoder A channel.
    #[serde(default = "default_a")]
    pub a: u8,
    /// Encoder B channel.
    #[serde(default = "default_b")]
    pub b: u8,
    /// Encoder index (Z) channel.
    #[serde(default = "default_z")]
    pub z: u8,
    /// Stepper STEP output.
    #[serde(default = "default_step")]
    pub step: u8,
    /// Stepper DIR output.
    #[serde(default = "default_dir")]
    pub dir: u8,
}

fn default_a() -> u8 {
    3
}

fn default_b() -> u8 {
    2
}

fn default_z() -> u8 {
    9
}

fn default_step() -> u8 {
    6
}

fn default_dir() -> u8 {
    7
}

impl Default for PinAssignments {
    fn default() -> Self {
        Self {
            a: default_a(),
            b: default_b(),
            z: default_z(),
            step: default_step(),
            dir: default_dir(),
        }
    }
}

impl PinAssignments {
    /// All pin numbers in a fixed order, for duplicate checks.
    pub fn all(&self) -> [u8; 5] {
        [self.a, self.b, self.z, self.step, self.dir]
    }
}
