//! Configuration module for els-sync.
//!
//! Provides the encoder, leadscrew and pin configuration, loaded from TOML
//! files (with `std` feature) or built in code. All values are fixed at
//! initialization.

mod encoder;
mod leadscrew;
mod pins;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use encoder::{EncoderConfig, Verbosity, MAX_CALIBRATION_SAMPLES};
pub use leadscrew::LeadscrewConfig;
pub use pins::PinAssignments;
pub use system::SystemConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{FixedPercent, Micros, Steps};
