//! # els-sync
//!
//! Electronic leadscrew core for a manual lathe: spindle encoder integrity
//! monitoring and stepper pulses synchronized to spindle rotation.
//!
//! ## Features
//!
//! - **Quadrature capture**: A/B/Z edge handling with gray-code decode
//! - **Timing baseline**: revolution period calibration with a sliding window
//! - **Signal integrity**: per-edge timing margins and per-revolution counts
//! - **Diagnostic handoff**: one-slot mailbox between interrupts and main loop
//! - **Feed tables**: inch, metric, diametral and module pitches
//! - **Synchronized stepping**: drift-free ratio accumulator with limits and rate faults
//! - **embedded-hal 1.0**: `InputPin` for A/B, `OutputPin` for STEP/DIR, `DelayNs` for pulse timing
//! - **no_std compatible**: Core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use els_sync::{
//!     DiagnosticMailbox, DiagnosticReporter, FeedMode, FeedSelection, LeadscrewController,
//!     PulseOutput, SharedCell, SpindleEncoder, SpindleReading,
//! };
//!
//! let config = els_sync::load_config("els.toml")?;
//!
//! static SPINDLE: SharedCell<SpindleReading> = SharedCell::new(SpindleReading::ZERO);
//! let mut mailbox = DiagnosticMailbox::new();
//! let (producer, mut consumer) = mailbox.split();
//!
//! // Interrupt side
//! let mut encoder = SpindleEncoder::new(&config.encoder, pins.sample()?, producer, &SPINDLE);
//!
//! // Main loop side
//! let output = PulseOutput::new(step_pin, dir_pin, delay, &config.leadscrew);
//! let mut els = LeadscrewController::from_config(
//!     &config,
//!     FeedSelection::new(FeedMode::Inch, 51),
//!     output,
//!     &SPINDLE,
//! )?;
//! let mut reporter = DiagnosticReporter::new(config.encoder.verbosity);
//!
//! loop {
//!     els.tick(clock.now())?;
//!     if let Some(snapshot) = consumer.poll() {
//!         reporter.report(&snapshot);
//!     }
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

// Core modules
pub mod config;
pub mod diagnostics;
pub mod encoder;
pub mod error;
pub mod feed;
pub mod sync;

// Re-exports for ergonomic API
pub use config::{validate_config, EncoderConfig, LeadscrewConfig, SystemConfig, Verbosity};
pub use diagnostics::{
    Condition, DiagnosticConsumer, DiagnosticMailbox, DiagnosticProducer, DiagnosticReporter,
    DiagnosticSnapshot, Severity,
};
pub use encoder::{Channel, EncoderPins, Phase, SpindleEncoder, SpindleReading, TimingBaseline};
pub use error::{Error, Result};
pub use feed::{FeedMode, FeedModeEntry, FeedRatioTable, FeedSelection};
pub use sync::{
    Command, DirectionFlags, LeadscrewController, PulseOutput, SharedCell, Side,
    SynchronizationState, SynchronizedStepGenerator,
};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{FixedPercent, Micros, Steps};
