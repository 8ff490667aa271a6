//! Error types for els-sync.
//!
//! Covers configuration, feed-table lookup, command handling and pin I/O.
//! Conditions detected in interrupt context (timing errors, lost steps, rate
//! faults) are not errors in this sense: they are recorded as flags and
//! surfaced through [`crate::diagnostics::Condition`].

use core::fmt;

use crate::feed::FeedMode;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all els-sync operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Feed table construction or lookup error
    Feed(FeedError),
    /// Command rejected by the synchronization state
    Sync(SyncError),
    /// Encoder input or STEP/DIR output pin error
    Pin(PinError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Counts per revolution must be even and at least 4
    InvalidCountsPerRevolution(u16),
    /// Acceptable A/B margin percent must be 1-100
    InvalidAcceptableMargin(u8),
    /// Settle margin percent must be 1-100
    InvalidSettleMargin(u8),
    /// Calibration sample count must be 1 to the window capacity
    InvalidCalibrationSamples {
        /// Requested sample count
        requested: u8,
        /// Window capacity
        max: usize,
    },
    /// Leadscrew geometry yields zero steps per inch
    InvalidLeadscrewGeometry,
    /// Step limit must be at least one step per second
    InvalidStepLimit(u32),
    /// Pulse width must be > 0 and shorter than the pulse period
    InvalidPulseTiming {
        /// Minimum pulse width in microseconds
        width: u32,
        /// Minimum pulse period in microseconds
        period: u32,
    },
    /// Same pin assigned to more than one signal
    DuplicatePin(u8),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Feed table errors.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedError {
    /// Row index past the end of the mode's table
    RowOutOfRange {
        /// Requested mode
        mode: FeedMode,
        /// Requested row
        index: usize,
        /// Number of rows in that mode
        rows: usize,
    },
    /// Leadscrew resolution too coarse: a row rounds to zero steps
    ZeroSteps {
        /// Mode of the offending row
        mode: FeedMode,
        /// Index of the offending row
        index: usize,
    },
}

/// Command errors from the synchronization state.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncError {
    /// A step-rate fault is latched and must be cleared first
    Faulted,
    /// Jogging is only possible while the leadscrew is not synced
    JogWhileSynced,
    /// Jog request larger than the pending-pulse capacity
    JogTooLarge(i32),
}

/// Pin errors.
#[derive(Debug, Clone, PartialEq)]
pub enum PinError {
    /// STEP pin operation failed
    Step,
    /// DIR pin operation failed
    Dir,
    /// Encoder A or B input read failed
    Input,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Feed(e) => write!(f, "Feed table error: {}", e),
            Error::Sync(e) => write!(f, "Synchronization error: {}", e),
            Error::Pin(e) => write!(f, "Pin error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidCountsPerRevolution(v) => {
                write!(f, "Invalid counts per revolution: {}. Must be even and >= 4", v)
            }
            ConfigError::InvalidAcceptableMargin(v) => {
                write!(f, "Invalid acceptable margin percent: {}. Must be 1-100", v)
            }
            ConfigError::InvalidSettleMargin(v) => {
                write!(f, "Invalid settle margin percent: {}. Must be 1-100", v)
            }
            ConfigError::InvalidCalibrationSamples { requested, max } => {
                write!(f, "Invalid calibration sample count: {}. Must be 1-{}", requested, max)
            }
            ConfigError::InvalidLeadscrewGeometry => {
                write!(f, "Leadscrew geometry gives zero steps per inch")
            }
            ConfigError::InvalidStepLimit(v) => write!(f, "Invalid step limit: {} steps/min. Must be >= 60", v),
            ConfigError::InvalidPulseTiming { width, period } => {
                write!(f, "Invalid pulse timing: width {}us must be > 0 and < period {}us", width, period)
            }
            ConfigError::DuplicatePin(pin) => write!(f, "Pin {} assigned more than once", pin),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::RowOutOfRange { mode, index, rows } => {
                write!(f, "Row {} out of range for {} table ({} rows)", index, mode, rows)
            }
            FeedError::ZeroSteps { mode, index } => {
                write!(f, "Row {} of {} table rounds to zero steps", index, mode)
            }
        }
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Faulted => write!(f, "Step-rate fault latched; clear it first"),
            SyncError::JogWhileSynced => write!(f, "Cannot jog while synced to the spindle"),
            SyncError::JogTooLarge(v) => write!(f, "Jog of {} steps exceeds pending capacity", v),
        }
    }
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinError::Step => write!(f, "STEP pin operation failed"),
            PinError::Dir => write!(f, "DIR pin operation failed"),
            PinError::Input => write!(f, "Encoder input pin read failed"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<FeedError> for Error {
    fn from(e: FeedError) -> Self {
        Error::Feed(e)
    }
}

impl From<SyncError> for Error {
    fn from(e: SyncError) -> Self {
        Error::Sync(e)
    }
}

impl From<PinError> for Error {
    fn from(e: PinError) -> Self {
        Error::Pin(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for FeedError {}

#[cfg(feature = "std")]
impl std::error::Error for SyncError {}

#[cfg(feature = "std")]
impl std::error::Error for PinError {}
