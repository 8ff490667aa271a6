//! Mode-keyed feed ratio table.

use core::fmt;

use crate::error::{FeedError, Result};

use super::pitches::{PitchRow, DIAMETRAL, INCH, METRIC, MODULE};

/// Rows in the longest table.
pub const MAX_ROWS: usize = INCH.len();

const MM_PER_INCH: f64 = 25.4;

/// Pitch or feed-rate family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeedMode {
    /// Threads per inch, feeds in inches per revolution.
    Inch,
    /// Metric pitch in millimetres.
    Metric,
    /// Diametral pitch worms.
    Diametral,
    /// Module worms.
    Module,
}

impl FeedMode {
    /// All modes in table order.
    pub const ALL: [FeedMode; 4] = [
        FeedMode::Inch,
        FeedMode::Metric,
        FeedMode::Diametral,
        FeedMode::Module,
    ];

    #[inline]
    const fn slot(self) -> usize {
        match self {
            FeedMode::Inch => 0,
            FeedMode::Metric => 1,
            FeedMode::Diametral => 2,
            FeedMode::Module => 3,
        }
    }

    fn pitches(self) -> &'static [PitchRow] {
        match self {
            FeedMode::Inch => &INCH,
            FeedMode::Metric => &METRIC,
            FeedMode::Diametral => &DIAMETRAL,
            FeedMode::Module => &MODULE,
        }
    }

    /// Leadscrew steps per spindle revolution for one pitch value.
    ///
    /// Rounds half away from zero.
    pub fn steps_for(self, value: f64, steps_per_inch: u32) -> u32 {
        let lspi = steps_per_inch as f64;
        let exact = match self {
            FeedMode::Inch => lspi / value,
            FeedMode::Metric => value * lspi / MM_PER_INCH,
            FeedMode::Diametral => core::f64::consts::PI * lspi / value,
            FeedMode::Module => core::f64::consts::PI * value * lspi / MM_PER_INCH,
        };
        libm::round(exact) as u32
    }

    /// Unit of the rate label.
    pub const fn rate_unit(self) -> &'static str {
        match self {
            FeedMode::Inch | FeedMode::Diametral => "in",
            FeedMode::Metric | FeedMode::Module => "mm",
        }
    }
}

impl fmt::Display for FeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedMode::Inch => write!(f, "inch"),
            FeedMode::Metric => write!(f, "metric"),
            FeedMode::Diametral => write!(f, "diametral"),
            FeedMode::Module => write!(f, "module"),
        }
    }
}

/// One row: the ratio and its labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FeedModeEntry {
    /// Leadscrew steps per spindle revolution.
    pub steps_per_revolution: u32,
    /// Feed per revolution, in the mode's rate unit.
    pub rate: &'static str,
    /// Thread designation, `None` for plain feeds.
    pub pitch: Option<&'static str>,
}

/// A mode and a row within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FeedSelection {
    /// Mode.
    pub mode: FeedMode,
    /// Row index within the mode.
    pub index: usize,
}

impl FeedSelection {
    /// Create a selection.
    pub const fn new(mode: FeedMode, index: usize) -> Self {
        Self { mode, index }
    }
}

/// The four feed tables with step counts computed for one leadscrew.
///
/// Built once at start-up; rows never change afterwards.
#[derive(Debug, Clone)]
pub struct FeedRatioTable {
    steps_per_inch: u32,
    steps: [heapless::Vec<u32, MAX_ROWS>; 4],
}

impl FeedRatioTable {
    /// Compute every row for a leadscrew with `steps_per_inch` steps per inch.
    ///
    /// Fails if any row rounds to zero steps.
    pub fn new(steps_per_inch: u32) -> Result<Self> {
        let mut steps: [heapless::Vec<u32, MAX_ROWS>; 4] = Default::default();

        for mode in FeedMode::ALL {
            let column = &mut steps[mode.slot()];
            for (index, row) in mode.pitches().iter().enumerate() {
                let value = mode.steps_for(row.value, steps_per_inch);
                if value == 0 {
                    return Err(FeedError::ZeroSteps { mode, index }.into());
                }
                // Every pitch table fits MAX_ROWS
                let _ = column.push(value);
            }
        }

        debug!("feed tables built for {} steps/inch", steps_per_inch);
        Ok(Self {
            steps_per_inch,
            steps,
        })
    }

    /// Leadscrew resolution the table was built for.
    #[inline]
    pub fn steps_per_inch(&self) -> u32 {
        self.steps_per_inch
    }

    /// Number of rows in a mode.
    #[inline]
    pub fn len(&self, mode: FeedMode) -> usize {
        self.steps[mode.slot()].len()
    }

    /// Look up one row.
    pub fn get(&self, mode: FeedMode, index: usize) -> Result<FeedModeEntry> {
        let steps = self.steps[mode.slot()].get(index).copied();
        let row = mode.pitches().get(index);
        match (steps, row) {
            (Some(steps_per_revolution), Some(row)) => Ok(FeedModeEntry {
                steps_per_revolution,
                rate: row.rate,
                pitch: row.pitch,
            }),
            _ => Err(FeedError::RowOutOfRange {
                mode,
                index,
                rows: self.len(mode),
            }
            .into()),
        }
    }

    /// Look up a selection.
    #[inline]
    pub fn select(&self, selection: FeedSelection) -> Result<FeedModeEntry> {
        self.get(selection.mode, selection.index)
    }

    /// Iterate the rows of one mode.
    pub fn rows(&self, mode: FeedMode) -> impl Iterator<Item = FeedModeEntry> + '_ {
        self.steps[mode.slot()]
            .iter()
            .zip(mode.pitches())
            .map(|(&steps_per_revolution, row)| FeedModeEntry {
                steps_per_revolution,
                rate: row.rate,
                pitch: row.pitch,
            })
    }
}
