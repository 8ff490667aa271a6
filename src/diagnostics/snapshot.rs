//! Diagnostic state carried from the encoder interrupts to the main loop.
//!
//! All types here are `Copy` and fixed-size so a snapshot can be moved across
//! the handoff in one critical section.

use crate::config::units::{FixedPercent, Micros};
use crate::encoder::{Channel, TimingBaseline};

/// Per-channel timing integrity (A or B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelErrorState {
    /// Sticky: an edge interval fell outside the margin.
    pub error: bool,
    /// Lifetime edge count of the channel at the first out-of-margin edge.
    pub error_edge_count: u32,
    /// Edges whose interval was within the margin.
    pub good_edges: u32,
    /// Signed deviation of the last in-margin edge from the expected interval.
    pub last_deviation_us: i32,
}

impl ChannelErrorState {
    /// Cleared state.
    pub const CLEAR: Self = Self {
        error: false,
        error_edge_count: 0,
        good_edges: 0,
        last_deviation_us: 0,
    };
}

/// Revolution period stability against the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ZStabilityState {
    /// Sticky: a revolution period left the stability margin.
    pub unstable: bool,
    /// Duration of the most recent offending revolution.
    pub interval: Micros,
    /// Its signed deviation from the baseline average.
    pub deviation: FixedPercent,
}

impl ZStabilityState {
    /// Cleared state.
    pub const CLEAR: Self = Self {
        unstable: false,
        interval: Micros(0),
        deviation: FixedPercent::ZERO,
    };
}

/// Count integrity and decode integrity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LostStepState {
    /// Sticky: a completed revolution had the wrong A or B edge count.
    pub count_mismatch: bool,
    /// A edges seen in the most recent mismatched revolution.
    pub a_count: u32,
    /// B edges seen in the most recent mismatched revolution.
    pub b_count: u32,
    /// Illegal quadrature transitions since the last handoff.
    pub illegal_transitions: u32,
}

impl LostStepState {
    /// Cleared state.
    pub const CLEAR: Self = Self {
        count_mismatch: false,
        a_count: 0,
        b_count: 0,
        illegal_transitions: 0,
    };

    /// Whether any lost-step condition is present.
    #[inline]
    pub fn any(&self) -> bool {
        self.count_mismatch || self.illegal_transitions > 0
    }

    /// Whether the given channel's count was wrong in the recorded revolution.
    pub fn channel_mismatch(&self, channel: Channel, expected: u32) -> bool {
        if !self.count_mismatch {
            return false;
        }
        match channel {
            Channel::A => self.a_count != expected,
            Channel::B => self.b_count != expected,
        }
    }
}

/// Calibration progress as seen by the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationStatus {
    /// Baseline not yet established; monitoring is suppressed.
    Calibrating {
        /// Samples currently in the window.
        collected: u8,
        /// Window length.
        needed: u8,
    },
    /// Baseline established.
    Tracking(TimingBaseline),
}

impl CalibrationStatus {
    /// The baseline, once established.
    #[inline]
    pub fn baseline(&self) -> Option<&TimingBaseline> {
        match self {
            CalibrationStatus::Calibrating { .. } => None,
            CalibrationStatus::Tracking(baseline) => Some(baseline),
        }
    }
}

/// One revolution's diagnostic result, moved across the handoff as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DiagnosticSnapshot {
    /// Index of the Z edge that closed the revolution (1 = first full revolution).
    pub revolution: u32,
    /// Duration of that revolution.
    pub revolution_time: Micros,
    /// Counts per revolution the counts were checked against.
    pub counts_per_revolution: u16,
    /// Calibration progress.
    pub calibration: CalibrationStatus,
    /// A channel timing integrity.
    pub a: ChannelErrorState,
    /// B channel timing integrity.
    pub b: ChannelErrorState,
    /// Revolution period stability.
    pub z: ZStabilityState,
    /// Count and decode integrity.
    pub lost_steps: LostStepState,
    /// Lifetime A edge count at the Z edge.
    pub a_lifetime: u32,
    /// Lifetime B edge count at the Z edge.
    pub b_lifetime: u32,
}

impl DiagnosticSnapshot {
    /// Placeholder content of an empty mailbox.
    pub const EMPTY: Self = Self {
        revolution: 0,
        revolution_time: Micros(0),
        counts_per_revolution: 0,
        calibration: CalibrationStatus::Calibrating {
            collected: 0,
            needed: 0,
        },
        a: ChannelErrorState::CLEAR,
        b: ChannelErrorState::CLEAR,
        z: ZStabilityState::CLEAR,
        lost_steps: LostStepState::CLEAR,
        a_lifetime: 0,
        b_lifetime: 0,
    };

    /// Channel state by channel.
    #[inline]
    pub fn channel(&self, channel: Channel) -> &ChannelErrorState {
        match channel {
            Channel::A => &self.a,
            Channel::B => &self.b,
        }
    }

    /// Spindle speed for this revolution in RPM, zero if unknown.
    pub fn rpm(&self) -> u32 {
        if self.revolution_time.0 == 0 {
            0
        } else {
            60_000_000 / self.revolution_time.0
        }
    }
}

impl Default for DiagnosticSnapshot {
    fn default() -> Self {
        Self::EMPTY
    }
}
