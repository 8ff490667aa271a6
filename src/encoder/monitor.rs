//! A/B edge timing and per-revolution count integrity.

use crate::config::units::Micros;
use crate::diagnostics::{ChannelErrorState, LostStepState};

use super::calibrator::TimingBaseline;
use super::quadrature::Channel;

/// Monitor state accumulated between two handoffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntegrityWindow {
    /// Channel A timing.
    pub a: ChannelErrorState,
    /// Channel B timing.
    pub b: ChannelErrorState,
    /// Count and decode integrity.
    pub lost_steps: LostStepState,
}

/// Validates edge intervals and revolution counts against the baseline.
///
/// Timing checks run only once a baseline exists; before that the monitor
/// only keeps the per-channel edge timestamps current.
#[derive(Debug, Clone)]
pub struct SignalIntegrityMonitor {
    counts_per_revolution: u16,
    last_edge: [Option<Micros>; 2],
    window: IntegrityWindow,
}

impl SignalIntegrityMonitor {
    /// Create a monitor for an encoder with the given resolution.
    pub const fn new(counts_per_revolution: u16) -> Self {
        Self {
            counts_per_revolution,
            last_edge: [None, None],
            window: IntegrityWindow {
                a: ChannelErrorState::CLEAR,
                b: ChannelErrorState::CLEAR,
                lost_steps: LostStepState::CLEAR,
            },
        }
    }

    /// Check one A or B edge.
    ///
    /// `lifetime` is the channel's lifetime edge count including this edge.
    pub fn on_edge(
        &mut self,
        channel: Channel,
        at: Micros,
        lifetime: u32,
        baseline: Option<&TimingBaseline>,
    ) {
        let slot = match channel {
            Channel::A => 0,
            Channel::B => 1,
        };
        let previous = self.last_edge[slot].replace(at);

        let (Some(baseline), Some(previous)) = (baseline, previous) else {
            return;
        };

        let state = self.channel_mut(channel);
        match baseline.edge_deviation(at.since(previous)) {
            Some(deviation) => {
                state.good_edges = state.good_edges.wrapping_add(1);
                state.last_deviation_us = deviation.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
            }
            None if !state.error => {
                state.error = true;
                state.error_edge_count = lifetime;
            }
            None => {}
        }
    }

    /// Record an illegal quadrature transition.
    #[inline]
    pub fn on_decode_fault(&mut self) {
        let lost = &mut self.window.lost_steps;
        lost.illegal_transitions = lost.illegal_transitions.saturating_add(1);
    }

    /// Check the edge counts of a completed revolution.
    ///
    /// Returns `true` on a count mismatch. Skipped while no baseline exists.
    pub fn on_revolution(
        &mut self,
        a_count: u32,
        b_count: u32,
        baseline: Option<&TimingBaseline>,
    ) -> bool {
        if baseline.is_none() {
            return false;
        }
        let expected = self.counts_per_revolution as u32;
        if a_count == expected && b_count == expected {
            return false;
        }
        let lost = &mut self.window.lost_steps;
        lost.count_mismatch = true;
        lost.a_count = a_count;
        lost.b_count = b_count;
        true
    }

    /// Window accumulated since the last take.
    #[inline]
    pub fn window(&self) -> &IntegrityWindow {
        &self.window
    }

    /// Move the accumulated window out, leaving it cleared.
    #[inline]
    pub fn take_window(&mut self) -> IntegrityWindow {
        core::mem::take(&mut self.window)
    }

    fn channel_mut(&mut self, channel: Channel) -> &mut ChannelErrorState {
        match channel {
            Channel::A => &mut self.window.a,
            Channel::B => &mut self.window.b,
        }
    }
}
