//! Classification of everything the core can report.

use core::fmt;

use crate::encoder::Channel;
use crate::sync::Side;

use super::snapshot::{CalibrationStatus, DiagnosticSnapshot};

/// How seriously a condition should be treated by the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Severity {
    /// Expected state, nothing is wrong.
    Status,
    /// Worth logging, does not stop motion.
    Diagnostic,
    /// Should be shown to the operator.
    Fault,
    /// Feed operation halted until cleared.
    Fatal,
}

/// Why steps are believed lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LostStepCause {
    /// A revolution had the wrong number of edges on this channel.
    CountMismatch(Channel),
    /// A/B levels changed in a way no quadrature sequence allows.
    IllegalTransition,
}

/// A reportable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Condition {
    /// Baseline not yet established; monitoring suppressed.
    CalibrationIncomplete,
    /// An A or B edge interval left the margin.
    ChannelTiming(Channel),
    /// Encoder counts were lost.
    LostStep(LostStepCause),
    /// Revolution period deviates from the baseline.
    ZInstability,
    /// Commanded pulse rate exceeded the stepper capability.
    StepRateFault,
    /// Travel limit reached in one direction.
    LimitEngaged(Side),
}

impl Condition {
    /// Severity of the condition.
    pub fn severity(&self) -> Severity {
        match self {
            Condition::CalibrationIncomplete | Condition::LimitEngaged(_) => Severity::Status,
            Condition::ChannelTiming(_) | Condition::ZInstability => Severity::Diagnostic,
            Condition::LostStep(_) => Severity::Fault,
            Condition::StepRateFault => Severity::Fatal,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::CalibrationIncomplete => write!(f, "calibration incomplete"),
            Condition::ChannelTiming(ch) => write!(f, "channel {} timing error", ch),
            Condition::LostStep(LostStepCause::CountMismatch(ch)) => {
                write!(f, "lost steps: channel {} count mismatch", ch)
            }
            Condition::LostStep(LostStepCause::IllegalTransition) => {
                write!(f, "lost steps: illegal quadrature transition")
            }
            Condition::ZInstability => write!(f, "revolution period unstable"),
            Condition::StepRateFault => write!(f, "step rate fault"),
            Condition::LimitEngaged(side) => write!(f, "{} limit engaged", side),
        }
    }
}

/// Upper bound on conditions derived from one snapshot.
pub const MAX_CONDITIONS: usize = 8;

impl DiagnosticSnapshot {
    /// Conditions present in this snapshot, in taxonomy order.
    pub fn conditions(&self) -> heapless::Vec<Condition, MAX_CONDITIONS> {
        let mut out = heapless::Vec::new();
        // Capacity covers every variant pushed below
        let mut push = |c: Condition| {
            let _ = out.push(c);
        };

        if let CalibrationStatus::Calibrating { .. } = self.calibration {
            push(Condition::CalibrationIncomplete);
        }
        for channel in Channel::BOTH {
            if self.channel(channel).error {
                push(Condition::ChannelTiming(channel));
            }
        }
        for channel in Channel::BOTH {
            if self
                .lost_steps
                .channel_mismatch(channel, self.counts_per_revolution as u32)
            {
                push(Condition::LostStep(LostStepCause::CountMismatch(channel)));
            }
        }
        if self.lost_steps.illegal_transitions > 0 {
            push(Condition::LostStep(LostStepCause::IllegalTransition));
        }
        if self.z.unstable {
            push(Condition::ZInstability);
        }
        out
    }

    /// Highest severity present, `None` for a clean revolution.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.conditions().iter().map(Condition::severity).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::snapshot::LostStepState;

    #[test]
    fn test_severity_order() {
        assert!(Condition::StepRateFault.severity() > Condition::LostStep(LostStepCause::IllegalTransition).severity());
        assert!(Condition::LostStep(LostStepCause::IllegalTransition).severity() > Condition::ZInstability.severity());
        assert!(Condition::ChannelTiming(Channel::A).severity() > Condition::CalibrationIncomplete.severity());
        assert_eq!(Condition::LimitEngaged(Side::Left).severity(), Severity::Status);
    }

    #[test]
    fn test_calibrating_snapshot_reports_status_only() {
        let snapshot = DiagnosticSnapshot::EMPTY;
        let conditions = snapshot.conditions();
        assert_eq!(conditions.as_slice(), &[Condition::CalibrationIncomplete]);
        assert_eq!(snapshot.worst_severity(), Some(Severity::Status));
    }

    #[test]
    fn test_count_mismatch_names_the_channel() {
        let snapshot = DiagnosticSnapshot {
            counts_per_revolution: 800,
            lost_steps: LostStepState {
                count_mismatch: true,
                a_count: 799,
                b_count: 800,
                illegal_transitions: 0,
            },
            ..DiagnosticSnapshot::EMPTY
        };

        let conditions = snapshot.conditions();
        assert!(conditions.contains(&Condition::LostStep(LostStepCause::CountMismatch(Channel::A))));
        assert!(!conditions.contains(&Condition::LostStep(LostStepCause::CountMismatch(Channel::B))));
        assert_eq!(snapshot.worst_severity(), Some(Severity::Fault));
    }
}
