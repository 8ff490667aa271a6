//! Main-loop reporting of diagnostic snapshots.

use crate::config::Verbosity;

use super::condition::{Condition, Severity};
use super::snapshot::{CalibrationStatus, DiagnosticSnapshot};

/// Whether a snapshot passes the verbosity filter.
///
/// - `Minimal`: only snapshots carrying a fault or worse
/// - `Medium`: any snapshot with a condition, calibration progress included
/// - `All`: every snapshot
pub fn should_report(snapshot: &DiagnosticSnapshot, verbosity: Verbosity) -> bool {
    match verbosity {
        Verbosity::All => true,
        Verbosity::Medium => snapshot.worst_severity().is_some(),
        Verbosity::Minimal => snapshot
            .worst_severity()
            .map_or(false, |s| s >= Severity::Fault),
    }
}

/// Emit one condition at a log level matching its severity.
pub(crate) fn log_condition(revolution: u32, condition: &Condition) {
    match condition.severity() {
        Severity::Status => debug!("rev {}: {}", revolution, condition),
        Severity::Diagnostic => warn!("rev {}: {}", revolution, condition),
        Severity::Fault | Severity::Fatal => error!("rev {}: {}", revolution, condition),
    }
}

/// Consumer-side escalation of snapshots.
#[derive(Debug, Clone)]
pub struct DiagnosticReporter {
    verbosity: Verbosity,
    baseline_announced: bool,
    reported: u32,
}

impl DiagnosticReporter {
    /// Create a reporter with the given verbosity.
    pub const fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            baseline_announced: false,
            reported: 0,
        }
    }

    /// Configured verbosity.
    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Snapshots that passed the filter so far.
    #[inline]
    pub fn reported(&self) -> u32 {
        self.reported
    }

    /// Classify and log one snapshot. Returns whether it passed the filter.
    pub fn report(&mut self, snapshot: &DiagnosticSnapshot) -> bool {
        if let CalibrationStatus::Tracking(baseline) = snapshot.calibration {
            if !self.baseline_announced {
                self.baseline_announced = true;
                info!(
                    "baseline established: {} per rev, {} per edge (+/- {})",
                    baseline.average(),
                    baseline.edge_interval(),
                    baseline.edge_margin()
                );
            }
        }

        if !should_report(snapshot, self.verbosity) {
            return false;
        }
        self.reported = self.reported.wrapping_add(1);

        let conditions = snapshot.conditions();
        if conditions.is_empty() {
            trace!(
                "rev {}: {} ({} rpm), clean",
                snapshot.revolution,
                snapshot.revolution_time,
                snapshot.rpm()
            );
        }
        for condition in conditions.iter() {
            log_condition(snapshot.revolution, condition);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::{FixedPercent, Micros};
    use crate::diagnostics::snapshot::{LostStepState, ZStabilityState};
    use crate::encoder::TimingBaseline;

    fn tracking() -> DiagnosticSnapshot {
        DiagnosticSnapshot {
            revolution: 12,
            revolution_time: Micros(100_000),
            counts_per_revolution: 800,
            calibration: CalibrationStatus::Tracking(TimingBaseline::from_average(
                Micros(100_000),
                800,
                10,
                5,
            )),
            ..DiagnosticSnapshot::EMPTY
        }
    }

    #[test]
    fn test_verbosity_filter() {
        let clean = tracking();
        let unstable = DiagnosticSnapshot {
            z: ZStabilityState {
                unstable: true,
                interval: Micros(110_000),
                deviation: FixedPercent(1000),
            },
            ..tracking()
        };
        let lost = DiagnosticSnapshot {
            lost_steps: LostStepState {
                illegal_transitions: 2,
                ..LostStepState::CLEAR
            },
            ..tracking()
        };

        assert!(should_report(&clean, Verbosity::All));
        assert!(!should_report(&clean, Verbosity::Medium));
        assert!(!should_report(&clean, Verbosity::Minimal));

        assert!(should_report(&unstable, Verbosity::Medium));
        assert!(!should_report(&unstable, Verbosity::Minimal));

        assert!(should_report(&lost, Verbosity::Minimal));
        assert!(should_report(&DiagnosticSnapshot::EMPTY, Verbosity::Medium));
    }

    #[test]
    fn test_reporter_counts_reported_snapshots() {
        let mut reporter = DiagnosticReporter::new(Verbosity::Minimal);
        assert!(!reporter.report(&tracking()));

        let lost = DiagnosticSnapshot {
            lost_steps: LostStepState {
                count_mismatch: true,
                a_count: 799,
                b_count: 800,
                illegal_transitions: 0,
            },
            ..tracking()
        };
        assert!(reporter.report(&lost));
        assert_eq!(reporter.reported(), 1);
    }
}
