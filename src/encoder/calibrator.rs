//! Revolution timing calibration.
//!
//! Collects inter-Z intervals until a full window of them agrees with its own
//! mean, then freezes that mean as the [`TimingBaseline`] and tracks every later
//! revolution against it.

use heapless::Deque;

use crate::config::units::{FixedPercent, Micros};
use crate::config::{EncoderConfig, MAX_CALIBRATION_SAMPLES};
use crate::diagnostics::{CalibrationStatus, ZStabilityState};

/// Timing reference derived from the calibrated revolution period.
///
/// Every field is computed from the average in [`TimingBaseline::from_average`];
/// there are no setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingBaseline {
    average: Micros,
    stability_margin: Micros,
    edge_interval: Micros,
    edge_margin: Micros,
}

impl TimingBaseline {
    /// Derive the baseline and its margins from an average revolution period.
    pub fn from_average(
        average: Micros,
        counts_per_revolution: u16,
        acceptable_margin_percent: u8,
        settle_margin_percent: u8,
    ) -> Self {
        let avg = average.0 as u64;
        let edge_interval = if counts_per_revolution == 0 {
            0
        } else {
            avg / counts_per_revolution as u64
        };
        Self {
            average,
            stability_margin: Micros((avg * settle_margin_percent as u64 / 100) as u32),
            edge_interval: Micros(edge_interval as u32),
            edge_margin: Micros((edge_interval * acceptable_margin_percent as u64 / 100) as u32),
        }
    }

    /// Average revolution period.
    #[inline]
    pub const fn average(&self) -> Micros {
        self.average
    }

    /// Allowed revolution period deviation.
    #[inline]
    pub const fn stability_margin(&self) -> Micros {
        self.stability_margin
    }

    /// Expected interval between consecutive edges of one channel.
    #[inline]
    pub const fn edge_interval(&self) -> Micros {
        self.edge_interval
    }

    /// Allowed edge interval deviation.
    #[inline]
    pub const fn edge_margin(&self) -> Micros {
        self.edge_margin
    }

    /// Signed deviation of an edge interval, if it lies within the margin.
    ///
    /// The margin is inclusive.
    pub fn edge_deviation(&self, interval: Micros) -> Option<i64> {
        let deviation = interval.deviation_from(self.edge_interval);
        (deviation.unsigned_abs() <= self.edge_margin.0 as u64).then_some(deviation)
    }

    /// Spindle speed implied by the baseline in RPM.
    pub fn rpm(&self) -> u32 {
        if self.average.0 == 0 {
            0
        } else {
            60_000_000 / self.average.0
        }
    }
}

/// Calibrator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationState {
    /// Still collecting a stable window.
    Calibrating,
    /// Baseline frozen.
    Tracking(TimingBaseline),
}

/// What one revolution did to the calibrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RevolutionVerdict {
    /// Sample stored, window not yet stable.
    Calibrating {
        /// Samples now in the window.
        collected: u8,
        /// Window length.
        needed: u8,
    },
    /// This revolution completed calibration.
    Established(TimingBaseline),
    /// Period within the stability margin.
    Stable(FixedPercent),
    /// Period outside the stability margin.
    Unstable(FixedPercent),
}

/// Establishes and holds the revolution timing baseline.
#[derive(Debug, Clone)]
pub struct RevolutionTimingCalibrator {
    samples: Deque<Micros, MAX_CALIBRATION_SAMPLES>,
    window: usize,
    counts_per_revolution: u16,
    acceptable_margin_percent: u8,
    settle_margin_percent: u8,
    state: CalibrationState,
    stability: ZStabilityState,
}

impl RevolutionTimingCalibrator {
    /// Create a calibrator in the Calibrating state.
    ///
    /// The window length is clamped to `1..=MAX_CALIBRATION_SAMPLES`; use
    /// [`crate::config::validate_config`] to reject such configurations instead.
    pub fn new(config: &EncoderConfig) -> Self {
        Self {
            samples: Deque::new(),
            window: config.window_len().clamp(1, MAX_CALIBRATION_SAMPLES),
            counts_per_revolution: config.counts_per_revolution,
            acceptable_margin_percent: config.acceptable_margin_percent,
            settle_margin_percent: config.settle_margin_percent,
            state: CalibrationState::Calibrating,
            stability: ZStabilityState::CLEAR,
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> &CalibrationState {
        &self.state
    }

    /// The baseline, once established.
    #[inline]
    pub fn baseline(&self) -> Option<&TimingBaseline> {
        match &self.state {
            CalibrationState::Calibrating => None,
            CalibrationState::Tracking(baseline) => Some(baseline),
        }
    }

    /// Progress as published in snapshots.
    pub fn status(&self) -> CalibrationStatus {
        match self.state {
            CalibrationState::Calibrating => CalibrationStatus::Calibrating {
                collected: self.samples.len() as u8,
                needed: self.window as u8,
            },
            CalibrationState::Tracking(baseline) => CalibrationStatus::Tracking(baseline),
        }
    }

    /// Feed one inter-Z interval.
    pub fn on_revolution(&mut self, interval: Micros) -> RevolutionVerdict {
        match self.state {
            CalibrationState::Calibrating => self.calibrate(interval),
            CalibrationState::Tracking(baseline) => self.track(&baseline, interval),
        }
    }

    /// Stability state accumulated since the last take, leaving it cleared.
    #[inline]
    pub fn take_stability(&mut self) -> ZStabilityState {
        core::mem::replace(&mut self.stability, ZStabilityState::CLEAR)
    }

    /// Stability state accumulated since the last take.
    #[inline]
    pub fn stability(&self) -> &ZStabilityState {
        &self.stability
    }

    /// Drop the baseline and start calibrating again.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.state = CalibrationState::Calibrating;
        self.stability = ZStabilityState::CLEAR;
    }

    fn calibrate(&mut self, interval: Micros) -> RevolutionVerdict {
        if self.samples.is_full() {
            self.samples.pop_front();
        }
        // Capacity was freed above
        let _ = self.samples.push_back(interval);

        if self.samples.len() < self.window {
            return self.progress();
        }

        let sum: u64 = self.samples.iter().map(|s| s.0 as u64).sum();
        let mean = (sum / self.samples.len() as u64) as u32;
        let settle = (mean as u64 * self.settle_margin_percent as u64 / 100) as u32;
        let settled = self
            .samples
            .iter()
            .all(|s| s.deviation_from(Micros(mean)).unsigned_abs() <= settle as u64);

        if !settled {
            self.samples.pop_front();
            return self.progress();
        }

        let baseline = TimingBaseline::from_average(
            Micros(mean),
            self.counts_per_revolution,
            self.acceptable_margin_percent,
            self.settle_margin_percent,
        );
        self.samples.clear();
        self.state = CalibrationState::Tracking(baseline);
        RevolutionVerdict::Established(baseline)
    }

    fn track(&mut self, baseline: &TimingBaseline, interval: Micros) -> RevolutionVerdict {
        let deviation = interval.deviation_from(baseline.average());
        let percent = FixedPercent::of(deviation, baseline.average().0);

        if deviation.unsigned_abs() > baseline.stability_margin().0 as u64 {
            self.stability = ZStabilityState {
                unstable: true,
                interval,
                deviation: percent,
            };
            RevolutionVerdict::Unstable(percent)
        } else {
            RevolutionVerdict::Stable(percent)
        }
    }

    fn progress(&self) -> RevolutionVerdict {
        RevolutionVerdict::Calibrating {
            collected: self.samples.len() as u8,
            needed: self.window as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: [u32; 10] = [
        100_000, 101_000, 99_500, 100_200, 99_800, 100_300, 99_700, 100_100, 100_400, 99_900,
    ];

    fn calibrator() -> RevolutionTimingCalibrator {
        RevolutionTimingCalibrator::new(&EncoderConfig::default())
    }

    #[test]
    fn test_example_window_calibrates() {
        let mut cal = calibrator();

        for &sample in &EXAMPLE[..9] {
            assert!(matches!(
                cal.on_revolution(Micros(sample)),
                RevolutionVerdict::Calibrating { needed: 10, .. }
            ));
        }

        let verdict = cal.on_revolution(Micros(EXAMPLE[9]));
        let baseline = match verdict {
            RevolutionVerdict::Established(b) => b,
            other => panic!("expected baseline, got {:?}", other),
        };

        assert_eq!(baseline.average(), Micros(100_090));
        assert_eq!(baseline.stability_margin(), Micros(5_004));
        assert_eq!(baseline.edge_interval(), Micros(125));
        assert_eq!(baseline.edge_margin(), Micros(12));
        assert_eq!(cal.baseline(), Some(&baseline));
    }

    #[test]
    fn test_unstable_window_slides() {
        let mut cal = calibrator();

        // One outlier in the first window
        cal.on_revolution(Micros(150_000));
        for _ in 0..9 {
            cal.on_revolution(Micros(100_000));
        }
        assert!(cal.baseline().is_none());
        assert_eq!(
            cal.status(),
            CalibrationStatus::Calibrating { collected: 9, needed: 10 }
        );

        // Outlier evicted, next sample completes a stable window
        let verdict = cal.on_revolution(Micros(100_000));
        assert!(matches!(verdict, RevolutionVerdict::Established(_)));
        assert_eq!(cal.baseline().map(|b| b.average()), Some(Micros(100_000)));
    }

    #[test]
    fn test_baseline_is_frozen_while_tracking() {
        let mut cal = calibrator();
        for _ in 0..10 {
            cal.on_revolution(Micros(100_000));
        }

        // Within 5 %
        assert_eq!(
            cal.on_revolution(Micros(104_000)),
            RevolutionVerdict::Stable(FixedPercent(400))
        );
        assert!(!cal.stability().unstable);

        // Sustained speed change is reported, not absorbed
        for _ in 0..20 {
            assert!(matches!(
                cal.on_revolution(Micros(90_000)),
                RevolutionVerdict::Unstable(_)
            ));
        }
        assert_eq!(cal.baseline().map(|b| b.average()), Some(Micros(100_000)));

        let stability = cal.take_stability();
        assert!(stability.unstable);
        assert_eq!(stability.interval, Micros(90_000));
        assert_eq!(stability.deviation, FixedPercent(-1000));
        assert_eq!(*cal.stability(), ZStabilityState::CLEAR);
    }

    #[test]
    fn test_reset_returns_to_calibrating() {
        let mut cal = calibrator();
        for _ in 0..10 {
            cal.on_revolution(Micros(100_000));
        }
        assert!(cal.baseline().is_some());

        cal.reset();
        assert_eq!(*cal.state(), CalibrationState::Calibrating);
        for _ in 0..10 {
            cal.on_revolution(Micros(50_000));
        }
        assert_eq!(cal.baseline().map(|b| b.average()), Some(Micros(50_000)));
    }

    #[test]
    fn test_edge_deviation_is_inclusive() {
        let baseline = TimingBaseline::from_average(Micros(100_000), 800, 10, 5);
        assert_eq!(baseline.edge_interval(), Micros(125));
        assert_eq!(baseline.edge_margin(), Micros(12));

        assert_eq!(baseline.edge_deviation(Micros(137)), Some(12));
        assert_eq!(baseline.edge_deviation(Micros(113)), Some(-12));
        assert_eq!(baseline.edge_deviation(Micros(138)), None);
        assert_eq!(baseline.rpm(), 600);
    }
}
