//! Spindle encoder facade wiring capture, calibration, monitoring and handoff.

use crate::config::units::Micros;
use crate::config::EncoderConfig;
use crate::diagnostics::{DiagnosticProducer, DiagnosticSnapshot};
use crate::sync::SharedCell;

use super::calibrator::{RevolutionTimingCalibrator, RevolutionVerdict};
use super::capture::{QuadratureEdgeCapture, SpindleReading};
use super::monitor::SignalIntegrityMonitor;
use super::quadrature::{Channel, Phase, Transition};

/// Everything that runs in the encoder interrupt handlers.
///
/// Call [`on_a`](Self::on_a), [`on_b`](Self::on_b) and [`on_z`](Self::on_z)
/// from the matching line interrupts, which must not preempt each other.
/// Nothing here blocks or logs.
pub struct SpindleEncoder<'a> {
    capture: QuadratureEdgeCapture,
    calibrator: RevolutionTimingCalibrator,
    monitor: SignalIntegrityMonitor,
    producer: DiagnosticProducer<'a>,
    reading: &'a SharedCell<SpindleReading>,
}

impl<'a> SpindleEncoder<'a> {
    /// Create the encoder pipeline.
    ///
    /// `initial` is the A/B state sampled before enabling the interrupts.
    /// `reading` receives the spindle position after every A edge.
    pub fn new(
        config: &EncoderConfig,
        initial: Phase,
        producer: DiagnosticProducer<'a>,
        reading: &'a SharedCell<SpindleReading>,
    ) -> Self {
        let capture = QuadratureEdgeCapture::new(config.counts_per_revolution, initial);
        reading.store(capture.reading());
        Self {
            capture,
            calibrator: RevolutionTimingCalibrator::new(config),
            monitor: SignalIntegrityMonitor::new(config.counts_per_revolution),
            producer,
            reading,
        }
    }

    /// A-line interrupt.
    pub fn on_a(&mut self, at: Micros, phase: Phase) {
        let event = self.capture.on_a(at, phase);
        self.record(event.transition);
        self.monitor
            .on_edge(event.channel, at, event.lifetime, self.calibrator.baseline());
        if event.transition != Transition::Idle {
            self.reading.store(self.capture.reading());
        }
    }

    /// B-line interrupt.
    pub fn on_b(&mut self, at: Micros, phase: Phase) {
        let event = self.capture.on_b(at, phase);
        self.record(event.transition);
        self.monitor
            .on_edge(event.channel, at, event.lifetime, self.calibrator.baseline());
    }

    /// Z-line interrupt.
    ///
    /// Once a revolution is closed, posts a snapshot if the consumer has
    /// drained the previous one. Otherwise the live state keeps accumulating
    /// and goes out with a later revolution.
    pub fn on_z(&mut self, at: Micros) -> Option<RevolutionVerdict> {
        let report = self.capture.on_z(at)?;

        self.monitor
            .on_revolution(report.a_count, report.b_count, self.calibrator.baseline());
        let verdict = self.calibrator.on_revolution(report.interval);

        if self.producer.is_drained() {
            let window = self.monitor.take_window();
            let snapshot = DiagnosticSnapshot {
                revolution: report.index,
                revolution_time: report.interval,
                counts_per_revolution: self.capture.counts_per_revolution(),
                calibration: self.calibrator.status(),
                a: window.a,
                b: window.b,
                z: self.calibrator.take_stability(),
                lost_steps: window.lost_steps,
                a_lifetime: self.capture.lifetime(Channel::A),
                b_lifetime: self.capture.lifetime(Channel::B),
            };
            // Drained was checked above and only this producer posts
            let _ = self.producer.try_post(snapshot);
        }

        Some(verdict)
    }

    /// Drop the baseline and recalibrate.
    pub fn recalibrate(&mut self) {
        self.calibrator.reset();
    }

    /// Edge capture state.
    #[inline]
    pub fn capture(&self) -> &QuadratureEdgeCapture {
        &self.capture
    }

    /// Calibrator state.
    #[inline]
    pub fn calibrator(&self) -> &RevolutionTimingCalibrator {
        &self.calibrator
    }

    /// Monitor state.
    #[inline]
    pub fn monitor(&self) -> &SignalIntegrityMonitor {
        &self.monitor
    }

    fn record(&mut self, transition: Transition) {
        if transition == Transition::Illegal {
            self.monitor.on_decode_fault();
        }
    }
}
