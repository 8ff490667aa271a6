//! Spindle encoder: edge capture, timing calibration and signal integrity.
//!
//! All of this runs in interrupt context. [`SpindleEncoder`] ties the pieces
//! together; the parts are public for hosts that want to wire them differently.

mod calibrator;
mod capture;
mod monitor;
mod pins;
mod quadrature;
mod spindle;

pub use calibrator::{CalibrationState, RevolutionTimingCalibrator, RevolutionVerdict, TimingBaseline};
pub use capture::{EdgeEvent, QuadratureEdgeCapture, RevolutionReport, SpindleReading};
pub use monitor::{IntegrityWindow, SignalIntegrityMonitor};
pub use pins::EncoderPins;
pub use quadrature::{transition, Channel, Phase, QuadratureDecoder, Transition};
pub use spindle::SpindleEncoder;
