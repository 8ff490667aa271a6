//! Diagnostic snapshots and their handoff to the main loop.
//!
//! The encoder interrupts fill a [`DiagnosticSnapshot`] per revolution and post
//! it through a [`DiagnosticMailbox`]. The main loop polls the mailbox and hands
//! snapshots to a [`DiagnosticReporter`], which classifies them into
//! [`Condition`]s and logs what the configured [`Verbosity`](crate::config::Verbosity) asks for.

mod condition;
mod mailbox;
mod report;
mod snapshot;

pub use condition::{Condition, LostStepCause, Severity, MAX_CONDITIONS};
pub use mailbox::{DiagnosticConsumer, DiagnosticMailbox, DiagnosticProducer};
pub use report::{should_report, DiagnosticReporter};
pub use snapshot::{
    CalibrationStatus, ChannelErrorState, DiagnosticSnapshot, LostStepState, ZStabilityState,
};
