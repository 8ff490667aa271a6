//! Spindle-synchronized leadscrew stepping.

mod carriage;
mod command;
mod controller;
mod generator;
mod output;
mod shared;

pub use carriage::{Carriage, Side, TravelLimit};
pub use command::Command;
pub use controller::LeadscrewController;
pub use generator::{
    DirectionFlags, RateFault, SynchronizationState, SynchronizedStepGenerator, MAX_JOG_STEPS,
};
pub use output::PulseOutput;
pub use shared::SharedCell;
