//! Main-loop leadscrew controller.
//!
//! Owns the feed table, the step generator and the STEP/DIR output. Reads the
//! spindle position published by the encoder interrupts and applies operator
//! commands between pulses.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::Micros;
use crate::config::{validate_config, SystemConfig};
use crate::encoder::SpindleReading;
use crate::error::Result;
use crate::feed::{FeedModeEntry, FeedRatioTable, FeedSelection};

use super::carriage::Side;
use super::command::Command;
use super::generator::{DirectionFlags, SynchronizationState, SynchronizedStepGenerator};
use super::output::PulseOutput;
use super::shared::SharedCell;

/// Electronic leadscrew: spindle-following step output plus operator commands.
///
/// # Example
///
/// ```rust,ignore
/// static SPINDLE: SharedCell<SpindleReading> = SharedCell::new(SpindleReading::ZERO);
///
/// let output = PulseOutput::new(step_pin, dir_pin, delay, &config.leadscrew);
/// let mut els = LeadscrewController::from_config(
///     &config,
///     FeedSelection::new(FeedMode::Inch, 51),
///     output,
///     &SPINDLE,
/// )?;
///
/// loop {
///     if let Some(command) = panel.poll() {
///         els.apply(command)?;
///     }
///     els.tick(clock.now())?;
/// }
/// ```
pub struct LeadscrewController<'a, STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    table: FeedRatioTable,
    selection: FeedSelection,
    generator: SynchronizedStepGenerator,
    output: PulseOutput<STEP, DIR, DELAY>,
    spindle: &'a SharedCell<SpindleReading>,
    last_reading: Option<SpindleReading>,
}

impl<'a, STEP, DIR, DELAY> LeadscrewController<'a, STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Build the controller from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, a feed table row
    /// rounds to zero steps, or `selection` is out of range.
    pub fn from_config(
        config: &SystemConfig,
        selection: FeedSelection,
        output: PulseOutput<STEP, DIR, DELAY>,
        spindle: &'a SharedCell<SpindleReading>,
    ) -> Result<Self> {
        validate_config(config)?;
        let table = FeedRatioTable::new(config.steps_per_inch())?;
        let entry = table.select(selection)?;
        let generator = SynchronizedStepGenerator::new(
            config.counts_per_revolution(),
            entry.steps_per_revolution,
            &config.leadscrew,
        );

        info!(
            "leadscrew ready: {} steps/inch, {} row {} ({} steps/rev)",
            table.steps_per_inch(),
            selection.mode,
            selection.index,
            entry.steps_per_revolution
        );

        Ok(Self {
            table,
            selection,
            generator,
            output,
            spindle,
            last_reading: None,
        })
    }

    /// Apply one operator command.
    pub fn apply(&mut self, command: Command) -> Result<()> {
        debug!("command: {}", command);
        match command {
            Command::SelectFeed(selection) => {
                let entry = self.table.select(selection)?;
                self.generator.set_steps_per_revolution(entry.steps_per_revolution);
                self.selection = selection;
                info!(
                    "feed {} row {}: {} {}",
                    selection.mode,
                    selection.index,
                    entry.rate,
                    selection.mode.rate_unit()
                );
            }
            Command::SetFeedLeft(feed_left) => {
                self.set_direction(DirectionFlags {
                    feed_left,
                    ..self.generator.direction()
                });
            }
            Command::ToggleFeedDirection => {
                let direction = self.generator.direction();
                self.set_direction(DirectionFlags {
                    feed_left: !direction.feed_left,
                    ..direction
                });
            }
            Command::SetSpindleCcw(spindle_ccw) => {
                self.set_direction(DirectionFlags {
                    spindle_ccw,
                    ..self.generator.direction()
                });
            }
            Command::SetLimit(side) => {
                self.generator.carriage_mut().set_limit(side);
                info!("{} limit set at {}", side, self.generator.position().value());
            }
            Command::ClearLimit(side) => {
                self.generator.carriage_mut().clear_limit(side);
                info!("{} limit cleared", side);
            }
            Command::Jog(steps) => self.generator.jog(steps)?,
            Command::SetSynced(synced) => {
                self.generator.set_synced(synced);
                info!("synced: {}", synced);
            }
            Command::ClearFault => {
                if self.generator.fault().is_some() {
                    self.generator.clear_fault();
                    self.last_reading = None;
                    info!("step rate fault cleared");
                }
            }
            Command::ZeroPosition => {
                self.generator.carriage_mut().zero();
                info!("carriage position zeroed");
            }
        }
        Ok(())
    }

    /// Follow the spindle and emit at most one pulse.
    ///
    /// Returns the direction of the emitted pulse. Call as often as possible;
    /// the minimum pulse period is enforced against `now`.
    pub fn tick(&mut self, now: Micros) -> Result<Option<Side>> {
        let reading = self.spindle.load();
        if self.last_reading != Some(reading) {
            self.last_reading = Some(reading);

            let faulted = self.generator.fault().is_some();
            let limited = self.limited();
            self.generator.on_spindle(reading);

            if !faulted {
                if let Some(fault) = self.generator.fault() {
                    error!("step rate fault, feed halted: {}", fault);
                }
            }
            self.log_limits(limited);
        }

        let limited = self.limited();
        let due = self.generator.due_pulse(now);
        self.log_limits(limited);

        let Some(side) = due else {
            return Ok(None);
        };
        self.output.pulse(side)?;
        self.generator.commit_pulse(side, now);
        Ok(Some(side))
    }

    /// Telemetry view of the synchronization state.
    #[inline]
    pub fn state(&self) -> SynchronizationState {
        self.generator.state()
    }

    /// Current feed selection.
    #[inline]
    pub fn selection(&self) -> FeedSelection {
        self.selection
    }

    /// Row of the current feed selection.
    pub fn entry(&self) -> Result<FeedModeEntry> {
        self.table.select(self.selection)
    }

    /// The feed tables.
    #[inline]
    pub fn table(&self) -> &FeedRatioTable {
        &self.table
    }

    /// The pulse output.
    #[inline]
    pub fn output(&self) -> &PulseOutput<STEP, DIR, DELAY> {
        &self.output
    }

    /// Tear down and give the output back.
    pub fn release(self) -> PulseOutput<STEP, DIR, DELAY> {
        self.output
    }

    fn set_direction(&mut self, direction: DirectionFlags) {
        self.generator.set_direction(direction);
        info!("feeding {}", direction.feed_side());
    }

    fn limited(&self) -> [bool; 2] {
        let carriage = self.generator.carriage();
        [carriage.is_limited(Side::Left), carriage.is_limited(Side::Right)]
    }

    fn log_limits(&self, before: [bool; 2]) {
        let after = self.limited();
        for (i, side) in [Side::Left, Side::Right].into_iter().enumerate() {
            if after[i] && !before[i] {
                info!("{} limit engaged", side);
            }
        }
    }
}
