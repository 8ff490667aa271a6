//! Spindle-synchronized step generation.
//!
//! Spindle counts are converted to leadscrew steps through an integer
//! accumulator: a spindle advance of `d` counts adds `d * spr` to it and every
//! multiple of `cpr` crossed is one step. The remainder always equals
//! `(position * spr) mod cpr` for the current spindle position, so stepping
//! stays phase-locked to the spindle and never drifts.

use crate::config::units::{Micros, Steps};
use crate::config::LeadscrewConfig;
use crate::diagnostics::Condition;
use crate::encoder::SpindleReading;
use crate::error::{Result, SyncError};

use super::carriage::{Carriage, Side};

/// Largest jog request accepted at once, in steps.
pub const MAX_JOG_STEPS: i32 = 1_000_000;

/// Spindle counts worth of steps that may be waiting before it is an overrun.
const PENDING_COUNTS: u32 = 8;

/// Operator direction settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DirectionFlags {
    /// Feed toward the headstock.
    pub feed_left: bool,
    /// Spindle runs counter-clockwise.
    pub spindle_ccw: bool,
}

impl Default for DirectionFlags {
    fn default() -> Self {
        Self {
            feed_left: true,
            spindle_ccw: true,
        }
    }
}

impl DirectionFlags {
    /// Whether forward spindle rotation moves the carriage left.
    #[inline]
    pub const fn feeding_left(&self) -> bool {
        (self.spindle_ccw && self.feed_left) || (!self.spindle_ccw && !self.feed_left)
    }

    /// Carriage direction for forward spindle rotation.
    #[inline]
    pub const fn feed_side(&self) -> Side {
        if self.feeding_left() {
            Side::Left
        } else {
            Side::Right
        }
    }
}

/// Why step emission halted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RateFault {
    /// Spindle speed requires more steps per second than the drive allows.
    Overspeed {
        /// Required step rate.
        required_hz: u32,
        /// Configured limit.
        limit_hz: u32,
    },
    /// Steps were accrued faster than they could be emitted.
    Backlog {
        /// Steps waiting when the fault latched.
        pending: i32,
    },
}

/// Read-only view of the synchronization state for telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SynchronizationState {
    /// Spindle position within the revolution.
    pub spindle_position: u16,
    /// Carriage position and limits.
    pub carriage: Carriage,
    /// Direction settings.
    pub direction: DirectionFlags,
    /// Stepping follows the spindle.
    pub synced: bool,
    /// Latched rate fault.
    pub fault: Option<RateFault>,
    /// Spindle-synchronized steps waiting to be emitted (signed).
    pub pending: i32,
    /// Jog steps waiting to be emitted (signed).
    pub jog_pending: i32,
    /// Selected ratio.
    pub steps_per_revolution: u32,
}

impl SynchronizationState {
    /// Conditions visible in this state.
    pub fn conditions(&self) -> heapless::Vec<Condition, 3> {
        let mut out = heapless::Vec::new();
        if self.fault.is_some() {
            let _ = out.push(Condition::StepRateFault);
        }
        for side in [Side::Left, Side::Right] {
            if self.carriage.is_limited(side) {
                let _ = out.push(Condition::LimitEngaged(side));
            }
        }
        out
    }
}

/// Converts spindle motion into carriage steps at the selected ratio.
#[derive(Debug, Clone)]
pub struct SynchronizedStepGenerator {
    counts_per_revolution: u32,
    steps_per_revolution: u32,
    max_rate_hz: u32,
    min_period: Micros,
    carry: u32,
    last_spindle: Option<SpindleReading>,
    pending: i32,
    jog_pending: i32,
    last_pulse: Option<Micros>,
    direction: DirectionFlags,
    carriage: Carriage,
    synced: bool,
    fault: Option<RateFault>,
}

impl SynchronizedStepGenerator {
    /// Create a synced generator with the carriage at zero.
    pub fn new(counts_per_revolution: u16, steps_per_revolution: u32, leadscrew: &LeadscrewConfig) -> Self {
        Self {
            counts_per_revolution: (counts_per_revolution as u32).max(1),
            steps_per_revolution,
            max_rate_hz: leadscrew.max_step_rate_hz(),
            min_period: Micros(leadscrew.min_pulse_period),
            carry: 0,
            last_spindle: None,
            pending: 0,
            jog_pending: 0,
            last_pulse: None,
            direction: DirectionFlags::default(),
            carriage: Carriage::new(),
            synced: true,
            fault: None,
        }
    }

    /// Feed a new spindle reading.
    ///
    /// Readings must arrive less than half a revolution apart. The first
    /// reading after construction or [`clear_fault`](Self::clear_fault) only
    /// anchors the accumulator. The step rate is checked only between two
    /// readings stamped by real edges.
    ///
    /// Edge timestamps wrap after about 71 minutes, so the first edge after a
    /// longer stall is timed against a wrapped interval.
    pub fn on_spindle(&mut self, reading: SpindleReading) {
        let Some(last) = self.last_spindle.replace(reading) else {
            self.anchor(reading.position);
            return;
        };

        let delta = self.spindle_delta(last.position, reading.position);
        if delta == 0 {
            return;
        }

        let cpr = self.counts_per_revolution as i64;
        let value = self.carry as i64 + delta * self.steps_per_revolution as i64;
        self.carry = value.rem_euclid(cpr) as u32;
        let ticks = value.div_euclid(cpr);

        if !self.synced || self.fault.is_some() {
            return;
        }

        if let (Some(now), Some(then)) = (reading.at, last.at) {
            if let Some(required_hz) = self.overspeed(delta, now.since(then)) {
                self.latch(RateFault::Overspeed {
                    required_hz,
                    limit_hz: self.max_rate_hz,
                });
                return;
            }
        }
        if ticks == 0 {
            return;
        }

        let steps = ticks * self.direction.feed_side().sign();
        let Some(side) = Side::of(steps) else {
            return;
        };
        if self.carriage.at_limit(side) {
            self.carriage.engage(side);
            return;
        }

        let pending = self.pending as i64 + steps;
        if pending.unsigned_abs() > self.backlog_limit() as u64 {
            self.latch(RateFault::Backlog {
                pending: pending.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            });
            return;
        }
        self.pending = pending as i32;
    }

    /// Direction of the next step if one may be emitted at `now`.
    ///
    /// Holds steps back until the minimum period since the previous step has
    /// passed. A step toward an engaged limit is dropped and the limit flag set.
    pub fn due_pulse(&mut self, now: Micros) -> Option<Side> {
        if self.fault.is_some() {
            return None;
        }
        let queued = if self.synced { self.pending } else { self.jog_pending };
        let side = Side::of(queued as i64)?;

        if let Some(last) = self.last_pulse {
            if now.since(last) < self.min_period {
                return None;
            }
        }

        if self.carriage.at_limit(side) {
            self.carriage.engage(side);
            if self.synced {
                self.pending = 0;
            } else {
                self.jog_pending = 0;
            }
            return None;
        }
        Some(side)
    }

    /// Record a step emitted toward `side` at `now`.
    pub fn commit_pulse(&mut self, side: Side, now: Micros) {
        let sign = side.sign() as i32;
        if self.synced {
            self.pending -= sign;
        } else {
            self.jog_pending -= sign;
        }
        self.carriage.step(side);
        self.last_pulse = Some(now);
    }

    /// [`due_pulse`](Self::due_pulse) and [`commit_pulse`](Self::commit_pulse) in one call.
    pub fn poll_pulse(&mut self, now: Micros) -> Option<Side> {
        let side = self.due_pulse(now)?;
        self.commit_pulse(side, now);
        Some(side)
    }

    /// Select a new ratio. The accumulator is realigned to the spindle position.
    pub fn set_steps_per_revolution(&mut self, steps_per_revolution: u32) {
        self.steps_per_revolution = steps_per_revolution;
        self.pending = 0;
        if let Some(last) = self.last_spindle {
            self.anchor(last.position);
        }
    }

    /// Follow the spindle or stop following it.
    ///
    /// Dropping sync discards steps not yet emitted; entering sync discards
    /// any unfinished jog.
    pub fn set_synced(&mut self, synced: bool) {
        self.synced = synced;
        self.pending = 0;
        self.jog_pending = 0;
    }

    /// Queue a jog of `steps` (positive is right).
    pub fn jog(&mut self, steps: i32) -> Result<()> {
        if self.fault.is_some() {
            return Err(SyncError::Faulted.into());
        }
        if self.synced {
            return Err(SyncError::JogWhileSynced.into());
        }
        let total = self.jog_pending as i64 + steps as i64;
        if total.unsigned_abs() > MAX_JOG_STEPS as u64 {
            return Err(SyncError::JogTooLarge(steps).into());
        }
        self.jog_pending = total as i32;
        Ok(())
    }

    /// Clear a latched rate fault. The next reading re-anchors the accumulator.
    pub fn clear_fault(&mut self) {
        self.fault = None;
        self.pending = 0;
        self.last_spindle = None;
    }

    /// Replace the direction settings. Waiting steps are discarded.
    pub fn set_direction(&mut self, direction: DirectionFlags) {
        if direction.feed_side() != self.direction.feed_side() {
            self.pending = 0;
        }
        self.direction = direction;
    }

    /// Direction settings.
    #[inline]
    pub fn direction(&self) -> DirectionFlags {
        self.direction
    }

    /// Carriage and limits.
    #[inline]
    pub fn carriage(&self) -> &Carriage {
        &self.carriage
    }

    /// Carriage and limits, mutable for limit commands and zero-set.
    #[inline]
    pub fn carriage_mut(&mut self) -> &mut Carriage {
        &mut self.carriage
    }

    /// Carriage position.
    #[inline]
    pub fn position(&self) -> Steps {
        self.carriage.position()
    }

    /// Latched fault.
    #[inline]
    pub fn fault(&self) -> Option<RateFault> {
        self.fault
    }

    /// Whether stepping follows the spindle.
    #[inline]
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// Selected ratio.
    #[inline]
    pub fn steps_per_revolution(&self) -> u32 {
        self.steps_per_revolution
    }

    /// Telemetry view.
    pub fn state(&self) -> SynchronizationState {
        SynchronizationState {
            spindle_position: self.last_spindle.map_or(0, |r| r.position),
            carriage: self.carriage,
            direction: self.direction,
            synced: self.synced,
            fault: self.fault,
            pending: self.pending,
            jog_pending: self.jog_pending,
            steps_per_revolution: self.steps_per_revolution,
        }
    }

    fn anchor(&mut self, position: u16) {
        let value = position as u64 * self.steps_per_revolution as u64;
        self.carry = (value % self.counts_per_revolution as u64) as u32;
    }

    fn spindle_delta(&self, from: u16, to: u16) -> i64 {
        let cpr = self.counts_per_revolution as i64;
        let forward = (to as i64 - from as i64).rem_euclid(cpr);
        if forward > cpr / 2 {
            forward - cpr
        } else {
            forward
        }
    }

    /// Step rate implied by `delta` counts in `dt`, if above the limit.
    fn overspeed(&self, delta: i64, dt: Micros) -> Option<u32> {
        let demand = (self.steps_per_revolution as u64 * 1_000_000)
            .saturating_mul(delta.unsigned_abs());
        let window = dt.0 as u64 * self.counts_per_revolution as u64;
        let capacity = (self.max_rate_hz as u64).saturating_mul(window);
        if demand <= capacity {
            return None;
        }
        let required = match window {
            0 => u32::MAX as u64,
            denominator => demand / denominator,
        };
        Some(required.min(u32::MAX as u64) as u32)
    }

    fn backlog_limit(&self) -> u32 {
        (self.steps_per_revolution / self.counts_per_revolution + 1) * PENDING_COUNTS
    }

    fn latch(&mut self, fault: RateFault) {
        self.fault = Some(fault);
        self.pending = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const CPR: u16 = 800;

    fn generator(spr: u32) -> SynchronizedStepGenerator {
        SynchronizedStepGenerator::new(CPR, spr, &LeadscrewConfig::default())
    }

    fn reading(position: u16, at: u32) -> SpindleReading {
        SpindleReading::at_edge(position, Micros(at))
    }

    fn drain(generator: &mut SynchronizedStepGenerator, now: &mut u32) -> i64 {
        let mut moved = 0;
        while let Some(side) = generator.poll_pulse(Micros(*now)) {
            moved += side.sign();
            *now += 100;
        }
        moved
    }

    #[test]
    fn test_feeding_left_truth_table() {
        let flags = |feed_left, spindle_ccw| DirectionFlags { feed_left, spindle_ccw };
        assert!(flags(true, true).feeding_left());
        assert!(!flags(false, true).feeding_left());
        assert!(!flags(true, false).feeding_left());
        assert!(flags(false, false).feeding_left());
    }

    #[test]
    fn test_one_revolution_at_1280() {
        let mut gen = generator(1280);
        let mut now = 0;
        gen.on_spindle(reading(0, now));

        let mut moved = 0;
        for count in 1..=800u32 {
            now += 1_000;
            gen.on_spindle(reading((count % 800) as u16, now));
            moved += drain(&mut gen, &mut now);
        }

        // Default flags feed left
        assert_eq!(moved, -1280);
        assert_eq!(gen.position(), Steps(-1280));
    }

    #[test]
    fn test_reverse_spindle_backs_out() {
        let mut gen = generator(1280);
        let mut now = 0;
        gen.on_spindle(reading(0, 0));
        for count in 1..=40u16 {
            now += 1_000;
            gen.on_spindle(reading(count, now));
            drain(&mut gen, &mut now);
        }
        assert_eq!(gen.position(), Steps(-64));

        for count in (0..40u16).rev() {
            now += 1_000;
            gen.on_spindle(reading(count, now));
            drain(&mut gen, &mut now);
        }
        assert_eq!(gen.position(), Steps(0));
    }

    #[test]
    fn test_overspeed_latches_until_cleared() {
        let mut gen = generator(1280);
        gen.on_spindle(reading(0, 0));
        // 1.6 steps per count at one count per 10us is 160 kHz
        gen.on_spindle(reading(1, 10));

        assert!(matches!(gen.fault(), Some(RateFault::Overspeed { limit_hz: 10_000, .. })));
        assert_eq!(gen.poll_pulse(Micros(1_000)), None);
        assert_eq!(gen.jog(5), Err(Error::Sync(SyncError::Faulted)));

        gen.on_spindle(reading(2, 5_000));
        assert_eq!(gen.poll_pulse(Micros(6_000)), None);

        gen.clear_fault();
        gen.on_spindle(reading(3, 10_000));
        gen.on_spindle(reading(4, 11_000));
        assert!(gen.fault().is_none());
        assert!(gen.poll_pulse(Micros(12_000)).is_some());
    }

    #[test]
    fn test_unsynced_drops_spindle_steps() {
        let mut gen = generator(1280);
        gen.set_synced(false);
        gen.on_spindle(reading(0, 0));
        gen.on_spindle(reading(10, 10_000));
        assert_eq!(gen.poll_pulse(Micros(20_000)), None);

        gen.jog(-3).unwrap();
        let mut now = 20_000;
        assert_eq!(drain(&mut gen, &mut now), -3);

        gen.set_synced(true);
        assert_eq!(gen.jog(1), Err(Error::Sync(SyncError::JogWhileSynced)));
    }

    #[test]
    fn test_min_period_holds_steps() {
        let mut gen = generator(1280);
        gen.on_spindle(reading(0, 0));
        gen.on_spindle(reading(5, 1_000));
        assert_eq!(gen.state().pending, -8);

        assert!(gen.poll_pulse(Micros(2_000)).is_some());
        assert_eq!(gen.poll_pulse(Micros(2_010)), None);
        assert!(gen.poll_pulse(Micros(2_030)).is_some());
    }

    #[test]
    fn test_selecting_ratio_realigns_accumulator() {
        let mut gen = generator(1280);
        gen.on_spindle(reading(0, 0));
        gen.on_spindle(reading(1, 1_000));
        gen.set_steps_per_revolution(400);
        assert_eq!(gen.state().pending, 0);

        // Position 1 * 400 = 400 -> remainder 400 of 800; one more count crosses 800
        gen.on_spindle(reading(2, 2_000));
        assert_eq!(gen.state().pending, -1);
    }

    #[test]
    fn test_untimed_anchor_skips_rate_check() {
        let mut gen = generator(1280);
        // Published before any edge, then the first real edge 125us later
        gen.on_spindle(SpindleReading::ZERO);
        gen.on_spindle(reading(1, 125));
        assert!(gen.fault().is_none());
        assert_eq!(gen.state().pending, -1);

        // 1.6 steps every 250us is 6.4 kHz, under the 10 kHz limit
        gen.on_spindle(reading(2, 375));
        assert!(gen.fault().is_none());
        assert_eq!(gen.state().pending, -3);
    }

    #[test]
    fn test_long_stall_on_fine_encoder() {
        let leadscrew = LeadscrewConfig {
            step_limit_per_minute: 30_000_000,
            min_pulse_width: 1,
            min_pulse_period: 2,
            ..LeadscrewConfig::default()
        };
        let mut gen = SynchronizedStepGenerator::new(65_534, 1280, &leadscrew);
        assert_eq!(leadscrew.max_step_rate_hz(), 500_000);

        gen.on_spindle(reading(0, 0));
        gen.on_spindle(reading(1, u32::MAX));
        assert!(gen.fault().is_none());
    }
}
