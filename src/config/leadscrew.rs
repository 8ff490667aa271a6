//! Leadscrew and stepper drive configuration from TOML.

use serde::Deserialize;

/// Leadscrew geometry and stepper drive capability.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LeadscrewConfig {
    /// Leadscrew threads per inch.
    #[serde(default = "default_threads_per_inch")]
    pub threads_per_inch: u16,

    /// Driver microsteps per stepper revolution.
    #[serde(default = "default_driver_steps_per_revolution")]
    pub driver_steps_per_revolution: u32,

    /// Stepper revolutions per leadscrew revolution (belt or gear reduction).
    #[serde(default = "default_step_ratio")]
    pub step_ratio: u16,

    /// Highest step rate the drive can follow, in steps per minute.
    #[serde(default = "default_step_limit_per_minute")]
    pub step_limit_per_minute: u32,

    /// Minimum STEP high time in microseconds.
    #[serde(default = "default_min_pulse_width_us", rename = "min_pulse_width_us")]
    pub min_pulse_width: u32,

    /// Minimum time between rising STEP edges in microseconds.
    #[serde(default = "default_min_pulse_period_us", rename = "min_pulse_period_us")]
    pub min_pulse_period: u32,

    /// Invert direction pin logic.
    #[serde(default)]
    pub invert_direction: bool,
}

fn default_threads_per_inch() -> u16 {
    8
}

fn default_driver_steps_per_revolution() -> u32 {
    400
}

fn default_step_ratio() -> u16 {
    8
}

fn default_step_limit_per_minute() -> u32 {
    600_000
}

fn default_min_pulse_width_us() -> u32 {
    3
}

fn default_min_pulse_period_us() -> u32 {
    30
}

impl Default for LeadscrewConfig {
    fn default() -> Self {
        Self {
            threads_per_inch: default_threads_per_inch(),
            driver_steps_per_revolution: default_driver_steps_per_revolution(),
            step_ratio: default_step_ratio(),
            step_limit_per_minute: default_step_limit_per_minute(),
            min_pulse_width: default_min_pulse_width_us(),
            min_pulse_period: default_min_pulse_period_us(),
            invert_direction: false,
        }
    }
}

impl LeadscrewConfig {
    /// Stepper steps per inch of carriage travel, `None` if it overflows `u32`.
    pub fn checked_steps_per_inch(&self) -> Option<u32> {
        (self.threads_per_inch as u32)
            .checked_mul(self.driver_steps_per_revolution)?
            .checked_mul(self.step_ratio as u32)
    }

    /// Stepper steps per inch of carriage travel.
    ///
    /// Zero when the geometry overflows; validation rejects both cases.
    pub fn steps_per_inch(&self) -> u32 {
        self.checked_steps_per_inch().unwrap_or(0)
    }

    /// Highest usable step rate in steps per second.
    ///
    /// The lower of the drive's step limit and the rate implied by the minimum
    /// pulse period.
    pub fn max_step_rate_hz(&self) -> u32 {
        let drive_limit = self.step_limit_per_minute / 60;
        let period_limit = if self.min_pulse_period > 0 {
            1_000_000 / self.min_pulse_period
        } else {
            u32::MAX
        };
        drive_limit.min(period_limit)
    }
}
