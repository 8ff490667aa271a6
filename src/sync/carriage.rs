//! Carriage position and travel limits.
//!
//! Position is absolute in leadscrew steps from the last zero-set. Positive is
//! toward the tailstock (right).

use core::fmt;

use crate::config::units::Steps;

/// Direction of carriage travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    /// Toward the headstock.
    Left,
    /// Toward the tailstock.
    Right,
}

impl Side {
    /// Step sign of this direction.
    #[inline]
    pub const fn sign(self) -> i64 {
        match self {
            Side::Left => -1,
            Side::Right => 1,
        }
    }

    /// The other direction.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Direction of a signed step count, `None` for zero.
    #[inline]
    pub const fn of(steps: i64) -> Option<Self> {
        if steps > 0 {
            Some(Side::Right)
        } else if steps < 0 {
            Some(Side::Left)
        } else {
            None
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Per-side limit position and engaged flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TravelLimit {
    /// Limit position, `None` when disabled.
    pub position: Option<Steps>,
    /// The carriage is held at this limit.
    pub engaged: bool,
}

/// Carriage position tracker with travel limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Carriage {
    position: Steps,
    left: TravelLimit,
    right: TravelLimit,
}

impl Carriage {
    /// Carriage at zero with no limits.
    pub const fn new() -> Self {
        Self {
            position: Steps(0),
            left: TravelLimit {
                position: None,
                engaged: false,
            },
            right: TravelLimit {
                position: None,
                engaged: false,
            },
        }
    }

    /// Current position.
    #[inline]
    pub fn position(&self) -> Steps {
        self.position
    }

    /// Limit state of one side.
    #[inline]
    pub fn limit(&self, side: Side) -> &TravelLimit {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Set a limit at the current position.
    pub fn set_limit(&mut self, side: Side) {
        let position = self.position;
        self.set_limit_at(side, position);
    }

    /// Set a limit at an explicit position.
    pub fn set_limit_at(&mut self, side: Side, position: Steps) {
        self.limit_mut(side).position = Some(position);
    }

    /// Disable a limit and release its engaged flag.
    pub fn clear_limit(&mut self, side: Side) {
        *self.limit_mut(side) = TravelLimit::default();
    }

    /// Whether the next step toward `side` would pass its limit.
    pub fn at_limit(&self, side: Side) -> bool {
        match (side, self.limit(side).position) {
            (Side::Left, Some(limit)) => self.position <= limit,
            (Side::Right, Some(limit)) => self.position >= limit,
            (_, None) => false,
        }
    }

    /// Whether travel toward `side` is held at its limit.
    #[inline]
    pub fn is_limited(&self, side: Side) -> bool {
        self.limit(side).engaged
    }

    /// Mark a limit as engaged.
    #[inline]
    pub(crate) fn engage(&mut self, side: Side) {
        self.limit_mut(side).engaged = true;
    }

    /// Move one step toward `side`. Moving away from a limit releases it.
    #[inline]
    pub(crate) fn step(&mut self, side: Side) {
        self.position = Steps(self.position.0 + side.sign());
        self.limit_mut(side.opposite()).engaged = false;
    }

    /// Make the current position zero. Limits keep their physical place.
    pub fn zero(&mut self) {
        let offset = self.position;
        for limit in [&mut self.left, &mut self.right] {
            if let Some(position) = limit.position.as_mut() {
                *position = *position - offset;
            }
        }
        self.position = Steps(0);
    }

    fn limit_mut(&mut self, side: Side) -> &mut TravelLimit {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}
