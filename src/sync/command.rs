//! Operator commands accepted by the leadscrew controller.

use crate::feed::FeedSelection;

use super::carriage::Side;

/// A command from the operator interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Select a feed table row.
    SelectFeed(FeedSelection),
    /// Set the feed direction (`true` toward the headstock).
    SetFeedLeft(bool),
    /// Flip the feed direction.
    ToggleFeedDirection,
    /// Set the spindle rotation direction.
    SetSpindleCcw(bool),
    /// Set a travel limit at the current carriage position.
    SetLimit(Side),
    /// Remove a travel limit.
    ClearLimit(Side),
    /// Move the carriage by a number of steps while not synced.
    Jog(i32),
    /// Start or stop following the spindle.
    SetSynced(bool),
    /// Clear a latched step-rate fault.
    ClearFault,
    /// Make the current carriage position zero.
    ZeroPosition,
}
