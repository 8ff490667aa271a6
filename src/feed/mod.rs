//! Feed and thread pitch tables.
//!
//! Four tables (inch, metric, diametral, module) keyed by [`FeedMode`]. Step
//! counts are derived once from the leadscrew resolution when the
//! [`FeedRatioTable`] is built.

mod pitches;
mod table;

pub use table::{FeedMode, FeedModeEntry, FeedRatioTable, FeedSelection, MAX_ROWS};
