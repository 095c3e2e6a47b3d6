//! Access History
//!
//! Access log entries, the sources they are fetched from, the filter engine
//! and the formatter that turns entries into list rows.

pub mod controller;
pub mod entry;
pub mod filter;
pub mod format;
pub mod source;

pub use controller::{AccessHistoryController, HistoryState, RefreshOutcome};
pub use entry::{sort_newest_first, AccessLogEntry};
pub use filter::{classify, AccessFilter};
pub use format::{
    format_confidence, format_method, format_pill, format_zone, metadata_pills, relative_time,
    style_for, title_for, DisplayRow, EntryIcon, EntryStyle, EntryTint, RelativeAge,
};
pub use source::{HistorySource, HttpHistorySource, MockHistorySource};
