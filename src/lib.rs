//! State engine for a calendar date-range selection widget.
//!
//! Tracks a start/end date pair, hover previews, blocked and highlighted
//! days, and minimum-nights constraints over a visible window of month
//! grids, and maintains the per-day set of named modifiers a rendering
//! component styles day cells with. Modifier maintenance is incremental:
//! each interaction patches only the days whose tags could have changed,
//! and the store is rebuilt in full only when the visible window moves.
//!
//! The crate renders nothing and owns no clock: the integrator samples
//! "today", reports pointer/click events, and receives the updated store
//! plus the [`Event`]s to dispatch.

mod config;
mod consts;
mod day;
mod engine;
mod events;
mod modifier;
mod phrases;
mod prelude;

pub use config::{DayPredicate, RangePickerConfig};
pub use consts::{DEFAULT_MINIMUM_NIGHTS, DEFAULT_NUMBER_OF_MONTHS, WEEK_LENGTH};
pub use day::{days_between, visible_days, CalendarDay, DayParseError};
pub use engine::{RangeSelectionEngine, SelectionState};
pub use events::{Event, FocusedInput};
pub use modifier::{Modifier, ModifierBatch, ModifierSet, ModifierStore, UnknownModifier};
pub use phrases::Phrases;
