use crate::day::CalendarDay;
use crate::prelude::*;
use serde::{Deserialize, Serialize};

/// Which selection endpoint currently has input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusedInput {
    /// The start-date input is focused
    #[display(fmt = "start")]
    Start,
    /// The end-date input is focused
    #[display(fmt = "end")]
    End,
}

/// Notifications emitted by engine operations, in emission order.
///
/// Operations return these instead of invoking injected callbacks; the
/// integrating component dispatches them to its own handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The (start, end) pair changed
    DatesChange {
        start: Option<CalendarDay>,
        end: Option<CalendarDay>,
    },
    /// Input focus should move to the given endpoint
    FocusChange(Option<FocusedInput>),
    /// A completed selection closed the picker
    Close {
        start: CalendarDay,
        end: CalendarDay,
    },
    /// Input focus should be dropped entirely
    Blur,
    /// The visible window moved one month back
    PrevMonthClick,
    /// The visible window moved one month forward
    NextMonthClick,
}
