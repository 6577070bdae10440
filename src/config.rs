use crate::consts::{DEFAULT_MINIMUM_NIGHTS, DEFAULT_NUMBER_OF_MONTHS};
use crate::day::CalendarDay;
use crate::phrases::Phrases;
use std::fmt;

/// An externally supplied per-day predicate. Absent predicates default to
/// "never true", so absence never blocks or highlights a day.
pub type DayPredicate = Box<dyn Fn(CalendarDay) -> bool>;

/// Construction-time configuration for [`RangeSelectionEngine`].
///
/// [`RangeSelectionEngine`]: crate::RangeSelectionEngine
pub struct RangePickerConfig {
    /// Keep input focus on the end date after a completed selection instead
    /// of closing the picker
    pub keep_open_on_date_select: bool,
    /// Minimum nights between start and end for a valid selection
    pub minimum_nights: u32,
    /// Number of simultaneously visible months
    pub number_of_months: u32,
    /// Pad month grids with days from adjacent months
    pub enable_outside_days: bool,
    /// Pointer hover carries no meaning on touch devices; hover events become
    /// no-ops when set
    pub is_touch_device: bool,
    /// First visible month (its day-of-month is ignored)
    pub initial_visible_month: CalendarDay,
    /// Days blocked by the integrating calendar
    pub is_day_blocked: DayPredicate,
    /// Days outside the selectable range
    pub is_outside_range: DayPredicate,
    /// Days the integrating calendar highlights
    pub is_day_highlighted: DayPredicate,
    /// Accessible text templates
    pub phrases: Phrases,
}

impl RangePickerConfig {
    /// Creates a configuration with default settings, anchored at the month
    /// of `initial_visible_month`.
    pub fn new(initial_visible_month: CalendarDay) -> Self {
        Self {
            keep_open_on_date_select: false,
            minimum_nights: DEFAULT_MINIMUM_NIGHTS,
            number_of_months: DEFAULT_NUMBER_OF_MONTHS,
            enable_outside_days: false,
            is_touch_device: false,
            initial_visible_month,
            is_day_blocked: Box::new(|_| false),
            is_outside_range: Box::new(|_| false),
            is_day_highlighted: Box::new(|_| false),
            phrases: Phrases::default(),
        }
    }
}

impl fmt::Debug for RangePickerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangePickerConfig")
            .field("keep_open_on_date_select", &self.keep_open_on_date_select)
            .field("minimum_nights", &self.minimum_nights)
            .field("number_of_months", &self.number_of_months)
            .field("enable_outside_days", &self.enable_outside_days)
            .field("is_touch_device", &self.is_touch_device)
            .field("initial_visible_month", &self.initial_visible_month)
            .finish_non_exhaustive()
    }
}
