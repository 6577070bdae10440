use crate::config::RangePickerConfig;
use crate::day::{visible_days, CalendarDay};
use crate::events::{Event, FocusedInput};
use crate::modifier::{Modifier, ModifierBatch, ModifierSet, ModifierStore};
use crate::phrases::Phrases;
use log::debug;

/// Current selection and interaction state.
///
/// `start_date`, `end_date` and `focused_input` mirror caller-owned props
/// and change through [`RangeSelectionEngine::set_selection`] or as click
/// outcomes; `hover_date` is owned and mutated by the engine alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    /// Selected start date
    pub start_date: Option<CalendarDay>,
    /// Selected end date; never earlier than the start date once both are set
    pub end_date: Option<CalendarDay>,
    /// Endpoint currently receiving input
    pub focused_input: Option<FocusedInput>,
    /// Day currently under the pointer
    pub hover_date: Option<CalendarDay>,
}

/// State core of a calendar date-range picker.
///
/// Driven by interaction events (day click, hover enter/leave, month
/// navigation, external selection changes), the engine maintains a
/// [`ModifierStore`] over the visible days. Every transition patches only
/// the days whose modifiers could have changed; the store is rebuilt in full
/// only when the visible window itself moves.
///
/// Operations return the [`Event`]s they emit; the integrating component
/// dispatches them. The engine itself never fails: blocked or absent days
/// degrade to no-ops.
pub struct RangeSelectionEngine {
    config: RangePickerConfig,
    anchor_month: CalendarDay,
    today: CalendarDay,
    state: SelectionState,
    store: ModifierStore,
}

impl RangeSelectionEngine {
    /// Creates an engine with an empty selection and builds the modifier
    /// store over the initially visible window.
    ///
    /// `today` is sampled by the caller; refresh it with
    /// [`refresh_today`](Self::refresh_today) before each render pass.
    pub fn new(config: RangePickerConfig, today: CalendarDay) -> Self {
        let anchor_month = config.initial_visible_month.first_of_month();
        let mut engine = Self {
            config,
            anchor_month,
            today,
            state: SelectionState::default(),
            store: ModifierStore::default(),
        };
        engine.rebuild_store();
        engine
    }

    /// The authoritative per-day modifier sets for rendering.
    pub fn visible_days(&self) -> &ModifierStore {
        &self.store
    }

    /// Current selection state snapshot.
    pub fn selection(&self) -> SelectionState {
        self.state
    }

    /// First day of the first visible month.
    pub fn anchor_month(&self) -> CalendarDay {
        self.anchor_month
    }

    /// The day currently tagged `today`.
    pub fn today(&self) -> CalendarDay {
        self.today
    }

    /// Phrase table for day cells, with the "choose available date" variant
    /// matching the focused endpoint.
    pub fn calendar_day_phrases(&self) -> Phrases {
        self.config.phrases.for_focus(self.state.focused_input)
    }

    /// Handles a click on `day`.
    ///
    /// Blocked days are ignored entirely. Otherwise the selection advances
    /// per the focused endpoint: focusing start re-anchors the range,
    /// focusing end either completes the selection (when `day` is at least
    /// `minimum_nights` after the start) or restarts it at `day`.
    pub fn on_day_click(&mut self, day: CalendarDay) -> Vec<Event> {
        if self.is_blocked(day) {
            return Vec::new();
        }

        let mut events = Vec::new();
        let mut start = self.state.start_date;
        let mut end = self.state.end_date;
        let mut focus = self.state.focused_input;

        match self.state.focused_input {
            Some(FocusedInput::Start) => {
                focus = Some(FocusedInput::End);
                events.push(Event::FocusChange(focus));

                start = Some(day);
                if end.is_some_and(|e| day.is_inclusively_after(e)) {
                    end = None;
                }
            }
            Some(FocusedInput::End) => {
                if let Some(anchor) = start {
                    let meets_minimum = anchor
                        .plus_days(i64::from(self.config.minimum_nights))
                        .is_some_and(|first_allowed| day.is_inclusively_after(first_allowed));

                    if meets_minimum {
                        end = Some(day);
                        if !self.config.keep_open_on_date_select {
                            focus = None;
                            events.push(Event::FocusChange(None));
                            events.push(Event::Close {
                                start: anchor,
                                end: day,
                            });
                        }
                    } else {
                        // Restart the selection anchored at the clicked day
                        start = Some(day);
                        end = None;
                    }
                } else {
                    end = Some(day);
                    focus = Some(FocusedInput::Start);
                    events.push(Event::FocusChange(focus));
                }
            }
            None => {}
        }

        debug!(
            "day click on {day}: start={start:?} end={end:?} focus={focus:?}",
        );
        self.apply_selection_change(start, end, focus);
        events.push(Event::DatesChange { start, end });
        events.push(Event::Blur);
        events
    }

    /// Applies an externally driven selection change (e.g. a programmatic
    /// reset), patching boundary and span modifiers incrementally.
    pub fn set_selection(
        &mut self,
        start_date: Option<CalendarDay>,
        end_date: Option<CalendarDay>,
        focused_input: Option<FocusedInput>,
    ) {
        self.apply_selection_change(start_date, end_date, focused_input);
    }

    /// Handles the pointer entering `day`. No-op on touch devices.
    pub fn on_day_hover(&mut self, day: CalendarDay) {
        if self.config.is_touch_device {
            return;
        }

        let SelectionState {
            start_date,
            end_date,
            focused_input,
            hover_date,
        } = self.state;

        let mut batch = ModifierBatch::default();
        self.store.add_modifier(&mut batch, Some(day), Modifier::Hovered);
        self.store.delete_modifier(&mut batch, hover_date, Modifier::Hovered);

        // Selecting forward: preview spans from the start date
        if let Some(start) = start_date {
            if end_date.is_none() && focused_input == Some(FocusedInput::End) {
                if let Some(old_hover) = hover_date.filter(|h| *h > start) {
                    self.store.delete_modifier_from_range(
                        &mut batch,
                        start,
                        old_hover,
                        Modifier::HoveredSpan,
                    );
                }
                if !self.is_blocked(day) && day > start {
                    self.store
                        .add_modifier_to_range(&mut batch, start, day, Modifier::HoveredSpan);
                }
            }
        }

        // Selecting backward: preview spans up to the end date
        if let Some(end) = end_date {
            if start_date.is_none() && focused_input == Some(FocusedInput::Start) {
                if let Some(old_hover) = hover_date.filter(|h| *h < end) {
                    self.store.delete_modifier_from_range(
                        &mut batch,
                        old_hover,
                        end,
                        Modifier::HoveredSpan,
                    );
                }
                if !self.is_blocked(day) && day < end {
                    self.store
                        .add_modifier_to_range(&mut batch, day, end, Modifier::HoveredSpan);
                }
            }
        }

        self.state.hover_date = Some(day);
        self.store.apply(batch);
    }

    /// Handles the pointer leaving the calendar. No-op on touch devices or
    /// without an active hover.
    pub fn on_day_hover_leave(&mut self) {
        if self.config.is_touch_device {
            return;
        }
        let Some(hover) = self.state.hover_date else {
            return;
        };

        let SelectionState {
            start_date,
            end_date,
            ..
        } = self.state;

        let mut batch = ModifierBatch::default();
        self.store
            .delete_modifier(&mut batch, Some(hover), Modifier::Hovered);

        if let Some(start) = start_date {
            if end_date.is_none() && hover > start {
                self.store
                    .delete_modifier_from_range(&mut batch, start, hover, Modifier::HoveredSpan);
            }
        }
        if let Some(end) = end_date {
            if start_date.is_none() && end > hover {
                self.store
                    .delete_modifier_from_range(&mut batch, hover, end, Modifier::HoveredSpan);
            }
        }

        self.state.hover_date = None;
        self.store.apply(batch);
    }

    /// Moves the visible window one month back and rebuilds the store.
    pub fn on_prev_month_click(&mut self) -> Vec<Event> {
        if let Some(anchor) = self.anchor_month.months_earlier(1) {
            self.anchor_month = anchor;
            self.rebuild_store();
        }
        vec![Event::PrevMonthClick]
    }

    /// Moves the visible window one month forward and rebuilds the store.
    pub fn on_next_month_click(&mut self) -> Vec<Event> {
        if let Some(anchor) = self.anchor_month.months_later(1) {
            self.anchor_month = anchor;
            self.rebuild_store();
        }
        vec![Event::NextMonthClick]
    }

    /// Moves the visible window to the month of `month` (externally driven)
    /// and rebuilds the store.
    pub fn set_visible_month(&mut self, month: CalendarDay) {
        self.anchor_month = month.first_of_month();
        self.rebuild_store();
    }

    /// Re-samples "today" and moves the `today` tag accordingly. Call before
    /// each render pass so long-lived sessions stay correct across day
    /// boundaries.
    pub fn refresh_today(&mut self, today: CalendarDay) {
        if today == self.today {
            return;
        }
        let mut batch = ModifierBatch::default();
        self.store
            .delete_modifier(&mut batch, Some(self.today), Modifier::Today);
        self.store.add_modifier(&mut batch, Some(today), Modifier::Today);
        self.today = today;
        self.store.apply(batch);
    }

    /// The day that should receive keyboard focus when `new_month` becomes
    /// visible.
    ///
    /// Prefers the focused endpoint's date (or `start + minimum_nights`
    /// while choosing an end date), else the first of the month. When the
    /// candidate is blocked, scans forward through the end of the last
    /// visible month for the first unblocked day strictly after it. The
    /// returned day may still be blocked when no unblocked day exists; that
    /// is a degraded outcome, not an error, and callers must not assume the
    /// result is selectable.
    pub fn first_focusable_day(&self, new_month: CalendarDay) -> CalendarDay {
        let month_start = new_month.first_of_month();
        let candidate = match (
            self.state.focused_input,
            self.state.start_date,
            self.state.end_date,
        ) {
            (Some(FocusedInput::Start), Some(start), _) => start,
            (Some(FocusedInput::End), Some(start), None) => start
                .plus_days(i64::from(self.config.minimum_nights))
                .unwrap_or(start),
            (Some(FocusedInput::End), _, Some(end)) => end,
            _ => month_start,
        };

        if !self.is_blocked(candidate) {
            return candidate;
        }

        let last_visible = month_start
            .months_later(self.config.number_of_months.saturating_sub(1))
            .unwrap_or(month_start)
            .last_of_month();
        let mut current = candidate;
        while let Some(next) = current.next_day() {
            if next > last_visible {
                break;
            }
            current = next;
            if !self.is_blocked(current) {
                return current;
            }
        }
        candidate
    }

    // --- incremental update machinery ---

    /// Diffs the old selection against the new one and patches only the
    /// modifiers whose predicate could have changed value: boundary tags on
    /// the specific boundary days, span tags over the changed spans, and the
    /// minimum-nights window after the start date.
    fn apply_selection_change(
        &mut self,
        start_date: Option<CalendarDay>,
        end_date: Option<CalendarDay>,
        focused_input: Option<FocusedInput>,
    ) {
        let old = self.state;
        let did_start_change = start_date != old.start_date;
        let did_end_change = end_date != old.end_date;
        let did_focus_change = focused_input != old.focused_input;

        let mut batch = ModifierBatch::default();

        if did_start_change {
            self.store
                .delete_modifier(&mut batch, old.start_date, Modifier::SelectedStart);
            self.store
                .add_modifier(&mut batch, start_date, Modifier::SelectedStart);
        }

        if did_end_change {
            self.store
                .delete_modifier(&mut batch, old.end_date, Modifier::SelectedEnd);
            self.store
                .add_modifier(&mut batch, end_date, Modifier::SelectedEnd);
        }

        if did_start_change || did_end_change {
            if let (Some(old_start), Some(old_end)) = (old.start_date, old.end_date) {
                if let Some(after_start) = old_start.next_day() {
                    self.store.delete_modifier_from_range(
                        &mut batch,
                        after_start,
                        old_end,
                        Modifier::SelectedSpan,
                    );
                }
            }

            if let (Some(start), Some(end)) = (start_date, end_date) {
                self.store
                    .delete_modifier_from_range(&mut batch, start, end, Modifier::HoveredSpan);
                if let Some(after_start) = start.next_day() {
                    self.store.add_modifier_to_range(
                        &mut batch,
                        after_start,
                        end,
                        Modifier::SelectedSpan,
                    );
                }
            }
        }

        if self.config.minimum_nights > 0 {
            let nights = i64::from(self.config.minimum_nights);

            if let Some(old_start) = old.start_date {
                if did_focus_change || did_start_change {
                    if let Some(window_end) = old_start.plus_days(nights) {
                        self.store.delete_modifier_from_range(
                            &mut batch,
                            old_start,
                            window_end,
                            Modifier::BlockedMinimumNights,
                        );
                    }
                }
            }

            if let Some(start) = start_date {
                if focused_input == Some(FocusedInput::End) {
                    if let Some(window_end) = start.plus_days(nights) {
                        self.store.add_modifier_to_range(
                            &mut batch,
                            start,
                            window_end,
                            Modifier::BlockedMinimumNights,
                        );
                    }
                }
            }
        }

        if did_focus_change {
            // TODO: recompute blocked-calendar, highlighted-calendar and
            // blocked-out-of-range here if integrators ever supply
            // focus-sensitive predicates; they currently go stale on a
            // focus-only change.
        }

        self.state.start_date = start_date;
        self.state.end_date = end_date;
        self.state.focused_input = focused_input;
        self.store.apply(batch);
    }

    /// Rebuilds the store in full over the current visible window. Stale
    /// entries for days no longer visible are dropped.
    fn rebuild_store(&mut self) {
        let days = visible_days(
            self.anchor_month,
            self.config.number_of_months,
            self.config.enable_outside_days,
        );
        let store = ModifierStore::build(days, |day| self.modifiers_for_day(day));
        self.store = store;
    }

    /// Evaluates every rule for `day`, in the fixed `Modifier::ALL` order.
    fn modifiers_for_day(&self, day: CalendarDay) -> ModifierSet {
        Modifier::ALL
            .into_iter()
            .filter(|modifier| self.rule_applies(*modifier, day))
            .collect()
    }

    fn rule_applies(&self, modifier: Modifier, day: CalendarDay) -> bool {
        match modifier {
            Modifier::Today => day == self.today,
            Modifier::Blocked => self.is_blocked(day),
            Modifier::BlockedCalendar => (self.config.is_day_blocked)(day),
            Modifier::BlockedOutOfRange => (self.config.is_outside_range)(day),
            Modifier::HighlightedCalendar => (self.config.is_day_highlighted)(day),
            Modifier::Valid => !self.is_blocked(day),
            Modifier::SelectedStart => self.state.start_date == Some(day),
            Modifier::SelectedEnd => self.state.end_date == Some(day),
            Modifier::BlockedMinimumNights => self.does_not_meet_minimum_nights(day),
            Modifier::SelectedSpan => self.is_in_selected_span(day),
            Modifier::LastInRange => self.is_last_in_range(day),
            Modifier::Hovered => self.state.hover_date == Some(day),
            Modifier::HoveredSpan => self.is_in_hovered_span(day),
            Modifier::AfterHoveredStart => self.is_day_after_hovered_start(day),
        }
    }

    // --- predicate rules ---

    fn is_blocked(&self, day: CalendarDay) -> bool {
        (self.config.is_day_blocked)(day)
            || (self.config.is_outside_range)(day)
            || self.does_not_meet_minimum_nights(day)
    }

    /// Only meaningful while choosing an end date. With a start date set, a
    /// day within the minimum-nights window after it cannot complete the
    /// selection; without one, the selectable-range predicate is probed
    /// `minimum_nights` days earlier as a proxy.
    fn does_not_meet_minimum_nights(&self, day: CalendarDay) -> bool {
        if self.state.focused_input != Some(FocusedInput::End) {
            return false;
        }
        let nights = i64::from(self.config.minimum_nights);
        if let Some(start) = self.state.start_date {
            let day_diff = day.days_since(start);
            (0..nights).contains(&day_diff)
        } else {
            day.minus_days(nights)
                .is_some_and(|proxy| (self.config.is_outside_range)(proxy))
        }
    }

    /// Strictly between start and end; boundary days carry their own tags.
    fn is_in_selected_span(&self, day: CalendarDay) -> bool {
        match (self.state.start_date, self.state.end_date) {
            (Some(start), Some(end)) => start < day && day < end,
            _ => false,
        }
    }

    fn is_last_in_range(&self, day: CalendarDay) -> bool {
        self.is_in_selected_span(day)
            && self
                .state
                .end_date
                .is_some_and(|end| end.is_next_day_of(day))
    }

    fn is_in_hovered_span(&self, day: CalendarDay) -> bool {
        let Some(hover) = self.state.hover_date else {
            return false;
        };
        if self.is_blocked(hover) {
            return false;
        }

        let forward = self.state.start_date.is_some_and(|start| {
            self.state.end_date.is_none() && ((start < day && day < hover) || hover == day)
        });
        let backward = self.state.end_date.is_some_and(|end| {
            self.state.start_date.is_none() && ((hover < day && day < end) || hover == day)
        });
        forward || backward
    }

    /// The one valid "next day" affordance right after a hovered anchor:
    /// selecting forward, hover sitting on the start date, and `day` exactly
    /// one day later.
    fn is_day_after_hovered_start(&self, day: CalendarDay) -> bool {
        let (Some(start), Some(hover)) = (self.state.start_date, self.state.hover_date) else {
            return false;
        };
        self.state.end_date.is_none()
            && !self.is_blocked(day)
            && day.is_next_day_of(hover)
            && self.config.minimum_nights > 0
            && hover == start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::day;

    fn engine_with(config: RangePickerConfig) -> RangeSelectionEngine {
        RangeSelectionEngine::new(config, day(2024, 1, 15))
    }

    fn engine() -> RangeSelectionEngine {
        engine_with(RangePickerConfig::new(day(2024, 1, 1)))
    }

    fn has(engine: &RangeSelectionEngine, d: CalendarDay, modifier: Modifier) -> bool {
        engine
            .visible_days()
            .get(d)
            .is_some_and(|set| set.contains(&modifier))
    }

    #[test]
    fn test_initial_store_covers_visible_window() {
        let engine = engine();
        assert_eq!(engine.visible_days().len(), 31);
        assert!(has(&engine, day(2024, 1, 15), Modifier::Today));
        assert!(!has(&engine, day(2024, 1, 14), Modifier::Today));
        // Nothing is blocked without predicates or an end-date focus
        for (d, set) in engine.visible_days().iter() {
            assert!(set.contains(&Modifier::Valid), "{d} should be valid");
            assert!(!set.contains(&Modifier::Blocked));
        }
    }

    #[test]
    fn test_initial_store_with_outside_days() {
        let mut config = RangePickerConfig::new(day(2024, 1, 1));
        config.enable_outside_days = true;
        let engine = engine_with(config);
        assert!(engine.visible_days().contains_day(day(2023, 12, 31)));
        assert!(engine.visible_days().contains_day(day(2024, 2, 3)));
    }

    #[test]
    fn test_click_with_start_focus_anchors_range() {
        let mut engine = engine();
        engine.set_selection(None, None, Some(FocusedInput::Start));

        let events = engine.on_day_click(day(2024, 1, 10));
        assert_eq!(
            events,
            vec![
                Event::FocusChange(Some(FocusedInput::End)),
                Event::DatesChange {
                    start: Some(day(2024, 1, 10)),
                    end: None,
                },
                Event::Blur,
            ]
        );

        let state = engine.selection();
        assert_eq!(state.start_date, Some(day(2024, 1, 10)));
        assert_eq!(state.end_date, None);
        assert_eq!(state.focused_input, Some(FocusedInput::End));
        assert!(has(&engine, day(2024, 1, 10), Modifier::SelectedStart));
        assert!(has(&engine, day(2024, 1, 10), Modifier::BlockedMinimumNights));
    }

    #[test]
    fn test_click_scenario_minimum_nights_completion() {
        // One month, one minimum night: Jan 10 anchors, a second Jan 10
        // click is swallowed by the minimum-nights window, Jan 12 completes.
        let mut engine = engine();
        engine.set_selection(None, None, Some(FocusedInput::Start));
        engine.on_day_click(day(2024, 1, 10));

        let blocked_click = engine.on_day_click(day(2024, 1, 10));
        assert!(blocked_click.is_empty());
        assert_eq!(engine.selection().start_date, Some(day(2024, 1, 10)));
        assert_eq!(engine.selection().end_date, None);

        let events = engine.on_day_click(day(2024, 1, 12));
        assert_eq!(
            events,
            vec![
                Event::FocusChange(None),
                Event::Close {
                    start: day(2024, 1, 10),
                    end: day(2024, 1, 12),
                },
                Event::DatesChange {
                    start: Some(day(2024, 1, 10)),
                    end: Some(day(2024, 1, 12)),
                },
                Event::Blur,
            ]
        );
        assert_eq!(engine.selection().focused_input, None);
        assert!(has(&engine, day(2024, 1, 10), Modifier::SelectedStart));
        assert!(has(&engine, day(2024, 1, 11), Modifier::SelectedSpan));
        assert!(has(&engine, day(2024, 1, 12), Modifier::SelectedEnd));
        assert!(!has(&engine, day(2024, 1, 12), Modifier::SelectedSpan));
    }

    #[test]
    fn test_click_restart_when_below_minimum_nights() {
        let mut engine = engine();
        engine.set_selection(Some(day(2024, 1, 10)), None, Some(FocusedInput::End));

        let events = engine.on_day_click(day(2024, 1, 5));
        assert_eq!(
            events,
            vec![
                Event::DatesChange {
                    start: Some(day(2024, 1, 5)),
                    end: None,
                },
                Event::Blur,
            ]
        );
        let state = engine.selection();
        assert_eq!(state.start_date, Some(day(2024, 1, 5)));
        assert_eq!(state.end_date, None);
        assert_eq!(state.focused_input, Some(FocusedInput::End));

        // The minimum-nights window and the start tag followed the restart
        assert!(!has(&engine, day(2024, 1, 10), Modifier::SelectedStart));
        assert!(!has(&engine, day(2024, 1, 10), Modifier::BlockedMinimumNights));
        assert!(has(&engine, day(2024, 1, 5), Modifier::SelectedStart));
        assert!(has(&engine, day(2024, 1, 5), Modifier::BlockedMinimumNights));
    }

    #[test]
    fn test_completion_with_keep_open_keeps_focus() {
        let mut config = RangePickerConfig::new(day(2024, 1, 1));
        config.keep_open_on_date_select = true;
        let mut engine = engine_with(config);
        engine.set_selection(Some(day(2024, 1, 10)), None, Some(FocusedInput::End));

        let events = engine.on_day_click(day(2024, 1, 12));
        assert_eq!(
            events,
            vec![
                Event::DatesChange {
                    start: Some(day(2024, 1, 10)),
                    end: Some(day(2024, 1, 12)),
                },
                Event::Blur,
            ]
        );
        assert_eq!(engine.selection().focused_input, Some(FocusedInput::End));
    }

    #[test]
    fn test_completion_emits_exactly_one_close() {
        let mut engine = engine();
        engine.set_selection(Some(day(2024, 1, 10)), None, Some(FocusedInput::End));
        let events = engine.on_day_click(day(2024, 1, 11));
        let closes = events
            .iter()
            .filter(|event| matches!(event, Event::Close { .. }))
            .count();
        assert_eq!(closes, 1);
        assert!(events.contains(&Event::FocusChange(None)));
    }

    #[test]
    fn test_click_end_focus_without_start() {
        let mut engine = engine();
        engine.set_selection(None, None, Some(FocusedInput::End));

        let events = engine.on_day_click(day(2024, 1, 10));
        assert_eq!(
            events,
            vec![
                Event::FocusChange(Some(FocusedInput::Start)),
                Event::DatesChange {
                    start: None,
                    end: Some(day(2024, 1, 10)),
                },
                Event::Blur,
            ]
        );
        assert_eq!(engine.selection().end_date, Some(day(2024, 1, 10)));
        assert!(has(&engine, day(2024, 1, 10), Modifier::SelectedEnd));
    }

    #[test]
    fn test_start_click_clears_end_unless_strictly_after() {
        let mut engine = engine();
        engine.set_selection(
            Some(day(2024, 1, 5)),
            Some(day(2024, 1, 8)),
            Some(FocusedInput::Start),
        );

        // Clicking the end day itself drops the end date
        engine.on_day_click(day(2024, 1, 8));
        assert_eq!(engine.selection().start_date, Some(day(2024, 1, 8)));
        assert_eq!(engine.selection().end_date, None);

        // An end date strictly after the clicked day survives
        let mut engine = self::engine();
        engine.set_selection(
            Some(day(2024, 1, 5)),
            Some(day(2024, 1, 8)),
            Some(FocusedInput::Start),
        );
        engine.on_day_click(day(2024, 1, 6));
        assert_eq!(engine.selection().start_date, Some(day(2024, 1, 6)));
        assert_eq!(engine.selection().end_date, Some(day(2024, 1, 8)));
    }

    #[test]
    fn test_click_blocked_day_is_ignored() {
        let mut config = RangePickerConfig::new(day(2024, 1, 1));
        config.is_day_blocked = Box::new(|d| d == CalendarDay::from_ymd(2024, 1, 20).unwrap());
        let mut engine = engine_with(config);
        engine.set_selection(None, None, Some(FocusedInput::Start));

        let events = engine.on_day_click(day(2024, 1, 20));
        assert!(events.is_empty());
        assert_eq!(engine.selection().start_date, None);
    }

    #[test]
    fn test_click_without_focus_leaves_selection_untouched() {
        let mut engine = engine();
        let events = engine.on_day_click(day(2024, 1, 10));
        assert_eq!(
            events,
            vec![
                Event::DatesChange {
                    start: None,
                    end: None,
                },
                Event::Blur,
            ]
        );
        assert_eq!(engine.selection(), SelectionState::default());
    }

    #[test]
    fn test_minimum_nights_boundary() {
        let mut config = RangePickerConfig::new(day(2024, 1, 1));
        config.minimum_nights = 2;
        let mut engine = engine_with(config);
        engine.set_selection(Some(day(2024, 1, 1)), None, Some(FocusedInput::End));

        assert!(has(&engine, day(2024, 1, 2), Modifier::BlockedMinimumNights));
        assert!(!has(&engine, day(2024, 1, 3), Modifier::BlockedMinimumNights));

        // A day exactly minimum_nights after the start completes the range
        let events = engine.on_day_click(day(2024, 1, 3));
        assert!(events.contains(&Event::Close {
            start: day(2024, 1, 1),
            end: day(2024, 1, 3),
        }));
    }

    #[test]
    fn test_minimum_nights_proxy_without_start() {
        let mut config = RangePickerConfig::new(day(2024, 1, 1));
        config.minimum_nights = 2;
        config.is_outside_range = Box::new(|d| d < CalendarDay::from_ymd(2024, 1, 10).unwrap());
        let mut engine = engine_with(config);
        engine.set_selection(None, None, Some(FocusedInput::End));
        // Full rebuild evaluates the proxy rule over the window
        engine.set_visible_month(day(2024, 1, 1));

        // Jan 10 is in range, but Jan 10 - 2 nights is not
        assert!(has(&engine, day(2024, 1, 10), Modifier::BlockedMinimumNights));
        assert!(has(&engine, day(2024, 1, 11), Modifier::BlockedMinimumNights));
        assert!(!has(&engine, day(2024, 1, 12), Modifier::BlockedMinimumNights));
    }

    #[test]
    fn test_hover_symmetry() {
        let mut engine = engine();
        engine.set_selection(Some(day(2024, 1, 10)), None, Some(FocusedInput::End));
        let before = engine.visible_days().clone();

        engine.on_day_hover(day(2024, 1, 14));
        assert_ne!(engine.visible_days(), &before);
        engine.on_day_hover_leave();
        assert_eq!(engine.visible_days(), &before);
        assert_eq!(engine.selection().hover_date, None);
    }

    #[test]
    fn test_hover_forward_span_is_half_open() {
        let mut engine = engine();
        engine.set_selection(Some(day(2024, 1, 10)), None, Some(FocusedInput::End));
        engine.on_day_hover(day(2024, 1, 14));

        for offset in 10..14 {
            assert!(has(&engine, day(2024, 1, offset), Modifier::HoveredSpan));
        }
        assert!(has(&engine, day(2024, 1, 14), Modifier::Hovered));
        assert!(!has(&engine, day(2024, 1, 14), Modifier::HoveredSpan));
    }

    #[test]
    fn test_hover_moves_and_shrinks_span() {
        let mut engine = engine();
        engine.set_selection(Some(day(2024, 1, 10)), None, Some(FocusedInput::End));
        engine.on_day_hover(day(2024, 1, 16));
        engine.on_day_hover(day(2024, 1, 12));

        assert!(!has(&engine, day(2024, 1, 16), Modifier::Hovered));
        assert!(has(&engine, day(2024, 1, 12), Modifier::Hovered));
        assert!(has(&engine, day(2024, 1, 11), Modifier::HoveredSpan));
        assert!(!has(&engine, day(2024, 1, 13), Modifier::HoveredSpan));
        assert!(!has(&engine, day(2024, 1, 15), Modifier::HoveredSpan));
    }

    #[test]
    fn test_hover_backward_span() {
        let mut engine = engine();
        engine.set_selection(None, Some(day(2024, 1, 20)), Some(FocusedInput::Start));
        engine.on_day_hover(day(2024, 1, 16));

        for offset in 16..20 {
            assert!(has(&engine, day(2024, 1, offset), Modifier::HoveredSpan));
        }
        assert!(!has(&engine, day(2024, 1, 20), Modifier::HoveredSpan));
        assert!(has(&engine, day(2024, 1, 16), Modifier::Hovered));
    }

    #[test]
    fn test_hover_is_noop_on_touch_devices() {
        let mut config = RangePickerConfig::new(day(2024, 1, 1));
        config.is_touch_device = true;
        let mut engine = engine_with(config);
        let before = engine.visible_days().clone();

        engine.on_day_hover(day(2024, 1, 14));
        assert_eq!(engine.visible_days(), &before);
        assert_eq!(engine.selection().hover_date, None);
        engine.on_day_hover_leave();
        assert_eq!(engine.visible_days(), &before);
    }

    #[test]
    fn test_hover_blocked_day_moves_pointer_without_span() {
        let mut config = RangePickerConfig::new(day(2024, 1, 1));
        config.is_day_blocked = Box::new(|d| d == CalendarDay::from_ymd(2024, 1, 14).unwrap());
        let mut engine = engine_with(config);
        engine.set_selection(Some(day(2024, 1, 10)), None, Some(FocusedInput::End));

        engine.on_day_hover(day(2024, 1, 14));
        assert!(has(&engine, day(2024, 1, 14), Modifier::Hovered));
        assert!(!has(&engine, day(2024, 1, 11), Modifier::HoveredSpan));
    }

    #[test]
    fn test_hover_leave_without_hover_is_noop() {
        let mut engine = engine();
        let before = engine.visible_days().clone();
        engine.on_day_hover_leave();
        assert_eq!(engine.visible_days(), &before);
    }

    #[test]
    fn test_set_selection_patches_spans_incrementally() {
        let mut engine = engine();
        engine.set_selection(Some(day(2024, 1, 10)), Some(day(2024, 1, 14)), None);
        assert!(has(&engine, day(2024, 1, 11), Modifier::SelectedSpan));
        assert!(has(&engine, day(2024, 1, 13), Modifier::SelectedSpan));
        assert!(!has(&engine, day(2024, 1, 10), Modifier::SelectedSpan));
        assert!(!has(&engine, day(2024, 1, 14), Modifier::SelectedSpan));

        engine.set_selection(Some(day(2024, 1, 12)), Some(day(2024, 1, 18)), None);
        assert!(!has(&engine, day(2024, 1, 11), Modifier::SelectedSpan));
        assert!(has(&engine, day(2024, 1, 13), Modifier::SelectedSpan));
        assert!(has(&engine, day(2024, 1, 17), Modifier::SelectedSpan));
        assert!(has(&engine, day(2024, 1, 12), Modifier::SelectedStart));
        assert!(has(&engine, day(2024, 1, 18), Modifier::SelectedEnd));
        assert!(!has(&engine, day(2024, 1, 10), Modifier::SelectedStart));
        assert!(!has(&engine, day(2024, 1, 14), Modifier::SelectedEnd));
    }

    #[test]
    fn test_clearing_selection_removes_tags() {
        let mut engine = engine();
        engine.set_selection(Some(day(2024, 1, 10)), Some(day(2024, 1, 14)), None);
        engine.set_selection(None, None, None);

        for (d, set) in engine.visible_days().iter() {
            assert!(!set.contains(&Modifier::SelectedStart), "{d}");
            assert!(!set.contains(&Modifier::SelectedEnd), "{d}");
            assert!(!set.contains(&Modifier::SelectedSpan), "{d}");
        }
    }

    #[test]
    fn test_last_in_range_on_rebuild() {
        let mut engine = engine();
        engine.set_selection(Some(day(2024, 1, 10)), Some(day(2024, 1, 14)), None);
        engine.set_visible_month(day(2024, 1, 1));

        assert!(has(&engine, day(2024, 1, 13), Modifier::LastInRange));
        assert!(!has(&engine, day(2024, 1, 12), Modifier::LastInRange));
        assert!(!has(&engine, day(2024, 1, 14), Modifier::LastInRange));
    }

    #[test]
    fn test_after_hovered_start_on_rebuild() {
        let mut engine = engine();
        engine.set_selection(Some(day(2024, 1, 10)), None, Some(FocusedInput::End));
        engine.on_day_hover(day(2024, 1, 10));
        engine.set_visible_month(day(2024, 1, 1));

        assert!(has(&engine, day(2024, 1, 11), Modifier::AfterHoveredStart));
        assert!(!has(&engine, day(2024, 1, 12), Modifier::AfterHoveredStart));
    }

    #[test]
    fn test_highlighted_calendar_days() {
        let mut config = RangePickerConfig::new(day(2024, 1, 1));
        config.is_day_highlighted = Box::new(|d| d == CalendarDay::from_ymd(2024, 1, 15).unwrap());
        let engine = engine_with(config);

        assert!(has(&engine, day(2024, 1, 15), Modifier::HighlightedCalendar));
        assert!(!has(&engine, day(2024, 1, 16), Modifier::HighlightedCalendar));
        // Highlighting does not block
        assert!(has(&engine, day(2024, 1, 15), Modifier::Valid));
    }

    #[test]
    fn test_blocked_predicates_on_build() {
        let mut config = RangePickerConfig::new(day(2024, 1, 1));
        config.is_day_blocked = Box::new(|d| d == CalendarDay::from_ymd(2024, 1, 5).unwrap());
        config.is_outside_range = Box::new(|d| d > CalendarDay::from_ymd(2024, 1, 25).unwrap());
        let engine = engine_with(config);

        assert!(has(&engine, day(2024, 1, 5), Modifier::BlockedCalendar));
        assert!(has(&engine, day(2024, 1, 5), Modifier::Blocked));
        assert!(has(&engine, day(2024, 1, 26), Modifier::BlockedOutOfRange));
        assert!(has(&engine, day(2024, 1, 26), Modifier::Blocked));
        assert!(!has(&engine, day(2024, 1, 26), Modifier::Valid));
        assert!(has(&engine, day(2024, 1, 10), Modifier::Valid));
    }

    #[test]
    fn test_refresh_today_moves_tag() {
        let mut engine = engine();
        assert!(has(&engine, day(2024, 1, 15), Modifier::Today));

        engine.refresh_today(day(2024, 1, 16));
        assert!(!has(&engine, day(2024, 1, 15), Modifier::Today));
        assert!(has(&engine, day(2024, 1, 16), Modifier::Today));
        assert_eq!(engine.today(), day(2024, 1, 16));
    }

    #[test]
    fn test_month_navigation_rebuilds_window() {
        let mut engine = engine();
        let events = engine.on_next_month_click();
        assert_eq!(events, vec![Event::NextMonthClick]);
        assert_eq!(engine.anchor_month(), day(2024, 2, 1));
        assert!(engine.visible_days().contains_day(day(2024, 2, 15)));
        assert!(!engine.visible_days().contains_day(day(2024, 1, 15)));

        let events = engine.on_prev_month_click();
        assert_eq!(events, vec![Event::PrevMonthClick]);
        assert_eq!(engine.anchor_month(), day(2024, 1, 1));
        assert!(engine.visible_days().contains_day(day(2024, 1, 15)));
    }

    #[test]
    fn test_rebuild_preserves_selection_tags() {
        let mut engine = engine();
        engine.set_selection(Some(day(2024, 1, 31)), Some(day(2024, 2, 3)), None);
        engine.on_next_month_click();

        // The window moved to February; the span tail is re-derived there
        assert!(has(&engine, day(2024, 2, 1), Modifier::SelectedSpan));
        assert!(has(&engine, day(2024, 2, 3), Modifier::SelectedEnd));
        assert!(!engine.visible_days().contains_day(day(2024, 1, 31)));
    }

    #[test]
    fn test_first_focusable_day_prefers_selection() {
        let mut engine = engine();
        assert_eq!(engine.first_focusable_day(day(2024, 1, 1)), day(2024, 1, 1));

        engine.set_selection(Some(day(2024, 1, 10)), None, Some(FocusedInput::Start));
        assert_eq!(engine.first_focusable_day(day(2024, 1, 1)), day(2024, 1, 10));

        engine.set_selection(Some(day(2024, 1, 10)), None, Some(FocusedInput::End));
        // start + minimum_nights while choosing an end date
        assert_eq!(engine.first_focusable_day(day(2024, 1, 1)), day(2024, 1, 11));

        engine.set_selection(
            Some(day(2024, 1, 10)),
            Some(day(2024, 1, 14)),
            Some(FocusedInput::End),
        );
        assert_eq!(engine.first_focusable_day(day(2024, 1, 1)), day(2024, 1, 14));
    }

    #[test]
    fn test_first_focusable_day_scans_past_blocked_candidate() {
        let mut config = RangePickerConfig::new(day(2024, 1, 1));
        config.is_day_blocked = Box::new(|d| d <= CalendarDay::from_ymd(2024, 1, 5).unwrap());
        let engine = engine_with(config);

        assert_eq!(engine.first_focusable_day(day(2024, 1, 1)), day(2024, 1, 6));
    }

    #[test]
    fn test_first_focusable_day_falls_back_to_blocked_candidate() {
        let mut config = RangePickerConfig::new(day(2024, 1, 1));
        config.is_day_blocked = Box::new(|_| true);
        let engine = engine_with(config);

        // Degraded outcome: every day is blocked, the candidate comes back
        assert_eq!(engine.first_focusable_day(day(2024, 1, 1)), day(2024, 1, 1));
    }

    #[test]
    fn test_calendar_day_phrases_follow_focus() {
        let mut engine = engine();
        let generic = engine.calendar_day_phrases();
        assert_eq!(
            generic.choose_available_date,
            Phrases::default().choose_available_date
        );

        engine.set_selection(None, None, Some(FocusedInput::End));
        let focused = engine.calendar_day_phrases();
        assert_eq!(
            focused.choose_available_date,
            Phrases::default().choose_available_end_date
        );
    }
}
