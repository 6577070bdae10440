use crate::day::{days_between, CalendarDay};
use crate::prelude::*;
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// A symbolic tag describing one aspect of a day's visual state.
///
/// The set of modifiers is closed; renderers match exhaustively instead of
/// looking names up in a table. `Display` yields the kebab-case name used as
/// the external identity of a modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum Modifier {
    /// Day equals the engine's sampled today
    #[display(fmt = "today")]
    Today,
    /// Day cannot be selected (calendar-blocked, out of range, or within the
    /// minimum-nights window)
    #[display(fmt = "blocked")]
    Blocked,
    /// Day blocked by the externally supplied calendar predicate
    #[display(fmt = "blocked-calendar")]
    BlockedCalendar,
    /// Day outside the externally supplied selectable range
    #[display(fmt = "blocked-out-of-range")]
    BlockedOutOfRange,
    /// Day highlighted by the externally supplied calendar predicate
    #[display(fmt = "highlighted-calendar")]
    HighlightedCalendar,
    /// Complement of `Blocked`
    #[display(fmt = "valid")]
    Valid,
    /// Day is the selected start date
    #[display(fmt = "selected-start")]
    SelectedStart,
    /// Day is the selected end date
    #[display(fmt = "selected-end")]
    SelectedEnd,
    /// Day falls inside the minimum-nights window after the start date
    #[display(fmt = "blocked-minimum-nights")]
    BlockedMinimumNights,
    /// Day is strictly between the selected start and end dates
    #[display(fmt = "selected-span")]
    SelectedSpan,
    /// Day is the last span day before the selected end date
    #[display(fmt = "last-in-range")]
    LastInRange,
    /// Day is under the pointer
    #[display(fmt = "hovered")]
    Hovered,
    /// Day falls inside the provisional span previewed while hovering
    #[display(fmt = "hovered-span")]
    HoveredSpan,
    /// Day directly after a hovered start-date anchor
    #[display(fmt = "after-hovered-start")]
    AfterHoveredStart,
}

impl Modifier {
    /// Every modifier, in the fixed order rules are evaluated in.
    pub const ALL: [Self; 14] = [
        Self::Today,
        Self::Blocked,
        Self::BlockedCalendar,
        Self::BlockedOutOfRange,
        Self::HighlightedCalendar,
        Self::Valid,
        Self::SelectedStart,
        Self::SelectedEnd,
        Self::BlockedMinimumNights,
        Self::SelectedSpan,
        Self::LastInRange,
        Self::Hovered,
        Self::HoveredSpan,
        Self::AfterHoveredStart,
    ];
}

/// Error type for modifier name parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown modifier name: {0}")]
pub struct UnknownModifier(String);

impl FromStr for Modifier {
    type Err = UnknownModifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|modifier| modifier.to_string() == s)
            .ok_or_else(|| UnknownModifier(s.to_owned()))
    }
}

impl Serialize for Modifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Modifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The set of modifiers attached to one day. Membership is the only
/// semantics; iteration order is the fixed `Modifier` order.
pub type ModifierSet = BTreeSet<Modifier>;

/// A batch of per-day modifier edits computed against a store snapshot.
///
/// The first edit to a day copies that day's published set, so a batch never
/// mutates previously published state; `ModifierStore::apply` merges the
/// batch by overwriting exactly the days it touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifierBatch {
    edits: BTreeMap<CalendarDay, ModifierSet>,
}

impl ModifierBatch {
    /// True when the batch holds no edits
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Number of days edited by this batch
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// The pending set for `day`, if the batch edited it
    pub fn get(&self, day: CalendarDay) -> Option<&ModifierSet> {
        self.edits.get(&day)
    }
}

/// Mapping from each visible day to its modifier set.
///
/// Covers exactly the currently visible days: every visible day has an entry
/// (possibly empty) and no entry exists outside the visible window. The
/// engine owns the authoritative store; renderers receive it by reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModifierStore {
    days: BTreeMap<CalendarDay, ModifierSet>,
}

impl ModifierStore {
    /// Builds a store over `days`, computing each day's set with `rule`.
    /// Duplicate days collapse to a single entry.
    pub fn build<I, F>(days: I, mut rule: F) -> Self
    where
        I: IntoIterator<Item = CalendarDay>,
        F: FnMut(CalendarDay) -> ModifierSet,
    {
        let days = days
            .into_iter()
            .map(|day| (day, rule(day)))
            .collect::<BTreeMap<_, _>>();
        trace!("built modifier store over {} visible days", days.len());
        Self { days }
    }

    /// The modifier set for `day`, if it is visible
    pub fn get(&self, day: CalendarDay) -> Option<&ModifierSet> {
        self.days.get(&day)
    }

    /// True when `day` is inside the tracked visible window
    pub fn contains_day(&self, day: CalendarDay) -> bool {
        self.days.contains_key(&day)
    }

    /// Iterates `(day, modifier set)` entries in calendar order
    pub fn iter(&self) -> impl Iterator<Item = (CalendarDay, &ModifierSet)> {
        self.days.iter().map(|(day, set)| (*day, set))
    }

    /// Number of visible days tracked
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// True when no days are tracked
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Stages adding `modifier` to `day`.
    ///
    /// Idempotent; no-op when `day` is `None` or outside the tracked window.
    pub fn add_modifier(
        &self,
        batch: &mut ModifierBatch,
        day: Option<CalendarDay>,
        modifier: Modifier,
    ) {
        let Some(day) = day else { return };
        let Some(set) = self.working_set(batch, day) else {
            return;
        };
        set.insert(modifier);
    }

    /// Stages removing `modifier` from `day`.
    ///
    /// Idempotent; no-op when `day` is `None` or outside the tracked window.
    pub fn delete_modifier(
        &self,
        batch: &mut ModifierBatch,
        day: Option<CalendarDay>,
        modifier: Modifier,
    ) {
        let Some(day) = day else { return };
        let Some(set) = self.working_set(batch, day) else {
            return;
        };
        set.remove(&modifier);
    }

    /// Stages adding `modifier` to every day in the half-open `[start, end)`.
    pub fn add_modifier_to_range(
        &self,
        batch: &mut ModifierBatch,
        start: CalendarDay,
        end: CalendarDay,
        modifier: Modifier,
    ) {
        for day in days_between(start, end) {
            self.add_modifier(batch, Some(day), modifier);
        }
    }

    /// Stages removing `modifier` from every day in the half-open
    /// `[start, end)`.
    pub fn delete_modifier_from_range(
        &self,
        batch: &mut ModifierBatch,
        start: CalendarDay,
        end: CalendarDay,
        modifier: Modifier,
    ) {
        for day in days_between(start, end) {
            self.delete_modifier(batch, Some(day), modifier);
        }
    }

    /// Merges a batch into the store: edited days are overwritten, all other
    /// days keep their previous sets.
    pub fn apply(&mut self, batch: ModifierBatch) {
        if batch.is_empty() {
            return;
        }
        trace!("merging modifier edits for {} days", batch.len());
        for (day, set) in batch.edits {
            // Window may have changed since the batch was staged
            if self.days.contains_key(&day) {
                self.days.insert(day, set);
            }
        }
    }

    /// The batch's working set for `day`, seeded from the published set on
    /// first edit. `None` when `day` is untracked.
    fn working_set<'b>(
        &self,
        batch: &'b mut ModifierBatch,
        day: CalendarDay,
    ) -> Option<&'b mut ModifierSet> {
        let published = self.days.get(&day)?;
        Some(batch.edits.entry(day).or_insert_with(|| published.clone()))
    }
}
