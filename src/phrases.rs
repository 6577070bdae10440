use crate::events::FocusedInput;

/// Accessible text templates handed to the rendering component.
///
/// Templates carry a `{{date}}` placeholder substituted by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrases {
    /// Label for the calendar region
    pub calendar_label: String,
    /// Generic prompt for a selectable day
    pub choose_available_date: String,
    /// Prompt while the start date is focused
    pub choose_available_start_date: String,
    /// Prompt while the end date is focused
    pub choose_available_end_date: String,
    /// Announcement for a blocked day
    pub date_is_unavailable: String,
    /// Announcement for a selected day
    pub date_is_selected: String,
}

impl Default for Phrases {
    fn default() -> Self {
        Self {
            calendar_label: "Calendar".to_owned(),
            choose_available_date: "{{date}}".to_owned(),
            choose_available_start_date: "Choose {{date}} as your start date.".to_owned(),
            choose_available_end_date: "Choose {{date}} as your end date.".to_owned(),
            date_is_unavailable: "Not available. {{date}}".to_owned(),
            date_is_selected: "Selected. {{date}}".to_owned(),
        }
    }
}

impl Phrases {
    /// The table handed to day cells, with `choose_available_date` swapped
    /// for the variant matching the focused endpoint.
    pub fn for_focus(&self, focused_input: Option<FocusedInput>) -> Self {
        let choose_available_date = match focused_input {
            Some(FocusedInput::Start) => self.choose_available_start_date.clone(),
            Some(FocusedInput::End) => self.choose_available_end_date.clone(),
            None => self.choose_available_date.clone(),
        };
        Self {
            choose_available_date,
            ..self.clone()
        }
    }
}
