use crate::core::error::PickerError;
use crate::widgets::shared::calendar::{self, Date, WeekStart};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_FIELD_NAME: &str = "start";

/// Raw text typed into the picker's inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputValue {
    pub start: String,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectedDate {
    pub start: Option<Date>,
    pub end: Option<Date>,
}

/// Mount-time configuration for a date picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub input_value: InputValue,
    pub selected_date: SelectedDate,
    /// Not validated; zero or negative renders no months.
    pub number_of_months: i32,
    pub is_visible: bool,
    pub week_start: WeekStart,
    pub field_name: String,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            input_value: InputValue::default(),
            selected_date: SelectedDate::default(),
            number_of_months: 1,
            is_visible: false,
            week_start: WeekStart::default(),
            field_name: DEFAULT_FIELD_NAME.to_string(),
        }
    }
}

impl PickerConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, PickerError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PickerError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| PickerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&source)
    }

    pub fn with_number_of_months(mut self, number_of_months: i32) -> Self {
        self.number_of_months = number_of_months;
        self
    }

    pub fn with_week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }
}

/// Everything the picker renders from.
///
/// `visible_month_anchors` holds `number_of_months` consecutive first-of-month
/// dates (empty when `number_of_months <= 0`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerState {
    pub input_value: InputValue,
    pub selected_date: SelectedDate,
    pub is_visible: bool,
    pub number_of_months: i32,
    pub visible_month_anchors: Vec<Date>,
}

impl PickerState {
    /// Builds the mount state. Months are anchored at the configured start
    /// date, or at `today` when none is set.
    pub fn from_config(config: &PickerConfig, today: Date) -> Self {
        let anchor = config.selected_date.start.unwrap_or(today);
        Self {
            input_value: config.input_value.clone(),
            selected_date: config.selected_date,
            is_visible: config.is_visible,
            number_of_months: config.number_of_months,
            visible_month_anchors: anchors_for(config.number_of_months, anchor),
        }
    }

    pub fn first_visible_anchor(&self, today: Date) -> Date {
        self.visible_month_anchors.first().copied().unwrap_or(today)
    }

    pub fn month_count(&self) -> usize {
        usize::try_from(self.number_of_months).unwrap_or(0)
    }
}

pub(crate) fn anchors_for(number_of_months: i32, anchor: Date) -> Vec<Date> {
    let count = usize::try_from(number_of_months).unwrap_or(0);
    calendar::first_days_of_consecutive_months(count, anchor)
}
