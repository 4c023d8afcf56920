use crate::core::event::Action;
use crate::core::state::{InputValue, PickerState, SelectedDate, anchors_for};
use crate::widgets::shared::calendar::{self, Date};

pub struct Reducer;

impl Reducer {
    /// Pure transition. `today` anchors navigation when no month is visible.
    pub fn reduce(state: &PickerState, action: Action, today: Date) -> PickerState {
        match action {
            Action::Reset => PickerState {
                input_value: InputValue::default(),
                selected_date: SelectedDate::default(),
                ..state.clone()
            },
            Action::Focus => PickerState {
                is_visible: true,
                ..state.clone()
            },
            Action::Blur => PickerState {
                is_visible: false,
                ..state.clone()
            },
            Action::ChangeInput(text) => Self::change_input(state, text),
            Action::SelectDate(date) => PickerState {
                is_visible: false,
                input_value: InputValue {
                    start: calendar::format_date(date),
                    ..state.input_value.clone()
                },
                selected_date: SelectedDate {
                    start: Some(date),
                    ..state.selected_date
                },
                ..state.clone()
            },
            Action::GoPrevMonth => Self::shift_months(state, -1, today),
            Action::GoNextMonth => Self::shift_months(state, 1, today),
        }
    }

    fn change_input(state: &PickerState, text: String) -> PickerState {
        let parsed = calendar::parse_date_text(&text).ok();
        let mut next = PickerState {
            input_value: InputValue {
                start: text,
                ..state.input_value.clone()
            },
            ..state.clone()
        };

        // Invalid text keeps the last valid selection and view.
        if let Some(date) = parsed {
            next.selected_date.start = Some(date);
            next.visible_month_anchors = anchors_for(state.number_of_months, date);
        }
        next
    }

    fn shift_months(state: &PickerState, delta: i32, today: Date) -> PickerState {
        let current = state.first_visible_anchor(today);
        PickerState {
            visible_month_anchors: anchors_for(
                state.number_of_months,
                calendar::add_months(current, delta),
            ),
            ..state.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::PickerConfig;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn today() -> Date {
        date(2024, 1, 10)
    }

    fn mounted(months: i32) -> PickerState {
        PickerState::from_config(
            &PickerConfig::default().with_number_of_months(months),
            today(),
        )
    }

    #[test]
    fn focus_and_blur_toggle_visibility() {
        let state = mounted(1);
        let opened = Reducer::reduce(&state, Action::Focus, today());
        assert!(opened.is_visible);
        let closed = Reducer::reduce(&opened, Action::Blur, today());
        assert!(!closed.is_visible);
        assert_eq!(closed.visible_month_anchors, state.visible_month_anchors);
    }

    #[test]
    fn reset_clears_text_and_selection() {
        let mut state = mounted(1);
        state.input_value.start = "2024/03/03".to_string();
        state.input_value.end = Some("2024/03/09".to_string());
        state.selected_date.start = Some(date(2024, 3, 3));
        state.selected_date.end = Some(date(2024, 3, 9));
        state.is_visible = true;

        let next = Reducer::reduce(&state, Action::Reset, today());
        assert_eq!(next.input_value.start, "");
        assert_eq!(next.input_value.end, None);
        assert_eq!(next.selected_date, SelectedDate::default());
        assert!(next.is_visible);
        assert_eq!(next.visible_month_anchors, state.visible_month_anchors);
    }

    #[test]
    fn select_date_closes_and_formats() {
        let opened = Reducer::reduce(&mounted(2), Action::Focus, today());
        let next = Reducer::reduce(&opened, Action::SelectDate(date(2024, 2, 5)), today());
        assert!(!next.is_visible);
        assert_eq!(next.input_value.start, "2024/02/05");
        assert_eq!(next.selected_date.start, Some(date(2024, 2, 5)));
        assert_eq!(next.visible_month_anchors, opened.visible_month_anchors);
    }

    #[test]
    fn valid_text_moves_selection_and_view() {
        let state = mounted(2);
        let next = Reducer::reduce(
            &state,
            Action::ChangeInput("2024-02-15".to_string()),
            today(),
        );
        assert_eq!(next.input_value.start, "2024-02-15");
        assert_eq!(next.selected_date.start, Some(date(2024, 2, 15)));
        assert_eq!(
            next.visible_month_anchors,
            vec![date(2024, 2, 1), date(2024, 3, 1)]
        );
    }

    #[test]
    fn invalid_text_is_stored_but_ignored() {
        let mut state = mounted(2);
        state.selected_date.start = Some(date(2023, 6, 1));
        let next = Reducer::reduce(
            &state,
            Action::ChangeInput("not-a-date".to_string()),
            today(),
        );
        assert_eq!(next.input_value.start, "not-a-date");
        assert_eq!(next.selected_date.start, Some(date(2023, 6, 1)));
        assert_eq!(next.visible_month_anchors, state.visible_month_anchors);
    }

    #[test]
    fn next_month_shifts_window() {
        let state = mounted(2);
        assert_eq!(
            state.visible_month_anchors,
            vec![date(2024, 1, 1), date(2024, 2, 1)]
        );
        let next = Reducer::reduce(&state, Action::GoNextMonth, today());
        assert_eq!(
            next.visible_month_anchors,
            vec![date(2024, 2, 1), date(2024, 3, 1)]
        );
    }

    #[test]
    fn next_then_prev_round_trips() {
        let state = mounted(3);
        let forward = Reducer::reduce(&state, Action::GoNextMonth, today());
        let back = Reducer::reduce(&forward, Action::GoPrevMonth, today());
        assert_eq!(back.visible_month_anchors, state.visible_month_anchors);
    }

    #[test]
    fn prev_month_wraps_year() {
        let state = mounted(1);
        let prev = Reducer::reduce(&state, Action::GoPrevMonth, today());
        assert_eq!(prev.visible_month_anchors, vec![date(2023, 12, 1)]);
    }

    #[test]
    fn navigation_without_anchors_uses_today() {
        let mut state = mounted(1);
        state.visible_month_anchors.clear();
        let next = Reducer::reduce(&state, Action::GoNextMonth, date(2024, 5, 20));
        assert_eq!(next.visible_month_anchors, vec![date(2024, 6, 1)]);
    }

    #[test]
    fn navigation_with_zero_months_stays_empty() {
        let state = mounted(0);
        let next = Reducer::reduce(&state, Action::GoNextMonth, today());
        assert!(next.visible_month_anchors.is_empty());
    }
}
