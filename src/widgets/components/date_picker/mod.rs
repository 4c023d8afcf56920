mod layout;

pub use layout::{Hit, PanelLayout};

use crate::core::controller::PickerController;
use crate::core::form_state::FormStore;
use crate::core::pointer::{PointerEvent, PointerHub};
use crate::core::state::{PickerConfig, PickerState};
use crate::core::value::Value;
use crate::runtime::event::{ValueChange, WidgetAction};
use crate::terminal::{CursorPos, KeyCode, KeyEvent, KeyModifiers};
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};
use crate::widgets::base::InputBase;
use crate::widgets::inputs::text_edit;
use crate::widgets::shared::calendar::{self, Clock, Date};
use crate::widgets::traits::{
    DrawOutput, Drawable, FocusMode, InteractionResult, Interactive, RenderContext,
};
use chrono::Duration;
use layout::{GRID_INDENT, NEXT_LABEL, PREV_LABEL};
use log::debug;
use std::cell::Cell;
use unicode_width::UnicodeWidthStr;

const PLACEHOLDER: &str = "yyyy/MM/dd";

/// Text input with a toggleable panel of month grids, bound to one form field.
pub struct DatePickerField {
    base: InputBase,
    controller: PickerController,
    field_name: String,
    text_cursor: usize,
    day_cursor: Option<Date>,
    origin_row: Cell<u16>,
}

impl DatePickerField {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        config: &PickerConfig,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            base: InputBase::new(id, label),
            controller: PickerController::new(config, clock),
            field_name: config.field_name.clone(),
            text_cursor: text_edit::char_count(&config.input_value.start),
            day_cursor: None,
            origin_row: Cell::new(0),
        }
    }

    pub fn mount(&mut self, hub: &PointerHub) {
        self.controller.mount(hub);
    }

    pub fn unmount(&mut self) {
        self.controller.unmount();
    }

    pub fn controller(&self) -> &PickerController {
        &self.controller
    }

    /// Geometry of the last render position with the current state.
    pub fn layout(&self) -> PanelLayout {
        self.layout_at(&self.controller.state(), self.origin_row.get())
    }

    fn layout_at(&self, state: &PickerState, origin_row: u16) -> PanelLayout {
        PanelLayout::compute(
            origin_row,
            self.prefix_width(),
            state,
            self.controller.week_start(),
        )
    }

    fn prefix(&self, focused: bool) -> String {
        format!("{}: ", self.base.prefixed_label(focused))
    }

    fn prefix_width(&self) -> u16 {
        u16::try_from(UnicodeWidthStr::width(self.prefix(false).as_str())).unwrap_or(u16::MAX)
    }

    fn bound_change(&self, text: String) -> InteractionResult {
        InteractionResult::with_action(WidgetAction::ValueChanged {
            change: ValueChange::new(self.field_name.clone(), Value::Text(text)),
        })
    }

    // ── Text editing ──────────────────────────────────────────────────────────

    fn edit_text(&mut self, edit: impl FnOnce(&mut String, &mut usize) -> bool) -> InteractionResult {
        let mut text = self.controller.state().input_value.start;
        let mut cursor = self.text_cursor;
        if !edit(&mut text, &mut cursor) {
            return InteractionResult::handled();
        }
        self.text_cursor = cursor;
        self.controller.change_input(text.clone());
        self.day_cursor = self.controller.state().selected_date.start;
        self.bound_change(text)
    }

    fn move_text_cursor(&mut self, to_end: bool) -> InteractionResult {
        self.text_cursor = if to_end {
            text_edit::char_count(&self.controller.state().input_value.start)
        } else {
            0
        };
        InteractionResult::handled()
    }

    // ── Day selection ─────────────────────────────────────────────────────────

    fn select(&mut self, date: Date) -> InteractionResult {
        self.controller.select_start(date);
        let text = self.controller.state().input_value.start;
        self.text_cursor = text_edit::char_count(&text);
        self.day_cursor = Some(date);
        self.bound_change(text)
    }

    /// Keyboard cursor inside the panel: the last moved-to day if still on
    /// screen, else the selected day if on screen, else the first visible 1st.
    fn active_day_cursor(&self, state: &PickerState) -> Option<Date> {
        let on_screen = |date: &Date| {
            state
                .visible_month_anchors
                .iter()
                .any(|anchor| calendar::is_same_month(*anchor, *date))
        };
        self.day_cursor
            .filter(on_screen)
            .or(state.selected_date.start.filter(on_screen))
            .or(state.visible_month_anchors.first().copied())
    }

    fn move_day_cursor(&mut self, days: i64) -> InteractionResult {
        let state = self.controller.state();
        let Some(current) = self.active_day_cursor(&state) else {
            return InteractionResult::handled();
        };
        let Some(target) = current.checked_add_signed(Duration::days(days)) else {
            return InteractionResult::handled();
        };

        if let (Some(first), Some(last)) = (
            state.visible_month_anchors.first(),
            state.visible_month_anchors.last(),
        ) {
            if target < *first {
                self.controller.prev_month();
            } else if target > calendar::last_of_month(*last) {
                self.controller.next_month();
            }
        }
        self.day_cursor = Some(target);
        InteractionResult::handled()
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw_input_line(&self, state: &PickerState, focused: bool) -> SpanLine {
        let mut line = vec![Span::new(self.prefix(focused))];
        if state.input_value.start.is_empty() {
            line.push(Span::styled(
                PLACEHOLDER,
                Style::new().color(Color::DarkGrey).dim(),
            ));
        } else {
            let style = if focused {
                Style::new().color(Color::Cyan)
            } else {
                Style::default()
            };
            line.push(Span::styled(state.input_value.start.clone(), style));
        }
        line
    }

    fn draw_panel(
        &self,
        state: &PickerState,
        layout: &PanelLayout,
        focused: bool,
        lines: &mut Vec<SpanLine>,
    ) {
        let today = self.controller.handle().today();
        let nav_style = Style::new().color(Color::Blue).bold();
        let heading = calendar::year_month_heading(state.first_visible_anchor(today));
        lines.push(vec![
            Span::new(" ".repeat(GRID_INDENT as usize)),
            Span::styled(PREV_LABEL, nav_style),
            Span::new("   "),
            Span::styled(NEXT_LABEL, nav_style),
            Span::new("   "),
            Span::styled(heading, Style::new().bold()),
        ]);

        let cursor = if focused {
            self.active_day_cursor(state)
        } else {
            None
        };
        let indent = " ".repeat(GRID_INDENT as usize);
        let dim = Style::new().color(Color::DarkGrey);

        for block in &layout.months {
            lines.push(Vec::new());
            lines.push(vec![
                Span::new(indent.clone()),
                Span::styled(calendar::month_title(block.anchor), Style::new().bold()),
            ]);

            let mut header = vec![Span::new(indent.clone())];
            for name in self.controller.week_start().headers() {
                header.push(Span::styled(format!(" {name} "), dim));
            }
            lines.push(header);

            for week in calendar::weeks(&block.cells) {
                let mut line = vec![Span::new(indent.clone())];
                for cell in week {
                    // trailing days of a neighbour month are never marked
                    let is_cursor = cell.in_displayed_month && cursor == Some(cell.date);
                    let is_selected =
                        cell.in_displayed_month && state.selected_date.start == Some(cell.date);
                    let style = if is_cursor {
                        Style::new().color(Color::Yellow).bold()
                    } else if is_selected {
                        Style::new().color(Color::Cyan).bold()
                    } else if !cell.in_displayed_month {
                        dim.dim()
                    } else if cell.date == today {
                        Style::new().color(Color::Green)
                    } else {
                        Style::default()
                    };
                    let (l, r) = if is_cursor { ("[", "]") } else { (" ", " ") };
                    line.push(Span::styled(
                        format!("{l}{}{r}", cell.date.format("%d")),
                        style,
                    ));
                }
                lines.push(line);
            }
        }
    }
}

// ── Drawable ──────────────────────────────────────────────────────────────────

impl Drawable for DatePickerField {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn label(&self) -> &str {
        self.base.label()
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        let focused = self.base.is_focused(ctx);
        let state = self.controller.state();
        let layout = self.layout_at(&state, ctx.origin_row);

        self.origin_row.set(ctx.origin_row);
        self.controller.input_region().set(Some(layout.input));
        self.controller.months_region().set(layout.panel);

        let mut lines = vec![self.draw_input_line(&state, focused)];
        if state.is_visible {
            self.draw_panel(&state, &layout, focused, &mut lines);
        }
        DrawOutput { lines }
    }
}

// ── Interactive ───────────────────────────────────────────────────────────────

impl Interactive for DatePickerField {
    fn focus_mode(&self) -> FocusMode {
        FocusMode::Leaf
    }

    fn on_focus(&mut self) {
        self.controller.focus();
    }

    fn on_blur(&mut self) {
        self.controller.blur();
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        if key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT)
        {
            return InteractionResult::ignored();
        }
        let visible = self.controller.handle().is_visible();

        match key.code {
            KeyCode::Char(ch) => {
                self.edit_text(|text, cursor| {
                    text_edit::insert_char(text, cursor, ch);
                    true
                })
            }
            KeyCode::Backspace => self.edit_text(text_edit::backspace_char),
            KeyCode::Delete => self.edit_text(text_edit::delete_char),
            KeyCode::Home => self.move_text_cursor(false),
            KeyCode::End => self.move_text_cursor(true),
            KeyCode::Left if !visible => {
                let text = self.controller.state().input_value.start;
                text_edit::move_left(&mut self.text_cursor, &text);
                InteractionResult::handled()
            }
            KeyCode::Right if !visible => {
                let text = self.controller.state().input_value.start;
                text_edit::move_right(&mut self.text_cursor, &text);
                InteractionResult::handled()
            }
            KeyCode::Down | KeyCode::Enter if !visible => {
                self.controller.focus();
                InteractionResult::handled()
            }
            KeyCode::Left => self.move_day_cursor(-1),
            KeyCode::Right => self.move_day_cursor(1),
            KeyCode::Up => self.move_day_cursor(-7),
            KeyCode::Down => self.move_day_cursor(7),
            KeyCode::PageUp => {
                self.controller.prev_month();
                InteractionResult::handled()
            }
            KeyCode::PageDown => {
                self.controller.next_month();
                InteractionResult::handled()
            }
            KeyCode::Enter => {
                let state = self.controller.state();
                match self.active_day_cursor(&state) {
                    Some(date) => self.select(date),
                    None => InteractionResult::handled(),
                }
            }
            KeyCode::Esc if visible => {
                self.controller.blur();
                InteractionResult::handled()
            }
            _ => InteractionResult::ignored(),
        }
    }

    fn on_pointer(&mut self, event: &PointerEvent) -> InteractionResult {
        let Some(hit) = self.layout().hit_test(event.col, event.row) else {
            return InteractionResult::ignored();
        };
        debug!("date picker hit: {hit:?}");
        match hit {
            Hit::Input => {
                self.controller.focus();
                InteractionResult::handled()
            }
            Hit::PrevMonth => {
                self.controller.prev_month();
                InteractionResult::handled()
            }
            Hit::NextMonth => {
                self.controller.next_month();
                InteractionResult::handled()
            }
            Hit::Day(date) => self.select(date),
        }
    }

    fn on_form_changed(&mut self, form: &FormStore) {
        let bound = form.text(&self.field_name);
        let state = self.controller.state();
        if bound.is_empty() {
            if !state.input_value.start.is_empty() || state.selected_date.start.is_some() {
                self.controller.reset();
                self.text_cursor = 0;
                self.day_cursor = None;
            }
            return;
        }
        if bound != state.input_value.start {
            self.controller.change_input(bound);
            self.text_cursor = text_edit::char_count(bound);
            self.day_cursor = self.controller.state().selected_date.start;
        }
    }

    fn cursor_pos(&self) -> Option<CursorPos> {
        let state = self.controller.state();
        let before: String = state
            .input_value
            .start
            .chars()
            .take(self.text_cursor)
            .collect();
        let offset = u16::try_from(UnicodeWidthStr::width(before.as_str())).unwrap_or(u16::MAX);
        Some(CursorPos {
            col: self.prefix_width().saturating_add(offset),
            row: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pointer::Rect;
    use crate::terminal::TerminalSize;
    use crate::ui::span::line_text;
    use crate::widgets::shared::calendar::FixedClock;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn field(months: i32) -> DatePickerField {
        DatePickerField::new(
            "start_date",
            "Start",
            &PickerConfig::default().with_number_of_months(months),
            FixedClock(date(2024, 1, 10)),
        )
    }

    fn ctx(focused: bool) -> RenderContext {
        RenderContext {
            focused_id: focused.then(|| "start_date".to_string()),
            terminal_size: TerminalSize {
                width: 80,
                height: 40,
            },
            origin_row: 2,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code)
    }

    fn typed(field: &mut DatePickerField, text: &str) -> Vec<WidgetAction> {
        let mut actions = Vec::new();
        for ch in text.chars() {
            actions.extend(field.on_key(key(KeyCode::Char(ch))).actions);
        }
        actions
    }

    #[test]
    fn typing_updates_state_and_binds_value() {
        let mut picker = field(2);
        let actions = typed(&mut picker, "2024-02-15");
        assert_eq!(
            actions.last(),
            Some(&WidgetAction::ValueChanged {
                change: ValueChange::new("start", Value::from("2024-02-15")),
            })
        );
        let state = picker.controller().state();
        assert_eq!(state.selected_date.start, Some(date(2024, 2, 15)));
        assert_eq!(
            state.visible_month_anchors,
            vec![date(2024, 2, 1), date(2024, 3, 1)]
        );
    }

    #[test]
    fn focus_opens_and_escape_closes() {
        let mut picker = field(1);
        picker.on_focus();
        assert!(picker.controller().state().is_visible);
        picker.on_key(key(KeyCode::Esc));
        assert!(!picker.controller().state().is_visible);
        picker.on_key(key(KeyCode::Down));
        assert!(picker.controller().state().is_visible);
        picker.on_blur();
        assert!(!picker.controller().state().is_visible);
    }

    #[test]
    fn arrow_keys_move_cursor_and_enter_selects() {
        let mut picker = field(1);
        picker.on_focus();
        // cursor starts on Jan 1; two weeks down and one day right
        picker.on_key(key(KeyCode::Down));
        picker.on_key(key(KeyCode::Down));
        picker.on_key(key(KeyCode::Right));
        let result = picker.on_key(key(KeyCode::Enter));

        let state = picker.controller().state();
        assert_eq!(state.selected_date.start, Some(date(2024, 1, 16)));
        assert_eq!(state.input_value.start, "2024/01/16");
        assert!(!state.is_visible);
        assert_eq!(
            result.actions,
            vec![WidgetAction::ValueChanged {
                change: ValueChange::new("start", Value::from("2024/01/16")),
            }]
        );
    }

    #[test]
    fn cursor_past_last_month_navigates() {
        let mut picker = field(1);
        picker.on_focus();
        for _ in 0..5 {
            picker.on_key(key(KeyCode::Down));
        }
        assert_eq!(
            picker.controller().state().visible_month_anchors,
            vec![date(2024, 2, 1)]
        );
        picker.on_key(key(KeyCode::PageUp));
        picker.on_key(key(KeyCode::PageUp));
        assert_eq!(
            picker.controller().state().visible_month_anchors,
            vec![date(2023, 12, 1)]
        );
    }

    #[test]
    fn draw_sets_regions_and_matches_layout() {
        let picker = field(2);
        picker.controller().focus();
        let out = picker.draw(&ctx(true));
        let layout = picker.layout();
        assert_eq!(out.lines.len(), layout.height as usize);
        assert_eq!(picker.controller().input_region().get(), Some(layout.input));
        assert_eq!(picker.controller().months_region().get(), layout.panel);
        assert!(line_text(&out.lines[0]).starts_with("> Start: "));
        assert!(line_text(&out.lines[1]).contains("2024/1"));
        assert_eq!(line_text(&out.lines[layout.months[0].title_row as usize - 2]).trim(), "01");
    }

    #[test]
    fn cursor_on_month_boundary_is_drawn_once() {
        let picker = field(2);
        picker.controller().select_start(date(2024, 2, 1));
        picker.controller().focus();
        let out = picker.draw(&ctx(true));
        let layout = picker.layout();

        let marked: Vec<usize> = out
            .lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line_text(line).contains("[01]"))
            .map(|(idx, _)| idx)
            .collect();
        // Jan's last week also shows Feb 1, dimmed and unmarked.
        let feb_first_week = (layout.months[1].first_week_row - 2) as usize;
        assert_eq!(marked, vec![feb_first_week]);

        let jan_last_week = (layout.months[0].first_week_row - 2) as usize
            + layout.months[0].week_count() as usize
            - 1;
        let jan_line = &out.lines[jan_last_week];
        assert!(line_text(jan_line).contains(" 01 "));
        let feb_one_in_jan = jan_line
            .iter()
            .find(|span| span.text == " 01 ")
            .expect("Feb 1 drawn in January's grid");
        assert!(feb_one_in_jan.style.dim);
    }

    #[test]
    fn unmount_releases_outside_click_listener() {
        let hub = PointerHub::new();
        let mut picker = field(1);
        picker.mount(&hub);
        assert_eq!(hub.listener_count(), 1);
        picker.unmount();
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn closed_draw_hides_panel_region() {
        let picker = field(2);
        let out = picker.draw(&ctx(false));
        assert_eq!(out.lines.len(), 1);
        assert!(line_text(&out.lines[0]).contains(PLACEHOLDER));
        assert_eq!(picker.controller().months_region().get(), None);
        assert_eq!(
            picker.controller().input_region().get().map(|r: Rect| r.row),
            Some(2)
        );
    }

    #[test]
    fn clicking_day_selects_it() {
        let mut picker = field(1);
        picker.on_focus();
        picker.draw(&ctx(true));
        let layout = picker.layout();
        let rect = layout.months[0].cell_rect(1);
        let result = picker.on_pointer(&PointerEvent::press(rect.col, rect.row));
        assert_eq!(
            picker.controller().state().selected_date.start,
            Some(date(2024, 1, 1))
        );
        assert_eq!(result.actions.len(), 1);
    }

    #[test]
    fn clicking_next_navigates() {
        let mut picker = field(1);
        picker.on_focus();
        picker.draw(&ctx(true));
        let next = picker.layout().next.expect("panel is open");
        picker.on_pointer(&PointerEvent::press(next.col, next.row));
        assert_eq!(
            picker.controller().state().visible_month_anchors,
            vec![date(2024, 2, 1)]
        );
    }

    #[test]
    fn empty_form_field_resets_picker() {
        let mut picker = field(1);
        typed(&mut picker, "2024-02-15");
        let form = FormStore::new([("start", "")]);
        picker.on_form_changed(&form);
        let state = picker.controller().state();
        assert_eq!(state.input_value.start, "");
        assert_eq!(state.selected_date.start, None);
        assert_eq!(picker.cursor_pos().map(|c| c.col), Some(picker.prefix_width()));
    }

    #[test]
    fn form_value_flows_into_picker() {
        let mut picker = field(1);
        let form = FormStore::new([("start", "2024-06-01")]);
        picker.on_form_changed(&form);
        assert_eq!(
            picker.controller().state().selected_date.start,
            Some(date(2024, 6, 1))
        );
    }

    #[test]
    fn backspace_keeps_last_valid_selection() {
        let mut picker = field(1);
        typed(&mut picker, "2024-02-15");
        picker.on_key(key(KeyCode::Backspace));
        let state = picker.controller().state();
        assert_eq!(state.input_value.start, "2024-02-1");
        assert_eq!(state.selected_date.start, Some(date(2024, 2, 15)));
    }
}
