use crate::core::pointer::Rect;
use crate::core::state::PickerState;
use crate::widgets::shared::calendar::{self, Date, DayCell, WeekStart};

pub const GRID_INDENT: u16 = 2;
pub const CELL_WIDTH: u16 = 4;
pub const PREV_LABEL: &str = "‹ prev";
pub const NEXT_LABEL: &str = "next ›";
const NAV_GAP: u16 = 3;
const MIN_INPUT_WIDTH: u16 = 10;

/// What a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Input,
    PrevMonth,
    NextMonth,
    Day(Date),
}

#[derive(Debug, Clone)]
pub struct MonthBlock {
    pub anchor: Date,
    pub title_row: u16,
    pub header_row: u16,
    pub first_week_row: u16,
    pub cells: Vec<DayCell>,
}

impl MonthBlock {
    pub fn week_count(&self) -> u16 {
        (self.cells.len() / 7) as u16
    }

    pub fn cell_rect(&self, index: usize) -> Rect {
        let row = self.first_week_row + (index / 7) as u16;
        let col = GRID_INDENT + (index % 7) as u16 * CELL_WIDTH;
        Rect::new(col, row, CELL_WIDTH, 1)
    }
}

/// Screen geometry of one picker render. Drawing and hit-testing share it.
#[derive(Debug, Clone)]
pub struct PanelLayout {
    pub input: Rect,
    pub nav_row: Option<u16>,
    pub prev: Option<Rect>,
    pub next: Option<Rect>,
    pub panel: Option<Rect>,
    pub months: Vec<MonthBlock>,
    pub height: u16,
}

impl PanelLayout {
    pub fn compute(
        origin_row: u16,
        prefix_width: u16,
        state: &PickerState,
        week_start: WeekStart,
    ) -> Self {
        let text_width = unicode_width::UnicodeWidthStr::width(state.input_value.start.as_str());
        let text_width = u16::try_from(text_width).unwrap_or(u16::MAX);
        let input = Rect::new(
            0,
            origin_row,
            prefix_width
                .saturating_add(text_width.max(MIN_INPUT_WIDTH))
                .saturating_add(1),
            1,
        );

        if !state.is_visible {
            return Self {
                input,
                nav_row: None,
                prev: None,
                next: None,
                panel: None,
                months: Vec::new(),
                height: 1,
            };
        }

        let nav_row = origin_row.saturating_add(1);
        let prev_width = label_width(PREV_LABEL);
        let prev = Rect::new(GRID_INDENT, nav_row, prev_width, 1);
        let next = Rect::new(
            GRID_INDENT + prev_width + NAV_GAP,
            nav_row,
            label_width(NEXT_LABEL),
            1,
        );

        let mut row = nav_row.saturating_add(1);
        let mut months = Vec::with_capacity(state.visible_month_anchors.len());
        for anchor in &state.visible_month_anchors {
            // blank separator, title, weekday header
            let title_row = row.saturating_add(1);
            let header_row = title_row.saturating_add(1);
            let first_week_row = header_row.saturating_add(1);
            let block = MonthBlock {
                anchor: *anchor,
                title_row,
                header_row,
                first_week_row,
                cells: calendar::month_grid(*anchor, week_start),
            };
            row = first_week_row.saturating_add(block.week_count());
            months.push(block);
        }

        let panel_width = GRID_INDENT + 7 * CELL_WIDTH;
        let panel = Rect::new(0, nav_row, panel_width, row.saturating_sub(nav_row));

        Self {
            input,
            nav_row: Some(nav_row),
            prev: Some(prev),
            next: Some(next),
            panel: Some(panel),
            months,
            height: row.saturating_sub(origin_row),
        }
    }

    pub fn hit_test(&self, col: u16, row: u16) -> Option<Hit> {
        if self.input.contains(col, row) {
            return Some(Hit::Input);
        }
        if self.prev.is_some_and(|r| r.contains(col, row)) {
            return Some(Hit::PrevMonth);
        }
        if self.next.is_some_and(|r| r.contains(col, row)) {
            return Some(Hit::NextMonth);
        }
        for block in &self.months {
            if row < block.first_week_row || row >= block.first_week_row + block.week_count() {
                continue;
            }
            return block
                .cells
                .iter()
                .enumerate()
                .find(|(index, _)| block.cell_rect(*index).contains(col, row))
                .map(|(_, cell)| Hit::Day(cell.date));
        }
        None
    }
}

fn label_width(label: &str) -> u16 {
    u16::try_from(unicode_width::UnicodeWidthStr::width(label)).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::PickerConfig;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn open_state(months: i32) -> PickerState {
        let config = PickerConfig {
            is_visible: true,
            number_of_months: months,
            ..PickerConfig::default()
        };
        PickerState::from_config(&config, date(2024, 1, 10))
    }

    #[test]
    fn closed_picker_is_one_line() {
        let mut state = open_state(2);
        state.is_visible = false;
        let layout = PanelLayout::compute(4, 12, &state, WeekStart::Sunday);
        assert_eq!(layout.height, 1);
        assert!(layout.panel.is_none());
        assert_eq!(layout.hit_test(13, 4), Some(Hit::Input));
        assert_eq!(layout.hit_test(3, 5), None);
    }

    #[test]
    fn open_picker_stacks_months() {
        // Jan 2024 spans 5 weeks, Feb 2024 spans 5 weeks (Sunday start).
        let layout = PanelLayout::compute(0, 12, &open_state(2), WeekStart::Sunday);
        assert_eq!(layout.nav_row, Some(1));
        assert_eq!(layout.months.len(), 2);
        assert_eq!(layout.months[0].title_row, 3);
        assert_eq!(layout.months[0].first_week_row, 5);
        assert_eq!(layout.months[1].title_row, 11);
        assert_eq!(layout.height, 18);
        assert_eq!(layout.panel.map(|p| p.height), Some(17));
    }

    #[test]
    fn hit_test_finds_controls_and_days() {
        let layout = PanelLayout::compute(0, 12, &open_state(1), WeekStart::Sunday);
        assert_eq!(layout.hit_test(GRID_INDENT, 1), Some(Hit::PrevMonth));
        assert_eq!(layout.hit_test(GRID_INDENT + 9, 1), Some(Hit::NextMonth));

        // Jan 1 2024 is a Monday: second column of the first week row.
        let row = layout.months[0].first_week_row;
        assert_eq!(
            layout.hit_test(GRID_INDENT + CELL_WIDTH, row),
            Some(Hit::Day(date(2024, 1, 1)))
        );
        assert_eq!(
            layout.hit_test(GRID_INDENT, row),
            Some(Hit::Day(date(2023, 12, 31)))
        );
        assert_eq!(layout.hit_test(GRID_INDENT + 7 * CELL_WIDTH, row), None);
    }
}
