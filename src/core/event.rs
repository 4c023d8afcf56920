use crate::widgets::shared::calendar::Date;

/// Everything that can change a picker's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Reset,
    Focus,
    Blur,
    ChangeInput(String),
    SelectDate(Date),
    GoPrevMonth,
    GoNextMonth,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::ChangeInput(_) => "change_input",
            Self::SelectDate(_) => "select_date",
            Self::GoPrevMonth => "prev_month",
            Self::GoNextMonth => "next_month",
        }
    }
}
