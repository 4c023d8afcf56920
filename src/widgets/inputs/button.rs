use crate::core::pointer::PointerEvent;
use crate::runtime::event::WidgetAction;
use crate::terminal::{KeyCode, KeyEvent};
use crate::ui::span::Span;
use crate::ui::style::{Color, Style};
use crate::widgets::base::InputBase;
use crate::widgets::traits::{
    DrawOutput, Drawable, FocusMode, InteractionResult, Interactive, RenderContext,
};

pub struct ButtonInput {
    base: InputBase,
    action: WidgetAction,
}

impl ButtonInput {
    pub fn new(id: impl Into<String>, label: impl Into<String>, action: WidgetAction) -> Self {
        Self {
            base: InputBase::new(id, label),
            action,
        }
    }

    fn press(&self) -> InteractionResult {
        InteractionResult::with_action(self.action.clone())
    }
}

impl Drawable for ButtonInput {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn label(&self) -> &str {
        self.base.label()
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        let focused = self.base.is_focused(ctx);
        let style = if focused {
            Style::new()
                .color(Color::White)
                .background(Color::Blue)
                .bold()
        } else {
            Style::new().color(Color::DarkGrey)
        };

        DrawOutput {
            lines: vec![vec![
                Span::new(format!("{} ", self.base.focus_marker(focused))),
                Span::styled(format!("[ {} ]", self.base.label()), style),
            ]],
        }
    }
}

impl Interactive for ButtonInput {
    fn focus_mode(&self) -> FocusMode {
        FocusMode::Leaf
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => self.press(),
            _ => InteractionResult::ignored(),
        }
    }

    fn on_pointer(&mut self, _event: &PointerEvent) -> InteractionResult {
        self.press()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_and_click_emit_action() {
        let mut button = ButtonInput::new("submit", "submit", WidgetAction::SubmitForm);
        let result = button.on_key(KeyEvent::new(KeyCode::Enter));
        assert_eq!(result.actions, vec![WidgetAction::SubmitForm]);

        let result = button.on_pointer(&PointerEvent::press(0, 0));
        assert_eq!(result.actions, vec![WidgetAction::SubmitForm]);

        let result = button.on_key(KeyEvent::new(KeyCode::Char('x')));
        assert!(!result.handled);
    }
}
