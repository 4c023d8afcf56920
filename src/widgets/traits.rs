use crate::core::form_state::FormStore;
use crate::core::pointer::PointerEvent;
use crate::runtime::event::WidgetAction;
use crate::terminal::{CursorPos, KeyEvent, TerminalSize};
use crate::ui::span::SpanLine;

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    /// Node does not participate in focus cycling.
    None,
    /// A single focusable leaf (text input, button, picker, …).
    Leaf,
}

// ---------------------------------------------------------------------------
// Render context & output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RenderContext {
    pub focused_id: Option<String>,
    pub terminal_size: TerminalSize,
    /// Screen row of the node's first line.
    pub origin_row: u16,
}

impl RenderContext {
    pub fn at_row(&self, origin_row: u16) -> Self {
        Self {
            origin_row,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DrawOutput {
    pub lines: Vec<SpanLine>,
}

// ---------------------------------------------------------------------------
// Drawable
// ---------------------------------------------------------------------------

pub trait Drawable {
    fn id(&self) -> &str;
    fn label(&self) -> &str {
        ""
    }
    fn draw(&self, ctx: &RenderContext) -> DrawOutput;
}

// ---------------------------------------------------------------------------
// InteractionResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct InteractionResult {
    pub handled: bool,
    pub actions: Vec<WidgetAction>,
}

impl InteractionResult {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            actions: Vec::new(),
        }
    }

    pub fn with_action(action: WidgetAction) -> Self {
        Self {
            handled: true,
            actions: vec![action],
        }
    }
}

// ---------------------------------------------------------------------------
// Interactive
// ---------------------------------------------------------------------------

pub trait Interactive {
    fn focus_mode(&self) -> FocusMode;

    fn on_focus(&mut self) {}
    fn on_blur(&mut self) {}

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult;

    /// Pointer press inside the node's rows, in screen coordinates.
    fn on_pointer(&mut self, _event: &PointerEvent) -> InteractionResult {
        InteractionResult::ignored()
    }

    /// Called after the form values changed from outside the node.
    fn on_form_changed(&mut self, _form: &FormStore) {}

    /// Cursor position relative to the node's first line.
    fn cursor_pos(&self) -> Option<CursorPos> {
        None
    }
}

pub trait InteractiveNode: Drawable + Interactive {}
impl<T> InteractiveNode for T where T: Drawable + Interactive {}
