use crate::core::controller::PickerHandle;
use crate::core::error::PickerError;
use crate::core::form_state::FormStore;
use crate::core::pointer::{PointerEvent, PointerHub, PointerKind};
use crate::core::state::{PickerConfig, PickerState};
use crate::runtime::command::Command;
use crate::runtime::event::WidgetAction;
use crate::runtime::key_bindings::KeyBindings;
use crate::terminal::{KeyCode, KeyEvent, TerminalSize};
use crate::ui::renderer::{NodeRows, RenderFrame, RenderView, Renderer};
use crate::ui::span::Span;
use crate::ui::style::{Color, Style};
use crate::widgets::components::date_picker::DatePickerField;
use crate::widgets::inputs::button::ButtonInput;
use crate::widgets::shared::calendar::Clock;
use crate::widgets::traits::{FocusMode, InteractionResult, InteractiveNode};
use log::{debug, info};

pub const PICKER_ID: &str = "start_date";
const TITLE: &str = "Pick a start date";
const HINT: &str = "Tab/Shift+Tab to move, arrows + Enter to pick, PgUp/PgDn for months, Ctrl+S submit, Esc to exit";

/// A form with one date picker field, a submit button and a reset button.
pub struct App {
    form: FormStore,
    hub: PointerHub,
    picker: PickerHandle,
    nodes: Vec<Box<dyn InteractiveNode>>,
    focused: Option<usize>,
    node_rows: Vec<NodeRows>,
    key_bindings: KeyBindings,
    submitted: Option<serde_json::Value>,
    should_exit: bool,
}

impl App {
    pub fn new(config: &PickerConfig, clock: impl Clock + 'static) -> Self {
        let form = FormStore::new([(
            config.field_name.clone(),
            config.input_value.start.clone(),
        )]);
        let hub = PointerHub::new();

        let mut picker = DatePickerField::new(PICKER_ID, "Start date", config, clock);
        picker.mount(&hub);
        let handle = picker.controller().handle().clone();

        let nodes: Vec<Box<dyn InteractiveNode>> = vec![
            Box::new(picker),
            Box::new(ButtonInput::new(
                "submit",
                "submit",
                WidgetAction::SubmitForm,
            )),
            Box::new(ButtonInput::new("reset", "reset", WidgetAction::ResetForm)),
        ];

        Self {
            form,
            hub,
            picker: handle,
            nodes,
            focused: None,
            node_rows: Vec::new(),
            key_bindings: KeyBindings::new(),
            submitted: None,
            should_exit: false,
        }
    }

    pub fn form(&self) -> &FormStore {
        &self.form
    }

    pub fn picker_state(&self) -> PickerState {
        self.picker.state()
    }

    pub fn pointer_hub(&self) -> &PointerHub {
        &self.hub
    }

    pub fn focused_id(&self) -> Option<&str> {
        self.focused
            .and_then(|idx| self.nodes.get(idx))
            .map(|node| node.id())
    }

    pub fn submitted(&self) -> Option<&serde_json::Value> {
        self.submitted.as_ref()
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<(), PickerError> {
        if let Some(command) = self.key_bindings.resolve(key) {
            return self.run_command(command);
        }

        let result = match self.focused.and_then(|idx| self.nodes.get_mut(idx)) {
            Some(node) => node.on_key(key),
            None => InteractionResult::ignored(),
        };
        if !result.handled && key.code == KeyCode::Esc {
            self.should_exit = true;
            return Ok(());
        }
        self.apply_result(result)
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<(), PickerError> {
        self.hub.dispatch(&event);
        if event.kind != PointerKind::Press {
            return Ok(());
        }

        let target = self
            .node_rows
            .iter()
            .position(|rows| rows.contains(event.row));
        match target {
            Some(idx) => {
                self.set_focus(Some(idx));
                let result = self.nodes[idx].on_pointer(&event);
                self.apply_result(result)
            }
            None => {
                self.set_focus(None);
                Ok(())
            }
        }
    }

    fn run_command(&mut self, command: Command) -> Result<(), PickerError> {
        debug!("command: {command:?}");
        match command {
            Command::Exit => self.should_exit = true,
            Command::NextFocus => self.move_focus(1),
            Command::PrevFocus => self.move_focus(-1),
            Command::Submit => self.submit()?,
            Command::ResetForm => self.reset_form(),
        }
        Ok(())
    }

    // ── Focus ─────────────────────────────────────────────────────────────────

    fn move_focus(&mut self, delta: isize) {
        let focusable: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.focus_mode() != FocusMode::None)
            .map(|(idx, _)| idx)
            .collect();
        if focusable.is_empty() {
            return;
        }

        let len = focusable.len() as isize;
        let next = match self
            .focused
            .and_then(|idx| focusable.iter().position(|f| *f == idx))
        {
            Some(pos) => (pos as isize + delta).rem_euclid(len) as usize,
            None if delta >= 0 => 0,
            None => focusable.len() - 1,
        };
        self.set_focus(Some(focusable[next]));
    }

    fn set_focus(&mut self, target: Option<usize>) {
        if self.focused == target {
            return;
        }
        if let Some(node) = self.focused.and_then(|idx| self.nodes.get_mut(idx)) {
            node.on_blur();
        }
        self.focused = target;
        if let Some(node) = self.focused.and_then(|idx| self.nodes.get_mut(idx)) {
            node.on_focus();
        }
        debug!("focus -> {:?}", self.focused_id());
    }

    // ── Form ──────────────────────────────────────────────────────────────────

    fn apply_result(&mut self, result: InteractionResult) -> Result<(), PickerError> {
        for action in result.actions {
            match action {
                WidgetAction::ValueChanged { change } => {
                    self.form.set_field_value(change.target, change.value);
                    self.notify_form_changed();
                }
                WidgetAction::SubmitForm => self.submit()?,
                WidgetAction::ResetForm => self.reset_form(),
            }
        }
        Ok(())
    }

    fn notify_form_changed(&mut self) {
        for node in &mut self.nodes {
            node.on_form_changed(&self.form);
        }
    }

    fn submit(&mut self) -> Result<(), PickerError> {
        self.submitted = Some(self.form.submit()?);
        Ok(())
    }

    fn reset_form(&mut self) {
        info!("resetting form");
        self.form.reset();
        self.notify_form_changed();
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    pub fn render(&mut self, terminal_size: TerminalSize) -> RenderFrame {
        let dim = Style::new().color(Color::DarkGrey);
        let values = serde_json::to_string(self.form.values()).unwrap_or_default();
        let mut values_line = vec![Span::styled(format!("values: {values}"), dim)];
        if self.form.is_dirty() {
            values_line.push(Span::styled(" (modified)", Style::new().color(Color::Yellow)));
        }
        let mut footer = vec![values_line];
        if let Some(submitted) = &self.submitted {
            footer.push(vec![Span::styled(
                format!("submitted #{}: {submitted}", self.form.submit_count()),
                Style::new().color(Color::Green),
            )]);
        }

        let view = RenderView {
            title: TITLE,
            hint: Some(HINT),
            nodes: &self.nodes,
            focused: self.focused,
            footer,
        };
        let (frame, rows) = Renderer::render(&view, terminal_size);
        self.node_rows = rows;
        frame
    }
}
