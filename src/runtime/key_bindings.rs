use crate::runtime::command::Command;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn from_event(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

#[derive(Default)]
pub struct KeyBindings {
    bindings: HashMap<KeyBinding, Command>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut manager = Self::default();
        manager.install_defaults();
        manager
    }

    pub fn bind(&mut self, key: KeyBinding, command: Command) {
        self.bindings.insert(key, command);
    }

    pub fn resolve(&self, event: KeyEvent) -> Option<Command> {
        self.bindings.get(&KeyBinding::from_event(event)).copied()
    }

    fn install_defaults(&mut self) {
        self.bind(KeyBinding::ctrl(KeyCode::Char('c')), Command::Exit);
        self.bind(KeyBinding::key(KeyCode::Tab), Command::NextFocus);
        self.bind(KeyBinding::key(KeyCode::BackTab), Command::PrevFocus);
        self.bind(
            KeyBinding::new(KeyCode::BackTab, KeyModifiers::SHIFT),
            Command::PrevFocus,
        );
        self.bind(KeyBinding::ctrl(KeyCode::Char('s')), Command::Submit);
        self.bind(KeyBinding::ctrl(KeyCode::Char('r')), Command::ResetForm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve() {
        let bindings = KeyBindings::new();
        let ctrl_c = KeyEvent::with_modifiers(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(bindings.resolve(ctrl_c), Some(Command::Exit));
        assert_eq!(
            bindings.resolve(KeyEvent::new(KeyCode::Tab)),
            Some(Command::NextFocus)
        );
        assert_eq!(bindings.resolve(KeyEvent::new(KeyCode::Char('c'))), None);
    }

    #[test]
    fn form_commands_and_back_tab_resolve() {
        let bindings = KeyBindings::new();
        let ctrl = |ch| KeyEvent::with_modifiers(KeyCode::Char(ch), KeyModifiers::CONTROL);
        assert_eq!(bindings.resolve(ctrl('s')), Some(Command::Submit));
        assert_eq!(bindings.resolve(ctrl('r')), Some(Command::ResetForm));
        assert_eq!(
            bindings.resolve(KeyEvent::with_modifiers(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(Command::PrevFocus)
        );
        assert_eq!(bindings.resolve(KeyEvent::new(KeyCode::Esc)), None);
    }
}
