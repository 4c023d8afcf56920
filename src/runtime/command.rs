/// App-level commands resolved from key bindings before keys reach widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    NextFocus,
    PrevFocus,
    Submit,
    ResetForm,
}
