use crate::core::value::Value;

pub type NodeId = String;

#[derive(Debug, Clone, PartialEq)]
pub struct ValueChange {
    pub target: NodeId,
    pub value: Value,
}

impl ValueChange {
    pub fn new(target: impl Into<NodeId>, value: Value) -> Self {
        Self {
            target: target.into(),
            value,
        }
    }
}

/// Actions emitted by widgets in `InteractionResult`.
/// These flow upward from widgets to the app, which owns the form values.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetAction {
    /// Write `change.value` into the form field named `change.target`.
    ValueChanged { change: ValueChange },
    SubmitForm,
    ResetForm,
}
