use crate::core::error::PickerError;
use crate::core::value::Value;
use indexmap::IndexMap;
use log::{debug, info};

/// Form values owned outside the picker and written through field names.
#[derive(Debug, Clone, Default)]
pub struct FormStore {
    initial: IndexMap<String, Value>,
    values: IndexMap<String, Value>,
    submit_count: u32,
}

impl FormStore {
    pub fn new<K, V>(initial: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let initial: IndexMap<String, Value> = initial
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: initial.clone(),
            initial,
            submit_count: 0,
        }
    }

    pub fn set_field_value(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        debug!("form field {name:?} <- {value:?}");
        self.values.insert(name, value);
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> &str {
        self.value(name).map(Value::as_text).unwrap_or("")
    }

    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    pub fn is_dirty(&self) -> bool {
        self.values != self.initial
    }

    pub fn reset(&mut self) {
        debug!("form reset");
        self.values = self.initial.clone();
    }

    pub fn submit_count(&self) -> u32 {
        self.submit_count
    }

    /// Snapshot of the current values, as handed to a submit handler.
    pub fn submit(&mut self) -> Result<serde_json::Value, PickerError> {
        self.submit_count += 1;
        let payload = serde_json::to_value(&self.values)?;
        info!("form submitted: {payload}");
        Ok(payload)
    }
}
