use serde::{Deserialize, Serialize};

/// A form field value. Serializes as the bare text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
}

impl Value {
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(v) => v,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
