//! Typed access to validated module parameters.

use crate::models::Tags;
use crate::modules::{ModuleError, ModuleResult};
use serde_json::{Map, Value};

/// Parameters after [`ArgSpec::validate`](super::ArgSpec::validate).
///
/// Values already carry their declared type, so accessors only need to
/// read them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: Map<String, Value>,
}

impl Params {
    pub fn new(values: Map<String, Value>) -> Self {
        Params { values }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn require_str(&self, key: &str) -> ModuleResult<&str> {
        self.get_str(key)
            .ok_or_else(|| ModuleError::InvalidParameter(format!("missing required arguments: {key}")))
    }

    /// Missing bools read as `false`.
    pub fn get_bool(&self, key: &str) -> bool {
        self.values
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn get_str_list(&self, key: &str) -> Option<Vec<String>> {
        let items = self.values.get(key)?.as_array()?;
        Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        )
    }

    /// Dict option read as resource tags; non-string values are stringified.
    pub fn get_tags(&self, key: &str) -> Option<Tags> {
        let object = self.values.get(key)?.as_object()?;
        Some(
            object
                .iter()
                .map(|(k, v)| {
                    let value = match v {
                        Value::String(s) => s.clone(),
                        Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    (k.clone(), value)
                })
                .collect(),
        )
    }
}
