//! Loading module arguments the way Ansible hands them to binary modules.

use crate::modules::{ModuleError, ModuleResult};
use serde_json::{json, Map, Value};
use std::path::Path;

const WRAPPER_KEY: &str = "ANSIBLE_MODULE_ARGS";
const INTERNAL_PREFIX: &str = "_ansible_";
const CHECK_MODE_KEY: &str = "_ansible_check_mode";

/// Arguments for one module run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invocation {
    /// User facing module arguments, internal keys removed.
    pub args: Map<String, Value>,
    pub check_mode: bool,
}

impl Invocation {
    pub fn new(args: Map<String, Value>, check_mode: bool) -> Self {
        Invocation { args, check_mode }
    }

    /// Parse the JSON args text; accepts plain or `ANSIBLE_MODULE_ARGS` wrapped.
    pub fn parse(text: &str) -> ModuleResult<Invocation> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ModuleError::Parse(format!("module arguments are not valid JSON: {e}")))?;
        let Value::Object(mut object) = value else {
            return Err(ModuleError::Parse(
                "module arguments must be a JSON object".to_string(),
            ));
        };
        if let Some(Value::Object(inner)) = object.remove(WRAPPER_KEY) {
            object = inner;
        }

        let check_mode = matches!(object.get(CHECK_MODE_KEY), Some(Value::Bool(true)));
        object.retain(|key, _| !key.starts_with(INTERNAL_PREFIX));
        Ok(Invocation::new(object, check_mode))
    }

    pub fn from_file(path: &Path) -> ModuleResult<Invocation> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ModuleError::Parse(format!("cannot read args file {}: {e}", path.display()))
        })?;
        log::debug!("Read module args from {}", path.display());
        Self::parse(&text)
    }
}

/// The result Ansible expects when a module fails.
pub fn failure(msg: &str) -> Value {
    json!({
        "failed": true,
        "changed": false,
        "msg": msg,
    })
}
