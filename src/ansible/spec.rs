//! Argument spec declaration and validation.

use super::params::Params;
use crate::modules::{ModuleError, ModuleResult};
use itertools::Itertools;
use serde_json::{Map, Value};

/// Declared type of a module option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    Str,
    Bool,
    List,
    Dict,
}

impl ArgType {
    fn name(&self) -> &'static str {
        match self {
            ArgType::Str => "str",
            ArgType::Bool => "bool",
            ArgType::List => "list",
            ArgType::Dict => "dict",
        }
    }
}

/// One option of a module.
#[derive(Debug, Clone)]
pub struct ArgOption {
    pub name: &'static str,
    pub arg_type: ArgType,
    pub required: bool,
    pub default: Option<Value>,
    pub choices: &'static [&'static str],
    pub aliases: &'static [&'static str],
}

impl ArgOption {
    fn new(name: &'static str, arg_type: ArgType) -> Self {
        ArgOption {
            name,
            arg_type,
            required: false,
            default: None,
            choices: &[],
            aliases: &[],
        }
    }

    pub fn str(name: &'static str) -> Self {
        Self::new(name, ArgType::Str)
    }

    pub fn bool(name: &'static str) -> Self {
        Self::new(name, ArgType::Bool)
    }

    pub fn list(name: &'static str) -> Self {
        Self::new(name, ArgType::List)
    }

    pub fn dict(name: &'static str) -> Self {
        Self::new(name, ArgType::Dict)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn choices(mut self, choices: &'static [&'static str]) -> Self {
        self.choices = choices;
        self
    }

    pub fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }
}

/// Options shared by every Azure module.
pub fn common_azure_options() -> Vec<ArgOption> {
    vec![
        ArgOption::str("subscription_id"),
        ArgOption::str("auth_source")
            .choices(&["auto", "cli", "env"])
            .default("auto"),
        ArgOption::str("cloud_environment").default("AzureCloud"),
    ]
}

/// `(param, value, required params)`: when `param == value` the listed
/// params must be set.
pub type RequiredIf = (&'static str, &'static str, &'static [&'static str]);

/// Full argument spec of a module.
#[derive(Debug, Clone, Default)]
pub struct ArgSpec {
    pub options: Vec<ArgOption>,
    pub mutually_exclusive: Vec<(&'static str, &'static str)>,
    pub required_if: Vec<RequiredIf>,
}

impl ArgSpec {
    /// Spec with `options` plus the common Azure options.
    pub fn azure(options: Vec<ArgOption>) -> Self {
        let mut all = options;
        all.extend(common_azure_options());
        ArgSpec {
            options: all,
            ..Default::default()
        }
    }

    pub fn mutually_exclusive(mut self, a: &'static str, b: &'static str) -> Self {
        self.mutually_exclusive.push((a, b));
        self
    }

    pub fn required_if(
        mut self,
        param: &'static str,
        value: &'static str,
        required: &'static [&'static str],
    ) -> Self {
        self.required_if.push((param, value, required));
        self
    }

    fn option(&self, name: &str) -> Option<&ArgOption> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Validate raw module arguments and return typed params.
    pub fn validate(&self, module: &str, raw: &Map<String, Value>) -> ModuleResult<Params> {
        let mut values = self.resolve_aliases(raw);

        let unknown: Vec<&String> = values
            .keys()
            .filter(|k| self.option(k).is_none())
            .sorted()
            .collect();
        if !unknown.is_empty() {
            return Err(ModuleError::InvalidParameter(format!(
                "Unsupported parameters for ({module}) module: {}",
                unknown.iter().join(", ")
            )));
        }

        for (a, b) in &self.mutually_exclusive {
            if values.contains_key(*a) && values.contains_key(*b) {
                return Err(ModuleError::InvalidParameter(format!(
                    "parameters are mutually exclusive: {a}|{b}"
                )));
            }
        }

        let missing: Vec<&str> = self
            .options
            .iter()
            .filter(|o| o.required && !values.contains_key(o.name))
            .map(|o| o.name)
            .collect();
        if !missing.is_empty() {
            return Err(ModuleError::InvalidParameter(format!(
                "missing required arguments: {}",
                missing.join(", ")
            )));
        }

        for option in &self.options {
            if let Some(value) = values.get_mut(option.name) {
                *value = coerce(option, value)?;
                check_choices(option, value)?;
            } else if let Some(default) = &option.default {
                values.insert(option.name.to_string(), default.clone());
            }
        }

        for (param, expected, required) in &self.required_if {
            if values.get(*param).and_then(Value::as_str) != Some(*expected) {
                continue;
            }
            let missing: Vec<&str> = required
                .iter()
                .copied()
                .filter(|r| !values.contains_key(*r))
                .collect();
            if !missing.is_empty() {
                return Err(ModuleError::InvalidParameter(format!(
                    "{param} is {expected} but all of the following are missing: {}",
                    missing.join(", ")
                )));
            }
        }

        Ok(Params::new(values))
    }

    /// Rename aliases to canonical names and drop nulls.
    fn resolve_aliases(&self, raw: &Map<String, Value>) -> Map<String, Value> {
        let mut values = Map::new();
        for (key, value) in raw {
            if value.is_null() {
                continue;
            }
            let canonical = self
                .options
                .iter()
                .find(|o| o.aliases.contains(&key.as_str()))
                .map(|o| o.name.to_string())
                .unwrap_or_else(|| key.clone());
            if canonical != *key && raw.get(&canonical).is_some_and(|v| !v.is_null()) {
                log::warn!("Both option {canonical} and its alias {key} are set, using {canonical}");
                continue;
            }
            values.insert(canonical, value.clone());
        }
        values
    }
}

fn coerce(option: &ArgOption, value: &Value) -> ModuleResult<Value> {
    let coerced = match (option.arg_type, value) {
        (ArgType::Str, Value::String(_)) => Some(value.clone()),
        (ArgType::Str, Value::Number(n)) => Some(Value::String(n.to_string())),
        (ArgType::Str, Value::Bool(b)) => Some(Value::String(b.to_string())),
        (ArgType::Bool, Value::Bool(_)) => Some(value.clone()),
        (ArgType::Bool, Value::String(s)) => parse_bool(s).map(Value::Bool),
        (ArgType::Bool, Value::Number(n)) => match n.as_i64() {
            Some(0) => Some(Value::Bool(false)),
            Some(1) => Some(Value::Bool(true)),
            _ => None,
        },
        (ArgType::List, Value::Array(_)) => Some(value.clone()),
        (ArgType::List, Value::String(s)) => Some(Value::Array(
            s.split(',')
                .map(|item| Value::String(item.trim().to_string()))
                .collect(),
        )),
        (ArgType::Dict, Value::Object(_)) => Some(value.clone()),
        _ => None,
    };
    coerced.ok_or_else(|| {
        ModuleError::InvalidParameter(format!(
            "argument '{}' is of type {} and we were unable to convert to {}",
            option.name,
            json_type_name(value),
            option.arg_type.name()
        ))
    })
}

fn check_choices(option: &ArgOption, value: &Value) -> ModuleResult<()> {
    if option.choices.is_empty() {
        return Ok(());
    }
    match value.as_str() {
        Some(s) if option.choices.contains(&s) => Ok(()),
        _ => Err(ModuleError::InvalidParameter(format!(
            "value of {} must be one of: {}, got: {}",
            option.name,
            option.choices.join(", "),
            value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string())
        ))),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" | "y" => Some(true),
        "false" | "no" | "off" | "0" | "n" => Some(false),
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
