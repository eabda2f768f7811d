//! Declarative Azure Resource Manager modules, runnable as Ansible binary modules.
//!
//! Each module validates its arguments, reads the current state from ARM,
//! makes at most one write and reports `changed` plus resource facts.

pub mod ansible;
pub mod azure;
pub mod config;
pub mod models;
pub mod modules;

use ansible::{failure, Invocation};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const USAGE: &str = "usage: azure-rm <module_name> <args_file> | azure-rm --list";

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run { module: String, args_file: PathBuf },
    List,
    /// Arguments did not match [`USAGE`].
    Usage,
}

/// Parse argv. A binary named after a module (symlink install) takes the
/// args file as its only argument.
pub fn parse_command(args: &[String]) -> Command {
    let invoked_as = args
        .first()
        .and_then(|a| Path::new(a).file_stem())
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    if modules::module_names().iter().any(|name| *name == invoked_as) {
        return match args.get(1) {
            Some(file) => Command::Run {
                module: invoked_as.to_string(),
                args_file: PathBuf::from(file),
            },
            None => Command::Usage,
        };
    }
    match (args.get(1).map(String::as_str), args.get(2)) {
        (Some("--list"), _) => Command::List,
        (Some(module), Some(file)) => Command::Run {
            module: module.to_string(),
            args_file: PathBuf::from(file),
        },
        _ => Command::Usage,
    }
}

/// Run module `name` with the args file at `args_file`.
///
/// Always returns the JSON object Ansible expects; failures carry
/// `failed: true` and `msg`.
pub async fn run_from_file(name: &str, args_file: &Path) -> Value {
    let Some(module) = modules::find_module(name) else {
        return failure(&modules::ModuleError::NotFound(name.to_string()).to_string());
    };
    let invocation = match Invocation::from_file(args_file) {
        Ok(invocation) => invocation,
        Err(e) => return failure(&e.to_string()),
    };
    match modules::run_module(module.as_ref(), &invocation).await {
        Ok(result) => result,
        Err(e) => failure(&e.to_string()),
    }
}

/// Whether a module result reports failure.
pub fn is_failed(result: &Value) -> bool {
    result.get("failed").and_then(Value::as_bool).unwrap_or(false)
}
