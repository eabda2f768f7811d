//! Azure CLI fallbacks.
//!
//! Used for the default subscription and for `auth_source: cli` tokens.

use colored::Colorize;
use regex::Regex;
use std::error::Error;
use std::process::Command;
use std::sync::OnceLock;

/// Largest stdout accepted from an `az` call; tokens and ids are tiny.
const MAX_STDOUT_BYTES: usize = 64_000;

static ARG_REGEX: OnceLock<Regex> = OnceLock::new();

fn arg_regex() -> &'static Regex {
    ARG_REGEX.get_or_init(|| {
        Regex::new(r#"'([^']*)'\s*|\"([^\"]*)\"\s*|([^'\s]*)\s*"#).expect("Invalid Regex")
    })
}

/// Run an `az` command line and return its trimmed stdout.
///
/// Quoted substrings stay together as a single argument.
pub fn run_az(cmd: &str) -> Result<String, Box<dyn Error>> {
    log::debug!("run_az({cmd})", cmd = cmd.on_blue());

    let args = split_args(cmd);
    let (program, rest) = match args.split_first() {
        Some((program, rest)) if !program.is_empty() => (*program, rest),
        _ => return Err("empty command".into()),
    };

    let output = Command::new(program)
        .args(rest.iter().filter(|a| !a.is_empty()))
        .output()
        .map_err(|e| format!("Failed to execute {program}: {e}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::trace!(
            "code={code:?}\n┎######\nstderr=\n{stderr}\n┖######",
            code = output.status.code(),
            stderr = stderr.red()
        );
        log::warn!(
            "{failed} to run {cmd}",
            failed = "failed".on_red(),
            cmd = cmd.on_blue()
        );
        return Err(format!("az cli error: {}", stderr.trim()).into());
    }

    if output.stdout.len() > MAX_STDOUT_BYTES {
        return Err(format!("az cli output too large: {} bytes", output.stdout.len()).into());
    }

    let stdout = String::from_utf8(output.stdout).map_err(|e| format!("Invalid UTF-8: {e}"))?;
    Ok(stdout.trim().to_string())
}

/// Subscription selected by `az account set` / `az login`.
pub fn default_subscription_id() -> Result<String, Box<dyn Error>> {
    let id = run_az("az account show --query id --output tsv")?;
    if id.is_empty() {
        return Err("az account show returned no subscription".into());
    }
    log::info!("Using az cli default subscription {id}");
    Ok(id)
}

/// Bearer token for `resource` from the logged in az cli account.
pub fn access_token(resource: &str) -> Result<String, Box<dyn Error>> {
    let token = run_az(&format!(
        "az account get-access-token --resource '{resource}' --query accessToken --output tsv"
    ))?;
    if token.is_empty() {
        return Err("az account get-access-token returned an empty token".into());
    }
    Ok(token)
}

fn split_args(input: &str) -> Vec<&str> {
    arg_regex()
        .find_iter(input)
        .map(|m| m.as_str().trim().trim_matches('\'').trim_matches('"'))
        .filter(|s| !s.is_empty())
        .collect()
}
