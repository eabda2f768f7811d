//! ARM scope and resource path construction.

use regex::Regex;
use std::sync::OnceLock;

static RESOURCE_ID_REGEX: OnceLock<Regex> = OnceLock::new();

fn resource_id_regex() -> &'static Regex {
    RESOURCE_ID_REGEX.get_or_init(|| {
        Regex::new(r"(?i)^/subscriptions/[^/]+(/resourcegroups/[^/]+(/providers/[^/]+(/[^/]+/[^/]+)+)?)?$")
            .expect("Invalid Regex")
    })
}

pub fn subscription_scope(subscription_id: &str) -> String {
    format!("/subscriptions/{subscription_id}")
}

pub fn resource_group_scope(subscription_id: &str, resource_group: &str) -> String {
    format!("/subscriptions/{subscription_id}/resourcegroups/{resource_group}")
}

/// Validate a user supplied resource id and strip any trailing `/`.
pub fn parse_resource_id(id: &str) -> Option<String> {
    let id = id.trim().trim_end_matches('/');
    resource_id_regex().is_match(id).then(|| id.to_string())
}

/// Scope a lock applies to: resource id, else resource group, else subscription.
pub fn lock_scope(
    subscription_id: &str,
    resource_group: Option<&str>,
    managed_resource_id: Option<&str>,
) -> Result<String, String> {
    if let Some(id) = managed_resource_id {
        return parse_resource_id(id)
            .ok_or_else(|| format!("managed_resource_id '{id}' is not a valid resource id"));
    }
    Ok(match resource_group {
        Some(rg) => resource_group_scope(subscription_id, rg),
        None => subscription_scope(subscription_id),
    })
}

pub fn lock_path(scope: &str, name: &str) -> String {
    format!("{scope}/providers/Microsoft.Authorization/locks/{name}")
}

pub fn vault_path(subscription_id: &str, resource_group: &str, name: &str) -> String {
    format!(
        "{}/providers/Microsoft.RecoveryServices/vaults/{name}",
        resource_group_scope(subscription_id, resource_group)
    )
}

pub fn resource_groups_path(subscription_id: &str) -> String {
    format!("{}/resourcegroups", subscription_scope(subscription_id))
}

pub fn resources_path(subscription_id: &str, resource_group: &str) -> String {
    format!(
        "{}/resources",
        resource_group_scope(subscription_id, resource_group)
    )
}
