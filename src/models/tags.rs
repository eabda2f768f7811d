//! Resource tag filtering and merging.

use itertools::Itertools;
use std::collections::BTreeMap;

/// Tags as stored on an ARM resource.
pub type Tags = BTreeMap<String, String>;

/// Check `tags` against a filter of `key` / `key:value` entries.
///
/// Every entry must match. A missing filter matches everything.
pub fn has_tags(tags: Option<&Tags>, filter: Option<&[String]>) -> bool {
    let filter = match filter {
        Some(f) if !f.is_empty() => f,
        _ => return true,
    };
    let Some(tags) = tags else {
        return false;
    };
    filter.iter().all(|entry| match entry.split_once(':') {
        Some((key, value)) => tags.get(key).is_some_and(|v| v == value),
        None => tags.contains_key(entry.as_str()),
    })
}

/// Merge `desired` into `existing`.
///
/// With `append` the existing keys absent from `desired` are kept, otherwise
/// the result is exactly `desired`. Returns whether anything changed.
pub fn update_tags(existing: Option<&Tags>, desired: Option<&Tags>, append: bool) -> (bool, Tags) {
    let existing = existing.cloned().unwrap_or_default();
    let Some(desired) = desired else {
        return (false, existing);
    };

    let mut new_tags = if append { existing.clone() } else { Tags::new() };
    for (key, value) in desired {
        new_tags.insert(key.clone(), value.clone());
    }
    let changed = new_tags != existing;
    if changed {
        log::debug!(
            "tags changed: [{}] -> [{}]",
            format_tags(&existing),
            format_tags(&new_tags)
        );
    }
    (changed, new_tags)
}

/// `k1=v1, k2=v2` rendering for log lines.
pub fn format_tags(tags: &Tags) -> String {
    tags.iter().map(|(k, v)| format!("{k}={v}")).join(", ")
}
