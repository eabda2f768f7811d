//! Management lock (`Microsoft.Authorization/locks`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Lock level as ARM spells it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockLevel {
    CanNotDelete,
    ReadOnly,
    NotSpecified,
}

impl LockLevel {
    /// Parse the module option spelling (`can_not_delete`, `read_only`).
    pub fn from_option(level: &str) -> Option<LockLevel> {
        match level {
            "can_not_delete" => Some(LockLevel::CanNotDelete),
            "read_only" => Some(LockLevel::ReadOnly),
            _ => None,
        }
    }
}

impl fmt::Display for LockLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockLevel::CanNotDelete => write!(f, "CanNotDelete"),
            LockLevel::ReadOnly => write!(f, "ReadOnly"),
            LockLevel::NotSpecified => write!(f, "NotSpecified"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LockProperties {
    pub level: LockLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owners: Option<Vec<Value>>,
}

/// A management lock on a scope.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ManagementLock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub lock_type: Option<String>,
    pub properties: LockProperties,
}

impl ManagementLock {
    pub fn new(level: LockLevel, notes: Option<String>) -> Self {
        ManagementLock {
            id: None,
            name: None,
            lock_type: None,
            properties: LockProperties {
                level,
                notes,
                owners: None,
            },
        }
    }

    pub fn level(&self) -> LockLevel {
        self.properties.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lock_level_from_option() {
        assert_eq!(
            LockLevel::from_option("can_not_delete"),
            Some(LockLevel::CanNotDelete)
        );
        assert_eq!(LockLevel::from_option("read_only"), Some(LockLevel::ReadOnly));
        assert_eq!(LockLevel::from_option("ReadOnly"), None);
    }

    #[test]
    fn test_new_lock_body() {
        let lock = ManagementLock::new(LockLevel::ReadOnly, None);
        assert_eq!(
            serde_json::to_value(&lock).unwrap(),
            json!({"properties": {"level": "ReadOnly"}})
        );
    }

    #[test]
    fn test_lock_from_arm() {
        let lock: ManagementLock =
            serde_json::from_str(include_str!("../tests/test_data/lock_cannotdelete.json"))
                .expect("lock fixture");
        assert_eq!(lock.level(), LockLevel::CanNotDelete);
        assert_eq!(lock.name.as_deref(), Some("keep-vault"));
        assert_eq!(lock.properties.notes.as_deref(), Some("protects backups"));
    }
}
