//! Recovery Services vault (`Microsoft.RecoveryServices/vaults`).

use super::Tags;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VaultSku {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct VaultProperties {
    pub provisioning_state: Option<String>,
}

/// Vault as ARM returns it.
#[derive(Deserialize, Debug, Clone)]
pub struct Vault {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(rename = "type", default)]
    pub vault_type: Option<String>,
    #[serde(default)]
    pub sku: Option<VaultSku>,
    #[serde(default)]
    pub tags: Option<Tags>,
    #[serde(default)]
    pub properties: VaultProperties,
}

impl Vault {
    pub fn sku_name(&self) -> Option<&str> {
        self.sku.as_ref().map(|s| s.name.as_str())
    }

    /// Module result shape.
    pub fn facts(&self) -> VaultFacts {
        VaultFacts {
            id: self.id.clone(),
            name: self.name.clone(),
            location: self.location.clone(),
            vault_type: self.vault_type.clone(),
            sku: self.sku_name().map(str::to_string),
            tags: self.tags.clone(),
            provisioning_state: self.properties.provisioning_state.clone(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct VaultFacts {
    pub id: String,
    pub name: String,
    pub location: String,
    #[serde(rename = "type")]
    pub vault_type: Option<String>,
    pub sku: Option<String>,
    pub tags: Option<Tags>,
    pub provisioning_state: Option<String>,
}

/// PUT body for a new vault.
pub fn vault_body(location: &str, sku: &str, tags: &Tags) -> Value {
    json!({
        "location": location,
        "sku": { "name": sku },
        "tags": tags,
        "properties": {}
    })
}

/// PUT body for an existing vault: the object as ARM returned it with only
/// `sku` and `tags` replaced, so properties the module does not manage survive.
pub fn vault_update_body(existing: &Value, sku: &str, tags: &Tags) -> Value {
    let mut body = existing.clone();
    body["sku"] = json!({ "name": sku });
    body["tags"] = json!(tags);
    body
}
