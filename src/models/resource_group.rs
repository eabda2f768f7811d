//! Resource groups and the generic resources inside them.

use super::Tags;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ArmProperties {
    provisioning_state: Option<String>,
}

/// Resource group as ARM returns it.
#[derive(Deserialize, Debug, Clone)]
pub struct ArmResourceGroup {
    id: String,
    name: String,
    location: String,
    #[serde(default)]
    tags: Option<Tags>,
    #[serde(default)]
    properties: ArmProperties,
}

/// Resource group facts in module result shape.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(from = "ArmResourceGroup")]
pub struct ResourceGroup {
    pub id: String,
    pub name: String,
    pub location: String,
    pub tags: Option<Tags>,
    pub provisioning_state: Option<String>,
    /// Filled when `list_resources` is requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<GenericResource>>,
}

impl From<ArmResourceGroup> for ResourceGroup {
    fn from(rg: ArmResourceGroup) -> Self {
        ResourceGroup {
            id: rg.id,
            name: rg.name,
            location: rg.location,
            tags: rg.tags,
            provisioning_state: rg.properties.provisioning_state,
            resources: None,
        }
    }
}

/// A resource listed inside a resource group.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GenericResource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Option<Tags>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azure::Page;
    use serde_json::json;

    #[test]
    fn test_resource_group_flattens_properties() {
        let page: Page =
            serde_json::from_str(include_str!("../tests/test_data/resource_groups.json"))
                .expect("resource group fixture");
        let groups: Vec<ResourceGroup> = page
            .value
            .into_iter()
            .map(|v| serde_json::from_value(v).expect("resource group"))
            .collect();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "rg-backup");
        assert_eq!(groups[0].provisioning_state.as_deref(), Some("Succeeded"));
        assert_eq!(
            serde_json::to_value(&groups[1]).unwrap(),
            json!({
                "id": "/subscriptions/11111111-1111-1111-1111-111111111111/resourceGroups/rg-web",
                "name": "rg-web",
                "location": "westeurope",
                "tags": null,
                "provisioning_state": "Succeeded"
            })
        );
    }

    #[test]
    fn test_generic_resource_type_key() {
        let res: GenericResource = serde_json::from_value(json!({
            "id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/st1",
            "name": "st1",
            "type": "Microsoft.Storage/storageAccounts",
            "location": "eastus",
            "kind": "StorageV2"
        }))
        .unwrap();
        assert_eq!(res.resource_type, "Microsoft.Storage/storageAccounts");
        assert_eq!(
            serde_json::to_value(&res).unwrap()["type"],
            "Microsoft.Storage/storageAccounts"
        );
    }
}
