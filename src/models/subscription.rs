//! Azure subscription as returned by `/subscriptions`.

use super::Tags;
use serde::{Deserialize, Serialize};

/// Subscription facts.
///
/// Deserializes from the ARM (camelCase) shape and serializes to the
/// module result (snake_case) shape.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Subscription {
    /// Fully qualified id, `/subscriptions/{guid}`.
    pub id: String,
    #[serde(rename(deserialize = "subscriptionId"))]
    pub subscription_id: String,
    #[serde(rename(deserialize = "displayName"), default)]
    pub display_name: String,
    /// `Enabled`, `Disabled`, `Warned`, `PastDue` or `Deleted`.
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub tags: Option<Tags>,
    #[serde(rename(deserialize = "tenantId"), default)]
    pub tenant_id: Option<String>,
}

impl Subscription {
    pub fn is_enabled(&self) -> bool {
        self.state.eq_ignore_ascii_case("Enabled")
    }
}
