//! `azure_rm_subscription_info`: facts for one or all subscriptions.

use super::{AzureModule, ModuleContext, ModuleError, ModuleResult};
use crate::ansible::{ArgOption, ArgSpec, Params};
use crate::azure::{from_value, scope};
use crate::config::API_VERSION_SUBSCRIPTIONS;
use crate::models::{has_tags, Subscription};
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct SubscriptionInfoModule;

impl SubscriptionInfoModule {
    async fn get_item(
        &self,
        ctx: &ModuleContext<'_>,
        id: &str,
        tags: Option<&[String]>,
    ) -> Vec<Subscription> {
        log::info!("Get properties for {id}");
        // Lookup failures mean "no such subscription" for this module.
        let item = match ctx
            .api
            .get(&scope::subscription_scope(id), API_VERSION_SUBSCRIPTIONS)
            .await
        {
            Ok(Some(value)) => match from_value::<Subscription>(value) {
                Ok(sub) => Some(sub),
                Err(e) => {
                    log::warn!("Ignoring unreadable subscription {id}: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!("Subscription {id} lookup failed: {e}");
                None
            }
        };
        item.into_iter()
            .filter(|sub| has_tags(sub.tags.as_ref(), tags))
            .collect()
    }

    async fn list_items(
        &self,
        ctx: &ModuleContext<'_>,
        name: Option<&str>,
        all: bool,
        tags: Option<&[String]>,
    ) -> ModuleResult<Vec<Subscription>> {
        log::info!("List all items");
        let values = ctx
            .api
            .list("/subscriptions", API_VERSION_SUBSCRIPTIONS)
            .await
            .map_err(|e| ModuleError::Failed(format!("Failed to list all items - {e}")))?;

        let mut results = Vec::new();
        for value in values {
            let sub: Subscription = from_value(value)
                .map_err(|e| ModuleError::Failed(format!("Failed to list all items - {e}")))?;
            if name.is_some_and(|n| n != sub.display_name) {
                continue;
            }
            if !all && !sub.is_enabled() {
                log::debug!("Skipping {} subscription {}", sub.state, sub.display_name);
                continue;
            }
            if has_tags(sub.tags.as_ref(), tags) {
                results.push(sub);
            }
        }
        Ok(results)
    }
}

#[async_trait]
impl AzureModule for SubscriptionInfoModule {
    fn name(&self) -> &'static str {
        "azure_rm_subscription_info"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::azure(vec![
            ArgOption::str("id"),
            ArgOption::str("name").aliases(&["subscription_name"]),
            ArgOption::bool("all").default(false),
            ArgOption::list("tags"),
        ])
        .mutually_exclusive("id", "name")
    }

    fn needs_subscription(&self) -> bool {
        false
    }

    async fn execute(&self, ctx: &ModuleContext<'_>, params: &Params) -> ModuleResult<Value> {
        let tags = params.get_str_list("tags");
        let subscriptions = match params.get_str("id") {
            Some(id) => self.get_item(ctx, id, tags.as_deref()).await,
            None => {
                self.list_items(
                    ctx,
                    params.get_str("name"),
                    params.get_bool("all"),
                    tags.as_deref(),
                )
                .await?
            }
        };
        Ok(json!({
            "changed": false,
            "subscriptions": subscriptions,
        }))
    }
}
