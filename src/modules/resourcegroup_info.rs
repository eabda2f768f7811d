//! `azure_rm_resourcegroup_info`: facts for resource groups in a subscription.

use super::{AzureModule, ModuleContext, ModuleError, ModuleResult};
use crate::ansible::{ArgOption, ArgSpec, Params};
use crate::azure::{from_value, scope, ArmError};
use crate::config::API_VERSION_RESOURCES;
use crate::models::{has_tags, GenericResource, ResourceGroup};
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct ResourceGroupInfoModule;

async fn get_group(
    ctx: &ModuleContext<'_>,
    subscription_id: &str,
    name: &str,
) -> ModuleResult<Option<ResourceGroup>> {
    let fail = |e: ArmError| ModuleError::Failed(format!("Error getting resource group {name} - {e}"));
    let path = scope::resource_group_scope(subscription_id, name);
    match ctx.api.get(&path, API_VERSION_RESOURCES).await.map_err(fail)? {
        Some(value) => Ok(Some(from_value(value).map_err(fail)?)),
        None => Ok(None),
    }
}

async fn list_groups(ctx: &ModuleContext<'_>, subscription_id: &str) -> ModuleResult<Vec<ResourceGroup>> {
    let fail = |e: ArmError| ModuleError::Failed(format!("Error listing resource groups - {e}"));
    ctx.api
        .list(&scope::resource_groups_path(subscription_id), API_VERSION_RESOURCES)
        .await
        .map_err(fail)?
        .into_iter()
        .map(|value| from_value(value).map_err(fail))
        .collect()
}

async fn list_resources(
    ctx: &ModuleContext<'_>,
    subscription_id: &str,
    group: &str,
) -> ModuleResult<Vec<GenericResource>> {
    let fail = |e: ArmError| ModuleError::Failed(format!("Error listing resources in {group} - {e}"));
    ctx.api
        .list(&scope::resources_path(subscription_id, group), API_VERSION_RESOURCES)
        .await
        .map_err(fail)?
        .into_iter()
        .map(|value| from_value(value).map_err(fail))
        .collect()
}

#[async_trait]
impl AzureModule for ResourceGroupInfoModule {
    fn name(&self) -> &'static str {
        "azure_rm_resourcegroup_info"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::azure(vec![
            ArgOption::str("name"),
            ArgOption::list("tags"),
            ArgOption::bool("list_resources").default(false),
        ])
    }

    async fn execute(&self, ctx: &ModuleContext<'_>, params: &Params) -> ModuleResult<Value> {
        let subscription_id = ctx.subscription()?;
        let tags = params.get_str_list("tags");

        let groups = match params.get_str("name") {
            Some(name) => get_group(ctx, subscription_id, name).await?.into_iter().collect(),
            None => list_groups(ctx, subscription_id).await?,
        };

        let mut results: Vec<ResourceGroup> = groups
            .into_iter()
            .filter(|rg| has_tags(rg.tags.as_ref(), tags.as_deref()))
            .collect();

        if params.get_bool("list_resources") {
            for group in results.iter_mut() {
                group.resources = Some(list_resources(ctx, subscription_id, &group.name).await?);
            }
        }
        log::info!("Found {} resource groups", results.len());

        Ok(json!({
            "changed": false,
            "resourcegroups": results,
        }))
    }
}
