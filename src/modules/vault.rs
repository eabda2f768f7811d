//! `azure_rm_recoveryservicesvault`: create, update or delete a Recovery Services vault.

use super::{AzureModule, ModuleContext, ModuleError, ModuleResult};
use crate::ansible::{ArgOption, ArgSpec, Params};
use crate::azure::{from_value, scope, ArmError};
use crate::config::API_VERSION_RECOVERY_SERVICES;
use crate::models::{update_tags, vault_body, vault_update_body, Vault};
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct RecoveryServicesVaultModule;

fn fail(action: &str, name: &str, e: ArmError) -> ModuleError {
    ModuleError::Failed(format!("Error when {action} vault {name}: {}", e.message()))
}

#[async_trait]
impl AzureModule for RecoveryServicesVaultModule {
    fn name(&self) -> &'static str {
        "azure_rm_recoveryservicesvault"
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::azure(vec![
            ArgOption::str("name").required(),
            ArgOption::str("resource_group").required(),
            ArgOption::str("state")
                .choices(&["present", "absent"])
                .default("present"),
            ArgOption::str("location"),
            ArgOption::str("sku")
                .choices(&["Standard", "RS0"])
                .default("Standard"),
            ArgOption::dict("tags"),
            ArgOption::bool("append_tags").default(true),
        ])
    }

    async fn execute(&self, ctx: &ModuleContext<'_>, params: &Params) -> ModuleResult<Value> {
        let name = params.require_str("name")?;
        let resource_group = params.require_str("resource_group")?;
        let state = params.get_str("state").unwrap_or("present");
        let sku = params.get_str("sku").unwrap_or("Standard");
        let path = scope::vault_path(ctx.subscription()?, resource_group, name);

        let raw = ctx
            .api
            .get(&path, API_VERSION_RECOVERY_SERVICES)
            .await
            .map_err(|e| fail("getting", name, e))?;
        let existing: Option<Vault> = match &raw {
            Some(value) => Some(from_value(value.clone()).map_err(|e| fail("getting", name, e))?),
            None => None,
        };

        if state == "absent" {
            let Some(vault) = existing else {
                return Ok(json!({"changed": false, "id": null, "vault": null}));
            };
            if ctx.check_mode {
                log::info!("Vault {} would be deleted", vault.id);
            } else {
                ctx.api
                    .delete(&path, API_VERSION_RECOVERY_SERVICES)
                    .await
                    .map_err(|e| fail("deleting", name, e))?;
                log::info!("Vault {} deleted", vault.id);
            }
            return Ok(json!({"changed": true, "id": null, "vault": null}));
        }

        let desired_tags = params.get_tags("tags");
        let (changed, body) = match (&existing, &raw) {
            (Some(vault), Some(raw)) => {
                let (tags_changed, tags) = update_tags(
                    vault.tags.as_ref(),
                    desired_tags.as_ref(),
                    params.get_bool("append_tags"),
                );
                let sku_changed = vault.sku_name() != Some(sku);
                if let Some(location) = params.get_str("location") {
                    if !location.eq_ignore_ascii_case(&vault.location) {
                        log::warn!(
                            "Vault {name} is in {}, location {location} ignored",
                            vault.location
                        );
                    }
                }
                (tags_changed || sku_changed, vault_update_body(raw, sku, &tags))
            }
            _ => {
                let location = params.get_str("location").ok_or_else(|| {
                    ModuleError::InvalidParameter(format!(
                        "location is required to create vault {name}"
                    ))
                })?;
                (true, vault_body(location, sku, &desired_tags.unwrap_or_default()))
            }
        };

        if !changed {
            let facts = existing.as_ref().map(Vault::facts);
            return Ok(json!({
                "changed": false,
                "id": facts.as_ref().map(|f| f.id.clone()),
                "vault": facts,
            }));
        }

        if ctx.check_mode {
            // A new vault has no id yet, so only updates can be projected.
            let projected = match existing {
                Some(_) => Some(
                    from_value::<Vault>(body)
                        .map_err(|e| fail("creating or updating", name, e))?
                        .facts(),
                ),
                None => None,
            };
            return Ok(json!({
                "changed": true,
                "id": projected.as_ref().map(|f| f.id.clone()),
                "vault": projected,
            }));
        }

        let stored = ctx
            .api
            .put(&path, API_VERSION_RECOVERY_SERVICES, &body)
            .await
            .map_err(|e| fail("creating or updating", name, e))?;
        let vault: Vault = from_value(stored).map_err(|e| fail("creating or updating", name, e))?;
        let facts = vault.facts();
        Ok(json!({
            "changed": true,
            "id": facts.id.clone(),
            "vault": facts,
        }))
    }
}
