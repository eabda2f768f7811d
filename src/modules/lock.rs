//! `azure_rm_lock`: management locks on a subscription, resource group or resource.
//!
//! Recovery Services vaults are protected by pointing `managed_resource_id`
//! at the vault; the module is also registered as
//! `azure_rm_recoveryservicesvault_lock` for that use.

use super::{AzureModule, ModuleContext, ModuleError, ModuleResult};
use crate::ansible::{ArgOption, ArgSpec, Params};
use crate::azure::{from_value, scope, ArmError};
use crate::config::API_VERSION_LOCKS;
use crate::models::{LockLevel, ManagementLock};
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct LockModule {
    name: &'static str,
}

impl LockModule {
    pub fn new(name: &'static str) -> Self {
        LockModule { name }
    }
}

/// Decide the lock to store for `state=present`.
///
/// Returns the lock to PUT, or `None` when `existing` already matches.
pub fn desired_lock(
    existing: Option<&ManagementLock>,
    level: LockLevel,
    notes: Option<&str>,
) -> Option<ManagementLock> {
    let Some(existing) = existing else {
        return Some(ManagementLock::new(level, notes.map(str::to_string)));
    };
    let mut lock = existing.clone();
    let mut changed = false;
    if lock.level() != level {
        log::info!("Lock level changed {} -> {level}", lock.level());
        lock.properties.level = level;
        changed = true;
    }
    if let Some(notes) = notes {
        if lock.properties.notes.as_deref() != Some(notes) {
            log::info!("Lock notes changed");
            lock.properties.notes = Some(notes.to_string());
            changed = true;
        }
    }
    changed.then_some(lock)
}

fn fail(action: &str, name: &str, scope: &str, e: ArmError) -> ModuleError {
    ModuleError::Failed(format!(
        "Error when {action} lock {name} for {scope}: {}",
        e.message()
    ))
}

#[async_trait]
impl AzureModule for LockModule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn arg_spec(&self) -> ArgSpec {
        ArgSpec::azure(vec![
            ArgOption::str("name").required(),
            ArgOption::str("state")
                .choices(&["present", "absent"])
                .default("present"),
            ArgOption::str("level").choices(&["can_not_delete", "read_only"]),
            ArgOption::str("resource_group"),
            ArgOption::str("managed_resource_id"),
            ArgOption::str("notes"),
        ])
        .mutually_exclusive("resource_group", "managed_resource_id")
        .required_if("state", "present", &["level"])
    }

    async fn execute(&self, ctx: &ModuleContext<'_>, params: &Params) -> ModuleResult<Value> {
        let name = params.require_str("name")?;
        let state = params.get_str("state").unwrap_or("present");
        let scope = scope::lock_scope(
            ctx.subscription()?,
            params.get_str("resource_group"),
            params.get_str("managed_resource_id"),
        )
        .map_err(ModuleError::InvalidParameter)?;
        let path = scope::lock_path(&scope, name);

        let existing: Option<ManagementLock> = match ctx.api.get(&path, API_VERSION_LOCKS).await {
            Ok(Some(value)) => Some(from_value(value).map_err(|e| fail("getting", name, &scope, e))?),
            Ok(None) => None,
            Err(e) => return Err(fail("getting", name, &scope, e)),
        };

        let mut changed = false;
        let mut id = existing.as_ref().and_then(|l| l.id.clone());

        if state == "present" {
            let level_option = params.require_str("level")?;
            let level = LockLevel::from_option(level_option).ok_or_else(|| {
                ModuleError::InvalidParameter(format!("unknown lock level {level_option}"))
            })?;
            if let Some(lock) = desired_lock(existing.as_ref(), level, params.get_str("notes")) {
                changed = true;
                if !ctx.check_mode {
                    let body = serde_json::to_value(&lock)
                        .map_err(|e| ModuleError::Failed(format!("Error serializing lock {name}: {e}")))?;
                    let stored = ctx
                        .api
                        .put(&path, API_VERSION_LOCKS, &body)
                        .await
                        .map_err(|e| fail("creating or updating", name, &scope, e))?;
                    let stored: ManagementLock = from_value(stored)
                        .map_err(|e| fail("creating or updating", name, &scope, e))?;
                    id = stored.id;
                }
            }
        } else if existing.is_some() {
            changed = true;
            if !ctx.check_mode {
                ctx.api
                    .delete(&path, API_VERSION_LOCKS)
                    .await
                    .map_err(|e| fail("deleting", name, &scope, e))?;
            }
            id = None;
        }

        Ok(json!({
            "changed": changed,
            "id": id,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansible::Invocation;
    use crate::modules::mock::{Call, MockArm};
    use crate::modules::run_module_with;

    const SUB: &str = "11111111-1111-1111-1111-111111111111";

    fn rg_lock_path(name: &str) -> String {
        scope::lock_path(&scope::resource_group_scope(SUB, "rg-backup"), name)
    }

    fn invocation(args: Value, check_mode: bool) -> Invocation {
        Invocation::new(args.as_object().cloned().unwrap(), check_mode)
    }

    async fn run(api: &MockArm, args: Value, check_mode: bool) -> ModuleResult<Value> {
        let module = LockModule::new("azure_rm_lock");
        run_module_with(
            &module,
            &invocation(args, check_mode),
            api,
            Some(SUB.to_string()),
        )
        .await
    }

    fn existing_lock(path: &str, level: &str) -> Value {
        json!({
            "id": path,
            "name": "keep",
            "type": "Microsoft.Authorization/locks",
            "properties": {"level": level, "notes": "original"}
        })
    }

    #[test]
    fn test_desired_lock_unchanged() {
        let lock = ManagementLock::new(LockLevel::ReadOnly, Some("n".to_string()));
        assert!(desired_lock(Some(&lock), LockLevel::ReadOnly, None).is_none());
        assert!(desired_lock(Some(&lock), LockLevel::ReadOnly, Some("n")).is_none());
        assert!(desired_lock(Some(&lock), LockLevel::ReadOnly, Some("m")).is_some());
    }

    #[tokio::test]
    async fn test_create_lock_on_resource_group() {
        let api = MockArm::default();
        let result = run(
            &api,
            json!({"name": "keep", "resource_group": "rg-backup", "level": "can_not_delete"}),
            false,
        )
        .await
        .expect("lock created");
        let path = rg_lock_path("keep");
        assert_eq!(result, json!({"changed": true, "id": path}));
        assert_eq!(
            api.calls(),
            vec![Call::Put(
                path,
                json!({"properties": {"level": "CanNotDelete"}})
            )]
        );
    }

    #[tokio::test]
    async fn test_existing_lock_same_level_is_unchanged() {
        let path = rg_lock_path("keep");
        let api = MockArm::default().with_object(&path, existing_lock(&path, "CanNotDelete"));
        let result = run(
            &api,
            json!({"name": "keep", "resource_group": "rg-backup", "level": "can_not_delete"}),
            false,
        )
        .await
        .unwrap();
        assert_eq!(result, json!({"changed": false, "id": path}));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_level_change_preserves_notes() {
        let path = rg_lock_path("keep");
        let api = MockArm::default().with_object(&path, existing_lock(&path, "CanNotDelete"));
        let result = run(
            &api,
            json!({"name": "keep", "resource_group": "rg-backup", "level": "read_only"}),
            false,
        )
        .await
        .unwrap();
        assert_eq!(result["changed"], json!(true));
        match &api.calls()[..] {
            [Call::Put(put_path, body)] => {
                assert_eq!(put_path, &path);
                assert_eq!(body["properties"]["level"], "ReadOnly");
                assert_eq!(body["properties"]["notes"], "original");
            }
            other => panic!("unexpected calls {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_check_mode_create_does_not_write() {
        let api = MockArm::default();
        let result = run(
            &api,
            json!({"name": "keep", "level": "read_only"}),
            true,
        )
        .await
        .unwrap();
        assert_eq!(result, json!({"changed": true, "id": null}));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_existing_lock_on_vault() {
        let vault_id = format!(
            "/subscriptions/{SUB}/resourceGroups/rg-backup/providers/Microsoft.RecoveryServices/vaults/vault-backup"
        );
        let path = scope::lock_path(&vault_id, "keep-vault");
        let api = MockArm::default().with_object(
            &path,
            serde_json::from_str(include_str!("../tests/test_data/lock_cannotdelete.json")).unwrap(),
        );
        let result = run(
            &api,
            json!({"name": "keep-vault", "managed_resource_id": vault_id, "state": "absent"}),
            false,
        )
        .await
        .unwrap();
        assert_eq!(result, json!({"changed": true, "id": null}));
        assert_eq!(api.calls(), vec![Call::Delete(path)]);
    }

    #[tokio::test]
    async fn test_delete_missing_lock_is_noop() {
        let api = MockArm::default().with_error(&rg_lock_path("keep"), 404, "not found");
        let result = run(
            &api,
            json!({"name": "keep", "resource_group": "rg-backup", "state": "absent"}),
            false,
        )
        .await
        .unwrap();
        assert_eq!(result, json!({"changed": false, "id": null}));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_get_error_is_fatal() {
        let path = rg_lock_path("keep");
        let api = MockArm::default().with_error(&path, 403, "AuthorizationFailed");
        let err = run(
            &api,
            json!({"name": "keep", "resource_group": "rg-backup", "state": "absent"}),
            false,
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "Error when getting lock keep for /subscriptions/{SUB}/resourcegroups/rg-backup: AuthorizationFailed"
            )
        );
    }

    #[tokio::test]
    async fn test_put_error_message() {
        let path = rg_lock_path("keep");
        let api = MockArm::default().with_write_error(&path, 409, "ScopeLocked");
        let err = run(
            &api,
            json!({"name": "keep", "resource_group": "rg-backup", "level": "read_only"}),
            false,
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "Error when creating or updating lock keep for /subscriptions/{SUB}/resourcegroups/rg-backup: ScopeLocked"
            )
        );
    }

    #[tokio::test]
    async fn test_delete_error_message() {
        let path = rg_lock_path("keep");
        let api = MockArm::default()
            .with_object(&path, existing_lock(&path, "CanNotDelete"))
            .with_write_error(&path, 403, "AuthorizationFailed");
        let err = run(
            &api,
            json!({"name": "keep", "resource_group": "rg-backup", "state": "absent"}),
            false,
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "Error when deleting lock keep for /subscriptions/{SUB}/resourcegroups/rg-backup: AuthorizationFailed"
            )
        );
    }

    #[tokio::test]
    async fn test_missing_level_for_present() {
        let api = MockArm::default();
        let err = run(&api, json!({"name": "keep"}), false).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "state is present but all of the following are missing: level"
        );
    }

    #[tokio::test]
    async fn test_invalid_managed_resource_id() {
        let api = MockArm::default();
        let err = run(
            &api,
            json!({"name": "keep", "managed_resource_id": "vault-backup", "state": "absent"}),
            false,
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "managed_resource_id 'vault-backup' is not a valid resource id"
        );
    }
}
