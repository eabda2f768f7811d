//! Integration tests for azure-rm-modules
//!
//! These tests drive modules from an args file through validation and
//! execution against an in-memory ARM.

use async_trait::async_trait;
use azure_rm_modules::ansible::Invocation;
use azure_rm_modules::azure::{scope, ArmApi, ArmError, ArmResult};
use azure_rm_modules::modules::{find_module, run_module_with};
use azure_rm_modules::{is_failed, run_from_file};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;

const SUB: &str = "11111111-1111-1111-1111-111111111111";

/// Minimal ARM: objects by path, PUT stores, DELETE removes.
#[derive(Default)]
struct FakeArm {
    objects: Mutex<HashMap<String, Value>>,
    writes: Mutex<usize>,
}

impl FakeArm {
    fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

#[async_trait]
impl ArmApi for FakeArm {
    async fn get(&self, path: &str, _api_version: &str) -> ArmResult<Option<Value>> {
        Ok(self.objects.lock().unwrap().get(path).cloned())
    }

    async fn put(&self, path: &str, _api_version: &str, body: &Value) -> ArmResult<Value> {
        *self.writes.lock().unwrap() += 1;
        let mut stored = body.clone();
        stored["id"] = json!(path);
        self.objects
            .lock()
            .unwrap()
            .insert(path.to_string(), stored.clone());
        Ok(stored)
    }

    async fn delete(&self, path: &str, _api_version: &str) -> ArmResult<()> {
        *self.writes.lock().unwrap() += 1;
        self.objects.lock().unwrap().remove(path);
        Ok(())
    }

    async fn list(&self, path: &str, _api_version: &str) -> ArmResult<Vec<Value>> {
        Err(ArmError::Api {
            status: 500,
            code: "NotImplemented".to_string(),
            message: format!("list {path}"),
        })
    }
}

fn args_file(content: &Value) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "{content}").expect("write args");
    file
}

async fn run_lock(api: &FakeArm, args: Value, check_mode: bool) -> Value {
    let mut wrapped = args;
    wrapped["_ansible_check_mode"] = json!(check_mode);
    let file = args_file(&json!({ "ANSIBLE_MODULE_ARGS": wrapped }));
    let invocation = Invocation::from_file(file.path()).expect("args parse");
    let module = find_module("azure_rm_recoveryservicesvault_lock").expect("module registered");
    run_module_with(module.as_ref(), &invocation, api, Some(SUB.to_string()))
        .await
        .expect("module run")
}

#[tokio::test]
async fn test_vault_lock_lifecycle() {
    let api = FakeArm::default();
    let vault_id = format!(
        "/subscriptions/{SUB}/resourceGroups/rg-backup/providers/Microsoft.RecoveryServices/vaults/vault-backup"
    );
    let lock_id = scope::lock_path(&vault_id, "keep-vault");
    let present = json!({
        "name": "keep-vault",
        "managed_resource_id": vault_id,
        "level": "can_not_delete"
    });

    // Check mode reports the change without writing.
    let result = run_lock(&api, present.clone(), true).await;
    assert_eq!(result, json!({"changed": true, "id": null}));
    assert_eq!(api.writes(), 0);

    let result = run_lock(&api, present.clone(), false).await;
    assert_eq!(result, json!({"changed": true, "id": lock_id}));
    assert_eq!(api.writes(), 1);

    // Idempotent second run.
    let result = run_lock(&api, present.clone(), false).await;
    assert_eq!(result, json!({"changed": false, "id": lock_id}));
    assert_eq!(api.writes(), 1);

    let mut read_only = present.clone();
    read_only["level"] = json!("read_only");
    let result = run_lock(&api, read_only, false).await;
    assert_eq!(result["changed"], json!(true));
    assert_eq!(api.writes(), 2);

    let mut absent = present.clone();
    absent["state"] = json!("absent");
    let result = run_lock(&api, absent.clone(), false).await;
    assert_eq!(result, json!({"changed": true, "id": null}));
    let result = run_lock(&api, absent, false).await;
    assert_eq!(result, json!({"changed": false, "id": null}));
    assert_eq!(api.writes(), 3);
}

#[tokio::test]
async fn test_run_from_file_reports_validation_failure() {
    let file = args_file(&json!({"name": "keep", "levle": "read_only"}));
    let result = run_from_file("azure_rm_lock", file.path()).await;
    assert!(is_failed(&result));
    assert_eq!(
        result["msg"],
        "Unsupported parameters for (azure_rm_lock) module: levle"
    );
    assert_eq!(result["changed"], json!(false));
}

#[tokio::test]
async fn test_run_from_file_reports_bad_json() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "name=keep").expect("write args");
    let result = run_from_file("azure_rm_subscription_info", file.path()).await;
    assert!(is_failed(&result));
    assert!(result["msg"]
        .as_str()
        .unwrap()
        .starts_with("module arguments are not valid JSON"));
}

#[tokio::test]
async fn test_subscription_info_list_failure_message() {
    let api = FakeArm::default();
    let module = find_module("azure_rm_subscription_info").expect("module registered");
    let invocation = Invocation::new(serde_json::Map::new(), false);
    let err = run_module_with(module.as_ref(), &invocation, &api, None)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to list all items - (NotImplemented) list /subscriptions"
    );
}
