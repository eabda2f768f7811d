//! Azure modules and the runner that drives them.
//!
//! - [`lock`] - `azure_rm_lock`, management locks on any scope
//! - [`vault`] - `azure_rm_recoveryservicesvault`
//! - [`subscription_info`] - `azure_rm_subscription_info`
//! - [`resourcegroup_info`] - `azure_rm_resourcegroup_info`

pub mod lock;
pub mod resourcegroup_info;
pub mod subscription_info;
pub mod vault;

use crate::ansible::{ArgSpec, Invocation, Params};
use crate::azure::{ArmApi, ArmClient, ArmError};
use crate::config::AzureSettings;
use async_trait::async_trait;
use colored::Colorize;
use serde_json::Value;
use thiserror::Error;

/// Errors that end a module run.
///
/// `Display` is the `msg` reported back to Ansible.
#[derive(Error, Debug)]
pub enum ModuleError {
    #[error("Module not found: {0}")]
    NotFound(String),

    /// Argument validation failure, already in Ansible's wording.
    #[error("{0}")]
    InvalidParameter(String),

    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Parse(String),

    /// Provider failure with the module's formatted message.
    #[error("{0}")]
    Failed(String),

    #[error("{0}")]
    Arm(#[from] ArmError),
}

/// Result type for module operations
pub type ModuleResult<T> = Result<T, ModuleError>;

/// What a module gets to work with.
pub struct ModuleContext<'a> {
    pub api: &'a dyn ArmApi,
    pub subscription_id: Option<String>,
    pub check_mode: bool,
}

impl ModuleContext<'_> {
    pub fn subscription(&self) -> ModuleResult<&str> {
        self.subscription_id
            .as_deref()
            .ok_or_else(|| ModuleError::Config("subscription_id is not set".to_string()))
    }
}

/// A declarative Azure module.
#[async_trait]
pub trait AzureModule: Send + Sync {
    /// Name as used in playbooks, e.g. `azure_rm_lock`.
    fn name(&self) -> &'static str;

    fn arg_spec(&self) -> ArgSpec;

    /// Whether a subscription id must be resolved before running.
    fn needs_subscription(&self) -> bool {
        true
    }

    /// Run with validated params; returns the result object incl. `changed`.
    async fn execute(&self, ctx: &ModuleContext<'_>, params: &Params) -> ModuleResult<Value>;
}

/// Every module this crate ships.
pub fn registry() -> Vec<Box<dyn AzureModule>> {
    vec![
        Box::new(lock::LockModule::new("azure_rm_lock")),
        Box::new(lock::LockModule::new("azure_rm_recoveryservicesvault_lock")),
        Box::new(vault::RecoveryServicesVaultModule),
        Box::new(subscription_info::SubscriptionInfoModule),
        Box::new(resourcegroup_info::ResourceGroupInfoModule),
    ]
}

pub fn find_module(name: &str) -> Option<Box<dyn AzureModule>> {
    registry().into_iter().find(|m| m.name() == name)
}

pub fn module_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = registry().iter().map(|m| m.name()).collect();
    names.sort_unstable();
    names
}

/// Validate, authenticate against ARM and execute `module`.
pub async fn run_module(module: &dyn AzureModule, invocation: &Invocation) -> ModuleResult<Value> {
    let params = module.arg_spec().validate(module.name(), &invocation.args)?;
    let settings = AzureSettings::resolve(
        params.get_str("subscription_id"),
        params.get_str("auth_source").unwrap_or("auto"),
        params.get_str("cloud_environment").unwrap_or("AzureCloud"),
        module.needs_subscription(),
    )?;
    let client = ArmClient::connect(&settings.endpoint, settings.token_source).await?;
    execute_validated(module, &client, settings.subscription_id, invocation.check_mode, &params).await
}

/// Validate and execute `module` against an already built [`ArmApi`].
pub async fn run_module_with(
    module: &dyn AzureModule,
    invocation: &Invocation,
    api: &dyn ArmApi,
    subscription_id: Option<String>,
) -> ModuleResult<Value> {
    let params = module.arg_spec().validate(module.name(), &invocation.args)?;
    execute_validated(module, api, subscription_id, invocation.check_mode, &params).await
}

async fn execute_validated(
    module: &dyn AzureModule,
    api: &dyn ArmApi,
    subscription_id: Option<String>,
    check_mode: bool,
    params: &Params,
) -> ModuleResult<Value> {
    log::info!(
        "#Start {name} check_mode={check_mode}",
        name = module.name().on_blue()
    );
    let ctx = ModuleContext {
        api,
        subscription_id,
        check_mode,
    };
    let result = module.execute(&ctx, params).await;
    match &result {
        Ok(value) => log::info!(
            "#End {name} changed={changed}",
            name = module.name(),
            changed = value.get("changed").and_then(Value::as_bool).unwrap_or(false)
        ),
        Err(e) => log::warn!("{} {name}: {e}", "failed".on_red(), name = module.name()),
    }
    result
}
