//! Constants and settings shared by all modules.

use crate::azure::{cli, TokenSource};
use crate::modules::ModuleError;
use std::env;

/// Default Azure Resource Manager endpoint (public cloud).
pub const ARM_ENDPOINT_PUBLIC: &str = "https://management.azure.com";
pub const ARM_ENDPOINT_CHINA: &str = "https://management.chinacloudapi.cn";
pub const ARM_ENDPOINT_USGOV: &str = "https://management.usgovcloudapi.net";

pub const API_VERSION_LOCKS: &str = "2016-09-01";
pub const API_VERSION_SUBSCRIPTIONS: &str = "2020-01-01";
pub const API_VERSION_RESOURCES: &str = "2021-04-01";
pub const API_VERSION_RECOVERY_SERVICES: &str = "2023-04-01";

/// Timeout for a single ARM request.
pub const HTTP_TIMEOUT_SEC: u64 = 60;

/// Upper bound on `nextLink` pages followed by a single list call.
pub const MAX_LIST_PAGES: usize = 500;

pub const ENV_SUBSCRIPTION_ID: &str = "AZURE_SUBSCRIPTION_ID";

/// Logging config read by the binary at startup.
pub const LOG_CONFIG_FILE: &str = "log4rs.yml";

/// Connection settings resolved from module options and the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureSettings {
    pub endpoint: String,
    pub subscription_id: Option<String>,
    pub token_source: TokenSource,
}

impl AzureSettings {
    /// Resolve settings from the common module options.
    ///
    /// `need_subscription` controls whether a missing subscription id is an
    /// error; subscription listing works without one.
    pub fn resolve(
        subscription_id: Option<&str>,
        auth_source: &str,
        cloud_environment: &str,
        need_subscription: bool,
    ) -> Result<AzureSettings, ModuleError> {
        let endpoint = endpoint_for(cloud_environment)?;
        let token_source = TokenSource::from_auth_source(auth_source)?;

        let subscription_id = match subscription_id {
            Some(id) if !id.is_empty() => Some(id.to_string()),
            _ => env::var(ENV_SUBSCRIPTION_ID)
                .ok()
                .filter(|id| !id.is_empty()),
        };
        let subscription_id = match subscription_id {
            Some(id) => Some(id),
            None if need_subscription => Some(cli::default_subscription_id().map_err(|e| {
                ModuleError::Config(format!(
                    "no subscription_id given, {ENV_SUBSCRIPTION_ID} unset and az cli lookup failed: {e}"
                ))
            })?),
            None => None,
        };
        log::debug!(
            "settings endpoint={endpoint} subscription={subscription_id:?} auth={token_source:?}"
        );

        Ok(AzureSettings {
            endpoint,
            subscription_id,
            token_source,
        })
    }
}

/// Map a `cloud_environment` option to its ARM endpoint.
pub fn endpoint_for(cloud_environment: &str) -> Result<String, ModuleError> {
    let endpoint = match cloud_environment {
        "" | "AzureCloud" => ARM_ENDPOINT_PUBLIC,
        "AzureChinaCloud" => ARM_ENDPOINT_CHINA,
        "AzureUSGovernment" => ARM_ENDPOINT_USGOV,
        url if url.starts_with("https://") => url.trim_end_matches('/'),
        other => {
            return Err(ModuleError::Config(format!(
                "unknown cloud_environment '{other}'"
            )))
        }
    };
    Ok(endpoint.to_string())
}
