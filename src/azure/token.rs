//! Bearer tokens for ARM requests.

use super::cli;
use super::error::{ArmError, ArmResult};
use crate::modules::ModuleError;
use azure_core::auth::TokenCredential;
use azure_identity::DefaultAzureCredential;

/// Where ARM access tokens come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// azure_identity credential chain (environment, managed identity, az cli).
    Identity,
    /// `az account get-access-token` from the logged in CLI account.
    Cli,
}

impl TokenSource {
    pub fn from_auth_source(auth_source: &str) -> Result<TokenSource, ModuleError> {
        match auth_source {
            "auto" | "env" => Ok(TokenSource::Identity),
            "cli" => Ok(TokenSource::Cli),
            other => Err(ModuleError::Config(format!(
                "auth_source '{other}' is not supported"
            ))),
        }
    }

    /// Fetch a token valid for `endpoint`.
    pub async fn token(&self, endpoint: &str) -> ArmResult<String> {
        match self {
            TokenSource::Identity => {
                let credential = DefaultAzureCredential::default();
                let scope = format!("{endpoint}/.default");
                let token = credential
                    .get_token(&[scope.as_str()])
                    .await
                    .map_err(|e| ArmError::Auth(format!("getting token for {scope}: {e}")))?;
                Ok(token.token.secret().to_string())
            }
            TokenSource::Cli => {
                cli::access_token(&format!("{endpoint}/")).map_err(|e| ArmError::Auth(e.to_string()))
            }
        }
    }
}
