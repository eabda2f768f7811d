//! ARM resource models.
//!
//! - [`ManagementLock`] and [`LockLevel`] - Authorization locks
//! - [`Subscription`] - Subscription facts
//! - [`ResourceGroup`] and [`GenericResource`] - Resource group facts
//! - [`Vault`] - Recovery Services vault
//! - [`tags`] - Tag filters and merging

mod lock;
mod resource_group;
mod subscription;
pub mod tags;
mod vault;

pub use lock::{LockLevel, LockProperties, ManagementLock};
pub use resource_group::{GenericResource, ResourceGroup};
pub use subscription::Subscription;
pub use tags::{has_tags, update_tags, Tags};
pub use vault::{vault_body, vault_update_body, Vault, VaultFacts, VaultSku};
