//! Ansible binary module protocol.
//!
//! - [`invocation`] - Reading the args file and check mode
//! - [`spec`] - Declaring and validating module options
//! - [`params`] - Typed access to validated options

mod invocation;
mod params;
mod spec;

pub use invocation::{failure, Invocation};
pub use params::Params;
pub use spec::{common_azure_options, ArgOption, ArgSpec, ArgType, RequiredIf};
