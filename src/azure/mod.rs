//! Azure Resource Manager access.
//!
//! - [`client`] - ARM REST client and the [`ArmApi`] seam used by modules
//! - [`cli`] - Azure CLI fallbacks (default subscription, cli tokens)
//! - [`scope`] - Scope and resource path construction
//! - [`token`] - Bearer token sources

pub mod cli;
mod client;
mod error;
pub mod scope;
mod token;

pub use client::{check_next_link, decode, from_value, ArmApi, ArmClient, Page};
pub use error::{ArmError, ArmResult};
pub use token::TokenSource;
