//! Repository implementations module.
//!
//! This module contains different implementations of the repository traits:
//! - `hosted`: REST client against the hosted database API
//! - `local`: In-memory implementation for unit testing and local development
#[cfg(feature = "hosted-repo")]
pub mod hosted;
pub mod local;

#[cfg(feature = "hosted-repo")]
pub use hosted::{HostedConfig, HostedRepository};
pub use local::LocalRepository;
