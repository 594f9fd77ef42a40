//! Storage backends for the Kentix connector.
//!
//! Two [`ConfigStore`](kentix_core::ConfigStore) implementations:
//! - [`RedbConfigStore`]: persistent, a single redb file
//! - [`MemoryConfigStore`]: process-local, used by tests and `--memory` mode

pub mod backends;
pub mod error;
pub mod seed;

pub use backends::{MemoryConfigStore, RedbConfigStore};
pub use error::{Error, Result};
pub use seed::{default_configurations, seed_defaults};
