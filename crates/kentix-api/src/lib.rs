//! Administrative HTTP API of the Kentix connector.
//!
//! Thin create/read/update surface over stored configurations plus a
//! read-only view of the device→asset mappings each configuration owns.
//! Configurations are never deleted through the API.

pub mod handlers;
pub mod models;
pub mod server;
pub mod shutdown;
pub mod validator;

pub use server::{create_router_with_state, run, ServerState};
