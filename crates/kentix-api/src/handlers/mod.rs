//! API request handlers.

pub mod basic;
pub mod common;
pub mod configs;

pub use common::{ok, HandlerResult};
