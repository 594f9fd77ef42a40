//! Handler tests for the administrative API.

mod common;
mod handlers;
