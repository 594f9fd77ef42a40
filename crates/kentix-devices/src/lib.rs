//! Kentix gateway access.
//!
//! This crate talks to the vendor REST API of Kentix gateways
//! (AccessManager, AlarmManager, MultiSensor) and turns the responses into
//! typed readings.
//!
//! ## Endpoints
//!
//! | Reading | Path |
//! |---|---|
//! | identity | `api/info` |
//! | door locks (paginated) | `api/devices/doorlocks` |
//! | sensor values | `api/devices/multisensor/values` |
//!
//! Every request carries `Authorization: Basic <api key>` and is bounded by
//! the configuration's request timeout.

pub mod client;
pub mod error;
pub mod models;

pub use client::{endpoints, DeviceClient, HttpDeviceClient};
pub use error::{DeviceError, DeviceResult};
pub use models::{DeviceInfo, DoorLock, SensorSnapshot, SensorState, SensorValue};
