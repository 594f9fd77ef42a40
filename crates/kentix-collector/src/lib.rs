//! Polling engine of the Kentix connector.
//!
//! The [`PollScheduler`] ticks every second, lets the [`LifecycleManager`]
//! reconcile each configuration's enabled/active flags and starts at most one
//! collection cycle per configuration. A cycle ([`Collector::collect`])
//! fetches gateway readings, resolves devices to platform assets through the
//! [`AssetResolver`] and forwards telemetry with the [`TelemetryForwarder`].

pub mod cycle;
pub mod error;
pub mod lifecycle;
pub mod platform;
pub mod resolver;
pub mod running;
pub mod scheduler;
pub mod telemetry;

pub use cycle::{Collector, CycleReport};
pub use error::CollectorError;
pub use lifecycle::{LifecycleManager, Transition};
pub use platform::{AssetPlatform, HttpAssetPlatform, PlatformError};
pub use resolver::{AssetDisplay, AssetResolver, DeviceKey, ResolveError};
pub use running::{CycleGuard, RunningCycles};
pub use scheduler::{PollScheduler, SchedulerConfig, TickReport};
pub use telemetry::TelemetryForwarder;
