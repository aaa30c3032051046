// Copyright 2025-Present the Beacon authors.
// SPDX-License-Identifier: Apache-2.0

//! Core of the Beacon real-user-monitoring layer: the event funnel shared
//! by every host variant.
//!
//! Instrumentation plugins observe a host runtime, build [`EventRecord`]s,
//! and feed them through a [`Monitor`]'s [`ReportSink`], which gates each
//! record on the configured severity threshold: qualifying records are
//! delivered to the [`UploadHandler`] immediately, the rest are held in a
//! bounded two-stage buffer. Host variant crates (`beacon-web`,
//! `beacon-miniapp`) supply the signal set for the navigation
//! [`EventBus`] and the platform wiring.
//!
//! Nothing in this crate is allowed to propagate a failure to the host
//! callback that triggered it: telemetry must never become the reason the
//! monitored application breaks.

pub mod bus;
pub mod config;
pub mod error;
pub mod level;
pub mod monitor;
pub mod plugin;
pub mod record;
pub mod sink;
pub mod uploader;
pub mod util;

pub use bus::{EventBus, Signal, SubscriptionId};
pub use config::{ConfigUpdate, MonitorConfig, OverflowPolicy};
pub use error::{ConfigError, RegistrationError, UploadError};
pub use level::{Level, ReportLevel};
pub use monitor::Monitor;
pub use plugin::{Plugin, PluginHandle, PluginRegistry};
pub use record::EventRecord;
pub use sink::ReportSink;
pub use uploader::{ConsoleUploader, MemoryUploader, Payload, UploadHandler};
