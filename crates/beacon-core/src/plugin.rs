// Copyright 2025-Present the Beacon authors.
// SPDX-License-Identifier: Apache-2.0

//! The instrumentation-source contract and the registry that drives it.

use crate::error::RegistrationError;
use crate::level::Level;
use crate::record::EventRecord;
use crate::sink::ReportSink;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// An independent instrumentation source observing one host capability.
///
/// `name` and `init` are the required surface; `destroy`, `run`, and
/// `clear_effects` default to no-ops so a plugin only overrides the
/// lifecycle stages it actually has. A plugin that installs host-native
/// interception (patched network calls, history listeners, timers) must
/// make that installation revocable through `destroy` — never rely on
/// garbage collection to undo a patch.
pub trait Plugin: Send {
    /// Unique, non-empty identity; duplicates are rejected at registration.
    fn name(&self) -> &str;

    /// Called synchronously at registration with the narrow handle that is
    /// this plugin's only view of the core.
    fn init(&mut self, handle: PluginHandle);

    /// Full teardown. Must be safe to call at any time.
    fn destroy(&mut self) {}

    /// Idempotent (re)start of the plugin's observation, typically after a
    /// navigation.
    fn run(&mut self) {}

    /// Tear down observation state without full destruction; paired with
    /// `run` on navigation-driven resynchronization.
    fn clear_effects(&mut self) {}
}

/// The only coupling between a plugin and the core: a logging entry point
/// bound to the owning sink, and a read accessor for the session
/// fingerprint. Plugins never see the sink's buffers or config.
#[derive(Clone)]
pub struct PluginHandle {
    sink: Arc<Mutex<ReportSink>>,
}

impl PluginHandle {
    pub(crate) fn new(sink: Arc<Mutex<ReportSink>>) -> Self {
        Self { sink }
    }

    /// Feeds one observation into the funnel.
    pub fn log(&self, level: Level, record: EventRecord) {
        #[allow(clippy::expect_used)]
        let mut sink = self.sink.lock().expect("lock poisoned");
        sink.log(level, record);
    }

    /// Current session identity.
    pub fn fingerprint(&self) -> Option<String> {
        #[allow(clippy::expect_used)]
        let sink = self.sink.lock().expect("lock poisoned");
        sink.fingerprint()
    }
}

/// Owns the set of active plugins and mediates their lifecycle.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the plugin and calls its `init` synchronously.
    ///
    /// An empty or duplicate name is rejected before `init` is ever
    /// called; the plugin is simply not added. A panicking `init` is the
    /// plugin's own failure and is not caught here.
    pub fn register(
        &mut self,
        plugin: Box<dyn Plugin>,
        handle: PluginHandle,
    ) -> Result<(), RegistrationError> {
        let name = plugin.name().to_string();
        if name.is_empty() {
            return Err(RegistrationError::EmptyName);
        }
        if self.plugins.iter().any(|p| p.name() == name) {
            return Err(RegistrationError::DuplicateName(name));
        }

        self.plugins.push(plugin);
        #[allow(clippy::expect_used)]
        self.plugins
            .last_mut()
            .expect("just pushed")
            .init(handle);
        debug!("plugin `{name}` registered");
        Ok(())
    }

    /// Re-runs every plugin's observation, in registration order.
    pub fn run_all(&mut self) {
        for plugin in &mut self.plugins {
            plugin.run();
        }
    }

    /// Clears every plugin's observation state, in registration order.
    pub fn clear_effects_all(&mut self) {
        for plugin in &mut self.plugins {
            plugin.clear_effects();
        }
    }

    /// Destroys every plugin in registration order, then clears the list.
    /// Idempotent: a second call sees an empty list and does nothing.
    pub fn destroy_all(&mut self) {
        for plugin in &mut self.plugins {
            plugin.destroy();
        }
        self.plugins.clear();
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name() == name)
    }
}
