// Copyright 2025-Present the Beacon authors.
// SPDX-License-Identifier: Apache-2.0

//! The explicit monitor context: one sink, one registry, one bus.
//!
//! Constructed once by the host application and passed around explicitly —
//! there is no module-level shared instance, so several independent
//! monitors (one per test, say) coexist without interference.

use crate::bus::{EventBus, Signal};
use crate::config::{ConfigUpdate, MonitorConfig};
use crate::error::ConfigError;
use crate::level::{Level, ReportLevel};
use crate::plugin::{Plugin, PluginHandle, PluginRegistry};
use crate::record::EventRecord;
use crate::sink::ReportSink;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// A complete monitor instance for one host, generic over the host
/// variant's signal set.
pub struct Monitor<S: Signal> {
    sink: Arc<Mutex<ReportSink>>,
    registry: PluginRegistry,
    bus: EventBus<S>,
    destroyed: bool,
}

impl<S: Signal> Monitor<S> {
    pub fn new(config: MonitorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            sink: Arc::new(Mutex::new(ReportSink::new(config)?)),
            registry: PluginRegistry::new(),
            bus: EventBus::new(),
            destroyed: false,
        })
    }

    /// Registers an instrumentation source and runs its `init`.
    ///
    /// Registration failures (duplicate or empty name) must never take the
    /// host application down, so they are logged and swallowed here; the
    /// return value says whether the plugin was actually added.
    pub fn install(&mut self, plugin: Box<dyn Plugin>) -> bool {
        let handle = self.handle();
        match self.registry.register(plugin, handle) {
            Ok(()) => true,
            Err(err) => {
                warn!("plugin registration rejected: {err}");
                false
            }
        }
    }

    /// Mints the narrow handle plugins (and host-side emitters) log through.
    pub fn handle(&self) -> PluginHandle {
        PluginHandle::new(Arc::clone(&self.sink))
    }

    /// Feeds one observation into the funnel.
    pub fn log(&self, level: Level, record: EventRecord) {
        self.handle().log(level, record);
    }

    /// Merges a partial configuration into the sink; see
    /// [`ReportSink::configure`].
    pub fn configure(&self, update: ConfigUpdate) {
        self.lock_sink().configure(update);
    }

    /// Sets the gating threshold and rescans the buffer.
    pub fn set_report_level(&self, level: impl Into<ReportLevel>) {
        self.lock_sink().update_report_level(level);
    }

    /// Installs a new session identity (current shifts to previous).
    pub fn set_fingerprint(&self, value: impl Into<String>) {
        self.lock_sink().set_fingerprint(value);
    }

    pub fn fingerprint(&self) -> Option<String> {
        self.lock_sink().fingerprint()
    }

    /// The host variant's signal bus.
    pub fn bus(&mut self) -> &mut EventBus<S> {
        &mut self.bus
    }

    /// Fans a signal out to the bus listeners.
    pub fn emit(&mut self, signal: &S) {
        self.bus.emit(signal);
    }

    /// Navigation-driven resynchronization: clears every plugin's
    /// observation state, then re-runs it for the new route.
    pub fn resync(&mut self) {
        self.registry.clear_effects_all();
        self.registry.run_all();
    }

    /// Best-effort flush of everything still buffered; wired to host
    /// lifecycle signals (page hide, app backgrounding).
    pub fn flush_all(&self) {
        self.lock_sink().flush_all();
    }

    pub fn plugin_count(&self) -> usize {
        self.registry.len()
    }

    /// Buffered record counts `(primary, overflow)`, for diagnostics.
    pub fn pending(&self) -> (usize, usize) {
        self.lock_sink().pending()
    }

    /// Tears down every plugin in registration order, then clears the sink
    /// without delivering. Idempotent. Hosts that want a last delivery
    /// attempt call [`Monitor::flush_all`] first.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.registry.destroy_all();
        self.lock_sink().destroy();
    }

    fn lock_sink(&self) -> std::sync::MutexGuard<'_, ReportSink> {
        #[allow(clippy::expect_used)]
        let sink = self.sink.lock().expect("lock poisoned");
        sink
    }
}

impl<S: Signal> Drop for Monitor<S> {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uploader::MemoryUploader;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_test::traced_test;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum NoKind {}

    enum NoSignal {}

    impl Signal for NoSignal {
        type Kind = NoKind;
        fn kind(&self) -> NoKind {
            match *self {}
        }
    }

    struct NamedPlugin {
        name: &'static str,
        destroys: Arc<AtomicUsize>,
    }

    impl Plugin for NamedPlugin {
        fn name(&self) -> &str {
            self.name
        }
        fn init(&mut self, _handle: PluginHandle) {}
        fn destroy(&mut self) {
            self.destroys.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn monitor_with(uploader: MemoryUploader) -> Monitor<NoSignal> {
        Monitor::new(MonitorConfig {
            uploader: Box::new(uploader),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_log_through_monitor_delivers() {
        let uploader = MemoryUploader::new();
        let monitor = monitor_with(uploader.clone());

        monitor.log(Level::Error, EventRecord::new("net", "boom"));
        assert_eq!(uploader.delivery_count(), 1);
    }

    #[traced_test]
    #[test]
    fn test_duplicate_install_warns_and_keeps_first() {
        let mut monitor = monitor_with(MemoryUploader::new());
        let destroys = Arc::new(AtomicUsize::new(0));

        assert!(monitor.install(Box::new(NamedPlugin {
            name: "perf",
            destroys: Arc::clone(&destroys),
        })));
        assert!(!monitor.install(Box::new(NamedPlugin {
            name: "perf",
            destroys: Arc::clone(&destroys),
        })));

        assert_eq!(monitor.plugin_count(), 1);
        assert!(logs_contain("plugin registration rejected"));
    }

    #[test]
    fn test_destroy_is_idempotent_and_tears_down_plugins() {
        let uploader = MemoryUploader::new();
        let mut monitor = monitor_with(uploader.clone());
        let destroys = Arc::new(AtomicUsize::new(0));
        monitor.install(Box::new(NamedPlugin {
            name: "perf",
            destroys: Arc::clone(&destroys),
        }));
        monitor.log(Level::Info, EventRecord::new("perf", "buffered"));

        monitor.destroy();
        monitor.destroy();

        assert_eq!(destroys.load(Ordering::SeqCst), 1);
        assert_eq!(monitor.plugin_count(), 0);
        assert_eq!(monitor.pending(), (0, 0));
        // Teardown never delivers.
        assert_eq!(uploader.delivery_count(), 0);
    }

    #[test]
    fn test_drop_destroys() {
        let destroys = Arc::new(AtomicUsize::new(0));
        {
            let mut monitor = monitor_with(MemoryUploader::new());
            monitor.install(Box::new(NamedPlugin {
                name: "perf",
                destroys: Arc::clone(&destroys),
            }));
        }
        assert_eq!(destroys.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fingerprint_roundtrip() {
        let monitor = monitor_with(MemoryUploader::new());
        assert_eq!(monitor.fingerprint(), None);
        monitor.set_fingerprint("visitor-1");
        assert_eq!(monitor.fingerprint().as_deref(), Some("visitor-1"));
    }
}
