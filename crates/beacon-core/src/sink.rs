// Copyright 2025-Present the Beacon authors.
// SPDX-License-Identifier: Apache-2.0

//! The leveled buffering/eviction/dispatch engine.
//!
//! Every [`EventRecord`] passes through [`ReportSink::log`], which decides
//! between immediate delivery and buffering:
//! 1. Records at or above the configured threshold are delivered at once.
//! 2. Everything else is appended to the bounded *primary* buffer.
//! 3. A record evicted from a full primary buffer moves to the *overflow*
//!    buffer (bounded by the same count), or is dropped under
//!    [`OverflowPolicy::DropOldest`].
//! 4. Once the overflow buffer itself exceeds the bound, its entire
//!    contents are delivered as one batch and cleared.
//!
//! Memory is therefore strictly bounded at `2 * max_storage_count` records
//! while stale low-priority data still gets one last delivery attempt
//! before being discarded.
//!
//! Delivery is at-most-once and fire-and-forget: a failing upload handler
//! is logged and its payload discarded. Nothing in this module is allowed
//! to propagate a failure to the host callback that triggered `log`.

use crate::config::{ConfigUpdate, MonitorConfig, OverflowPolicy};
use crate::error::ConfigError;
use crate::level::{Level, ReportLevel};
use crate::record::EventRecord;
use crate::uploader::Payload;
use std::collections::VecDeque;
use tracing::{debug, error, warn};

/// The report sink. Owns the configuration, both buffers, and the session
/// fingerprint pair; nothing outside mutates any of them directly.
pub struct ReportSink {
    config: MonitorConfig,
    previous_fingerprint: Option<String>,
    primary: VecDeque<EventRecord>,
    overflow: VecDeque<EventRecord>,
}

impl ReportSink {
    pub fn new(config: MonitorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            previous_fingerprint: None,
            primary: VecDeque::new(),
            overflow: VecDeque::new(),
        })
    }

    /// Merges a partial config into the current one (shallow overwrite).
    ///
    /// A changed `report_level` re-evaluates the primary buffer; a changed
    /// `fingerprint` goes through the current-to-previous shift. A zero
    /// `max_storage_count` is rejected with a warning and the old bound
    /// kept; a smaller one drains both buffers back under the new bound
    /// through the overflow policy before returning.
    pub fn configure(&mut self, update: ConfigUpdate) {
        if let Some(enabled) = update.enabled {
            self.config.enabled = enabled;
        }
        if let Some(count) = update.max_storage_count {
            if count == 0 {
                warn!("ignoring configure: {}", ConfigError::ZeroStorageCount);
            } else {
                self.config.max_storage_count = count;
                self.enforce_bounds();
            }
        }
        if let Some(platform) = update.platform {
            self.config.platform = Some(platform);
        }
        if let Some(policy) = update.overflow_policy {
            self.config.overflow_policy = policy;
        }
        if let Some(uploader) = update.uploader {
            self.config.uploader = uploader;
        }
        if let Some(fingerprint) = update.fingerprint {
            self.set_fingerprint(fingerprint);
        }
        if let Some(level) = update.report_level {
            if level != self.config.report_level {
                self.update_report_level(level);
            }
        }
    }

    /// Installs a new session identity, shifting the current one to
    /// "previous". Pure state transition; only records logged afterwards
    /// observe the new pair.
    pub fn set_fingerprint(&mut self, value: impl Into<String>) {
        self.previous_fingerprint = self.config.fingerprint.replace(value.into());
    }

    /// Current session identity, as exposed to plugins.
    pub fn fingerprint(&self) -> Option<String> {
        self.config.fingerprint.clone()
    }

    /// The funnel's single entry point.
    ///
    /// No-op while the kill switch is off. Otherwise the record is stamped
    /// with severity, fingerprint pair, and platform, then either delivered
    /// immediately (threshold qualifies) or buffered with the eviction
    /// cascade described in the module docs.
    pub fn log(&mut self, level: Level, mut record: EventRecord) {
        if !self.config.enabled {
            return;
        }

        record.stamp(
            level,
            self.config.fingerprint.clone(),
            self.previous_fingerprint.clone(),
            self.config.platform.clone(),
        );

        if self.config.report_level.qualifies(level) {
            self.deliver(Payload::Single(record));
            return;
        }

        self.primary.push_back(record);
        if self.primary.len() > self.config.max_storage_count {
            self.evict_oldest();
        }
    }

    /// Moves the oldest primary record through the overflow policy: into
    /// the overflow buffer (force-flushing it once it too passes the
    /// bound), or dropped outright under [`OverflowPolicy::DropOldest`].
    fn evict_oldest(&mut self) {
        let Some(evicted) = self.primary.pop_front() else {
            return;
        };
        match self.config.overflow_policy {
            OverflowPolicy::DropOldest => {
                warn!(
                    "primary buffer full ({} records), dropping oldest record from plugin `{}`",
                    self.config.max_storage_count, evicted.plugin
                );
            }
            OverflowPolicy::SecondaryBuffer => {
                self.overflow.push_back(evicted);
                if self.overflow.len() > self.config.max_storage_count {
                    debug!(
                        "overflow buffer past its bound, force-flushing {} records",
                        self.overflow.len()
                    );
                    let batch: Vec<EventRecord> = self.overflow.drain(..).collect();
                    self.deliver(Payload::Batch(batch));
                }
            }
        }
    }

    /// Re-establishes both buffer bounds after the bound itself shrank:
    /// excess oldest records drain through the overflow policy until the
    /// primary fits, and an overflow buffer past the new bound is
    /// force-flushed as one batch.
    fn enforce_bounds(&mut self) {
        while self.primary.len() > self.config.max_storage_count {
            self.evict_oldest();
        }
        if self.overflow.len() > self.config.max_storage_count {
            debug!(
                "overflow buffer past its bound, force-flushing {} records",
                self.overflow.len()
            );
            let batch: Vec<EventRecord> = self.overflow.drain(..).collect();
            self.deliver(Payload::Batch(batch));
        }
    }

    /// Sets a new threshold and rescans the primary buffer: every buffered
    /// record that qualifies under the new threshold is delivered oldest
    /// first and removed; the rest stay buffered in their original order.
    pub fn update_report_level(&mut self, level: impl Into<ReportLevel>) {
        self.config.report_level = level.into();

        let buffered: Vec<EventRecord> = self.primary.drain(..).collect();
        for record in buffered {
            if self.config.report_level.qualifies(record.level) {
                self.deliver(Payload::Single(record));
            } else {
                self.primary.push_back(record);
            }
        }
    }

    /// Best-effort "don't lose what we have": delivers the primary buffer
    /// as one batch (oldest first), then the overflow buffer as another,
    /// clearing both. Wired to host lifecycle signals such as page hide.
    pub fn flush_all(&mut self) {
        if !self.primary.is_empty() {
            let batch: Vec<EventRecord> = self.primary.drain(..).collect();
            self.deliver(Payload::Batch(batch));
        }
        if !self.overflow.is_empty() {
            let batch: Vec<EventRecord> = self.overflow.drain(..).collect();
            self.deliver(Payload::Batch(batch));
        }
    }

    /// Teardown, not flush: clears both buffers without delivering. The
    /// host is going away and delivery may no longer be possible. Also
    /// disables the sink so a straggler `log` after teardown is a no-op.
    /// Idempotent.
    pub fn destroy(&mut self) {
        self.primary.clear();
        self.overflow.clear();
        self.config.enabled = false;
    }

    /// Buffered record counts `(primary, overflow)`, for diagnostics.
    pub fn pending(&self) -> (usize, usize) {
        (self.primary.len(), self.overflow.len())
    }

    pub fn report_level(&self) -> ReportLevel {
        self.config.report_level
    }

    fn deliver(&mut self, payload: Payload) {
        let count = payload.len();
        if let Err(err) = self.config.uploader.send(payload) {
            error!("upload handler failed, {count} record(s) dropped: {err}");
        }
    }
}
