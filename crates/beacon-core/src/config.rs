// Copyright 2025-Present the Beacon authors.
// SPDX-License-Identifier: Apache-2.0

use crate::error::ConfigError;
use crate::level::{Level, ReportLevel};
use crate::uploader::{ConsoleUploader, UploadHandler};
use std::fmt;

/// What happens to the record evicted from a full primary buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Evicted records move to a secondary buffer bounded by the same
    /// count; once that bound is also exceeded, the whole secondary buffer
    /// is delivered as one batch and cleared. Old low-priority data gets a
    /// last delivery attempt instead of silently vanishing.
    #[default]
    SecondaryBuffer,
    /// Evicted records are dropped outright, with a warning.
    DropOldest,
}

/// Configuration owned by the report sink.
pub struct MonitorConfig {
    /// Severity threshold at which events bypass buffering.
    pub report_level: ReportLevel,
    /// Global kill switch; when false, `log` is a no-op.
    pub enabled: bool,
    /// Bound on the primary buffer (and on the overflow buffer).
    pub max_storage_count: usize,
    /// Host variant stamped onto every record (`"web"`, `"wechat"`, ...).
    pub platform: Option<String>,
    /// Initial session identity; changeable later via `set_fingerprint`.
    pub fingerprint: Option<String>,
    /// What to do with records evicted from the primary buffer.
    pub overflow_policy: OverflowPolicy,
    /// Where delivered payloads go.
    pub uploader: Box<dyn UploadHandler>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            report_level: ReportLevel::Level(Level::Error),
            enabled: true,
            max_storage_count: 100,
            platform: None,
            fingerprint: None,
            overflow_policy: OverflowPolicy::default(),
            uploader: Box::new(ConsoleUploader),
        }
    }
}

impl fmt::Debug for MonitorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorConfig")
            .field("report_level", &self.report_level)
            .field("enabled", &self.enabled)
            .field("max_storage_count", &self.max_storage_count)
            .field("platform", &self.platform)
            .field("fingerprint", &self.fingerprint)
            .field("overflow_policy", &self.overflow_policy)
            .finish_non_exhaustive()
    }
}

impl MonitorConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_storage_count == 0 {
            return Err(ConfigError::ZeroStorageCount);
        }
        Ok(())
    }
}

/// Partial configuration for runtime updates: only the fields present are
/// merged into the sink's current config (shallow field overwrite).
#[derive(Default)]
pub struct ConfigUpdate {
    pub(crate) report_level: Option<ReportLevel>,
    pub(crate) enabled: Option<bool>,
    pub(crate) max_storage_count: Option<usize>,
    pub(crate) platform: Option<String>,
    pub(crate) fingerprint: Option<String>,
    pub(crate) overflow_policy: Option<OverflowPolicy>,
    pub(crate) uploader: Option<Box<dyn UploadHandler>>,
}

impl ConfigUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Changing the threshold also rescans the primary buffer; see
    /// [`crate::sink::ReportSink::update_report_level`].
    #[must_use]
    pub fn report_level(mut self, level: impl Into<ReportLevel>) -> Self {
        self.report_level = Some(level.into());
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn max_storage_count(mut self, count: usize) -> Self {
        self.max_storage_count = Some(count);
        self
    }

    #[must_use]
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Changing the fingerprint through an update performs the same
    /// current-to-previous shift as `set_fingerprint`.
    #[must_use]
    pub fn fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    #[must_use]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = Some(policy);
        self
    }

    #[must_use]
    pub fn uploader(mut self, uploader: impl UploadHandler + 'static) -> Self {
        self.uploader = Some(Box::new(uploader));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.report_level, ReportLevel::Level(Level::Error));
        assert!(config.enabled);
        assert_eq!(config.max_storage_count, 100);
        assert_eq!(config.overflow_policy, OverflowPolicy::SecondaryBuffer);
    }

    #[test]
    fn test_validate_zero_storage_count() {
        let config = MonitorConfig {
            max_storage_count: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_update_builder_only_sets_named_fields() {
        let update = ConfigUpdate::new()
            .report_level(Level::Warn)
            .max_storage_count(10);
        assert_eq!(update.report_level, Some(ReportLevel::Level(Level::Warn)));
        assert_eq!(update.max_storage_count, Some(10));
        assert!(update.enabled.is_none());
        assert!(update.fingerprint.is_none());
        assert!(update.uploader.is_none());
    }

    #[test]
    fn test_debug_omits_uploader() {
        let rendered = format!("{:?}", MonitorConfig::default());
        assert!(rendered.contains("max_storage_count"));
        assert!(!rendered.contains("ConsoleUploader"));
    }
}
