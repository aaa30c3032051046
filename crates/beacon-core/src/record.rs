// Copyright 2025-Present the Beacon authors.
// SPDX-License-Identifier: Apache-2.0

//! The immutable value describing one observation.

use crate::level::Level;
use crate::util::now_millis;
use serde::Serialize;

/// One normalized observation flowing through the funnel.
///
/// A plugin builds a record with [`EventRecord::new`] plus the chained
/// setters, then hands it to the sink. The sink stamps the severity,
/// session fingerprint, and platform exactly once as the record enters the
/// funnel; after that the record is only ever copied into buffers or
/// forwarded, never mutated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Severity stamped by the sink from the `log` call's level argument.
    pub level: Level,
    /// Human-readable description of the observation.
    pub message: String,
    /// Name of the plugin that produced the record.
    pub plugin: String,
    /// Epoch milliseconds, monotonic-preferring (see [`crate::util::now_millis`]).
    pub timestamp_ms: u64,
    /// Page or route the observation happened on, if the plugin knows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Free-form structured payload. Plugin-specific; only the upload
    /// backend assigns meaning to its shape.
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub extra: serde_json::Value,
    /// Session identity at the time the record entered the funnel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    /// The identity that was current before the most recent transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_fingerprint: Option<String>,
    /// Host variant the record originated from (`"web"`, `"wechat"`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl EventRecord {
    /// Creates a record for `plugin` carrying `message`, timestamped now.
    ///
    /// The severity is provisional until the sink stamps it from the `log`
    /// call; fingerprint and platform are likewise sink-stamped.
    pub fn new(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
            plugin: plugin.into(),
            timestamp_ms: now_millis(),
            url: None,
            extra: serde_json::Value::Null,
            fingerprint: None,
            previous_fingerprint: None,
            platform: None,
        }
    }

    /// Attaches the page or route URL the observation happened on.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Attaches the plugin-specific structured payload.
    #[must_use]
    pub fn with_extra(mut self, extra: serde_json::Value) -> Self {
        self.extra = extra;
        self
    }

    /// Stamps the sink-owned fields as the record enters the funnel.
    ///
    /// This is the single mutation point; the record is immutable afterwards.
    pub(crate) fn stamp(
        &mut self,
        level: Level,
        fingerprint: Option<String>,
        previous_fingerprint: Option<String>,
        platform: Option<String>,
    ) {
        self.level = level;
        self.fingerprint = fingerprint;
        self.previous_fingerprint = previous_fingerprint;
        self.platform = platform;
    }
}
