// Copyright 2025-Present the Beacon authors.
// SPDX-License-Identifier: Apache-2.0

/// Errors raised when a plugin is rejected at registration time.
///
/// These never reach the monitored application as panics; the registry
/// returns them and [`crate::monitor::Monitor::install`] logs and swallows
/// them at the boundary.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("plugin name must be non-empty")]
    EmptyName,

    #[error("a plugin named `{0}` is already registered")]
    DuplicateName(String),
}

/// Errors raised when configuration is rejected.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("max_storage_count must be greater than 0")]
    ZeroStorageCount,
}

/// Failure surface an upload handler may report.
///
/// The sink logs and discards these; delivery is at-most-once and a failed
/// payload is never re-buffered or retried.
#[derive(Debug, thiserror::Error)]
#[error("upload failed: {0}")]
pub struct UploadError(pub String);
