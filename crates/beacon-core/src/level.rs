// Copyright 2025-Present the Beacon authors.
// SPDX-License-Identifier: Apache-2.0

//! Severity model for the event funnel.
//!
//! Two types split what the source of an event may say from what the sink
//! may be configured with: every event carries a [`Level`], while the sink
//! gates on a [`ReportLevel`], which adds the `Off` sentinel that is only
//! ever valid as a threshold.

use derive_more::Display;
use serde::Serialize;

/// Severity of a single observation.
///
/// Ordinals are severity-descending: `Error` is the most severe (lowest
/// ordinal), `Debug` the least. The derived `Ord` therefore ranks a more
/// severe level as *smaller*, which is what the gating comparison relies on.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[display("error")]
    Error = 0,
    #[display("warn")]
    Warn = 1,
    #[display("info")]
    Info = 2,
    #[display("debug")]
    Debug = 3,
}

/// Gating threshold for the report sink.
///
/// `Off` buffers everything and can never be an event's own level; the type
/// split enforces that statically instead of documenting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    /// Report events at this severity or more severe immediately.
    Level(Level),
    /// Report nothing immediately; every event is buffered.
    Off,
}

impl ReportLevel {
    /// Whether an event at `level` is severe enough to bypass buffering.
    ///
    /// `Error` always qualifies unless the threshold is `Off`.
    pub fn qualifies(self, level: Level) -> bool {
        match self {
            ReportLevel::Level(threshold) => level <= threshold,
            ReportLevel::Off => false,
        }
    }
}

impl From<Level> for ReportLevel {
    fn from(level: Level) -> Self {
        ReportLevel::Level(level)
    }
}
