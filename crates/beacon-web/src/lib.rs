// Copyright 2025-Present the Beacon authors.
// SPDX-License-Identifier: Apache-2.0

//! Browser host variant of the Beacon funnel.
//!
//! The browser's channel set is deliberately minimal: a single
//! route-change channel. History/hash-based navigation plugins emit on it;
//! performance sampling, white-screen detection, and analytics counters
//! re-run their setup for the new route via the monitor's resync.

use beacon_core::{Monitor, MonitorConfig, Signal};
use serde::Serialize;
use tracing::debug;

/// Platform identifier stamped onto every record from this host.
pub const PLATFORM_WEB: &str = "web";

/// A completed in-page route transition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteChange {
    /// Route the page navigated away from, when known (hash and history
    /// navigations know it; a hard landing does not).
    pub from: Option<String>,
    /// Route the page navigated to.
    pub to: String,
}

/// The browser's closed channel set; one variant per channel.
#[derive(Debug)]
pub enum WebSignal {
    RouteChange(RouteChange),
}

/// Channel discriminants for [`WebSignal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebChannel {
    RouteChange,
}

impl Signal for WebSignal {
    type Kind = WebChannel;

    fn kind(&self) -> WebChannel {
        match self {
            WebSignal::RouteChange(_) => WebChannel::RouteChange,
        }
    }
}

/// A monitor wired for the browser.
pub type WebMonitor = Monitor<WebSignal>;

/// Default configuration for the browser host: core defaults plus the
/// `"web"` platform stamp.
pub fn web_config() -> MonitorConfig {
    MonitorConfig {
        platform: Some(PLATFORM_WEB.to_string()),
        ..Default::default()
    }
}

/// Host lifecycle entry points the browser glue calls into.
pub trait WebMonitorExt {
    /// Announce a completed route transition: fans the signal out on the
    /// bus, then re-runs navigation-sensitive plugins for the new route.
    fn route_changed(&mut self, change: RouteChange);

    /// Page-hide/unload hook: best-effort flush of everything buffered.
    fn page_hidden(&mut self);
}

impl WebMonitorExt for WebMonitor {
    fn route_changed(&mut self, change: RouteChange) {
        debug!("route changed to {}", change.to);
        self.emit(&WebSignal::RouteChange(change));
        self.resync();
    }

    fn page_hidden(&mut self) {
        self.flush_all();
    }
}
