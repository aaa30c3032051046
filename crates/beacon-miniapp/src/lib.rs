// Copyright 2025-Present the Beacon authors.
// SPDX-License-Identifier: Apache-2.0

//! Mini-program host variants of the Beacon funnel (WeChat and Alipay
//! runtimes).
//!
//! Unlike the browser, mini-program runtimes expose a family of distinct
//! navigation methods, so the channel set is richer: each navigation
//! method is its own channel, and backgrounding the app is a separate
//! lifecycle channel wired to a best-effort flush.

use beacon_core::{Monitor, MonitorConfig, Signal};
use serde::Serialize;
use tracing::debug;

/// The mini-program runtimes this variant covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiniAppPlatform {
    Wechat,
    Alipay,
}

impl MiniAppPlatform {
    pub fn as_str(self) -> &'static str {
        match self {
            MiniAppPlatform::Wechat => "wechat",
            MiniAppPlatform::Alipay => "alipay",
        }
    }
}

/// Destination of a mini-program navigation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTarget {
    /// Page path within the mini program.
    pub path: String,
    /// Raw query string, when the navigation carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl RouteTarget {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: None,
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

/// The mini-program channel set; one variant per navigation method plus
/// the app-hide lifecycle channel.
#[derive(Debug)]
pub enum MiniAppSignal {
    NavigateTo(RouteTarget),
    RedirectTo(RouteTarget),
    SwitchTab(RouteTarget),
    NavigateBack(RouteTarget),
    ReLaunch(RouteTarget),
    AppHide,
}

/// Channel discriminants for [`MiniAppSignal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiniAppChannel {
    NavigateTo,
    RedirectTo,
    SwitchTab,
    NavigateBack,
    ReLaunch,
    AppHide,
}

impl Signal for MiniAppSignal {
    type Kind = MiniAppChannel;

    fn kind(&self) -> MiniAppChannel {
        match self {
            MiniAppSignal::NavigateTo(_) => MiniAppChannel::NavigateTo,
            MiniAppSignal::RedirectTo(_) => MiniAppChannel::RedirectTo,
            MiniAppSignal::SwitchTab(_) => MiniAppChannel::SwitchTab,
            MiniAppSignal::NavigateBack(_) => MiniAppChannel::NavigateBack,
            MiniAppSignal::ReLaunch(_) => MiniAppChannel::ReLaunch,
            MiniAppSignal::AppHide => MiniAppChannel::AppHide,
        }
    }
}

/// A monitor wired for a mini-program runtime.
pub type MiniAppMonitor = Monitor<MiniAppSignal>;

/// Default configuration for a mini-program host: core defaults plus the
/// runtime's platform stamp.
pub fn miniapp_config(platform: MiniAppPlatform) -> MonitorConfig {
    MonitorConfig {
        platform: Some(platform.as_str().to_string()),
        ..Default::default()
    }
}

/// Host lifecycle entry points the mini-program glue calls into.
pub trait MiniAppMonitorExt {
    /// Announce a host navigation or lifecycle signal. Navigation signals
    /// fan out on the bus and then resynchronize the plugins for the new
    /// page; `AppHide` fans out and then best-effort flushes the buffers.
    fn navigated(&mut self, signal: MiniAppSignal);
}

impl MiniAppMonitorExt for MiniAppMonitor {
    fn navigated(&mut self, signal: MiniAppSignal) {
        debug!("mini-app signal on {:?}", signal.kind());
        match &signal {
            MiniAppSignal::AppHide => {
                self.emit(&signal);
                self.flush_all();
            }
            _ => {
                self.emit(&signal);
                self.resync();
            }
        }
    }
}
