// Copyright 2025-Present the Beacon authors.
// SPDX-License-Identifier: Apache-2.0

use std::sync::OnceLock;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Wall-clock epoch milliseconds paired with the monotonic instant they
/// were captured at. Anchored once per process.
static CLOCK_ANCHOR: OnceLock<(u128, Instant)> = OnceLock::new();

/// Current time as epoch milliseconds.
///
/// Prefers a monotonic reading: the wall clock is sampled once and every
/// later call adds the monotonic elapsed time to that anchor, so timestamps
/// never go backwards even if the system clock is adjusted mid-session.
/// Falls back to an anchor of zero if the wall clock reads before the epoch.
pub fn now_millis() -> u64 {
    let (epoch_ms, anchor) = *CLOCK_ANCHOR.get_or_init(|| {
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        (wall, Instant::now())
    });
    u64::try_from(epoch_ms + anchor.elapsed().as_millis()).unwrap_or(u64::MAX)
}
