// Copyright 2025-Present the Beacon authors.
// SPDX-License-Identifier: Apache-2.0

//! Synchronous publish/subscribe over a closed, per-host channel set.
//!
//! Each host variant defines one signal enum (a [`Signal`] implementor)
//! whose variants are the channels; adding a channel is a compile-time
//! change and payloads are typed by construction. The concrete use is
//! navigation decoupling: a route-observing plugin emits, and performance
//! sampling, white-screen detection, and analytics re-run their setup for
//! the new route without depending on the route plugin directly.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::error;

/// A typed bus message. The associated `Kind` is the channel discriminant
/// listeners subscribe on; the signal value itself carries the payload.
pub trait Signal {
    type Kind: Copy + Eq + fmt::Debug;

    fn kind(&self) -> Self::Kind;
}

/// Token returned by [`EventBus::on`], used to remove the listener again.
/// Callers are expected to keep the token if they intend to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener<S> = Box<dyn FnMut(&S) + Send>;

/// Fixed-channel synchronous fan-out.
///
/// `emit` invokes every listener registered for the signal's channel, in
/// registration order, immediately on the calling thread. No queuing, no
/// async dispatch. Each listener invocation is isolated: one panicking
/// listener cannot suppress delivery to the rest.
pub struct EventBus<S: Signal> {
    listeners: Vec<(S::Kind, SubscriptionId, Listener<S>)>,
    next_id: u64,
}

impl<S: Signal> Default for EventBus<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Signal> EventBus<S> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Registers a listener on `kind` and returns its removal token.
    pub fn on(
        &mut self,
        kind: S::Kind,
        listener: impl FnMut(&S) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((kind, id, Box::new(listener)));
        id
    }

    /// Removes the listener registered under `id` on `kind`. Returns
    /// whether anything was removed.
    pub fn off(&mut self, kind: S::Kind, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(k, i, _)| !(*k == kind && *i == id));
        self.listeners.len() != before
    }

    /// Synchronous fan-out to every listener on the signal's channel.
    pub fn emit(&mut self, signal: &S) {
        let kind = signal.kind();
        for (listener_kind, _, listener) in &mut self.listeners {
            if *listener_kind != kind {
                continue;
            }
            if catch_unwind(AssertUnwindSafe(|| listener(signal))).is_err() {
                error!(
                    "bus listener panicked on {:?}; remaining listeners still notified",
                    kind
                );
            }
        }
    }

    /// Number of listeners currently registered on `kind`.
    pub fn listener_count(&self, kind: S::Kind) -> usize {
        self.listeners.iter().filter(|(k, _, _)| *k == kind).count()
    }
}
