// Copyright 2025-Present the Beacon authors.
// SPDX-License-Identifier: Apache-2.0

//! Delivery boundary between the funnel and the host application.

use crate::error::UploadError;
use crate::record::EventRecord;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::info;

/// What the sink hands to an upload handler: a single immediately-reported
/// record, or a batch produced by a buffer flush.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Single(EventRecord),
    Batch(Vec<EventRecord>),
}

impl Payload {
    /// Number of records in the payload.
    pub fn len(&self) -> usize {
        match self {
            Payload::Single(_) => 1,
            Payload::Batch(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The payload's records as a slice, regardless of shape.
    pub fn records(&self) -> &[EventRecord] {
        match self {
            Payload::Single(record) => std::slice::from_ref(record),
            Payload::Batch(records) => records.as_slice(),
        }
    }
}

/// The external sink the funnel delivers to.
///
/// Implemented by the host application. Delivery is fire-and-forget: an
/// `Err` is logged by the sink and the payload is considered
/// delivered-and-discarded — no retry, no re-buffering.
pub trait UploadHandler: Send {
    fn send(&mut self, payload: Payload) -> Result<(), UploadError>;
}

/// Default handler: renders each payload as JSON through the process
/// logger. Keeps a freshly-constructed monitor observable before the host
/// wires a real transport.
#[derive(Debug, Default)]
pub struct ConsoleUploader;

impl UploadHandler for ConsoleUploader {
    fn send(&mut self, payload: Payload) -> Result<(), UploadError> {
        let rendered =
            serde_json::to_string(&payload).map_err(|e| UploadError(e.to_string()))?;
        info!(target: "beacon::upload", "{rendered}");
        Ok(())
    }
}

/// Capture handler: accumulates every payload in memory.
///
/// Used by the test suites and handy for local development; clones share
/// the same captured log.
#[derive(Debug, Clone, Default)]
pub struct MemoryUploader {
    payloads: Arc<Mutex<Vec<Payload>>>,
}

impl MemoryUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every payload delivered so far, in delivery order.
    pub fn payloads(&self) -> Vec<Payload> {
        #[allow(clippy::expect_used)]
        let payloads = self.payloads.lock().expect("lock poisoned");
        payloads.clone()
    }

    /// Every delivered record, flattened across payloads in delivery order.
    pub fn records(&self) -> Vec<EventRecord> {
        self.payloads()
            .iter()
            .flat_map(|p| p.records().to_vec())
            .collect()
    }

    pub fn delivery_count(&self) -> usize {
        #[allow(clippy::expect_used)]
        let payloads = self.payloads.lock().expect("lock poisoned");
        payloads.len()
    }
}

impl UploadHandler for MemoryUploader {
    fn send(&mut self, payload: Payload) -> Result<(), UploadError> {
        #[allow(clippy::expect_used)]
        self.payloads.lock().expect("lock poisoned").push(payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;

    #[test]
    fn test_payload_records_view() {
        let single = Payload::Single(EventRecord::new("a", "one"));
        assert_eq!(single.len(), 1);
        assert_eq!(single.records()[0].message, "one");

        let batch = Payload::Batch(vec![
            EventRecord::new("a", "one"),
            EventRecord::new("b", "two"),
        ]);
        assert_eq!(batch.len(), 2);
        assert!(!batch.is_empty());
    }

    #[test]
    fn test_payload_serializes_untagged() {
        let mut record = EventRecord::new("a", "one");
        record.stamp(Level::Error, None, None, None);
        let single = serde_json::to_value(&Payload::Single(record.clone())).unwrap();
        assert!(single.is_object());

        let batch = serde_json::to_value(&Payload::Batch(vec![record])).unwrap();
        assert!(batch.is_array());
    }

    #[test]
    fn test_memory_uploader_shares_captures_across_clones() {
        let uploader = MemoryUploader::new();
        let mut handle = uploader.clone();
        handle
            .send(Payload::Single(EventRecord::new("a", "one")))
            .unwrap();
        assert_eq!(uploader.delivery_count(), 1);
        assert_eq!(uploader.records()[0].message, "one");
    }
}
