/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Live progress of a bucket dump.
///
/// Cheap to clone, every clone observes the same dump. A key counts as completed once
/// it is downloaded, skipped, or has failed.
#[derive(Debug, Clone)]
pub struct DumpProgress {
    inner: Arc<ProgressState>,
}

#[derive(Debug)]
struct ProgressState {
    total: u64,
    completed: AtomicU64,
    bytes: AtomicU64,
}

impl DumpProgress {
    pub(crate) fn new(total: u64) -> Self {
        Self {
            inner: Arc::new(ProgressState {
                total,
                completed: AtomicU64::default(),
                bytes: AtomicU64::default(),
            }),
        }
    }

    /// Number of keys listed for the dump
    pub fn objects_total(&self) -> u64 {
        self.inner.total
    }

    /// Number of keys processed so far
    pub fn objects_completed(&self) -> u64 {
        self.inner.completed.load(Ordering::SeqCst)
    }

    /// Bytes written to disk so far
    pub fn bytes_transferred(&self) -> u64 {
        self.inner.bytes.load(Ordering::SeqCst)
    }

    /// True once every listed key has been processed
    pub fn is_complete(&self) -> bool {
        self.objects_completed() >= self.objects_total()
    }

    pub(crate) fn record(&self, bytes: u64) {
        self.inner.bytes.fetch_add(bytes, Ordering::SeqCst);
        let completed = self.inner.completed.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!("progress: {completed}/{}", self.inner.total);
    }
}

impl fmt::Display for DumpProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.objects_total();
        let completed = self.objects_completed();
        let percent = if total == 0 {
            100.0
        } else {
            completed as f64 * 100.0 / total as f64
        };
        write!(
            f,
            "{completed}/{total} objects ({percent:.1}%), {} bytes",
            self.bytes_transferred()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::DumpProgress;

    #[test]
    fn test_progress_shared_between_clones() {
        let progress = DumpProgress::new(4);
        let observer = progress.clone();
        assert!(!observer.is_complete());

        progress.record(10);
        progress.record(0);
        assert_eq!(2, observer.objects_completed());
        assert_eq!(10, observer.bytes_transferred());
        assert_eq!("2/4 objects (50.0%), 10 bytes", observer.to_string());

        progress.record(5);
        progress.record(5);
        assert!(observer.is_complete());
    }
}
