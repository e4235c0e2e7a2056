/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::{Path, PathBuf};

use crate::DEFAULT_DELIMITER;

/// The concurrency settings to use for dumping a bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConcurrencySetting {
    /// Use the default sized worker pool (5 workers).
    #[default]
    Auto,

    /// Download objects one at a time, in listing order.
    Sequential,

    /// Explicitly sized worker pool. A value of zero is treated as one worker.
    Explicit(usize),
}

/// Policy for how to handle a failure of any individual object download while dumping
/// a bucket.
///
/// Default is to abort the dump.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FailedTransferPolicy {
    /// Stop dispatching new downloads on the first failure. Downloads already in flight
    /// run to completion and the failure is returned when the dump is joined.
    #[default]
    Abort,
    /// Continue the dump. Any failure will be logged and the details of all failed
    /// objects will be available in the output after the dump completes.
    Continue,
}

/// Detailed information about a failed object download
#[non_exhaustive]
#[derive(Debug)]
pub struct FailedDownload {
    pub(crate) key: String,
    pub(crate) error: crate::error::Error,
}

impl FailedDownload {
    /// The key of the object that failed to download
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The error encountered downloading the object
    pub fn error(&self) -> &crate::error::Error {
        &self.error
    }
}

/// A bucket that has been confirmed to exist among the buckets accessible to the caller.
///
/// Only obtainable through bucket resolution, see
/// [`Client::resolve_bucket`](crate::Client::resolve_bucket).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketHandle {
    name: String,
}

impl BucketHandle {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The bucket name
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Where a single object key lands on the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    key: String,
    target_dir: PathBuf,
    filename: String,
}

impl DownloadTask {
    /// Derive the download task for `key` rooted at `root_dir`.
    ///
    /// The key is split on its last `/`. Spaces in the directory part are replaced with
    /// underscores; the filename is kept as-is. Returns `None` if the key has no
    /// filename component (e.g. `"photos/"`).
    pub fn from_key(root_dir: &Path, key: &str) -> Option<DownloadTask> {
        let (path, filename) = split_key(key);
        if filename.is_empty() {
            return None;
        }

        Some(DownloadTask {
            key: key.to_owned(),
            target_dir: root_dir.join(path.replace(' ', "_")),
            filename: filename.to_owned(),
        })
    }

    /// The object key to download
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The local directory the object is written into
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// The local file name of the object
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Full local path of the object
    pub fn target_path(&self) -> PathBuf {
        self.target_dir.join(&self.filename)
    }
}

/// Split a key into `(path, filename)` on the last delimiter.
///
/// A key without a delimiter has an empty path, a key ending in the delimiter has an
/// empty filename.
pub fn split_key(key: &str) -> (&str, &str) {
    key.rsplit_once(DEFAULT_DELIMITER).unwrap_or(("", key))
}
