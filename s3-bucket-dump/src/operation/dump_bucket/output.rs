/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::types::FailedDownload;

/// Output type for dumping a bucket
#[non_exhaustive]
#[derive(Debug)]
pub struct DumpBucketOutput {
    /// The number of objects that were successfully downloaded
    pub objects_downloaded: u64,

    /// Keys without a filename component (e.g. `photos/`), never downloaded
    pub skipped_keys: Vec<String>,

    /// A list of failed object downloads
    pub failed_transfers: Option<Vec<FailedDownload>>,

    /// Total number of bytes transferred
    pub total_bytes_transferred: u64,
}

impl DumpBucketOutput {
    /// Creates a new builder-style object to manufacture [`DumpBucketOutput`](crate::operation::dump_bucket::DumpBucketOutput).
    pub fn builder() -> DumpBucketOutputBuilder {
        DumpBucketOutputBuilder::default()
    }

    /// The number of objects that were successfully downloaded
    pub fn objects_downloaded(&self) -> u64 {
        self.objects_downloaded
    }

    /// Keys without a filename component, in the order they were encountered
    pub fn skipped_keys(&self) -> &[String] {
        &self.skipped_keys
    }

    /// A slice of failed object downloads. Only ever populated with
    /// [`FailedTransferPolicy::Continue`](crate::types::FailedTransferPolicy::Continue).
    pub fn failed_transfers(&self) -> &[FailedDownload] {
        self.failed_transfers.as_deref().unwrap_or_default()
    }

    /// The number of bytes successfully transferred (downloaded)
    pub fn total_bytes_transferred(&self) -> u64 {
        self.total_bytes_transferred
    }
}

/// A builder for [`DumpBucketOutput`](crate::operation::dump_bucket::DumpBucketOutput).
#[non_exhaustive]
#[derive(Debug, Default)]
pub struct DumpBucketOutputBuilder {
    pub(crate) objects_downloaded: u64,
    pub(crate) skipped_keys: Vec<String>,
    pub(crate) failed_transfers: Option<Vec<FailedDownload>>,
    pub(crate) total_bytes_transferred: u64,
}

impl DumpBucketOutputBuilder {
    /// The number of objects that were successfully downloaded
    pub fn objects_downloaded(mut self, input: u64) -> Self {
        self.objects_downloaded = input;
        self
    }

    /// Keys without a filename component
    pub fn set_skipped_keys(mut self, input: Vec<String>) -> Self {
        self.skipped_keys = input;
        self
    }

    /// A list of failed object downloads
    pub fn set_failed_transfers(mut self, input: Option<Vec<FailedDownload>>) -> Self {
        self.failed_transfers = input;
        self
    }

    /// The number of bytes successfully transferred (downloaded)
    pub fn total_bytes_transferred(mut self, input: u64) -> Self {
        self.total_bytes_transferred = input;
        self
    }

    /// Consume the builder and return the output
    pub fn build(self) -> DumpBucketOutput {
        DumpBucketOutput {
            objects_downloaded: self.objects_downloaded,
            skipped_keys: self.skipped_keys,
            failed_transfers: self.failed_transfers,
            total_bytes_transferred: self.total_bytes_transferred,
        }
    }
}
