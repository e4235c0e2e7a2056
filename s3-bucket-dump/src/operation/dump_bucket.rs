/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Operation builders
pub mod builders;

mod input;
/// Input type for dumping a bucket
pub use input::{DumpBucketInput, DumpBucketInputBuilder};
mod output;
/// Output type for dumping a bucket
pub use output::{DumpBucketOutput, DumpBucketOutputBuilder};

mod handle;
pub use handle::DumpBucketHandle;

mod progress;
pub use progress::DumpProgress;

mod worker;

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::types::{BucketHandle, FailedDownload, FailedTransferPolicy};

use super::list_keys::{absolute, list_keys, normalize_prefix};
use super::resolve_bucket::resolve_bucket;
use super::TransferContext;

/// Operation struct for dumping a bucket to a local directory
#[derive(Clone, Default, Debug)]
pub(crate) struct DumpBucket;

impl DumpBucket {
    /// Execute a single `DumpBucket` operation
    ///
    /// Resolves the bucket and lists every key to download before any download starts.
    /// The returned handle drives the downloads to completion.
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: DumpBucketInput,
    ) -> Result<DumpBucketHandle, Error> {
        let store = handle.config.store();
        let bucket = resolve_bucket(store, input.bucket()).await?;

        let destination = input
            .destination()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(bucket.name()));
        tracing::info!(
            "bucket objects from {} will be dumped at {}",
            bucket.name(),
            absolute(&destination).display()
        );

        let prefix = normalize_prefix(input.key_prefix());
        let keys = list_keys(store, &bucket, prefix.as_deref(), &destination).await?;
        tracing::debug!("keys to download: {keys:?}");

        let state = DumpBucketState::new(bucket, destination, &input, keys.len());
        let ctx = DumpBucketContext::new(handle.clone(), state);

        let mut tasks = JoinSet::new();
        if handle.is_sequential() {
            tracing::info!("initiating sequential download of {} objects", keys.len());
            tasks.spawn(worker::download_sequential(ctx.clone(), keys));
        } else {
            let concurrency = handle.num_workers();
            tracing::info!(
                "initiating download of {} objects with {concurrency} workers",
                keys.len()
            );
            let (work_tx, work_rx) = async_channel::bounded(concurrency);
            tasks.spawn(worker::dispatch_keys(ctx.clone(), keys, work_tx));
            for _ in 0..concurrency {
                tasks.spawn(worker::download_objects(ctx.clone(), work_rx.clone()));
            }
        }

        Ok(DumpBucketHandle { tasks, ctx })
    }
}

/// DumpBucket operation specific state
#[derive(Debug)]
pub(crate) struct DumpBucketState {
    bucket: BucketHandle,
    destination: PathBuf,
    failure_policy: FailedTransferPolicy,
    cancel: CancellationToken,
    progress: DumpProgress,
    successful_downloads: AtomicU64,
    skipped_keys: Mutex<Vec<String>>,
    failed_downloads: Mutex<Vec<FailedDownload>>,
}

type DumpBucketContext = TransferContext<DumpBucketState>;

impl DumpBucketState {
    fn new(
        bucket: BucketHandle,
        destination: PathBuf,
        input: &DumpBucketInput,
        total_keys: usize,
    ) -> Self {
        Self {
            bucket,
            destination,
            failure_policy: input.failure_policy().clone(),
            cancel: CancellationToken::new(),
            progress: DumpProgress::new(total_keys as u64),
            successful_downloads: AtomicU64::default(),
            skipped_keys: Mutex::new(Vec::new()),
            failed_downloads: Mutex::new(Vec::new()),
        }
    }
}

impl DumpBucketContext {
    fn new(handle: Arc<crate::client::Handle>, state: DumpBucketState) -> Self {
        Self {
            handle,
            state: Arc::new(state),
        }
    }
}
