/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::mem;
use std::sync::atomic::Ordering;
use std::sync::PoisonError;

use tokio::task;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, ErrorKind};

use super::{DumpBucketContext, DumpBucketOutput, DumpProgress};

/// Handle for a running bucket dump
#[derive(Debug)]
#[non_exhaustive]
pub struct DumpBucketHandle {
    /// All child tasks spawned for this dump
    pub(crate) tasks: task::JoinSet<Result<(), Error>>,
    /// The context used to drive the dump to completion
    pub(crate) ctx: DumpBucketContext,
}

impl DumpBucketHandle {
    /// Live progress of this dump
    pub fn progress(&self) -> DumpProgress {
        self.ctx.state.progress.clone()
    }

    /// Token that stops new downloads from being dispatched once cancelled.
    ///
    /// Downloads already in flight run to completion and [`join`](Self::join) returns an
    /// [`ErrorKind::OperationCancelled`] error.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.ctx.state.cancel.clone()
    }

    /// Consume the handle and wait for the dump to complete
    ///
    /// Keys without a filename are reported whether or not the dump succeeded.
    #[tracing::instrument(skip_all, level = "debug", name = "dump-bucket-join")]
    pub async fn join(mut self) -> Result<DumpBucketOutput, Error> {
        let mut first_error: Option<Error> = None;
        while let Some(join_result) = self.tasks.join_next().await {
            let result = join_result.map_err(Error::from).and_then(|r| r);
            if let Err(err) = result {
                // a download failure wins over the cancellation it triggered
                let replace = match &first_error {
                    None => true,
                    Some(prev) => {
                        prev.kind() == &ErrorKind::OperationCancelled
                            && err.kind() != &ErrorKind::OperationCancelled
                    }
                };
                if replace {
                    first_error = Some(err);
                }
            }
        }

        let skipped_keys = mem::take(
            &mut *self
                .ctx
                .state
                .skipped_keys
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        report_skipped(&skipped_keys);

        if let Some(err) = first_error {
            return Err(err);
        }

        let failed_downloads = mem::take(
            &mut *self
                .ctx
                .state
                .failed_downloads
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        let successful_downloads = self.ctx.state.successful_downloads.load(Ordering::SeqCst);

        let output = DumpBucketOutput::builder()
            .objects_downloaded(successful_downloads)
            .set_skipped_keys(skipped_keys)
            .set_failed_transfers((!failed_downloads.is_empty()).then_some(failed_downloads))
            .total_bytes_transferred(self.ctx.state.progress.bytes_transferred())
            .build();

        tracing::info!(
            "downloaded {} objects ({} bytes) from {} to {}",
            output.objects_downloaded(),
            output.total_bytes_transferred(),
            self.ctx.state.bucket.name(),
            self.ctx.state.destination.display()
        );
        Ok(output)
    }
}

fn report_skipped(skipped_keys: &[String]) {
    if skipped_keys.is_empty() {
        return;
    }
    tracing::warn!(
        "{} keys could not be downloaded, they have no filename: {:?}",
        skipped_keys.len(),
        skipped_keys
    );
    tracing::warn!("keys ending in '/' are likely folder placeholders created from the S3 console");
}
