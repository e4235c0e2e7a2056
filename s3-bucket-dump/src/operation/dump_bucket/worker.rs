/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use async_channel::{Receiver, Sender};
use path_clean::PathClean;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::PoisonError;
use tokio::fs;

use crate::error::{self, ErrorKind};
use crate::types::{DownloadTask, FailedDownload, FailedTransferPolicy};

use super::DumpBucketContext;

#[derive(Debug)]
enum KeyOutcome {
    Downloaded(u64),
    Skipped,
}

// feed listed keys to the worker pool in listing order
pub(super) async fn dispatch_keys(
    ctx: DumpBucketContext,
    keys: Vec<String>,
    work_tx: Sender<String>,
) -> Result<(), error::Error> {
    let cancel = ctx.state.cancel.clone();
    for key in keys {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::error!("received cancellation signal, not dispatching new keys");
                return Err(error::operation_cancelled());
            }
            sent = work_tx.send(key) => {
                if sent.is_err() {
                    tracing::error!("all receiver ends have been dropped, unable to send a key!");
                    break;
                }
            }
        }
    }

    Ok(())
}

// worker to download objects until the key channel closes
pub(super) async fn download_objects(
    ctx: DumpBucketContext,
    work_rx: Receiver<String>,
) -> Result<(), error::Error> {
    let cancel = ctx.state.cancel.clone();
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::error!("received cancellation signal, exiting and not downloading a new object");
                return Err(error::operation_cancelled());
            }
            key = work_rx.recv() => {
                match key {
                    Err(_) => break,
                    Ok(key) => {
                        tracing::debug!("worker recv'd request for key {key:?}");
                        process_key(&ctx, key).await?;
                    }
                }
            }
        }
    }

    tracing::trace!("key channel closed, worker finished");
    Ok(())
}

// download keys one at a time, in listing order
pub(super) async fn download_sequential(
    ctx: DumpBucketContext,
    keys: Vec<String>,
) -> Result<(), error::Error> {
    for key in keys {
        if ctx.state.cancel.is_cancelled() {
            tracing::error!("received cancellation signal, not downloading remaining keys");
            return Err(error::operation_cancelled());
        }
        process_key(&ctx, key).await?;
    }
    Ok(())
}

/// Download `key` and record the outcome. Only returns an error under
/// [`FailedTransferPolicy::Abort`], after cancelling the rest of the dump.
async fn process_key(ctx: &DumpBucketContext, key: String) -> Result<(), error::Error> {
    let state = &ctx.state;
    match download_key(ctx, &key).await {
        Ok(KeyOutcome::Downloaded(bytes)) => {
            state.successful_downloads.fetch_add(1, Ordering::SeqCst);
            state.progress.record(bytes);
            tracing::debug!("finished downloading key {key:?} ({bytes} bytes)");
        }
        Ok(KeyOutcome::Skipped) => {
            state
                .skipped_keys
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(key);
            state.progress.record(0);
        }
        Err(err) => {
            state.progress.record(0);
            match state.failure_policy {
                FailedTransferPolicy::Abort => {
                    tracing::error!("failed to download key {key:?}: {err}");
                    if err.kind() != &ErrorKind::OperationCancelled {
                        state.cancel.cancel();
                    }
                    return Err(err);
                }
                FailedTransferPolicy::Continue => {
                    tracing::warn!("failed to download key {key:?}: {err}");
                    state
                        .failed_downloads
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(FailedDownload { key, error: err });
                }
            }
        }
    }
    Ok(())
}

async fn download_key(ctx: &DumpBucketContext, key: &str) -> Result<KeyOutcome, error::Error> {
    let root_dir = &ctx.state.destination;
    let task = match DownloadTask::from_key(root_dir, key) {
        Some(task) => task,
        None => {
            tracing::debug!("skipping key {key:?} without a filename");
            return Ok(KeyOutcome::Skipped);
        }
    };

    let target_path = task.target_path().clean();
    validate_path(root_dir, &target_path, key)?;

    // directory of the cleaned path, not of the raw key
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let bytes = ctx
        .store()
        .download_object(ctx.state.bucket.name(), task.key(), &target_path)
        .await?;

    Ok(KeyOutcome::Downloaded(bytes))
}

fn validate_path(root_dir: &Path, local_path: &Path, key: &str) -> Result<(), error::Error> {
    let root_dir = root_dir.clean();
    // `clean` turns "./" into "." and strips it from relative paths
    let contained = if root_dir == Path::new(".") {
        local_path.is_relative() && !local_path.starts_with("..")
    } else {
        local_path.starts_with(&root_dir)
    };

    // validate the resolved key path doesn't resolve outside the destination directory
    if !contained || local_path == root_dir {
        let err = error::invalid_input(format!("Unable to download key: '{key}', its relative path resolves outside the target destination directory"));
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use path_clean::PathClean;
    use std::path::Path;

    use super::validate_path;
    use crate::error::ErrorKind;
    use crate::types::DownloadTask;

    fn check(root: &str, key: &str) -> Result<(), ErrorKind> {
        let task = DownloadTask::from_key(Path::new(root), key).unwrap();
        validate_path(Path::new(root), &task.target_path().clean(), key).map_err(|e| e.kind().clone())
    }

    #[test]
    fn test_validate_path_accepts_nested_keys() {
        for root in ["bucket", "./bucket", "/tmp/bucket", ".", "./"] {
            assert_eq!(Ok(()), check(root, "a.txt"), "{root}");
            assert_eq!(Ok(()), check(root, "a/b/c.txt"), "{root}");
            assert_eq!(Ok(()), check(root, "a/../b.txt"), "{root}");
        }
    }

    #[cfg(target_family = "unix")]
    #[test]
    fn test_validate_path_rejects_escaping_keys() {
        for root in ["bucket", "./bucket", "/tmp/bucket", ".", "./"] {
            assert_eq!(Err(ErrorKind::InputInvalid), check(root, "../a.txt"), "{root}");
            assert_eq!(Err(ErrorKind::InputInvalid), check(root, "a/../../b.txt"), "{root}");
            assert_eq!(Err(ErrorKind::InputInvalid), check(root, "/etc/passwd"), "{root}");
        }
    }
}
