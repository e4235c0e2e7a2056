/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::BTreeSet;
use std::path::Path;

use tokio::fs;

use crate::error::{self, Error, ErrorKind, InvalidPrefix};
use crate::storage::ObjectStore;
use crate::types::{split_key, BucketHandle};
use crate::DEFAULT_DELIMITER;

/// Normalize a user supplied prefix so it only ever matches whole path segments.
///
/// Empty prefixes are dropped, anything else gets a trailing delimiter.
pub(crate) fn normalize_prefix(prefix: Option<&str>) -> Option<String> {
    match prefix {
        None | Some("") => None,
        Some(prefix) if prefix.ends_with(DEFAULT_DELIMITER) => Some(prefix.to_owned()),
        Some(prefix) => Some(format!("{prefix}{DEFAULT_DELIMITER}")),
    }
}

/// Every folder-like prefix present in `keys`, i.e. each key minus its last segment.
pub(crate) fn folder_prefixes<I, S>(keys: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keys.into_iter()
        .filter_map(|key| {
            let key = key.as_ref();
            key.contains(DEFAULT_DELIMITER)
                .then(|| split_key(key).0.to_owned())
        })
        .collect()
}

/// List the keys to download from `bucket`, and make sure `destination` exists.
///
/// `prefix` must already be normalized. The listing is fully materialized before
/// anything is downloaded.
pub(crate) async fn list_keys(
    store: &dyn ObjectStore,
    bucket: &BucketHandle,
    prefix: Option<&str>,
    destination: &Path,
) -> Result<Vec<String>, Error> {
    let keys = match prefix {
        Some(prefix) => {
            let keys = store.list_objects(bucket.name(), Some(prefix)).await?;
            if keys.is_empty() {
                let all_keys = store.list_objects(bucket.name(), None).await?;
                let available = folder_prefixes(&all_keys);
                if !available.is_empty() {
                    return Err(Error::new(
                        ErrorKind::InvalidPrefix,
                        InvalidPrefix::new(prefix, bucket.name(), available),
                    ));
                }
            }
            tracing::info!(
                "number of objects found in {} limited to {prefix:?}: {}",
                bucket.name(),
                keys.len()
            );
            keys
        }
        None => {
            let keys = store.list_objects(bucket.name(), None).await?;
            tracing::info!("number of objects found in {}: {}", bucket.name(), keys.len());
            keys
        }
    };

    if keys.is_empty() {
        return Err(error::no_objects_found(bucket.name()));
    }

    if !fs::try_exists(destination).await? {
        fs::create_dir_all(destination).await?;
        tracing::info!("created {}", absolute(destination).display());
    }

    Ok(keys)
}

/// Best-effort absolute form of `path` for log messages.
pub(crate) fn absolute(path: &Path) -> std::path::PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
