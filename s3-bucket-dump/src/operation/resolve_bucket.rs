/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::error::{self, Error};
use crate::storage::ObjectStore;
use crate::types::BucketHandle;

/// Resolve `bucket` against the buckets accessible to the caller.
///
/// Both the missing-name and unknown-name errors list the available buckets. Failures
/// listing the buckets are returned as-is.
pub(crate) async fn resolve_bucket(
    store: &dyn ObjectStore,
    bucket: Option<&str>,
) -> Result<BucketHandle, Error> {
    let available = store.list_buckets().await?;

    let name = match bucket {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(error::invalid_input(format!(
                "cannot proceed without a bucket name. Available: {available:?}"
            )))
        }
    };

    if !available.iter().any(|b| b == name) {
        return Err(error::bucket_not_found(name, &available));
    }

    tracing::debug!("resolved bucket {name}");
    Ok(BucketHandle::new(name))
}
