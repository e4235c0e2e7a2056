/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Storage backends a [`Client`](crate::Client) reads buckets from.
//!
//! The dump logic only needs three remote operations: list the accessible buckets,
//! list the keys of a bucket, and download one object to a local file. Retries, auth
//! and region handling are left to the backend.

use std::fmt::Debug;
use std::path::Path;

use async_trait::async_trait;

use crate::error::Error;

mod s3;
pub use s3::S3ObjectStore;

#[cfg(test)]
pub(crate) mod in_memory;

/// A remote object store holding buckets of objects.
#[async_trait]
pub trait ObjectStore: Send + Sync + Debug {
    /// Names of all buckets accessible to the caller.
    async fn list_buckets(&self) -> Result<Vec<String>, Error>;

    /// Keys of all objects in `bucket`, limited to keys starting with `prefix` if given.
    ///
    /// Keys are returned in listing order.
    async fn list_objects(&self, bucket: &str, prefix: Option<&str>) -> Result<Vec<String>, Error>;

    /// Download a single object to `dest`, creating or truncating the file.
    ///
    /// Returns the number of bytes written.
    async fn download_object(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64, Error>;
}
