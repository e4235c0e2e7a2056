/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use crate::error::Error;
use crate::tree::KeyTree;
use crate::types::{BucketHandle, ConcurrencySetting};
use crate::{Config, DEFAULT_CONCURRENCY};

/// Client for dumping Amazon S3 buckets to a local directory.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) handle: Arc<Handle>,
}

/// Whatever is needed to carry out operations, e.g. config, object store, etc
#[derive(Debug)]
pub(crate) struct Handle {
    pub(crate) config: crate::Config,
}

impl Handle {
    /// Get the concrete number of workers to use based on the concurrency setting.
    pub(crate) fn num_workers(&self) -> usize {
        match self.config.concurrency() {
            ConcurrencySetting::Auto => DEFAULT_CONCURRENCY,
            ConcurrencySetting::Sequential => 1,
            ConcurrencySetting::Explicit(concurrency) => (*concurrency).max(1),
        }
    }

    /// True if objects should be downloaded one at a time in listing order.
    pub(crate) fn is_sequential(&self) -> bool {
        matches!(self.config.concurrency(), ConcurrencySetting::Sequential)
    }
}

impl Client {
    /// Creates a new client from a config.
    pub fn new(config: Config) -> Client {
        let handle = Arc::new(Handle { config });
        Client { handle }
    }

    /// Returns the client's configuration
    pub fn config(&self) -> &Config {
        &self.handle.config
    }

    /// Download every object in a bucket, or under a prefix, to a local directory.
    ///
    /// Constructs a fluent builder for the
    /// [`DumpBucket`](crate::operation::dump_bucket::builders::DumpBucketFluentBuilder) operation.
    ///
    /// # Examples
    /// ```no_run
    /// use std::path::PathBuf;
    /// use s3_bucket_dump::error::Error;
    ///
    /// async fn dump_bucket(
    ///     client: &s3_bucket_dump::Client,
    ///     dest: PathBuf
    /// ) -> Result<(), Error> {
    ///
    ///     let handle = client
    ///         .dump_bucket()
    ///         .bucket("my-bucket")
    ///         .key_prefix("reports/2024")
    ///         .destination(dest)
    ///         .send()
    ///         .await?;
    ///
    ///     // wait for the dump to complete
    ///     handle.join().await?;
    ///
    ///     Ok(())
    /// }
    ///
    /// ```
    pub fn dump_bucket(&self) -> crate::operation::dump_bucket::builders::DumpBucketFluentBuilder {
        crate::operation::dump_bucket::builders::DumpBucketFluentBuilder::new(self.handle.clone())
    }

    /// Confirm `bucket` is one of the buckets accessible to the caller.
    pub async fn resolve_bucket(&self, bucket: Option<&str>) -> Result<BucketHandle, Error> {
        crate::operation::resolve_bucket::resolve_bucket(self.config().store(), bucket).await
    }

    /// Build the folder-like structure of every object in `bucket`.
    ///
    /// # Examples
    /// ```no_run
    /// async fn print_structure(client: &s3_bucket_dump::Client) -> Result<(), s3_bucket_dump::error::Error> {
    ///     let tree = client.bucket_structure("my-bucket").await?;
    ///     print!("{tree}");
    ///     Ok(())
    /// }
    /// ```
    pub async fn bucket_structure(&self, bucket: &str) -> Result<KeyTree, Error> {
        let bucket = self.resolve_bucket(Some(bucket)).await?;
        tracing::info!("building structure of {}", bucket.name());
        let keys = self
            .config()
            .store()
            .list_objects(bucket.name(), None)
            .await?;
        Ok(crate::tree::build(keys))
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::storage::in_memory::InMemoryObjectStore;
    use crate::types::ConcurrencySetting;
    use crate::{Client, Config};

    fn client(store: InMemoryObjectStore, concurrency: ConcurrencySetting) -> Client {
        let config = Config::builder()
            .store(store)
            .concurrency(concurrency)
            .build();
        Client::new(config)
    }

    #[test]
    fn test_num_workers() {
        let store = || InMemoryObjectStore::new().bucket("b");
        assert_eq!(5, client(store(), ConcurrencySetting::Auto).handle.num_workers());
        assert_eq!(1, client(store(), ConcurrencySetting::Sequential).handle.num_workers());
        assert_eq!(8, client(store(), ConcurrencySetting::Explicit(8)).handle.num_workers());
        assert_eq!(1, client(store(), ConcurrencySetting::Explicit(0)).handle.num_workers());
        assert!(client(store(), ConcurrencySetting::Sequential).handle.is_sequential());
        assert!(!client(store(), ConcurrencySetting::Explicit(1)).handle.is_sequential());
    }

    #[tokio::test]
    async fn test_bucket_structure() {
        let store = InMemoryObjectStore::new()
            .bucket("alpha")
            .object("docs/readme.txt", "r")
            .object("docs/img/logo.png", "l")
            .object("top.txt", "t");
        let client = client(store, ConcurrencySetting::Auto);

        let tree = client.bucket_structure("alpha").await.unwrap();
        assert_eq!(
            "├── docs\n│   ├── readme.txt\n│   └── img\n│       └── logo.png\n└── top.txt\n",
            crate::tree::render(&tree)
        );
    }

    #[tokio::test]
    async fn test_bucket_structure_unknown_bucket() {
        let store = InMemoryObjectStore::new().bucket("alpha");
        let client = client(store, ConcurrencySetting::Auto);

        let err = client.bucket_structure("gamma").await.unwrap_err();
        assert_eq!(&ErrorKind::BucketNotFound, err.kind());
    }
}
