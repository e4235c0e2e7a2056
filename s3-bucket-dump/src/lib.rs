/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/* Automatically managed default lints */
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
/* End of automatically managed default lints */
#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

//! Download an entire Amazon S3 bucket, or everything under a prefix, into a local
//! directory that mirrors the object key hierarchy.
//!
//! Objects are listed up front and then downloaded either one at a time or across a
//! fixed size pool of workers.
//!
//! # Examples
//!
//! Dump a bucket to a local directory:
//!
//! ```no_run
//! # async fn example() -> Result<(), s3_bucket_dump::error::Error> {
//! let config = s3_bucket_dump::from_env().load().await;
//! let client = s3_bucket_dump::Client::new(config);
//!
//! let handle = client
//!     .dump_bucket()
//!     .bucket("my-bucket")
//!     .destination("/tmp/my-bucket")
//!     .send()
//!     .await?;
//!
//! // wait for the dump to complete
//! let output = handle.join().await?;
//! println!("downloaded {} objects", output.objects_downloaded());
//! # Ok(())
//! # }
//! ```
//!
//! Print the folder-like structure of a bucket:
//!
//! ```no_run
//! # async fn example() -> Result<(), s3_bucket_dump::error::Error> {
//! let config = s3_bucket_dump::from_env().load().await;
//! let client = s3_bucket_dump::Client::new(config);
//!
//! let tree = client.bucket_structure("my-bucket").await?;
//! print!("{}", s3_bucket_dump::tree::render(&tree));
//! # Ok(())
//! # }
//! ```

/// Default number of download workers
pub(crate) const DEFAULT_CONCURRENCY: usize = 5;

/// Separator between the path segments of an object key
pub(crate) const DEFAULT_DELIMITER: &str = "/";

/// Error types emitted by `s3-bucket-dump`
pub mod error;

/// Common types used by `s3-bucket-dump`
pub mod types;

/// Folder-like tree built from object keys
pub mod tree;

/// Storage backends the client talks to
pub mod storage;

/// Bucket dump client
pub mod client;

/// Bucket dump operations
pub mod operation;

/// Client configuration
pub mod config;

pub use self::client::Client;
use self::config::loader::ConfigLoader;
pub use self::config::Config;

/// Create a config loader
pub fn from_env() -> ConfigLoader {
    ConfigLoader::default()
}
