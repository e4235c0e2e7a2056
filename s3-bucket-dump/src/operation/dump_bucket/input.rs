/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::types::FailedTransferPolicy;
use aws_smithy_types::error::operation::BuildError;

use std::path::{Path, PathBuf};

/// Input type for dumping a bucket
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct DumpBucketInput {
    /// The bucket to dump. Checked against the buckets accessible to the caller.
    pub bucket: Option<String>,

    /// The local directory objects are written into. Defaults to the bucket name.
    pub destination: Option<PathBuf>,

    /// Only dump keys under this folder-like prefix
    pub key_prefix: Option<String>,

    /// The failure policy to use when any individual object download fails.
    pub failure_policy: FailedTransferPolicy,
}

impl DumpBucketInput {
    /// Creates a new builder-style object to manufacture [`DumpBucketInput`](crate::operation::dump_bucket::DumpBucketInput).
    pub fn builder() -> DumpBucketInputBuilder {
        DumpBucketInputBuilder::default()
    }

    /// The bucket to dump.
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// The local directory objects are written into
    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    /// Only dump keys under this folder-like prefix
    pub fn key_prefix(&self) -> Option<&str> {
        self.key_prefix.as_deref()
    }

    /// The failure policy to use when any individual object download fails.
    pub fn failure_policy(&self) -> &FailedTransferPolicy {
        &self.failure_policy
    }
}

/// A builder for [`DumpBucketInput`](crate::operation::dump_bucket::DumpBucketInput).
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub struct DumpBucketInputBuilder {
    pub(crate) bucket: Option<String>,
    pub(crate) destination: Option<PathBuf>,
    pub(crate) key_prefix: Option<String>,
    pub(crate) failure_policy: FailedTransferPolicy,
}

impl DumpBucketInputBuilder {
    /// Set the bucket to dump.
    ///
    /// NOTE: A bucket name is required. Without one the dump fails listing the
    /// available buckets.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.bucket = Some(input.into());
        self
    }

    /// Set the bucket to dump.
    pub fn set_bucket(mut self, input: Option<String>) -> Self {
        self.bucket = input;
        self
    }

    /// The bucket to dump.
    pub fn get_bucket(&self) -> &Option<String> {
        &self.bucket
    }

    /// Set the local directory objects are written into.
    ///
    /// Created if missing. Defaults to a directory named after the bucket in the
    /// current working directory.
    pub fn destination(mut self, input: impl Into<PathBuf>) -> Self {
        self.destination = Some(input.into());
        self
    }

    /// Set the local directory objects are written into.
    pub fn set_destination(mut self, input: Option<PathBuf>) -> Self {
        self.destination = input;
        self
    }

    /// The local directory objects are written into
    pub fn get_destination(&self) -> &Option<PathBuf> {
        &self.destination
    }

    /// Only dump keys under this folder-like prefix.
    ///
    /// A trailing `/` is added if missing, so `img` never matches `images/...`.
    pub fn key_prefix(mut self, input: impl Into<String>) -> Self {
        self.key_prefix = Some(input.into());
        self
    }

    /// Only dump keys under this folder-like prefix.
    pub fn set_key_prefix(mut self, input: Option<String>) -> Self {
        self.key_prefix = input;
        self
    }

    /// Only dump keys under this folder-like prefix
    pub fn get_key_prefix(&self) -> &Option<String> {
        &self.key_prefix
    }

    /// The failure policy to use when any individual object download fails.
    pub fn failure_policy(mut self, input: FailedTransferPolicy) -> Self {
        self.failure_policy = input;
        self
    }

    /// The failure policy to use when any individual object download fails.
    pub fn get_failure_policy(&self) -> &FailedTransferPolicy {
        &self.failure_policy
    }

    /// Consumes the builder and constructs a [`DumpBucketInput`](crate::operation::dump_bucket::DumpBucketInput).
    ///
    /// Bucket existence is checked when the operation is sent, not here.
    pub fn build(self) -> Result<DumpBucketInput, BuildError> {
        if matches!(&self.destination, Some(dest) if dest.as_os_str().is_empty()) {
            return Err(BuildError::invalid_field(
                "destination",
                "destination must not be empty",
            ));
        }

        Ok(DumpBucketInput {
            bucket: self.bucket,
            destination: self.destination,
            key_prefix: self.key_prefix,
            failure_policy: self.failure_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::DumpBucketInput;
    use crate::types::FailedTransferPolicy;

    #[test]
    fn test_defaults() {
        let input = DumpBucketInput::builder().bucket("alpha").build().unwrap();
        assert_eq!(Some("alpha"), input.bucket());
        assert!(input.destination().is_none());
        assert!(input.key_prefix().is_none());
        assert_eq!(&FailedTransferPolicy::Abort, input.failure_policy());
    }

    #[test]
    fn test_empty_destination_rejected() {
        let err = DumpBucketInput::builder()
            .bucket("alpha")
            .destination("")
            .build()
            .unwrap_err();
        assert!(format!("{err}").contains("destination"));
    }
}
