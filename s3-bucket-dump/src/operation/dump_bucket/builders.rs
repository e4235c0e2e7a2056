/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::{error::Error, types::FailedTransferPolicy};
use std::{path::PathBuf, sync::Arc};

use super::{DumpBucketHandle, DumpBucketInputBuilder};

/// Fluent builder for constructing a bucket dump
#[derive(Debug)]
pub struct DumpBucketFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: DumpBucketInputBuilder,
}

impl DumpBucketFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: ::std::default::Default::default(),
        }
    }

    /// Resolve the bucket, list its keys and start downloading them.
    ///
    /// Bucket and listing failures are returned here, download failures by
    /// [`DumpBucketHandle::join`].
    pub async fn send(self) -> Result<DumpBucketHandle, Error> {
        let input = self.inner.build()?;
        crate::operation::dump_bucket::DumpBucket::orchestrate(self.handle, input).await
    }

    /// Set the bucket to dump.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.bucket(input);
        self
    }

    /// Set the bucket to dump.
    pub fn set_bucket(mut self, input: Option<String>) -> Self {
        self.inner = self.inner.set_bucket(input);
        self
    }

    /// The bucket to dump.
    pub fn get_bucket(&self) -> &Option<String> {
        self.inner.get_bucket()
    }

    /// Set the local directory objects are written into
    pub fn destination(mut self, input: impl Into<PathBuf>) -> Self {
        self.inner = self.inner.destination(input);
        self
    }

    /// Set the local directory objects are written into
    pub fn set_destination(mut self, input: Option<PathBuf>) -> Self {
        self.inner = self.inner.set_destination(input);
        self
    }

    /// The local directory objects are written into
    pub fn get_destination(&self) -> &Option<PathBuf> {
        self.inner.get_destination()
    }

    /// Only dump keys under this folder-like prefix
    pub fn key_prefix(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.key_prefix(input);
        self
    }

    /// Only dump keys under this folder-like prefix
    pub fn set_key_prefix(mut self, input: Option<String>) -> Self {
        self.inner = self.inner.set_key_prefix(input);
        self
    }

    /// Only dump keys under this folder-like prefix
    pub fn get_key_prefix(&self) -> &Option<String> {
        self.inner.get_key_prefix()
    }

    /// The failure policy to use when any individual object download fails.
    pub fn failure_policy(mut self, input: FailedTransferPolicy) -> Self {
        self.inner = self.inner.failure_policy(input);
        self
    }

    /// The failure policy to use when any individual object download fails.
    pub fn get_failure_policy(&self) -> &FailedTransferPolicy {
        self.inner.get_failure_policy()
    }
}

impl crate::operation::dump_bucket::input::DumpBucketInputBuilder {
    /// Initiate a bucket dump with this input using the given client.
    pub async fn send_with(self, client: &crate::Client) -> Result<DumpBucketHandle, Error> {
        let mut fluent_builder = client.dump_bucket();
        fluent_builder.inner = self;
        fluent_builder.send().await
    }
}
