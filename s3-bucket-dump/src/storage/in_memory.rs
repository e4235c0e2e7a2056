/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! In-memory implementation of the ObjectStore trait for unit tests.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, ErrorKind};
use crate::storage::ObjectStore;

/// Buckets of objects held in memory. Keys are listed in insertion order.
#[derive(Debug, Default)]
pub(crate) struct InMemoryObjectStore {
    buckets: Vec<(String, Vec<(String, Vec<u8>)>)>,
    failing_keys: HashSet<String>,
    list_buckets_failure: Option<ErrorKind>,
    download_delay: Option<Duration>,
    downloads: Mutex<Vec<String>>,
    list_calls: AtomicUsize,
}

impl InMemoryObjectStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn bucket(mut self, name: &str) -> Self {
        self.buckets.push((name.to_owned(), Vec::new()));
        self
    }

    /// Add an object to the most recently added bucket
    pub(crate) fn object(mut self, key: &str, data: &str) -> Self {
        let (_, objects) = self
            .buckets
            .last_mut()
            .expect("add a bucket before adding objects");
        objects.push((key.to_owned(), data.as_bytes().to_vec()));
        self
    }

    /// Add an object to the most recently added bucket that fails to download
    pub(crate) fn failing_object(mut self, key: &str) -> Self {
        self = self.object(key, "");
        self.failing_keys.insert(key.to_owned());
        self
    }

    /// Fail every `list_buckets` call with an error of `kind`
    pub(crate) fn failing_list_buckets(mut self, kind: ErrorKind) -> Self {
        self.list_buckets_failure = Some(kind);
        self
    }

    pub(crate) fn download_delay(mut self, delay: Duration) -> Self {
        self.download_delay = Some(delay);
        self
    }

    /// Keys passed to `download_object` so far, in call order
    pub(crate) fn downloaded_keys(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn objects(&self, bucket: &str) -> Result<&[(String, Vec<u8>)], Error> {
        self.buckets
            .iter()
            .find(|(name, _)| name == bucket)
            .map(|(_, objects)| objects.as_slice())
            .ok_or_else(|| Error::new(ErrorKind::NotFound, format!("no such bucket: {bucket}")))
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn list_buckets(&self) -> Result<Vec<String>, Error> {
        if let Some(kind) = &self.list_buckets_failure {
            return Err(Error::new(kind.clone(), "injected failure listing buckets"));
        }
        Ok(self.buckets.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn list_objects(&self, bucket: &str, prefix: Option<&str>) -> Result<Vec<String>, Error> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let prefix = prefix.unwrap_or("");
        Ok(self
            .objects(bucket)?
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn download_object(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64, Error> {
        self.downloads.lock().unwrap().push(key.to_owned());
        if let Some(delay) = self.download_delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing_keys.contains(key) {
            return Err(Error::new(
                ErrorKind::ChildOperationFailed,
                format!("injected failure for {key}"),
            ));
        }

        let objects: HashMap<&str, &Vec<u8>> = self
            .objects(bucket)?
            .iter()
            .map(|(k, data)| (k.as_str(), data))
            .collect();
        let data = objects
            .get(key)
            .ok_or_else(|| Error::new(ErrorKind::NotFound, format!("no such key: {key}")))?;

        tokio::fs::write(dest, data.as_slice()).await?;
        Ok(data.len() as u64)
    }
}
