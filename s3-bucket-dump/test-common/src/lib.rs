/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::{
    operation::{
        get_object::GetObjectOutput, list_buckets::ListBucketsOutput,
        list_objects_v2::ListObjectsV2Output,
    },
    primitives::ByteStream,
    types::{Bucket, Object},
};
use aws_smithy_mocks_experimental::{mock, Rule};
use aws_smithy_runtime_api::{client::orchestrator::HttpResponse, http::StatusCode};
use bytes::Bytes;
use std::{io, iter, path::Path, sync::Arc};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
struct MockObject {
    key: String,
    contents: Bytes,
    error_on_get: bool,
}

impl MockObject {
    /// Create a new mock object with the given key and contents
    fn new(key: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            contents: data.into(),
            error_on_get: false,
        }
    }

    /// Create a new mock object with the given key and content size using random data
    fn new_random(key: impl Into<String>, size: usize) -> Self {
        let data: String = iter::repeat_with(fastrand::alphanumeric)
            .take(size)
            .collect();
        Self::new(key, data)
    }

    /// Create a new mock object that fails when `get_object` is invoked on it
    fn new_with_error(key: impl Into<String>) -> Self {
        let mut obj = Self::new_random(key, 10);
        obj.error_on_get = true;
        obj
    }

    fn listing_entry(&self) -> Object {
        Object::builder()
            .key(&self.key)
            .size(self.contents.len() as i64)
            .build()
    }

    /// Get the output for the `get_object` invocation
    fn get_object_output(&self) -> GetObjectOutput {
        assert!(!self.error_on_get, "mock object expects error");
        GetObjectOutput::builder()
            .body(ByteStream::from(self.contents.clone()))
            .content_length(self.contents.len() as i64)
            .build()
    }
}

fn get_object_error_http_resp() -> HttpResponse {
    HttpResponse::new(StatusCode::try_from(500).unwrap(), Bytes::new().into())
}

/// Get the mock rule for this object when `get_object` is API is invoked for the corresponding key
fn get_object_rule(mobj: &MockObject) -> Rule {
    let share1 = Arc::new(mobj.clone());
    let share2 = share1.clone();

    if mobj.error_on_get {
        mock!(aws_sdk_s3::Client::get_object)
            .match_requests(move |r| r.key() == Some(share1.key.as_str()))
            .then_http_response(get_object_error_http_resp)
    } else {
        mock!(aws_sdk_s3::Client::get_object)
            .match_requests(move |r| r.key() == Some(share1.key.as_str()))
            .then_output(move || share2.get_object_output())
    }
}

fn list_objects_output<'a>(objects: impl Iterator<Item = &'a MockObject>) -> ListObjectsV2Output {
    ListObjectsV2Output::builder()
        .set_contents(Some(objects.map(MockObject::listing_entry).collect()))
        .build()
}

/// Mock bucket with the set of objects for testing bucket dumps.
///
/// NOTE: Every listing is answered with a single `ListObjectsV2` page. Only the prefixes
/// registered with [`MockBucketBuilder::prefix`] are answered for prefixed listings.
#[derive(Debug)]
pub struct MockBucket {
    name: String,
    other_buckets: Vec<String>,
    prefixes: Vec<String>,
    objects: Vec<MockObject>,
}

impl MockBucket {
    /// Create a new builder for a bucket named `name`
    pub fn builder(name: impl Into<String>) -> MockBucketBuilder {
        MockBucketBuilder {
            name: name.into(),
            other_buckets: Vec::new(),
            prefixes: Vec::new(),
            objects: Vec::new(),
        }
    }

    /// Contents of `key`, if present
    pub fn contents(&self, key: &str) -> Option<Bytes> {
        self.objects
            .iter()
            .find(|o| o.key == key)
            .map(|o| o.contents.clone())
    }

    /// Return the mock rules representing this bucket. This includes the `ListBuckets`
    /// call, the `ListObjectsV2` calls, and all of the `GetObject` calls.
    pub fn rules(&self) -> Vec<Rule> {
        let buckets = iter::once(&self.name)
            .chain(self.other_buckets.iter())
            .map(|name| Bucket::builder().name(name).build())
            .collect();
        let list_buckets_output = ListBucketsOutput::builder()
            .set_buckets(Some(buckets))
            .build();
        let list_buckets_rule = mock!(aws_sdk_s3::Client::list_buckets)
            .then_output(move || list_buckets_output.clone());

        let mut rules = vec![list_buckets_rule];

        for prefix in &self.prefixes {
            let output =
                list_objects_output(self.objects.iter().filter(|o| o.key.starts_with(prefix)));
            let prefix = prefix.clone();
            rules.push(
                mock!(aws_sdk_s3::Client::list_objects_v2)
                    .match_requests(move |r| r.prefix() == Some(prefix.as_str()))
                    .then_output(move || output.clone()),
            );
        }

        let list_all_output = list_objects_output(self.objects.iter());
        rules.push(
            mock!(aws_sdk_s3::Client::list_objects_v2)
                .match_requests(|r| r.prefix().is_none())
                .then_output(move || list_all_output.clone()),
        );

        rules.extend(self.objects.iter().map(get_object_rule));
        rules
    }
}

/// Builder for [`MockBucket`]
#[derive(Debug)]
pub struct MockBucketBuilder {
    name: String,
    other_buckets: Vec<String>,
    prefixes: Vec<String>,
    objects: Vec<MockObject>,
}

impl MockBucketBuilder {
    /// Another bucket returned by `ListBuckets`, without any objects
    pub fn other_bucket(mut self, name: impl Into<String>) -> Self {
        self.other_buckets.push(name.into());
        self
    }

    /// Answer `ListObjectsV2` requests for this exact prefix
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Create a new key with the given contents
    pub fn key_with_contents(mut self, key: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.objects.push(MockObject::new(key, data));
        self
    }

    /// Create a new key with the given content size using random data
    pub fn key_with_size(mut self, key: impl Into<String>, size: usize) -> Self {
        self.objects.push(MockObject::new_random(key, size));
        self
    }

    /// Create a new key that returns an error when `get_object` API operation is invoked
    pub fn key_with_error(mut self, key: impl Into<String>) -> Self {
        self.objects.push(MockObject::new_with_error(key));
        self
    }

    /// Consume the builder and build a `MockBucket`
    pub fn build(self) -> MockBucket {
        MockBucket {
            name: self.name,
            other_buckets: self.other_buckets,
            prefixes: self.prefixes,
            objects: self.objects,
        }
    }
}

/// Walk the directory rooted at `dir` and gather all of the relative path filenames (sans
/// directory names), sorted
pub fn relative_path_names(dir: &Path) -> Result<Vec<String>, io::Error> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        paths.push(relative.to_string_lossy().into_owned());
    }

    paths.sort();
    Ok(paths)
}
