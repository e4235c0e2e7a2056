/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::{
    error::SdkError,
    operation::list_objects_v2::{ListObjectsV2Error, ListObjectsV2Output},
};
use aws_smithy_runtime_api::http::Response;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, ErrorKind};

use super::ObjectStore;

/// [`ObjectStore`] backed by Amazon S3.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    /// Create a store that sends requests with the given S3 client
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    /// The Amazon S3 client instance used to send requests to S3.
    pub fn client(&self) -> &aws_sdk_s3::Client {
        &self.client
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_buckets(&self) -> Result<Vec<String>, Error> {
        let mut names = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let output = self
                .client
                .list_buckets()
                .set_continuation_token(next_token.take())
                .send()
                .await?;

            names.extend(
                output
                    .buckets()
                    .iter()
                    .filter_map(|bucket| bucket.name().map(str::to_owned)),
            );

            match output.continuation_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_owned()),
                _ => break,
            }
        }
        Ok(names)
    }

    async fn list_objects(&self, bucket: &str, prefix: Option<&str>) -> Result<Vec<String>, Error> {
        let mut paginator = ListObjectsPaginator::new(self.client.clone(), bucket, prefix);
        let mut keys = Vec::new();
        while let Some(page) = paginator.next_page().await {
            let page = page?;
            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|obj| obj.key().map(str::to_owned)),
            );
        }
        tracing::trace!("listed {} keys from {bucket} (prefix: {prefix:?})", keys.len());
        Ok(keys)
    }

    async fn download_object(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64, Error> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;

        let mut body = output.body;
        let mut file = fs::File::create(dest).await?;
        let mut written: u64 = 0;
        while let Some(bytes) = body
            .try_next()
            .await
            .map_err(|err| Error::new(ErrorKind::IOError, err))?
        {
            file.write_all(&bytes).await?;
            written += bytes.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }
}

/// Paginator for the `ListObjectsV2` operation following continuation tokens until the
/// listing is exhausted.
#[derive(Debug)]
struct ListObjectsPaginator {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: Option<String>,
    state: Option<State>,
}

#[derive(Debug, PartialEq)]
enum State {
    Paginating { next_token: Option<String> },
    Done,
}

impl State {
    fn next_state(self, output: &ListObjectsV2Output) -> State {
        let is_truncated =
            output.is_truncated().unwrap_or(false) && output.next_continuation_token().is_some();

        match self {
            // more results
            State::Paginating { .. } if is_truncated => State::Paginating {
                next_token: output.next_continuation_token.to_owned(),
            },
            State::Paginating { .. } => State::Done,
            State::Done => self,
        }
    }
}

impl ListObjectsPaginator {
    fn new(client: aws_sdk_s3::Client, bucket: &str, prefix: Option<&str>) -> Self {
        Self {
            client,
            bucket: bucket.to_owned(),
            prefix: prefix.map(str::to_owned),
            state: Some(State::Paginating { next_token: None }),
        }
    }

    async fn next_page(
        &mut self,
    ) -> Option<Result<ListObjectsV2Output, SdkError<ListObjectsV2Error, Response>>> {
        let next_token = match self.state.as_ref()? {
            State::Done => return None,
            State::Paginating { next_token } => next_token.clone(),
        };

        let list_result = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .set_prefix(self.prefix.clone())
            .set_continuation_token(next_token)
            .send()
            .await;

        match list_result {
            Ok(output) => {
                let next_state = self.state.take().map(|prev| prev.next_state(&output));
                self.state = next_state;
                Some(Ok(output))
            }
            Err(err) => {
                // a failed page ends the listing
                self.state = Some(State::Done);
                Some(Err(err))
            }
        }
    }
}
