/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_config::retry::RetryConfig;
use aws_sdk_s3::config::Credentials;
use aws_types::region::Region;

use crate::config::Builder;
use crate::{types::ConcurrencySetting, Config};

/// Maximum attempts the SDK makes for a single request
const MAX_ATTEMPTS: u32 = 10;

/// Load [`Config`] from the environment.
///
/// Region, profile and credentials left unset here are resolved by the default AWS
/// provider chains (environment variables, shared config files, instance metadata, ...).
#[derive(Default, Debug)]
pub struct ConfigLoader {
    builder: Builder,
    region: Option<String>,
    profile_name: Option<String>,
    credentials: Option<Credentials>,
}

impl ConfigLoader {
    /// Set the concurrency used to download objects.
    ///
    /// Default is [ConcurrencySetting::Auto].
    pub fn concurrency(mut self, concurrency: ConcurrencySetting) -> Self {
        self.builder = self.builder.concurrency(concurrency);
        self
    }

    /// Override the AWS region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Load credentials and region from this named profile.
    pub fn profile_name(mut self, profile_name: impl Into<String>) -> Self {
        self.profile_name = Some(profile_name.into());
        self
    }

    /// Use static access key credentials instead of the default credentials chain.
    pub fn access_key(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "s3-bucket-dump",
        ));
        self
    }

    /// Load the default configuration
    ///
    /// If fields have been overridden during builder construction, the override values will be
    /// used. Otherwise, the default values for each field will be provided.
    pub async fn load(self) -> Config {
        let mut loader =
            aws_config::from_env().retry_config(RetryConfig::standard().with_max_attempts(MAX_ATTEMPTS));
        if let Some(region) = self.region {
            loader = loader.region(Region::new(region));
        }
        if let Some(profile_name) = self.profile_name {
            loader = loader.profile_name(profile_name);
        }
        if let Some(credentials) = self.credentials {
            loader = loader.credentials_provider(credentials);
        }

        let shared_config = loader.load().await;
        let s3_client = aws_sdk_s3::Client::new(&shared_config);
        self.builder.client(s3_client).build()
    }
}
