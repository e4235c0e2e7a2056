/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{self, Duration};

use aws_sdk_s3::error::DisplayErrorContext;
use clap::{CommandFactory, Parser};
use s3_bucket_dump::error::Error;
use s3_bucket_dump::operation::dump_bucket::DumpProgress;
use s3_bucket_dump::types::{ConcurrencySetting, FailedTransferPolicy};
use tracing_subscriber::EnvFilter;

const ONE_MEGABYTE: u64 = 1000 * 1000;

const PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "s3-bucket-dump")]
#[command(about = "Downloads every object of an S3 bucket, or of a prefix, into a local directory.")]
struct Args {
    /// Bucket to download
    #[arg(long, env = "BUCKET_NAME")]
    bucket: Option<String>,

    /// Local directory to download into [default: the bucket name]
    #[arg(long)]
    destination: Option<PathBuf>,

    /// Only download objects under this folder-like prefix
    #[arg(long)]
    prefix: Option<String>,

    /// Number of concurrent downloads [default: 5]
    #[arg(long, conflicts_with = "sequential")]
    concurrency: Option<usize>,

    /// Download objects one at a time, in listing order
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    sequential: bool,

    /// Keep going when an object fails to download and report failures at the end
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    continue_on_failure: bool,

    /// AWS region of the bucket
    #[arg(long, env = "AWS_DEFAULT_REGION")]
    region: Option<String>,

    /// Named profile to load credentials from
    #[arg(long, env = "PROFILE_NAME")]
    profile: Option<String>,

    /// Access key id, used together with the secret access key
    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    access_key_id: Option<String>,

    /// Secret access key, used together with the access key id
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    secret_access_key: Option<String>,

    /// Print the folder structure of the bucket instead of downloading it
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    print_structure: bool,
}

impl Args {
    fn concurrency_setting(&self) -> ConcurrencySetting {
        match (self.sequential, self.concurrency) {
            (true, _) => ConcurrencySetting::Sequential,
            (false, Some(n)) => ConcurrencySetting::Explicit(n),
            (false, None) => ConcurrencySetting::Auto,
        }
    }

    fn failure_policy(&self) -> FailedTransferPolicy {
        if self.continue_on_failure {
            FailedTransferPolicy::Continue
        } else {
            FailedTransferPolicy::Abort
        }
    }
}

fn invalid_arg(message: &str) -> ! {
    Args::command()
        .error(clap::error::ErrorKind::InvalidValue, message)
        .exit()
}

async fn client(args: &Args) -> s3_bucket_dump::Client {
    let mut loader = s3_bucket_dump::from_env().concurrency(args.concurrency_setting());
    if let Some(region) = &args.region {
        loader = loader.region(region);
    }
    if let Some(profile) = &args.profile {
        loader = loader.profile_name(profile);
    }
    match (&args.access_key_id, &args.secret_access_key) {
        (Some(id), Some(secret)) => loader = loader.access_key(id, secret),
        (None, None) => {}
        _ => invalid_arg("--access-key-id and --secret-access-key must be given together"),
    }

    s3_bucket_dump::Client::new(loader.load().await)
}

async fn do_print_structure(args: Args, client: s3_bucket_dump::Client) -> Result<(), Error> {
    // an empty name fails listing the available buckets
    let bucket = args.bucket.as_deref().unwrap_or_default();
    let tree = client.bucket_structure(bucket).await?;
    print!("{tree}");
    Ok(())
}

async fn do_dump(args: Args, client: s3_bucket_dump::Client) -> Result<(), Error> {
    let start = time::Instant::now();
    let handle = client
        .dump_bucket()
        .set_bucket(args.bucket.clone())
        .set_destination(args.destination.clone())
        .set_key_prefix(args.prefix.clone())
        .failure_policy(args.failure_policy())
        .send()
        .await?;

    let cancel = handle.cancellation_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, waiting for in-flight downloads to finish");
            cancel.cancel();
        }
    });
    let reporter = tokio::spawn(report_progress(handle.progress()));

    let result = handle.join().await;
    interrupt.abort();
    reporter.abort();
    let output = result?;

    for failed in output.failed_transfers() {
        tracing::error!(
            "failed to download {:?}: {}",
            failed.key(),
            DisplayErrorContext(failed.error())
        );
    }

    let elapsed = start.elapsed();
    let transfer_size_bytes = output.total_bytes_transferred();
    let transfer_size_megabytes = transfer_size_bytes as f64 / ONE_MEGABYTE as f64;
    let transfer_size_megabits = transfer_size_megabytes * 8f64;

    tracing::info!(
        "downloaded {} objects totalling {transfer_size_bytes} bytes ({transfer_size_megabytes} MB) in {elapsed:?}; Mb/s: {}",
        output.objects_downloaded(),
        transfer_size_megabits / elapsed.as_secs_f64(),
    );
    Ok(())
}

async fn report_progress(progress: DumpProgress) {
    let mut interval = tokio::time::interval(PROGRESS_INTERVAL);
    // first tick completes immediately
    interval.tick().await;
    while !progress.is_complete() {
        interval.tick().await;
        tracing::info!("progress: {progress}");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_thread_ids(true)
        .init();

    let client = client(&args).await;
    let result = if args.print_structure {
        do_print_structure(args, client).await
    } else {
        do_dump(args, client).await
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("bucket dump failed: {}", DisplayErrorContext(&err));
            ExitCode::FAILURE
        }
    }
}
