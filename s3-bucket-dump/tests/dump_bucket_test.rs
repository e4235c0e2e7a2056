/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::error::DisplayErrorContext;
use aws_smithy_mocks_experimental::{mock_client, RuleMode};
use s3_bucket_dump::error::ErrorKind;
use s3_bucket_dump::types::{ConcurrencySetting, FailedTransferPolicy};
use test_common::{relative_path_names, MockBucket};

fn dump_client(bucket: &MockBucket, concurrency: ConcurrencySetting) -> s3_bucket_dump::Client {
    let client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, bucket.rules().as_slice());
    let config = s3_bucket_dump::Config::builder()
        .client(client)
        .concurrency(concurrency)
        .build();
    s3_bucket_dump::Client::new(config)
}

fn sorted(keys: &[&str]) -> Vec<String> {
    let mut keys: Vec<String> = keys.iter().map(|k| (*k).to_owned()).collect();
    keys.sort();
    keys
}

#[tokio::test]
async fn test_dump_whole_bucket() {
    let bucket = MockBucket::builder("test-bucket")
        .other_bucket("another-bucket")
        .key_with_size("root.jpg", 3)
        .key_with_size("photos/2020/October/16/image1.jpg", 12)
        .key_with_size("photos/2022/July/7/image2.jpg", 7)
        .key_with_contents("my photos/summer/beach.jpg", "sand")
        .key_with_size("photos/", 0)
        .build();
    let client = dump_client(&bucket, ConcurrencySetting::Auto);
    let dest = tempfile::tempdir().unwrap();

    let output = client
        .dump_bucket()
        .bucket("test-bucket")
        .destination(dest.path())
        .send()
        .await
        .unwrap()
        .join()
        .await
        .unwrap();

    assert_eq!(4, output.objects_downloaded());
    assert_eq!(vec!["photos/"], output.skipped_keys());
    assert_eq!((3 + 12 + 7 + 4) as u64, output.total_bytes_transferred());
    assert_eq!(
        sorted(&[
            "root.jpg",
            "photos/2020/October/16/image1.jpg",
            "photos/2022/July/7/image2.jpg",
            "my_photos/summer/beach.jpg",
        ]),
        relative_path_names(dest.path()).unwrap()
    );

    let beach = std::fs::read(dest.path().join("my_photos/summer/beach.jpg")).unwrap();
    assert_eq!(bucket.contents("my photos/summer/beach.jpg").unwrap(), beach);
}

#[tokio::test]
async fn test_dump_prefix_keeps_full_key_path() {
    let bucket = MockBucket::builder("test-bucket")
        .prefix("abc/def/")
        .key_with_size("abc/def/image.jpg", 12)
        .key_with_size("abc/def/ghi/xyz.txt", 5)
        .key_with_size("abcd", 5)
        .build();
    let client = dump_client(&bucket, ConcurrencySetting::Explicit(2));
    let dest = tempfile::tempdir().unwrap();

    let output = client
        .dump_bucket()
        .bucket("test-bucket")
        .key_prefix("abc/def")
        .destination(dest.path())
        .send()
        .await
        .unwrap()
        .join()
        .await
        .unwrap();

    assert_eq!(2, output.objects_downloaded());
    assert_eq!(
        sorted(&["abc/def/image.jpg", "abc/def/ghi/xyz.txt"]),
        relative_path_names(dest.path()).unwrap()
    );
}

#[tokio::test]
async fn test_sequential_matches_parallel() {
    let bucket = MockBucket::builder("test-bucket")
        .key_with_size("a/1.txt", 4)
        .key_with_size("a/b/2.txt", 9)
        .key_with_size("c/3.txt", 1)
        .key_with_size("c/", 0)
        .key_with_size("4.txt", 16)
        .build();

    let mut results = Vec::new();
    for concurrency in [
        ConcurrencySetting::Sequential,
        ConcurrencySetting::Explicit(1),
        ConcurrencySetting::Auto,
    ] {
        let client = dump_client(&bucket, concurrency);
        let dest = tempfile::tempdir().unwrap();
        let output = client
            .dump_bucket()
            .bucket("test-bucket")
            .destination(dest.path())
            .send()
            .await
            .unwrap()
            .join()
            .await
            .unwrap();
        results.push((
            relative_path_names(dest.path()).unwrap(),
            output.skipped_keys().to_vec(),
            output.total_bytes_transferred(),
        ));
    }

    assert_eq!(results[0], results[1]);
    assert_eq!(results[0], results[2]);
}

#[tokio::test]
async fn test_unknown_bucket_lists_available_buckets() {
    let bucket = MockBucket::builder("test-bucket")
        .other_bucket("another-bucket")
        .key_with_size("a.txt", 1)
        .build();
    let client = dump_client(&bucket, ConcurrencySetting::Auto);

    let err = client
        .dump_bucket()
        .bucket("missing-bucket")
        .destination("unused")
        .send()
        .await
        .unwrap_err();

    assert_eq!(&ErrorKind::BucketNotFound, err.kind());
    let message = format!("{}", DisplayErrorContext(&err));
    assert!(message.contains("missing-bucket"), "{message}");
    assert!(message.contains("another-bucket"), "{message}");
}

#[tokio::test]
async fn test_missing_bucket_name() {
    let bucket = MockBucket::builder("test-bucket")
        .key_with_size("a.txt", 1)
        .build();
    let client = dump_client(&bucket, ConcurrencySetting::Auto);

    let err = client.dump_bucket().send().await.unwrap_err();
    assert_eq!(&ErrorKind::InputInvalid, err.kind());
    assert!(format!("{}", DisplayErrorContext(&err)).contains("test-bucket"));
}

#[tokio::test]
async fn test_invalid_prefix_reports_available_prefixes() {
    let bucket = MockBucket::builder("test-bucket")
        .prefix("img/")
        .key_with_size("docs/readme.txt", 4)
        .key_with_size("docs/images/logo.png", 4)
        .build();
    let client = dump_client(&bucket, ConcurrencySetting::Auto);
    let dest = tempfile::tempdir().unwrap();

    let err = client
        .dump_bucket()
        .bucket("test-bucket")
        .key_prefix("img")
        .destination(dest.path())
        .send()
        .await
        .unwrap_err();

    assert_eq!(&ErrorKind::InvalidPrefix, err.kind());
    let details = err.invalid_prefix().unwrap();
    assert_eq!("img/", details.prefix());
    assert_eq!(
        vec!["docs", "docs/images"],
        details.available().iter().cloned().collect::<Vec<String>>()
    );

    let message = format!("{}", DisplayErrorContext(&err));
    assert!(message.contains("└── docs\n    └── images\n"), "{message}");
    assert!(relative_path_names(dest.path()).unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_bucket() {
    let bucket = MockBucket::builder("test-bucket").build();
    let client = dump_client(&bucket, ConcurrencySetting::Auto);
    let dest = tempfile::tempdir().unwrap();

    let err = client
        .dump_bucket()
        .bucket("test-bucket")
        .destination(dest.path().join("out"))
        .send()
        .await
        .unwrap_err();

    assert_eq!(&ErrorKind::NoObjectsFound, err.kind());
    assert!(!dest.path().join("out").exists());
}

#[tokio::test]
async fn test_failed_download_policy_continue() {
    let bucket = MockBucket::builder("test-bucket")
        .key_with_size("key1", 12)
        .key_with_size("key2", 7)
        .key_with_error("key3")
        .build();
    let client = dump_client(&bucket, ConcurrencySetting::Auto);
    let dest = tempfile::tempdir().unwrap();

    let output = client
        .dump_bucket()
        .bucket("test-bucket")
        .destination(dest.path())
        .failure_policy(FailedTransferPolicy::Continue)
        .send()
        .await
        .unwrap()
        .join()
        .await
        .unwrap();

    assert_eq!(2, output.objects_downloaded());
    assert_eq!(sorted(&["key1", "key2"]), relative_path_names(dest.path()).unwrap());

    let failures = output.failed_transfers();
    assert_eq!(1, failures.len());
    assert_eq!("key3", failures[0].key());
}

#[tokio::test]
async fn test_failed_download_policy_abort() {
    let bucket = MockBucket::builder("test-bucket")
        .key_with_size("key1", 12)
        .key_with_error("key2")
        .key_with_size("key3", 7)
        .build();
    let client = dump_client(&bucket, ConcurrencySetting::Sequential);
    let dest = tempfile::tempdir().unwrap();

    let err = client
        .dump_bucket()
        .bucket("test-bucket")
        .destination(dest.path())
        .send()
        .await
        .unwrap()
        .join()
        .await
        .unwrap_err();

    assert_eq!(&ErrorKind::ChildOperationFailed, err.kind());
    assert_eq!(sorted(&["key1"]), relative_path_names(dest.path()).unwrap());
}

#[tokio::test]
async fn test_bucket_structure() {
    let bucket = MockBucket::builder("test-bucket")
        .key_with_size("docs/readme.txt", 1)
        .key_with_size("docs/img/logo.png", 1)
        .key_with_size("top.txt", 1)
        .build();
    let client = dump_client(&bucket, ConcurrencySetting::Auto);

    let tree = client.bucket_structure("test-bucket").await.unwrap();
    assert_eq!(
        "├── docs\n│   ├── readme.txt\n│   └── img\n│       └── logo.png\n└── top.txt\n",
        tree.to_string()
    );
}
