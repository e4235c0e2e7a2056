/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::BTreeSet;
use std::fmt;

use aws_sdk_s3::error::ProvideErrorMetadata;

/// A boxed error that is `Send` and `Sync`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by this library
///
/// NOTE: Use [`aws_smithy_types::error::display::DisplayErrorContext`] or similar to display
/// the entire error cause/source chain.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: BoxError,
}

/// General categories of errors.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Operation input or configuration is invalid (e.g. no bucket name was given)
    InputInvalid,

    /// The requested bucket is not one of the buckets accessible to the caller
    BucketNotFound,

    /// The requested prefix matched no objects but other prefixes exist in the bucket
    InvalidPrefix,

    /// The bucket contains no objects
    NoObjectsFound,

    /// I/O errors
    IOError,

    /// Some kind of internal runtime issue (e.g. task failure)
    RuntimeError,

    /// Resource not found (e.g. bucket or key vanished between listing and download)
    NotFound,

    /// child operation failed (e.g. download of a single object as part of dumping a bucket)
    ChildOperationFailed,

    /// The operation is being cancelled because of an interrupt, or because a child
    /// operation failed with the abort policy.
    OperationCancelled,
}

impl Error {
    /// Creates a new [`Error`] from a known kind of error as well as an arbitrary error
    /// source.
    pub fn new<E>(kind: ErrorKind, err: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            kind,
            source: err.into(),
        }
    }

    /// Returns the corresponding [`ErrorKind`] for this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Details about an [`ErrorKind::InvalidPrefix`] error, `None` for any other kind.
    pub fn invalid_prefix(&self) -> Option<&InvalidPrefix> {
        self.source.downcast_ref::<InvalidPrefix>()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::InputInvalid => write!(f, "invalid input"),
            ErrorKind::BucketNotFound => write!(f, "bucket not found"),
            ErrorKind::InvalidPrefix => write!(f, "invalid prefix"),
            ErrorKind::NoObjectsFound => write!(f, "no objects found"),
            ErrorKind::IOError => write!(f, "I/O error"),
            ErrorKind::RuntimeError => write!(f, "runtime error"),
            ErrorKind::NotFound => write!(f, "resource not found"),
            ErrorKind::ChildOperationFailed => write!(f, "child operation failed"),
            ErrorKind::OperationCancelled => write!(f, "operation cancelled"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::new(ErrorKind::IOError, value)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::new(ErrorKind::RuntimeError, value)
    }
}

impl From<aws_smithy_types::error::operation::BuildError> for Error {
    fn from(value: aws_smithy_types::error::operation::BuildError) -> Self {
        Self::new(ErrorKind::InputInvalid, value)
    }
}

impl<E, R> From<aws_sdk_s3::error::SdkError<E, R>> for Error
where
    E: std::error::Error + ProvideErrorMetadata + Send + Sync + 'static,
    R: Send + Sync + fmt::Debug + 'static,
{
    fn from(value: aws_sdk_s3::error::SdkError<E, R>) -> Self {
        let kind = match value.code() {
            Some("NotFound" | "NoSuchKey" | "NoSuchBucket") => ErrorKind::NotFound,
            _ => ErrorKind::ChildOperationFailed,
        };

        Error::new(kind, value)
    }
}

/// Details of a prefix that matched no objects in a bucket that does contain other
/// prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPrefix {
    prefix: String,
    bucket: String,
    available: BTreeSet<String>,
}

impl InvalidPrefix {
    pub(crate) fn new(
        prefix: impl Into<String>,
        bucket: impl Into<String>,
        available: BTreeSet<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            bucket: bucket.into(),
            available,
        }
    }

    /// The prefix that was requested
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The bucket that was searched
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Folder-like prefixes that do exist in the bucket
    pub fn available(&self) -> &BTreeSet<String> {
        &self.available
    }
}

impl fmt::Display for InvalidPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = crate::tree::build(&self.available);
        write!(
            f,
            "{:?} was not found in {}. Available: {:?}\n\n{}",
            self.prefix,
            self.bucket,
            self.available,
            crate::tree::render(&tree)
        )
    }
}

impl std::error::Error for InvalidPrefix {}

pub(crate) fn invalid_input<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::InputInvalid, err)
}

pub(crate) fn bucket_not_found(bucket: &str, available: &[String]) -> Error {
    Error::new(
        ErrorKind::BucketNotFound,
        format!("{bucket} was not found among the accessible buckets. Available: {available:?}"),
    )
}

pub(crate) fn no_objects_found(bucket: &str) -> Error {
    Error::new(
        ErrorKind::NoObjectsFound,
        format!("no objects found in {bucket}"),
    )
}

static CANCELLATION_ERROR: &str =
    "the dump was interrupted or a download failed, no new objects will be downloaded";

pub(crate) fn operation_cancelled() -> Error {
    Error::new(ErrorKind::OperationCancelled, CANCELLATION_ERROR)
}
