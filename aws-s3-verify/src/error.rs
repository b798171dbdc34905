/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use aws_sdk_s3::error::ProvideErrorMetadata;

/// A boxed error that is `Send` and `Sync`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by this library
///
/// A checksum mismatch is NOT an error, it is reported through
/// [`VerificationOutcome`](crate::operation::verify::VerificationOutcome).
/// An `Error` means the comparison could not be performed.
///
/// NOTE: Use [`aws_smithy_types::error::display::DisplayErrorContext`] or similar to display
/// the entire error cause/source chain.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: BoxError,
}

/// General categories of verification errors.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Operation input validation issues
    InputInvalid,

    /// I/O errors while reading local data
    IOError,

    /// Resource not found (e.g. bucket, key or version not found)
    NotFound,

    /// The checksum descriptor could not be retrieved from S3
    DescriptorUnavailable,

    /// The checksum descriptor has an unexpected shape (no checksum, truncated or
    /// out of order part listing, etc). The comparison cannot be performed.
    MalformedDescriptor,

    /// The object was uploaded with a checksum algorithm that is not supported
    UnsupportedAlgorithm,

    /// The size of the local data does not match the size of the object
    ObjectSizeMismatch(SizeMismatch),
}

/// Sizes involved in an [`ErrorKind::ObjectSizeMismatch`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SizeMismatch {
    object_size: u64,
    local_size: u64,
}

impl SizeMismatch {
    pub(crate) fn new(object_size: u64, local_size: u64) -> Self {
        Self {
            object_size,
            local_size,
        }
    }

    /// The size of the S3 object in bytes
    pub fn object_size(&self) -> u64 {
        self.object_size
    }

    /// The size of the local data in bytes
    pub fn local_size(&self) -> u64 {
        self.local_size
    }
}

impl Error {
    /// Creates a new verification [`Error`] from a known kind of error as well as an arbitrary error
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

    /// True when the object carries no checksum that can be verified at all, as
    /// opposed to a descriptor with a broken part listing.
    pub fn is_missing_checksum(&self) -> bool {
        self.kind == ErrorKind::MalformedDescriptor
            && self.source.downcast_ref::<MissingChecksum>().is_some()
    }
}

/// Source of a [`ErrorKind::MalformedDescriptor`] error for an object uploaded
/// without the additional checksum feature
#[derive(Debug)]
struct MissingChecksum;

impl fmt::Display for MissingChecksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("object was not uploaded using the additional checksum feature")
    }
}

impl std::error::Error for MissingChecksum {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::InputInvalid => write!(f, "invalid input"),
            ErrorKind::IOError => write!(f, "I/O error"),
            ErrorKind::NotFound => write!(f, "resource not found"),
            ErrorKind::DescriptorUnavailable => write!(f, "failed to retrieve object attributes"),
            ErrorKind::MalformedDescriptor => write!(f, "malformed object attributes"),
            ErrorKind::UnsupportedAlgorithm => write!(f, "unsupported checksum algorithm"),
            ErrorKind::ObjectSizeMismatch(sizes) => write!(
                f,
                "object size ({} bytes) does not match local size ({} bytes)",
                sizes.object_size, sizes.local_size
            ),
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
            Some("NotFound" | "NoSuchKey" | "NoSuchBucket" | "NoSuchVersion") => {
                ErrorKind::NotFound
            }
            _ => ErrorKind::DescriptorUnavailable,
        };

        Error::new(kind, value)
    }
}

pub(crate) fn invalid_input<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::InputInvalid, err)
}

pub(crate) fn malformed_descriptor<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::MalformedDescriptor, err)
}

pub(crate) fn missing_checksum() -> Error {
    Error::new(ErrorKind::MalformedDescriptor, MissingChecksum)
}

pub(crate) fn unsupported_algorithm<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::UnsupportedAlgorithm, err)
}

pub(crate) fn object_size_mismatch(object_size: u64, local_size: u64) -> Error {
    let sizes = SizeMismatch::new(object_size, local_size);
    Error::new(
        ErrorKind::ObjectSizeMismatch(sizes),
        format!(
            "the size of the S3 object ({object_size} bytes) does not match the size of the local file ({local_size} bytes)"
        ),
    )
}
