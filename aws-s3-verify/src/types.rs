/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::str::FromStr;

use crate::error;

/// The checksum algorithms that an object can be verified with.
///
/// S3 supports more algorithms than these (e.g. `CRC64NVME`), those are rejected with
/// [`ErrorKind::UnsupportedAlgorithm`](crate::error::ErrorKind::UnsupportedAlgorithm).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ChecksumAlgorithm {
    /// SHA-1
    Sha1,
    /// SHA-256
    Sha256,
    /// CRC-32 (IEEE polynomial)
    Crc32,
    /// CRC-32C (Castagnoli polynomial)
    Crc32C,
}

impl ChecksumAlgorithm {
    /// The name of the algorithm as used by the S3 API
    pub fn as_str(&self) -> &'static str {
        match self {
            ChecksumAlgorithm::Sha1 => "SHA1",
            ChecksumAlgorithm::Sha256 => "SHA256",
            ChecksumAlgorithm::Crc32 => "CRC32",
            ChecksumAlgorithm::Crc32C => "CRC32C",
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let algorithm = if s.eq_ignore_ascii_case("SHA1") {
            ChecksumAlgorithm::Sha1
        } else if s.eq_ignore_ascii_case("SHA256") {
            ChecksumAlgorithm::Sha256
        } else if s.eq_ignore_ascii_case("CRC32") {
            ChecksumAlgorithm::Crc32
        } else if s.eq_ignore_ascii_case("CRC32C") {
            ChecksumAlgorithm::Crc32C
        } else {
            return Err(error::unsupported_algorithm(s.to_owned()));
        };
        Ok(algorithm)
    }
}

impl TryFrom<&aws_sdk_s3::types::ChecksumAlgorithm> for ChecksumAlgorithm {
    type Error = error::Error;

    fn try_from(value: &aws_sdk_s3::types::ChecksumAlgorithm) -> Result<Self, Self::Error> {
        value.as_str().parse()
    }
}

/// How the whole-object checksum of a multipart object was calculated.
///
/// See [checksum types](https://docs.aws.amazon.com/AmazonS3/latest/userguide/checking-object-integrity.html#ChecksumTypes).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ChecksumType {
    /// A checksum of the concatenated (raw) part checksums.
    #[default]
    Composite,

    /// A checksum of the entire object content, as if it had been uploaded in one piece.
    FullObject,
}

impl From<&aws_sdk_s3::types::ChecksumType> for ChecksumType {
    fn from(value: &aws_sdk_s3::types::ChecksumType) -> Self {
        match value {
            aws_sdk_s3::types::ChecksumType::FullObject => ChecksumType::FullObject,
            // Composite is what S3 has always reported for multipart objects
            _ => ChecksumType::Composite,
        }
    }
}
