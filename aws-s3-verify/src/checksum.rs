/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use aws_smithy_checksums::http::HttpChecksum;
use bytes::Bytes;

use crate::error;
use crate::operation::verify::PartDescriptor;
use crate::types::ChecksumAlgorithm;

/// The set of checksum values S3 reports for an object or a single part.
///
/// S3 stores one checksum per object, so normally exactly one field is populated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumSet {
    sha1: Option<String>,
    sha256: Option<String>,
    crc32: Option<String>,
    crc32_c: Option<String>,
    crc64_nvme: Option<String>,
}

impl ChecksumSet {
    /// Create an empty checksum set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base64 encoded checksum value for `algorithm`
    pub fn with_checksum(mut self, algorithm: ChecksumAlgorithm, value: impl Into<String>) -> Self {
        self.set_checksum(algorithm, Some(value.into()));
        self
    }

    /// Set or clear the base64 encoded checksum value for `algorithm`
    pub fn set_checksum(&mut self, algorithm: ChecksumAlgorithm, value: Option<String>) {
        let field = match algorithm {
            ChecksumAlgorithm::Sha1 => &mut self.sha1,
            ChecksumAlgorithm::Sha256 => &mut self.sha256,
            ChecksumAlgorithm::Crc32 => &mut self.crc32,
            ChecksumAlgorithm::Crc32C => &mut self.crc32_c,
        };
        *field = value;
    }

    /// Set or clear the `CRC64NVME` checksum value.
    ///
    /// This algorithm cannot be verified. It is tracked to tell "unsupported algorithm"
    /// apart from "no checksum at all".
    pub fn set_crc64_nvme(&mut self, value: Option<String>) {
        self.crc64_nvme = value;
    }

    /// The checksum value for `algorithm`, if present
    pub fn checksum(&self, algorithm: ChecksumAlgorithm) -> Option<&str> {
        (entry(algorithm).value)(self)
    }

    /// The `SHA1` checksum value
    pub fn sha1(&self) -> Option<&str> {
        self.sha1.as_deref()
    }

    /// The `SHA256` checksum value
    pub fn sha256(&self) -> Option<&str> {
        self.sha256.as_deref()
    }

    /// The `CRC32` checksum value
    pub fn crc32(&self) -> Option<&str> {
        self.crc32.as_deref()
    }

    /// The `CRC32C` checksum value
    pub fn crc32_c(&self) -> Option<&str> {
        self.crc32_c.as_deref()
    }

    /// The `CRC64NVME` checksum value
    pub fn crc64_nvme(&self) -> Option<&str> {
        self.crc64_nvme.as_deref()
    }
}

/// One row of the algorithm table: how to read the algorithm's value out of a
/// [`ChecksumSet`] and how to create a hasher for it.
struct AlgorithmEntry {
    algorithm: ChecksumAlgorithm,
    value: fn(&ChecksumSet) -> Option<&str>,
    new_hasher: fn() -> Box<dyn HttpChecksum>,
}

/// All supported algorithms, in selection priority order.
///
/// Indexed by the `ChecksumAlgorithm` discriminant.
static ALGORITHMS: [AlgorithmEntry; 4] = [
    AlgorithmEntry {
        algorithm: ChecksumAlgorithm::Sha1,
        value: ChecksumSet::sha1,
        new_hasher: sha1_hasher,
    },
    AlgorithmEntry {
        algorithm: ChecksumAlgorithm::Sha256,
        value: ChecksumSet::sha256,
        new_hasher: sha256_hasher,
    },
    AlgorithmEntry {
        algorithm: ChecksumAlgorithm::Crc32,
        value: ChecksumSet::crc32,
        new_hasher: crc32_hasher,
    },
    AlgorithmEntry {
        algorithm: ChecksumAlgorithm::Crc32C,
        value: ChecksumSet::crc32_c,
        new_hasher: crc32_c_hasher,
    },
];

fn entry(algorithm: ChecksumAlgorithm) -> &'static AlgorithmEntry {
    &ALGORITHMS[algorithm as usize]
}

fn sha1_hasher() -> Box<dyn HttpChecksum> {
    aws_smithy_checksums::ChecksumAlgorithm::Sha1.into_impl()
}

fn sha256_hasher() -> Box<dyn HttpChecksum> {
    aws_smithy_checksums::ChecksumAlgorithm::Sha256.into_impl()
}

fn crc32_hasher() -> Box<dyn HttpChecksum> {
    aws_smithy_checksums::ChecksumAlgorithm::Crc32.into_impl()
}

fn crc32_c_hasher() -> Box<dyn HttpChecksum> {
    aws_smithy_checksums::ChecksumAlgorithm::Crc32c.into_impl()
}

/// Determine which checksum algorithm an object was uploaded with.
///
/// Fields are tested in the order `SHA1`, `SHA256`, `CRC32`, `CRC32C` and the first
/// populated one wins.
pub fn select_algorithm(checksums: &ChecksumSet) -> Result<ChecksumAlgorithm, error::Error> {
    if let Some(entry) = ALGORITHMS
        .iter()
        .find(|entry| (entry.value)(checksums).is_some())
    {
        return Ok(entry.algorithm);
    }

    if checksums.crc64_nvme.is_some() {
        return Err(error::unsupported_algorithm("CRC64NVME"));
    }

    Err(error::missing_checksum())
}

/// The whole-object checksum value for the already selected `algorithm`
pub fn object_checksum(
    checksums: &ChecksumSet,
    algorithm: ChecksumAlgorithm,
) -> Result<&str, error::Error> {
    checksums.checksum(algorithm).ok_or_else(|| {
        error::malformed_descriptor(format!("object checksum missing for {algorithm}"))
    })
}

/// The checksum value of a single part for the already selected `algorithm`
pub fn part_checksum(
    part: &PartDescriptor,
    algorithm: ChecksumAlgorithm,
) -> Result<&str, error::Error> {
    part.checksums().checksum(algorithm).ok_or_else(|| {
        error::malformed_descriptor(format!(
            "part {} has no {algorithm} checksum",
            part.part_number()
        ))
    })
}

/// Base64 encode a raw digest the way S3 reports checksum values
pub fn encode(digest: impl AsRef<[u8]>) -> String {
    aws_smithy_types::base64::encode(digest)
}

/// Incremental hash for one of the supported algorithms.
///
/// A `Hasher` produces exactly one digest, a new instance is required for every
/// independent digest.
pub struct Hasher {
    algorithm: ChecksumAlgorithm,
    inner: Box<dyn HttpChecksum>,
}

impl Hasher {
    /// Create a fresh hasher for `algorithm`
    pub fn new(algorithm: ChecksumAlgorithm) -> Self {
        Self {
            algorithm,
            inner: (entry(algorithm).new_hasher)(),
        }
    }

    /// The algorithm this hasher computes
    pub fn algorithm(&self) -> ChecksumAlgorithm {
        self.algorithm
    }

    /// Absorb `bytes` into the digest
    pub fn update(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    /// Consume the hasher and return the raw digest bytes
    pub fn finalize(self) -> Bytes {
        self.inner.finalize()
    }
}

impl fmt::Debug for Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hasher")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}
