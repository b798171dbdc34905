/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::ops::Range;

use crate::types::{ChecksumAlgorithm, ChecksumType};

/// Result of a completed comparison
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VerificationOutcome {
    /// The local data and the S3 object are identical
    Match,

    /// The local data differs from the S3 object.
    ///
    /// `part` is set when a part of a multipart object failed to match, it is `None`
    /// when only the whole-object checksum disagreed.
    Mismatch {
        /// The first part that failed to match
        part: Option<PartMismatch>,
    },
}

/// Location of the first part that failed to match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartMismatch {
    pub(crate) part_number: u32,
    pub(crate) byte_range: Range<u64>,
}

impl PartMismatch {
    /// The part number that failed to match
    pub fn part_number(&self) -> u32 {
        self.part_number
    }

    /// Byte range of the part within the object, end exclusive
    pub fn byte_range(&self) -> Range<u64> {
        self.byte_range.clone()
    }
}

/// Outcome of hashing a single part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartResult {
    pub(crate) part_number: u32,
    pub(crate) byte_range: Range<u64>,
    pub(crate) local_checksum: String,
    pub(crate) remote_checksum: String,
    pub(crate) matched: bool,
}

impl PartResult {
    /// The part number
    pub fn part_number(&self) -> u32 {
        self.part_number
    }

    /// Byte range of the part within the object, end exclusive
    pub fn byte_range(&self) -> Range<u64> {
        self.byte_range.clone()
    }

    /// Base64 encoded checksum of the local bytes in this part's range
    pub fn local_checksum(&self) -> &str {
        &self.local_checksum
    }

    /// Base64 encoded checksum S3 reported for this part
    pub fn remote_checksum(&self) -> &str {
        &self.remote_checksum
    }

    /// Whether the local checksum matches the part's checksum
    pub fn matched(&self) -> bool {
        self.matched
    }
}

/// Output of a verification that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOutput {
    pub(crate) algorithm: ChecksumAlgorithm,
    pub(crate) object_size: u64,
    pub(crate) checksum_type: Option<ChecksumType>,
    pub(crate) remote_checksum: String,
    pub(crate) local_checksum: Option<String>,
    pub(crate) parts: Vec<PartResult>,
    pub(crate) outcome: VerificationOutcome,
}

impl VerifyOutput {
    /// The checksum algorithm the object was uploaded with
    pub fn algorithm(&self) -> ChecksumAlgorithm {
        self.algorithm
    }

    /// Size of the S3 object in bytes
    pub fn object_size(&self) -> u64 {
        self.object_size
    }

    /// How the whole-object checksum was calculated.
    ///
    /// `None` for objects uploaded in a single request.
    pub fn checksum_type(&self) -> Option<ChecksumType> {
        self.checksum_type
    }

    /// The whole-object checksum reported by S3
    pub fn remote_checksum(&self) -> &str {
        &self.remote_checksum
    }

    /// The whole-object checksum calculated from the local data.
    ///
    /// For composite multipart checksums this is the checksum of checksums, including
    /// the part count suffix when S3 reports one. `None` when verification stopped at
    /// a mismatched part.
    pub fn local_checksum(&self) -> Option<&str> {
        self.local_checksum.as_deref()
    }

    /// Per-part results, in part order. Empty for objects uploaded in a single request.
    pub fn parts(&self) -> &[PartResult] {
        &self.parts
    }

    /// The verification outcome
    pub fn outcome(&self) -> &VerificationOutcome {
        &self.outcome
    }

    /// Returns true if the local data and the S3 object are identical
    pub fn is_match(&self) -> bool {
        self.outcome == VerificationOutcome::Match
    }
}
