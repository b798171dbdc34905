/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use bytes::Bytes;
use tokio::io::AsyncRead;

use super::event::EventSink;
use super::{
    ObjectDescriptor, ObjectParts, PartMismatch, PartResult, VerificationOutcome, VerifyEvent,
    VerifyOutput,
};
use crate::checksum::{self, Hasher};
use crate::error;
use crate::io::PartReader;
use crate::types::{ChecksumAlgorithm, ChecksumType};

/// Check that the part listing can be verified, before any data is read.
pub(super) fn validate(
    descriptor: &ObjectDescriptor,
    parts: &ObjectParts,
    algorithm: ChecksumAlgorithm,
) -> Result<(), error::Error> {
    if parts.is_truncated() {
        return Err(error::malformed_descriptor(format!(
            "part listing is truncated ({} of {} parts returned)",
            parts.parts().len(),
            parts.total_parts_count()
        )));
    }
    if parts.total_parts_count() as usize != parts.parts().len() {
        return Err(error::malformed_descriptor(format!(
            "object has {} parts but {} were listed",
            parts.total_parts_count(),
            parts.parts().len()
        )));
    }
    if parts.parts().is_empty() {
        return Err(error::malformed_descriptor("part listing is empty"));
    }

    let mut total_size: u64 = 0;
    for (expected, part) in (1u32..).zip(parts.parts()) {
        if part.part_number() != expected {
            return Err(error::malformed_descriptor(format!(
                "parts are out of order: expected part {expected} but found part {}",
                part.part_number()
            )));
        }
        checksum::part_checksum(part, algorithm)?;
        total_size = total_size.checked_add(part.size()).ok_or_else(|| {
            error::malformed_descriptor("sum of part sizes overflows")
        })?;
    }

    if total_size != descriptor.object_size() {
        return Err(error::malformed_descriptor(format!(
            "sum of part sizes ({total_size} bytes) does not match the object size ({} bytes)",
            descriptor.object_size()
        )));
    }
    Ok(())
}

/// The whole-object digest computed alongside the per-part digests
enum ObjectChecksum {
    /// checksum of the raw part checksums
    Composite(Hasher),
    /// checksum of every byte of the object
    FullObject(Hasher),
}

impl ObjectChecksum {
    fn new(checksum_type: ChecksumType, algorithm: ChecksumAlgorithm) -> Self {
        match checksum_type {
            ChecksumType::Composite => ObjectChecksum::Composite(Hasher::new(algorithm)),
            ChecksumType::FullObject => ObjectChecksum::FullObject(Hasher::new(algorithm)),
        }
    }

    fn absorb_data(&mut self, chunk: &[u8]) {
        if let ObjectChecksum::FullObject(hasher) = self {
            hasher.update(chunk);
        }
    }

    fn absorb_part_digest(&mut self, digest: &Bytes) {
        if let ObjectChecksum::Composite(hasher) = self {
            hasher.update(digest);
        }
    }

    fn finish(self, remote_checksum: &str, part_count: usize) -> String {
        match self {
            ObjectChecksum::Composite(hasher) => with_part_count_suffix(
                checksum::encode(hasher.finalize()),
                remote_checksum,
                part_count,
            ),
            ObjectChecksum::FullObject(hasher) => checksum::encode(hasher.finalize()),
        }
    }
}

/// Append `-<part_count>` when the remote composite checksum carries the part count.
///
/// Only applied when the encoded lengths differ.
fn with_part_count_suffix(candidate: String, remote_checksum: &str, part_count: usize) -> String {
    if candidate.len() != remote_checksum.len() {
        format!("{candidate}-{part_count}")
    } else {
        candidate
    }
}

/// Hash every part in order, stopping at the first part that does not match.
///
/// `parts` must have passed [`validate`].
pub(super) async fn verify<R>(
    reader: &mut PartReader<R>,
    descriptor: &ObjectDescriptor,
    parts: &ObjectParts,
    algorithm: ChecksumAlgorithm,
    remote_checksum: &str,
    events: &mut EventSink,
) -> Result<VerifyOutput, error::Error>
where
    R: AsyncRead + Unpin,
{
    let checksum_type = descriptor.checksum_type();
    let mut object_checksum = ObjectChecksum::new(checksum_type, algorithm);
    let mut results = Vec::with_capacity(parts.parts().len());
    let mut offset: u64 = 0;

    for part in parts.parts() {
        let mut hasher = Hasher::new(algorithm);
        let read = reader
            .read_range(part.size(), |chunk| {
                hasher.update(chunk);
                object_checksum.absorb_data(chunk);
            })
            .await?;
        if read != part.size() {
            return Err(error::object_size_mismatch(
                descriptor.object_size(),
                offset + read,
            ));
        }

        let digest = hasher.finalize();
        let local_checksum = checksum::encode(&digest);
        let part_remote_checksum = checksum::part_checksum(part, algorithm)?;
        let byte_range = offset..offset + part.size();
        let matched = local_checksum == part_remote_checksum;
        tracing::debug!(
            part_number = part.part_number(),
            matched,
            "verified part {local_checksum} (bytes {} to {})",
            byte_range.start,
            byte_range.end
        );

        let result = PartResult {
            part_number: part.part_number(),
            byte_range: byte_range.clone(),
            local_checksum,
            remote_checksum: part_remote_checksum.to_owned(),
            matched,
        };
        events.emit(&VerifyEvent::PartVerified(&result));
        results.push(result);

        if !matched {
            return Ok(VerifyOutput {
                algorithm,
                object_size: descriptor.object_size(),
                checksum_type: Some(checksum_type),
                remote_checksum: remote_checksum.to_owned(),
                local_checksum: None,
                parts: results,
                outcome: VerificationOutcome::Mismatch {
                    part: Some(PartMismatch {
                        part_number: part.part_number(),
                        byte_range,
                    }),
                },
            });
        }

        object_checksum.absorb_part_digest(&digest);
        offset += part.size();
    }

    // trailing bytes are counted but not hashed
    let trailing = reader.read_to_end(|_| {}).await?;
    if trailing > 0 {
        return Err(error::object_size_mismatch(
            descriptor.object_size(),
            offset + trailing,
        ));
    }

    let local_checksum = object_checksum.finish(remote_checksum, parts.parts().len());
    tracing::debug!("local object checksum: {local_checksum}");
    let outcome = if local_checksum == remote_checksum {
        VerificationOutcome::Match
    } else {
        VerificationOutcome::Mismatch { part: None }
    };

    Ok(VerifyOutput {
        algorithm,
        object_size: descriptor.object_size(),
        checksum_type: Some(checksum_type),
        remote_checksum: remote_checksum.to_owned(),
        local_checksum: Some(local_checksum),
        parts: results,
        outcome,
    })
}
