/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use tokio::io::AsyncRead;

use super::{ObjectDescriptor, VerificationOutcome, VerifyOutput};
use crate::checksum::{self, Hasher};
use crate::error;
use crate::io::PartReader;
use crate::types::ChecksumAlgorithm;

/// Hash the entire stream and compare it with the whole-object checksum.
pub(super) async fn verify<R>(
    reader: &mut PartReader<R>,
    descriptor: &ObjectDescriptor,
    algorithm: ChecksumAlgorithm,
    remote_checksum: &str,
) -> Result<VerifyOutput, error::Error>
where
    R: AsyncRead + Unpin,
{
    let mut hasher = Hasher::new(algorithm);
    let read = reader.read_to_end(|chunk| hasher.update(chunk)).await?;
    let local_checksum = checksum::encode(hasher.finalize());
    tracing::debug!("hashed {read} bytes, local checksum: {local_checksum}");

    let outcome = if local_checksum == remote_checksum {
        VerificationOutcome::Match
    } else {
        VerificationOutcome::Mismatch { part: None }
    };

    Ok(VerifyOutput {
        algorithm,
        object_size: descriptor.object_size(),
        checksum_type: None,
        remote_checksum: remote_checksum.to_owned(),
        local_checksum: Some(local_checksum),
        parts: Vec::new(),
        outcome,
    })
}
