/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::operation::get_object_attributes::GetObjectAttributesOutput;
use aws_sdk_s3::types::{Checksum, GetObjectAttributesParts, ObjectPart};

use crate::checksum::ChecksumSet;
use crate::error;
use crate::types::{ChecksumAlgorithm, ChecksumType};

/// The published size and checksum(s) of an S3 object.
///
/// Usually constructed from a `GetObjectAttributes` response, but can also be built
/// by hand to verify data against a known descriptor with
/// [`StreamVerifier`](super::StreamVerifier).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDescriptor {
    object_size: u64,
    checksums: ChecksumSet,
    checksum_type: ChecksumType,
    parts: Option<ObjectParts>,
}

impl ObjectDescriptor {
    /// Create a descriptor for an object uploaded in a single request
    pub fn new(object_size: u64, checksums: ChecksumSet) -> Self {
        Self {
            object_size,
            checksums,
            checksum_type: ChecksumType::default(),
            parts: None,
        }
    }

    /// Set how the whole-object checksum of a multipart object was calculated
    pub fn with_checksum_type(mut self, checksum_type: ChecksumType) -> Self {
        self.checksum_type = checksum_type;
        self
    }

    /// Set the part listing of a multipart object
    pub fn with_parts(mut self, parts: ObjectParts) -> Self {
        self.parts = Some(parts);
        self
    }

    /// Size of the object in bytes
    pub fn object_size(&self) -> u64 {
        self.object_size
    }

    /// The whole-object checksum(s)
    pub fn checksums(&self) -> &ChecksumSet {
        &self.checksums
    }

    /// How the whole-object checksum was calculated
    pub fn checksum_type(&self) -> ChecksumType {
        self.checksum_type
    }

    /// The part listing, present only for objects uploaded with a multipart upload
    pub fn parts(&self) -> Option<&ObjectParts> {
        self.parts.as_ref()
    }
}

/// The part listing of a multipart object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectParts {
    total_parts_count: u32,
    is_truncated: bool,
    parts: Vec<PartDescriptor>,
}

impl ObjectParts {
    /// Create a complete (not truncated) listing of `parts`
    pub fn new(parts: Vec<PartDescriptor>) -> Self {
        Self {
            total_parts_count: parts.len().try_into().unwrap_or(u32::MAX),
            is_truncated: false,
            parts,
        }
    }

    /// Override the total number of parts reported by S3
    pub fn with_total_parts_count(mut self, total_parts_count: u32) -> Self {
        self.total_parts_count = total_parts_count;
        self
    }

    /// Mark the listing as truncated (more parts exist than were returned)
    pub fn with_truncated(mut self, is_truncated: bool) -> Self {
        self.is_truncated = is_truncated;
        self
    }

    /// The total number of parts of the object as reported by S3
    pub fn total_parts_count(&self) -> u32 {
        self.total_parts_count
    }

    /// Whether S3 returned only a page of the part listing
    pub fn is_truncated(&self) -> bool {
        self.is_truncated
    }

    /// The listed parts, in the order S3 returned them
    pub fn parts(&self) -> &[PartDescriptor] {
        &self.parts
    }
}

/// A single part of a multipart object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartDescriptor {
    part_number: u32,
    size: u64,
    checksums: ChecksumSet,
}

impl PartDescriptor {
    /// Create a new part descriptor
    pub fn new(part_number: u32, size: u64, checksums: ChecksumSet) -> Self {
        Self {
            part_number,
            size,
            checksums,
        }
    }

    /// The 1-based part number
    pub fn part_number(&self) -> u32 {
        self.part_number
    }

    /// Size of the part in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// The checksum(s) of this part
    pub fn checksums(&self) -> &ChecksumSet {
        &self.checksums
    }
}

fn non_negative(value: i64, what: &str) -> Result<u64, error::Error> {
    u64::try_from(value)
        .map_err(|_| error::malformed_descriptor(format!("{what} is negative: {value}")))
}

fn checksum_set(
    sha1: Option<String>,
    sha256: Option<String>,
    crc32: Option<String>,
    crc32_c: Option<String>,
    crc64_nvme: Option<String>,
) -> ChecksumSet {
    let mut checksums = ChecksumSet::new();
    checksums.set_checksum(ChecksumAlgorithm::Sha1, sha1);
    checksums.set_checksum(ChecksumAlgorithm::Sha256, sha256);
    checksums.set_checksum(ChecksumAlgorithm::Crc32, crc32);
    checksums.set_checksum(ChecksumAlgorithm::Crc32C, crc32_c);
    checksums.set_crc64_nvme(crc64_nvme);
    checksums
}

impl From<Checksum> for ChecksumSet {
    fn from(value: Checksum) -> Self {
        checksum_set(
            value.checksum_sha1,
            value.checksum_sha256,
            value.checksum_crc32,
            value.checksum_crc32_c,
            value.checksum_crc64_nvme,
        )
    }
}

impl TryFrom<ObjectPart> for PartDescriptor {
    type Error = error::Error;

    fn try_from(value: ObjectPart) -> Result<Self, Self::Error> {
        let part_number = value
            .part_number
            .ok_or_else(|| error::malformed_descriptor("part is missing its part number"))?;
        let part_number = u32::try_from(part_number).map_err(|_| {
            error::malformed_descriptor(format!("invalid part number: {part_number}"))
        })?;
        let size = value.size.ok_or_else(|| {
            error::malformed_descriptor(format!("part {part_number} is missing its size"))
        })?;
        let size = non_negative(size, "part size")?;

        let checksums = checksum_set(
            value.checksum_sha1,
            value.checksum_sha256,
            value.checksum_crc32,
            value.checksum_crc32_c,
            value.checksum_crc64_nvme,
        );

        Ok(PartDescriptor::new(part_number, size, checksums))
    }
}

impl TryFrom<GetObjectAttributesParts> for ObjectParts {
    type Error = error::Error;

    fn try_from(value: GetObjectAttributesParts) -> Result<Self, Self::Error> {
        let parts = value
            .parts
            .unwrap_or_default()
            .into_iter()
            .map(PartDescriptor::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let total_parts_count = value
            .total_parts_count
            .ok_or_else(|| error::malformed_descriptor("total parts count is missing"))?;
        let total_parts_count = u32::try_from(total_parts_count).map_err(|_| {
            error::malformed_descriptor(format!("invalid total parts count: {total_parts_count}"))
        })?;

        Ok(ObjectParts::new(parts)
            .with_total_parts_count(total_parts_count)
            .with_truncated(value.is_truncated.unwrap_or_default()))
    }
}

impl TryFrom<GetObjectAttributesOutput> for ObjectDescriptor {
    type Error = error::Error;

    fn try_from(value: GetObjectAttributesOutput) -> Result<Self, Self::Error> {
        let object_size = value
            .object_size
            .ok_or_else(|| error::malformed_descriptor("object size is missing"))?;
        let object_size = non_negative(object_size, "object size")?;

        let mut checksum_type = ChecksumType::default();
        let checksums = match value.checksum {
            Some(checksum) => {
                if let Some(ty) = checksum.checksum_type.as_ref() {
                    checksum_type = ty.into();
                }
                ChecksumSet::from(checksum)
            }
            None => ChecksumSet::new(),
        };

        let mut descriptor =
            ObjectDescriptor::new(object_size, checksums).with_checksum_type(checksum_type);
        if let Some(parts) = value.object_parts {
            descriptor = descriptor.with_parts(parts.try_into()?);
        }
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_s3::operation::get_object_attributes::GetObjectAttributesOutput;
    use aws_sdk_s3::types::{Checksum, GetObjectAttributesParts, ObjectPart};

    use super::ObjectDescriptor;
    use crate::error::ErrorKind;
    use crate::types::{ChecksumAlgorithm, ChecksumType};

    #[test]
    fn test_single_part_object() {
        let output = GetObjectAttributesOutput::builder()
            .object_size(10)
            .checksum(Checksum::builder().checksum_crc32_c("Vsu0gA==").build())
            .build();

        let descriptor = ObjectDescriptor::try_from(output).unwrap();
        assert_eq!(10, descriptor.object_size());
        assert_eq!(
            Some("Vsu0gA=="),
            descriptor.checksums().checksum(ChecksumAlgorithm::Crc32C)
        );
        assert_eq!(ChecksumType::Composite, descriptor.checksum_type());
        assert!(descriptor.parts().is_none());
    }

    #[test]
    fn test_multipart_object() {
        let output = GetObjectAttributesOutput::builder()
            .object_size(10)
            .checksum(
                Checksum::builder()
                    .checksum_crc32("wpn7tg==-2")
                    .checksum_type(aws_sdk_s3::types::ChecksumType::Composite)
                    .build(),
            )
            .object_parts(
                GetObjectAttributesParts::builder()
                    .total_parts_count(2)
                    .is_truncated(false)
                    .parts(
                        ObjectPart::builder()
                            .part_number(1)
                            .size(5)
                            .checksum_crc32("NhCmhg==")
                            .build(),
                    )
                    .parts(
                        ObjectPart::builder()
                            .part_number(2)
                            .size(5)
                            .checksum_crc32("OncRQw==")
                            .build(),
                    )
                    .build(),
            )
            .build();

        let descriptor = ObjectDescriptor::try_from(output).unwrap();
        let parts = descriptor.parts().unwrap();
        assert_eq!(2, parts.total_parts_count());
        assert!(!parts.is_truncated());
        assert_eq!(2, parts.parts()[1].part_number());
        assert_eq!(5, parts.parts()[1].size());
        assert_eq!(
            Some("OncRQw=="),
            parts.parts()[1].checksums().checksum(ChecksumAlgorithm::Crc32)
        );
    }

    #[test]
    fn test_full_object_checksum_type() {
        let output = GetObjectAttributesOutput::builder()
            .object_size(10)
            .checksum(
                Checksum::builder()
                    .checksum_crc32("+esgrQ==")
                    .checksum_type(aws_sdk_s3::types::ChecksumType::FullObject)
                    .build(),
            )
            .build();
        let descriptor = ObjectDescriptor::try_from(output).unwrap();
        assert_eq!(ChecksumType::FullObject, descriptor.checksum_type());
    }

    #[test]
    fn test_missing_object_size() {
        let output = GetObjectAttributesOutput::builder().build();
        let err = ObjectDescriptor::try_from(output).unwrap_err();
        assert_eq!(&ErrorKind::MalformedDescriptor, err.kind());
    }

    #[test]
    fn test_negative_part_size() {
        let output = GetObjectAttributesOutput::builder()
            .object_size(10)
            .object_parts(
                GetObjectAttributesParts::builder()
                    .total_parts_count(1)
                    .parts(ObjectPart::builder().part_number(1).size(-1).build())
                    .build(),
            )
            .build();
        let err = ObjectDescriptor::try_from(output).unwrap_err();
        assert_eq!(&ErrorKind::MalformedDescriptor, err.kind());
    }
}
