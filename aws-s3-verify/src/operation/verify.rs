/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Operation builders
pub mod builders;
mod descriptor;
mod discovery;
mod event;
mod input;
mod multipart;
mod output;
mod single;

use std::sync::Arc;

use tokio::io::AsyncRead;

use crate::checksum;
use crate::error;
use crate::io::PartReader;
/// Checksum attributes of an object
pub use descriptor::{ObjectDescriptor, ObjectParts, PartDescriptor};
use event::EventSink;
/// Progress events
pub use event::VerifyEvent;
/// Request type for verifying a local file against an S3 object
pub use input::{VerifyInput, VerifyInputBuilder};
/// Response type for verifications
pub use output::{PartMismatch, PartResult, VerificationOutcome, VerifyOutput};

/// Operation struct for verifying a single object
#[derive(Clone, Default, Debug)]
pub(crate) struct Verify;

impl Verify {
    /// Execute a single `Verify` operation
    #[tracing::instrument(skip_all, level = "debug", name = "verify", fields(
        bucket = input.bucket(),
        key = input.key(),
    ))]
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: VerifyInput,
        mut events: EventSink,
    ) -> Result<VerifyOutput, error::Error> {
        // local problems are reported before any request is sent
        let stream = input.source().open().await?;

        events.emit(&VerifyEvent::FetchingAttributes {
            bucket: input.bucket(),
            key: input.key(),
        });
        let descriptor = discovery::fetch_descriptor(&handle, &input, &mut events).await?;

        let (reader, local_size) = stream.into_parts();
        StreamVerifier::new(&descriptor)
            .read_buffer_size(handle.config.read_buffer_size())
            .with_events(events)
            .verify(reader, local_size)
            .await
    }
}

/// Compares a local byte stream with an [`ObjectDescriptor`].
///
/// This is the verification engine used by [`Client::verify`](crate::Client::verify),
/// usable on its own when the descriptor was obtained some other way. The stream is
/// read once, front to back.
#[derive(Debug)]
pub struct StreamVerifier<'a> {
    descriptor: &'a ObjectDescriptor,
    read_buffer_size: usize,
    events: EventSink,
}

impl<'a> StreamVerifier<'a> {
    /// Create a verifier for `descriptor`
    pub fn new(descriptor: &'a ObjectDescriptor) -> Self {
        Self {
            descriptor,
            read_buffer_size: crate::DEFAULT_READ_BUFFER_SIZE,
            events: EventSink::default(),
        }
    }

    /// Size of the buffer used to read the stream
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Receive progress events while the verification runs
    pub fn on_event<F>(self, listener: F) -> Self
    where
        F: FnMut(&VerifyEvent<'_>) + Send + 'static,
    {
        self.with_events(EventSink::new(listener))
    }

    pub(crate) fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// Verify `reader` against the descriptor.
    ///
    /// `local_size` is the total length of the stream when known up front. A known
    /// size that differs from the object size fails with
    /// [`ErrorKind::ObjectSizeMismatch`](crate::error::ErrorKind::ObjectSizeMismatch)
    /// before anything is read.
    pub async fn verify<R>(
        mut self,
        reader: R,
        local_size: Option<u64>,
    ) -> Result<VerifyOutput, error::Error>
    where
        R: AsyncRead + Unpin,
    {
        let descriptor = self.descriptor;
        let algorithm = checksum::select_algorithm(descriptor.checksums())?;
        let remote_checksum = checksum::object_checksum(descriptor.checksums(), algorithm)?;
        tracing::debug!("object checksum ({algorithm}): {remote_checksum}");

        if let Some(parts) = descriptor.parts() {
            multipart::validate(descriptor, parts, algorithm)?;
        }

        if let Some(local_size) = local_size {
            if local_size != descriptor.object_size() {
                return Err(error::object_size_mismatch(
                    descriptor.object_size(),
                    local_size,
                ));
            }
        }

        self.events.emit(&VerifyEvent::Started {
            algorithm,
            remote_checksum,
            part_count: descriptor.parts().map(|parts| parts.parts().len()),
        });

        let mut reader = PartReader::new(reader, self.read_buffer_size);
        match descriptor.parts() {
            Some(parts) => {
                multipart::verify(
                    &mut reader,
                    descriptor,
                    parts,
                    algorithm,
                    remote_checksum,
                    &mut self.events,
                )
                .await
            }
            None => single::verify(&mut reader, descriptor, algorithm, remote_checksum).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{
        ObjectDescriptor, ObjectParts, PartDescriptor, StreamVerifier, VerificationOutcome,
        VerifyEvent,
    };
    use crate::checksum::ChecksumSet;
    use crate::error::ErrorKind;
    use crate::types::{ChecksumAlgorithm, ChecksumType};

    fn crc32(value: &str) -> ChecksumSet {
        ChecksumSet::new().with_checksum(ChecksumAlgorithm::Crc32, value)
    }

    fn hello_world_parts() -> ObjectParts {
        ObjectParts::new(vec![
            PartDescriptor::new(1, 5, crc32("NhCmhg==")),
            PartDescriptor::new(2, 5, crc32("OncRQw==")),
        ])
    }

    #[tokio::test]
    async fn test_single_part_match() {
        let descriptor = ObjectDescriptor::new(
            10,
            ChecksumSet::new().with_checksum(ChecksumAlgorithm::Crc32C, "Vsu0gA=="),
        );
        let output = StreamVerifier::new(&descriptor)
            .verify(&b"helloworld"[..], Some(10))
            .await
            .unwrap();
        assert!(output.is_match());
        assert_eq!(ChecksumAlgorithm::Crc32C, output.algorithm());
        assert_eq!(Some("Vsu0gA=="), output.local_checksum());
        assert_eq!(None, output.checksum_type());
    }

    #[tokio::test]
    async fn test_single_part_unknown_size_skips_size_check() {
        let descriptor = ObjectDescriptor::new(10, crc32("+esgrQ=="));
        let output = StreamVerifier::new(&descriptor)
            .verify(&b"hello"[..], None)
            .await
            .unwrap();
        assert_eq!(
            &VerificationOutcome::Mismatch { part: None },
            output.outcome()
        );
    }

    #[tokio::test]
    async fn test_known_size_mismatch_fails_before_reading() {
        let descriptor = ObjectDescriptor::new(10, crc32("+esgrQ=="));
        // reading would surface as an I/O error instead
        let stream = tokio_test::io::Builder::new()
            .read_error(std::io::Error::other("stream was read"))
            .build();
        let err = StreamVerifier::new(&descriptor)
            .verify(stream, Some(9))
            .await
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ObjectSizeMismatch(_)));
    }

    #[tokio::test]
    async fn test_structure_checked_before_size() {
        let parts = ObjectParts::new(vec![
            PartDescriptor::new(2, 5, crc32("OncRQw==")),
            PartDescriptor::new(1, 5, crc32("NhCmhg==")),
        ]);
        let descriptor = ObjectDescriptor::new(10, crc32("wpn7tg==-2")).with_parts(parts);
        let err = StreamVerifier::new(&descriptor)
            .verify(&b"hello"[..], Some(5))
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::MalformedDescriptor, err.kind());
    }

    #[tokio::test]
    async fn test_multipart_composite_with_suffix() {
        let descriptor =
            ObjectDescriptor::new(10, crc32("wpn7tg==-2")).with_parts(hello_world_parts());
        let output = StreamVerifier::new(&descriptor)
            .read_buffer_size(3)
            .verify(&b"helloworld"[..], None)
            .await
            .unwrap();
        assert!(output.is_match());
        assert_eq!(Some("wpn7tg==-2"), output.local_checksum());
        assert_eq!(Some(ChecksumType::Composite), output.checksum_type());
        assert_eq!(2, output.parts().len());
        assert_eq!(5..10, output.parts()[1].byte_range());
    }

    #[tokio::test]
    async fn test_multipart_composite_without_suffix() {
        let descriptor =
            ObjectDescriptor::new(10, crc32("wpn7tg==")).with_parts(hello_world_parts());
        let output = StreamVerifier::new(&descriptor)
            .verify(&b"helloworld"[..], Some(10))
            .await
            .unwrap();
        assert!(output.is_match());
        assert_eq!(Some("wpn7tg=="), output.local_checksum());
    }

    #[tokio::test]
    async fn test_multipart_full_object() {
        let descriptor = ObjectDescriptor::new(10, crc32("+esgrQ=="))
            .with_checksum_type(ChecksumType::FullObject)
            .with_parts(hello_world_parts());
        let output = StreamVerifier::new(&descriptor)
            .verify(&b"helloworld"[..], Some(10))
            .await
            .unwrap();
        assert!(output.is_match());
        assert_eq!(Some("+esgrQ=="), output.local_checksum());
    }

    #[tokio::test]
    async fn test_multipart_short_stream() {
        let descriptor =
            ObjectDescriptor::new(10, crc32("wpn7tg==-2")).with_parts(hello_world_parts());
        let err = StreamVerifier::new(&descriptor)
            .verify(&b"hellowo"[..], None)
            .await
            .unwrap_err();
        match err.kind() {
            ErrorKind::ObjectSizeMismatch(sizes) => {
                assert_eq!(10, sizes.object_size());
                assert_eq!(7, sizes.local_size());
            }
            kind => panic!("unexpected error kind: {kind:?}"),
        }
    }

    #[tokio::test]
    async fn test_multipart_trailing_data() {
        let descriptor =
            ObjectDescriptor::new(10, crc32("wpn7tg==-2")).with_parts(hello_world_parts());
        let err = StreamVerifier::new(&descriptor)
            .verify(&b"helloworld!!"[..], None)
            .await
            .unwrap_err();
        match err.kind() {
            ErrorKind::ObjectSizeMismatch(sizes) => assert_eq!(12, sizes.local_size()),
            kind => panic!("unexpected error kind: {kind:?}"),
        }
    }

    #[tokio::test]
    async fn test_events() {
        let descriptor =
            ObjectDescriptor::new(10, crc32("wpn7tg==-2")).with_parts(hello_world_parts());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let output = StreamVerifier::new(&descriptor)
            .on_event({
                let seen = seen.clone();
                move |event| {
                    let line = match event {
                        VerifyEvent::Started {
                            algorithm,
                            remote_checksum,
                            part_count,
                        } => format!("started {algorithm} {remote_checksum} {part_count:?}"),
                        VerifyEvent::PartVerified(part) => format!(
                            "part {} {} {}",
                            part.part_number(),
                            part.local_checksum(),
                            part.matched()
                        ),
                        _ => "other".to_owned(),
                    };
                    seen.lock().unwrap().push(line);
                }
            })
            .verify(&b"helloworld"[..], Some(10))
            .await
            .unwrap();
        assert!(output.is_match());
        assert_eq!(
            vec![
                "started CRC32 wpn7tg==-2 Some(2)".to_owned(),
                "part 1 NhCmhg== true".to_owned(),
                "part 2 OncRQw== true".to_owned(),
            ],
            *seen.lock().unwrap()
        );
    }
}
