/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::io::{self, Write};

use aws_smithy_types::error::display::DisplayErrorContext;

use crate::error::{Error, ErrorKind};
use crate::operation::verify::{VerificationOutcome, VerifyEvent, VerifyOutput};
use crate::types::ChecksumType;

const OBJECT_INTEGRITY_DOCS: &str =
    "https://docs.aws.amazon.com/AmazonS3/latest/userguide/checking-object-integrity.html";

const ISSUES_URL: &str = "https://github.com/stefansundin/s3verify";

/// Writes verification progress and results in a human readable form.
///
/// Checksums and the verdict go to `out`, diagnostics go to `err`.
#[derive(Debug)]
pub struct ConsoleReporter<O, E> {
    out: O,
    err: E,
    part_number_width: usize,
}

impl ConsoleReporter<io::Stdout, io::Stderr> {
    /// A reporter writing to standard output and standard error
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ConsoleReporter<O, E> {
    /// Create a reporter writing to the given streams
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            part_number_width: 1,
        }
    }

    /// Consumes the reporter and returns the underlying streams
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    /// Report a progress event
    pub fn event(&mut self, event: &VerifyEvent<'_>) -> io::Result<()> {
        match event {
            VerifyEvent::FetchingAttributes { .. } => {
                writeln!(self.err, "Fetching S3 object information...")?;
            }
            VerifyEvent::BucketRegionResolved { region } => {
                writeln!(self.err, "Bucket region: {region}")?;
            }
            VerifyEvent::Started {
                algorithm,
                remote_checksum,
                part_count,
            } => {
                writeln!(
                    self.err,
                    "S3 object was uploaded using the {algorithm} checksum algorithm."
                )?;
                writeln!(self.out, "S3 object checksum: {remote_checksum}")?;
                if let Some(count) = part_count {
                    self.part_number_width = count.to_string().len();
                    writeln!(
                        self.out,
                        "Object consists of {count} part{}.",
                        if *count == 1 { "" } else { "s" }
                    )?;
                    writeln!(self.out)?;
                }
            }
            VerifyEvent::PartVerified(part) => {
                writeln!(
                    self.out,
                    "Part {:>width$}: {}  {}",
                    part.part_number(),
                    part.local_checksum(),
                    if part.matched() { "OK" } else { "FAILED" },
                    width = self.part_number_width
                )?;
            }
        }
        Ok(())
    }

    /// Report the result of a verification that ran to completion
    pub fn output(&mut self, output: &VerifyOutput) -> io::Result<()> {
        if let VerificationOutcome::Mismatch { part: Some(part) } = output.outcome() {
            let range = part.byte_range();
            writeln!(self.out)?;
            writeln!(
                self.out,
                "Local file did not match part {} (bytes {} to {}).",
                part.part_number(),
                range.start,
                range.end
            )?;
            return Ok(());
        }

        if let Some(local_checksum) = output.local_checksum() {
            let label = match output.checksum_type() {
                Some(ChecksumType::Composite) => "Checksum of checksums",
                _ => "Local file checksum",
            };
            writeln!(self.out)?;
            writeln!(self.out, "{label}: {local_checksum}")?;
            writeln!(self.out)?;
        }

        if output.is_match() {
            writeln!(
                self.out,
                "Checksum matches! File and S3 object are identical."
            )
        } else {
            writeln!(
                self.out,
                "Checksum MISMATCH! File and S3 object are NOT identical!"
            )
        }
    }

    /// Report an error that prevented the comparison
    pub fn error(&mut self, err: &Error) -> io::Result<()> {
        match err.kind() {
            ErrorKind::NotFound => writeln!(self.err, "Error: The object does not exist."),
            ErrorKind::ObjectSizeMismatch(sizes) => writeln!(
                self.err,
                "Error: The size of the S3 object ({} bytes) does not match the size of the local file ({} bytes).",
                sizes.object_size(),
                sizes.local_size()
            ),
            ErrorKind::UnsupportedAlgorithm => {
                let algorithm = std::error::Error::source(err)
                    .map(ToString::to_string)
                    .unwrap_or_default();
                writeln!(
                    self.err,
                    "Error: This S3 object was uploaded using an unsupported checksum algorithm ({algorithm}). Please file an issue: {ISSUES_URL}"
                )
            }
            ErrorKind::MalformedDescriptor if err.is_missing_checksum() => writeln!(
                self.err,
                "Error: This S3 object was not uploaded using the additional checksum feature. s3verify requires that the object is uploaded with this feature enabled. Please consult {OBJECT_INTEGRITY_DOCS}"
            ),
            _ => writeln!(self.err, "Error: {}", DisplayErrorContext(err)),
        }
    }
}
