/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/* Automatically managed default lints */
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
/* End of automatically managed default lints */

//! AWS S3 Verify
//!
//! Verifies that a local file is identical to an object stored in Amazon S3 without
//! downloading the object. The object must have been uploaded with one of the
//! [additional checksum algorithms] (`SHA1`, `SHA256`, `CRC32` or `CRC32C`).
//!
//! Objects uploaded in a single request are verified by hashing the whole file.
//! Multipart objects are verified part by part, and then by recomputing the
//! checksum of checksums that S3 reports for the whole object.
//!
//! [additional checksum algorithms]: https://docs.aws.amazon.com/AmazonS3/latest/userguide/checking-object-integrity.html

#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

pub(crate) const KIBIBYTE: usize = 1024;

/// Default size of the buffer used to read local data
pub(crate) const DEFAULT_READ_BUFFER_SIZE: usize = 256 * KIBIBYTE;

/// Error types emitted by `aws-s3-verify`
pub mod error;

/// Common types used by `aws-s3-verify`
pub mod types;

/// Checksum algorithms and descriptor lookups
pub mod checksum;

/// Types and helpers for I/O
pub mod io;

/// Verification client
pub mod client;

/// Verification operations
pub mod operation;

/// Human readable reporting of verification results
pub mod report;

/// Client configuration
pub mod config;

pub use self::client::Client;
pub use self::config::Config;

use self::config::loader::ConfigLoader;

/// Create a config loader
pub fn from_env() -> ConfigLoader {
    ConfigLoader::default()
}
