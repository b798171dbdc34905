/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use crate::operation::verify::builders::VerifyFluentBuilder;
use crate::Config;

/// Verification client for Amazon Simple Storage Service.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) handle: Arc<Handle>,
}

/// Whatever is needed to carry out operations
#[derive(Debug)]
pub(crate) struct Handle {
    pub(crate) config: crate::Config,
}

impl Client {
    /// Creates a new client from a verification config.
    pub fn new(config: Config) -> Client {
        let handle = Arc::new(Handle { config });
        Client { handle }
    }

    /// Returns the client configuration
    pub fn config(&self) -> &Config {
        &self.handle.config
    }

    /// Verify that a local file is identical to an object in Amazon S3.
    ///
    /// The object's checksum attributes are fetched with `GetObjectAttributes`, the
    /// object data itself is never downloaded.
    ///
    /// # Examples
    /// ```no_run
    /// use aws_s3_verify::error::Error;
    /// use aws_s3_verify::io::LocalSource;
    ///
    /// async fn verify_file(client: &aws_s3_verify::Client) -> Result<(), Error> {
    ///     let output = client
    ///         .verify()
    ///         .bucket("my-bucket")
    ///         .key("my-key")
    ///         .source(LocalSource::from_path("my-file"))
    ///         .send()
    ///         .await?;
    ///
    ///     if output.is_match() {
    ///         println!("file and object are identical");
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub fn verify(&self) -> VerifyFluentBuilder {
        VerifyFluentBuilder::new(self.handle.clone())
    }
}
