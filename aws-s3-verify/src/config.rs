/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_smithy_types::error::operation::BuildError;

use crate::DEFAULT_READ_BUFFER_SIZE;

/// Load [`Config`] from the environment
pub mod loader;

/// Configuration for a [`Client`](crate::client::Client)
#[derive(Debug, Clone)]
pub struct Config {
    read_buffer_size: usize,
    resolve_bucket_region: bool,
    dual_stack: bool,
    client: aws_sdk_s3::client::Client,
}

impl Config {
    /// Create a new `Config` builder
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Returns the size of the buffer used to read local data
    pub fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }

    /// Returns whether the bucket's region is looked up before fetching object attributes
    pub fn resolve_bucket_region(&self) -> bool {
        self.resolve_bucket_region
    }

    /// Returns whether dual-stack endpoints are used once the bucket's region is resolved
    pub fn dual_stack(&self) -> bool {
        self.dual_stack
    }

    /// The Amazon S3 client instance that will be used to send requests to S3.
    pub fn client(&self) -> &aws_sdk_s3::Client {
        &self.client
    }
}

/// Fluent style builder for [Config]
#[derive(Debug, Clone)]
pub struct Builder {
    read_buffer_size: usize,
    resolve_bucket_region: bool,
    dual_stack: bool,
    client: Option<aws_sdk_s3::Client>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            resolve_bucket_region: false,
            dual_stack: false,
            client: None,
        }
    }
}

impl Builder {
    /// Size of the buffer used to read local data.
    ///
    /// This has no effect on the result of a verification, only on how many bytes
    /// are requested from the local stream at a time. Default is 256 KiB.
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Look up the bucket's region with `GetBucketLocation` and send
    /// `GetObjectAttributes` to that region.
    ///
    /// Useful when the region of the bucket is not known up front. Default is `false`.
    pub fn resolve_bucket_region(mut self, resolve: bool) -> Self {
        self.resolve_bucket_region = resolve;
        self
    }

    /// Use dual-stack endpoints for the region resolved by
    /// [`resolve_bucket_region`](Self::resolve_bucket_region). Default is `false`.
    pub fn dual_stack(mut self, dual_stack: bool) -> Self {
        self.dual_stack = dual_stack;
        self
    }

    /// Set an explicit S3 client to use.
    pub fn client(mut self, client: aws_sdk_s3::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Consumes the builder and constructs a [`Config`](crate::config::Config)
    pub fn build(self) -> Result<Config, BuildError> {
        let client = self
            .client
            .ok_or_else(|| BuildError::missing_field("client", "an S3 client is required"))?;
        if self.read_buffer_size == 0 {
            return Err(BuildError::invalid_field(
                "read_buffer_size",
                "read buffer size must be greater than zero",
            ));
        }

        Ok(Config {
            read_buffer_size: self.read_buffer_size,
            resolve_bucket_region: self.resolve_bucket_region,
            dual_stack: self.dual_stack,
            client,
        })
    }
}
