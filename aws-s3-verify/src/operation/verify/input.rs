/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_smithy_types::error::operation::BuildError;

use crate::io::LocalSource;

/// Input type for verifying a local file against a single S3 object
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct VerifyInput {
    bucket: String,
    key: String,
    version_id: Option<String>,
    source: LocalSource,
}

impl VerifyInput {
    /// Creates a new builder-style object to manufacture [`VerifyInput`](crate::operation::verify::VerifyInput).
    pub fn builder() -> VerifyInputBuilder {
        VerifyInputBuilder::default()
    }

    /// The bucket containing the object
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The key of the object
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The object version to verify, the current version if not set
    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }

    /// The local data to compare with the object
    pub fn source(&self) -> &LocalSource {
        &self.source
    }
}

/// A builder for [`VerifyInput`](crate::operation::verify::VerifyInput).
#[non_exhaustive]
#[derive(Clone, Default, Debug)]
pub struct VerifyInputBuilder {
    pub(crate) bucket: Option<String>,
    pub(crate) key: Option<String>,
    pub(crate) version_id: Option<String>,
    pub(crate) source: Option<LocalSource>,
}

impl VerifyInputBuilder {
    /// The bucket containing the object.
    /// Required.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.bucket = Some(input.into());
        self
    }

    /// The bucket containing the object.
    pub fn set_bucket(mut self, input: Option<String>) -> Self {
        self.bucket = input;
        self
    }

    /// The bucket containing the object.
    pub fn get_bucket(&self) -> &Option<String> {
        &self.bucket
    }

    /// The key of the object.
    /// Required.
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.key = Some(input.into());
        self
    }

    /// The key of the object.
    pub fn set_key(mut self, input: Option<String>) -> Self {
        self.key = input;
        self
    }

    /// The key of the object.
    pub fn get_key(&self) -> &Option<String> {
        &self.key
    }

    /// The object version to verify.
    pub fn version_id(mut self, input: impl Into<String>) -> Self {
        self.version_id = Some(input.into());
        self
    }

    /// The object version to verify.
    pub fn set_version_id(mut self, input: Option<String>) -> Self {
        self.version_id = input;
        self
    }

    /// The object version to verify.
    pub fn get_version_id(&self) -> &Option<String> {
        &self.version_id
    }

    /// The local data to compare with the object.
    /// Required.
    pub fn source(mut self, input: impl Into<LocalSource>) -> Self {
        self.source = Some(input.into());
        self
    }

    /// The local data to compare with the object.
    pub fn set_source(mut self, input: Option<LocalSource>) -> Self {
        self.source = input;
        self
    }

    /// The local data to compare with the object.
    pub fn get_source(&self) -> &Option<LocalSource> {
        &self.source
    }

    /// Consumes the builder and constructs a [`VerifyInput`](crate::operation::verify::VerifyInput).
    pub fn build(self) -> Result<VerifyInput, BuildError> {
        let bucket = self
            .bucket
            .filter(|bucket| !bucket.is_empty())
            .ok_or_else(|| BuildError::missing_field("bucket", "a bucket is required"))?;
        let key = self
            .key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| BuildError::missing_field("key", "a key is required"))?;
        let source = self
            .source
            .ok_or_else(|| BuildError::missing_field("source", "a local source is required"))?;

        Ok(VerifyInput {
            bucket,
            key,
            version_id: self.version_id,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::VerifyInput;
    use crate::io::LocalSource;

    #[test]
    fn test_required_fields() {
        assert!(VerifyInput::builder().key("k").source(LocalSource::Stdin).build().is_err());
        assert!(VerifyInput::builder().bucket("b").source(LocalSource::Stdin).build().is_err());
        assert!(VerifyInput::builder().bucket("b").key("k").build().is_err());
        assert!(VerifyInput::builder()
            .bucket("")
            .key("k")
            .source(LocalSource::Stdin)
            .build()
            .is_err());

        let input = VerifyInput::builder()
            .bucket("b")
            .key("k")
            .source(LocalSource::Stdin)
            .build()
            .unwrap();
        assert_eq!("b", input.bucket());
        assert_eq!("k", input.key());
        assert_eq!(None, input.version_id());
    }
}
