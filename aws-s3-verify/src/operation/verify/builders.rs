/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use crate::io::LocalSource;

use super::event::EventSink;
use super::{VerifyEvent, VerifyInputBuilder, VerifyOutput};

/// Fluent builder for verifying a local file against a single S3 object
#[derive(Debug)]
pub struct VerifyFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: VerifyInputBuilder,
    events: EventSink,
}

impl VerifyFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: std::default::Default::default(),
            events: EventSink::default(),
        }
    }

    /// Fetch the object's checksum attributes and compare them with the local data
    #[tracing::instrument(skip_all, level = "debug", name = "initiate-verify", fields(
        bucket = self.inner.bucket.as_deref().unwrap_or_default(),
        key = self.inner.key.as_deref().unwrap_or_default(),
    ))]
    pub async fn send(self) -> Result<VerifyOutput, crate::error::Error> {
        let input = self.inner.build()?;
        crate::operation::verify::Verify::orchestrate(self.handle, input, self.events).await
    }

    /// The bucket containing the object.
    /// Required.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.bucket(input);
        self
    }

    /// The bucket containing the object.
    pub fn set_bucket(mut self, input: Option<String>) -> Self {
        self.inner = self.inner.set_bucket(input);
        self
    }

    /// The bucket containing the object.
    pub fn get_bucket(&self) -> &Option<String> {
        self.inner.get_bucket()
    }

    /// The key of the object.
    /// Required.
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.key(input);
        self
    }

    /// The key of the object.
    pub fn set_key(mut self, input: Option<String>) -> Self {
        self.inner = self.inner.set_key(input);
        self
    }

    /// The key of the object.
    pub fn get_key(&self) -> &Option<String> {
        self.inner.get_key()
    }

    /// The object version to verify, defaults to the current version.
    pub fn version_id(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.version_id(input);
        self
    }

    /// The object version to verify.
    pub fn set_version_id(mut self, input: Option<String>) -> Self {
        self.inner = self.inner.set_version_id(input);
        self
    }

    /// The object version to verify.
    pub fn get_version_id(&self) -> &Option<String> {
        self.inner.get_version_id()
    }

    /// The local data to compare with the object.
    /// Required.
    pub fn source(mut self, input: impl Into<LocalSource>) -> Self {
        self.inner = self.inner.source(input);
        self
    }

    /// The local data to compare with the object.
    pub fn set_source(mut self, input: Option<LocalSource>) -> Self {
        self.inner = self.inner.set_source(input);
        self
    }

    /// The local data to compare with the object.
    pub fn get_source(&self) -> &Option<LocalSource> {
        self.inner.get_source()
    }

    /// Receive progress events while the verification runs.
    ///
    /// The listener is called on the task driving [`send`](Self::send).
    pub fn on_event<F>(mut self, listener: F) -> Self
    where
        F: FnMut(&VerifyEvent<'_>) + Send + 'static,
    {
        self.events = EventSink::new(listener);
        self
    }
}

impl crate::operation::verify::input::VerifyInputBuilder {
    /// Verify a local file with this input using the given client.
    pub async fn send_with(
        self,
        client: &crate::Client,
    ) -> Result<VerifyOutput, crate::error::Error> {
        let mut fluent_builder = client.verify();
        fluent_builder.inner = self;
        fluent_builder.send().await
    }
}
