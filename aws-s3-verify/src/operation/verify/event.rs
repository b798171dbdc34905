/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use super::PartResult;
use crate::types::ChecksumAlgorithm;

/// Progress notifications emitted while a verification runs
#[derive(Debug)]
#[non_exhaustive]
pub enum VerifyEvent<'a> {
    /// The local data was opened and the object attributes are about to be fetched
    FetchingAttributes {
        /// The bucket containing the object
        bucket: &'a str,
        /// The key of the object
        key: &'a str,
    },

    /// The bucket's region was resolved with `GetBucketLocation`
    BucketRegionResolved {
        /// The resolved region
        region: &'a str,
    },

    /// The object attributes were fetched and hashing is about to start
    Started {
        /// The algorithm the object was uploaded with
        algorithm: ChecksumAlgorithm,
        /// The whole-object checksum reported by S3
        remote_checksum: &'a str,
        /// Number of parts, `None` for objects uploaded in a single request
        part_count: Option<usize>,
    },

    /// A part was hashed and compared
    PartVerified(&'a PartResult),
}

type Listener = Box<dyn FnMut(&VerifyEvent<'_>) + Send>;

/// Optional receiver of [`VerifyEvent`]s
#[derive(Default)]
pub(crate) struct EventSink(Option<Listener>);

impl EventSink {
    pub(crate) fn new<F>(listener: F) -> Self
    where
        F: FnMut(&VerifyEvent<'_>) + Send + 'static,
    {
        Self(Some(Box::new(listener)))
    }

    pub(crate) fn emit(&mut self, event: &VerifyEvent<'_>) {
        if let Some(listener) = self.0.as_mut() {
            listener(event);
        }
    }
}

impl fmt::Debug for EventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EventSink")
            .field(&self.0.as_ref().map(|_| "<listener>"))
            .finish()
    }
}
