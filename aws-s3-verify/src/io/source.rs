/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::io::AsyncRead;

use crate::error;

/// Where the local data to verify comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalSource {
    /// A file (or anything else that can be opened by path)
    Path(PathBuf),

    /// Standard input. The size of the data is unknown up front.
    Stdin,
}

impl LocalSource {
    /// Create a source that reads from the given path
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        LocalSource::Path(path.as_ref().to_path_buf())
    }

    /// Open the source for reading.
    ///
    /// The size is only reported for regular files, pipes and character devices
    /// opened by path are treated like standard input.
    pub async fn open(&self) -> Result<LocalStream, error::Error> {
        match self {
            LocalSource::Path(path) => {
                let file = tokio::fs::File::open(path).await?;
                let metadata = file.metadata().await?;
                if metadata.is_dir() {
                    return Err(error::invalid_input(format!(
                        "{} is a directory",
                        path.display()
                    )));
                }
                let size = metadata.is_file().then(|| metadata.len());
                tracing::debug!("opened {} (size: {size:?})", path.display());
                Ok(LocalStream::new(file, size))
            }
            LocalSource::Stdin => Ok(LocalStream::new(tokio::io::stdin(), None)),
        }
    }
}

impl From<PathBuf> for LocalSource {
    fn from(value: PathBuf) -> Self {
        LocalSource::Path(value)
    }
}

impl From<&Path> for LocalSource {
    fn from(value: &Path) -> Self {
        LocalSource::from_path(value)
    }
}

/// An opened [`LocalSource`]
pub struct LocalStream {
    reader: Box<dyn AsyncRead + Send + Unpin>,
    size: Option<u64>,
}

impl LocalStream {
    /// Wrap an arbitrary reader. `size` is the total length when it is known up front.
    pub fn new(reader: impl AsyncRead + Send + Unpin + 'static, size: Option<u64>) -> Self {
        Self {
            reader: Box::new(reader),
            size,
        }
    }

    /// The total length of the data, if it is known before reading
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub(crate) fn into_parts(self) -> (Box<dyn AsyncRead + Send + Unpin>, Option<u64>) {
        (self.reader, self.size)
    }
}

impl fmt::Debug for LocalStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalStream")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
