/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::cmp;
use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

/// Reads consecutive byte ranges from a forward-only stream.
///
/// Every byte of the stream is handed out exactly once, in order. The stream is
/// never rewound.
#[derive(Debug)]
pub(crate) struct PartReader<R> {
    inner: R,
    buf: Box<[u8]>,
    // number of bytes consumed from `inner` so far
    position: u64,
}

impl<R> PartReader<R>
where
    R: AsyncRead + Unpin,
{
    pub(crate) fn new(inner: R, buffer_size: usize) -> Self {
        let buffer_size = cmp::max(buffer_size, 1);
        Self {
            inner,
            buf: vec![0; buffer_size].into_boxed_slice(),
            position: 0,
        }
    }

    /// Total number of bytes read so far
    #[cfg(test)]
    pub(crate) fn position(&self) -> u64 {
        self.position
    }

    /// Read the next `len` bytes, passing every chunk to `sink` in order.
    ///
    /// Returns the number of bytes read, which is less than `len` only if the stream
    /// ended early.
    pub(crate) async fn read_range<F>(&mut self, len: u64, mut sink: F) -> Result<u64, io::Error>
    where
        F: FnMut(&[u8]),
    {
        let mut remaining = len;
        while remaining > 0 {
            let want = cmp::min(remaining, self.buf.len() as u64) as usize;
            let n = self.fill(want).await?;
            if n == 0 {
                break;
            }
            sink(&self.buf[..n]);
            remaining -= n as u64;
        }
        Ok(len - remaining)
    }

    /// Read until the end of the stream, passing every chunk to `sink` in order.
    ///
    /// Returns the number of bytes read.
    pub(crate) async fn read_to_end<F>(&mut self, mut sink: F) -> Result<u64, io::Error>
    where
        F: FnMut(&[u8]),
    {
        let start = self.position;
        loop {
            let n = self.fill(self.buf.len()).await?;
            if n == 0 {
                break;
            }
            sink(&self.buf[..n]);
        }
        Ok(self.position - start)
    }

    /// Read up to `want` bytes into the front of the buffer
    async fn fill(&mut self, want: usize) -> Result<usize, io::Error> {
        loop {
            match self.inner.read(&mut self.buf[..want]).await {
                Ok(n) => {
                    self.position += n as u64;
                    tracing::trace!("read {n} bytes, position={}", self.position);
                    return Ok(n);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::io;

    use super::PartReader;

    const DATA: &[u8] = b"a lep is a ball, a tay is a hammer, a flix is a comb";

    #[tokio::test]
    async fn test_read_consecutive_ranges() {
        // buffer smaller than a range forces multiple reads per range
        let mut reader = PartReader::new(DATA, 3);
        let mut ranges = Vec::new();
        for len in [8, 8, 19, 17] {
            let mut range = Vec::new();
            let n = reader
                .read_range(len, |chunk| range.extend_from_slice(chunk))
                .await
                .unwrap();
            assert_eq!(len, n);
            ranges.push(range);
        }

        assert_eq!(b"a lep is".as_slice(), ranges[0].as_slice());
        assert_eq!(DATA, ranges.concat().as_slice());
        assert_eq!(DATA.len() as u64, reader.position());
    }

    #[tokio::test]
    async fn test_read_range_past_end() {
        let mut reader = PartReader::new(&b"short"[..], 1024);
        let mut seen = Vec::new();
        let n = reader
            .read_range(100, |chunk| seen.extend_from_slice(chunk))
            .await
            .unwrap();
        assert_eq!(5, n);
        assert_eq!(b"short".as_slice(), seen.as_slice());

        let n = reader.read_range(1, |_| panic!("no data expected")).await.unwrap();
        assert_eq!(0, n);
    }

    #[tokio::test]
    async fn test_read_to_end() {
        let mut reader = PartReader::new(DATA, 7);
        reader.read_range(2, |_| {}).await.unwrap();
        let mut rest = Vec::new();
        let n = reader
            .read_to_end(|chunk| rest.extend_from_slice(chunk))
            .await
            .unwrap();
        assert_eq!(DATA.len() as u64 - 2, n);
        assert_eq!(&DATA[2..], rest.as_slice());
    }

    #[tokio::test]
    async fn test_read_error_propagates() {
        let stream = tokio_test::io::Builder::new()
            .read(b"abc")
            .read_error(io::Error::other("device unplugged"))
            .build();
        let mut reader = PartReader::new(stream, 16);
        let err = reader.read_range(10, |_| {}).await.unwrap_err();
        assert_eq!("device unplugged", err.to_string());
        assert_eq!(3, reader.position());
    }
}
