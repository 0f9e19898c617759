//! Deferred content writers.
//!
//! A [`WriteFn`] is installed into a body part or file and only invoked when
//! the owning message is serialized. It may be invoked any number of times.

use bytes::Bytes;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

type WriteClosure = dyn Fn(&mut dyn Write) -> io::Result<u64> + Send + Sync;

/// A repeatable writer of part content.
#[derive(Clone)]
pub struct WriteFn {
    inner: Arc<WriteClosure>,
}

impl WriteFn {
    /// Wraps an arbitrary write closure.
    ///
    /// The closure returns the number of bytes it wrote.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut dyn Write) -> io::Result<u64> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Creates a writer that always emits the given bytes.
    #[must_use]
    pub fn from_bytes(content: impl Into<Bytes>) -> Self {
        let content: Bytes = content.into();
        Self::new(move |sink| {
            sink.write_all(&content)?;
            Ok(content.len() as u64)
        })
    }

    /// Writes the content to `sink`, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the sink or the underlying closure.
    pub fn write_to(&self, sink: &mut dyn Write) -> io::Result<u64> {
        (self.inner)(sink)
    }

    /// Collects the content into a buffer.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the underlying closure.
    pub fn to_vec(&self) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(buffer)
    }
}

impl fmt::Debug for WriteFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteFn").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_bytes_reports_length() {
        let writer = WriteFn::from_bytes("Hello, World!");
        let mut sink = Vec::new();
        let written = writer.write_to(&mut sink).unwrap();
        assert_eq!(written, 13);
        assert_eq!(sink, b"Hello, World!");
    }

    #[test]
    fn test_custom_closure() {
        let writer = WriteFn::new(|sink| {
            sink.write_all(b"abc")?;
            sink.write_all(b"def")?;
            Ok(6)
        });
        assert_eq!(writer.to_vec().unwrap(), b"abcdef");
    }

    #[test]
    fn test_sink_error_propagates() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("sink closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let writer = WriteFn::from_bytes("data");
        let err = writer.write_to(&mut Broken).unwrap_err();
        assert_eq!(err.to_string(), "sink closed");
    }

    proptest! {
        #[test]
        fn prop_repeated_writes_are_identical(content in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let writer = WriteFn::from_bytes(content.clone());
            let first = writer.to_vec().unwrap();
            let second = writer.clone().to_vec().unwrap();
            prop_assert_eq!(&first, &content);
            prop_assert_eq!(first, second);
        }
    }
}
