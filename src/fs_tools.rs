use std::{
    fs::File,
    io::{ErrorKind, Read, Write},
    path::Path,
};

use crate::error::{Endpoint, Error, Result};

/// Maximum number of bytes handed out by a single [`Source::read`].
pub const CHUNK_SIZE: usize = 1024;

/// Yields successive chunks until the input is exhausted.
pub trait Source {
    /// Returns the next chunk, or `None` once no further bytes exist.
    /// A chunk may be shorter than [`CHUNK_SIZE`] without ending the input.
    fn read(&mut self) -> Result<Option<&[u8]>>;

    fn close(self) -> Result<()>
    where
        Self: Sized;
}

/// Accepts chunks and persists each one in full.
pub trait Sink {
    fn write(&mut self, chunk: &[u8]) -> Result<()>;

    fn close(self) -> Result<()>
    where
        Self: Sized;
}

pub struct ReaderSource<R> {
    inner: R,
    buffer: Box<[u8; CHUNK_SIZE]>,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        ReaderSource {
            inner,
            buffer: Box::new([0; CHUNK_SIZE]),
        }
    }
}

impl ReaderSource<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::OpenInput {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("opened input {}", path.display());
        Ok(Self::new(file))
    }
}

impl<R: Read> Source for ReaderSource<R> {
    fn read(&mut self) -> Result<Option<&[u8]>> {
        let n = loop {
            match self.inner.read(&mut self.buffer[..]) {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(Error::Read(err)),
            }
        };
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(&self.buffer[..n]))
    }

    fn close(self) -> Result<()> {
        drop(self.inner);
        log::debug!("closed input");
        Ok(())
    }
}

/// Hook run by [`WriterSink::close`] after flushing.
pub trait Finish {
    fn finish(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Finish for File {
    fn finish(&mut self) -> std::io::Result<()> {
        self.sync_all()
    }
}

impl Finish for Vec<u8> {}

impl<W: Finish + ?Sized> Finish for &mut W {
    fn finish(&mut self) -> std::io::Result<()> {
        (**self).finish()
    }
}

pub struct WriterSink<W> {
    inner: W,
}

impl<W: Write + Finish> WriterSink<W> {
    pub fn new(inner: W) -> Self {
        WriterSink { inner }
    }
}

impl WriterSink<File> {
    /// Creates the file at `path`, truncating it if it already exists.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::OpenOutput {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("created output {}", path.display());
        Ok(Self::new(file))
    }
}

impl<W: Write + Finish> Sink for WriterSink<W> {
    fn write(&mut self, chunk: &[u8]) -> Result<()> {
        self.inner.write_all(chunk).map_err(Error::Write)
    }

    fn close(mut self) -> Result<()> {
        self.inner
            .flush()
            .and_then(|()| self.inner.finish())
            .map_err(|source| Error::Close {
                endpoint: Endpoint::Sink,
                source,
            })?;
        log::debug!("closed output");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    struct Interrupting {
        interrupted: bool,
        data: Cursor<Vec<u8>>,
    }

    impl Read for Interrupting {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            self.data.read(buf)
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::Other, "disk on fire"))
        }
    }

    fn drain<S: Source>(source: &mut S) -> Vec<usize> {
        let mut sizes = Vec::new();
        while let Some(chunk) = source.read().unwrap() {
            sizes.push(chunk.len());
        }
        sizes
    }

    #[test]
    fn reads_fixed_size_chunks() {
        let mut source = ReaderSource::new(Cursor::new(vec![7u8; CHUNK_SIZE * 2 + 10]));
        assert_eq!(drain(&mut source), vec![CHUNK_SIZE, CHUNK_SIZE, 10]);
        // Exhausted sources keep reporting the end of input.
        assert!(source.read().unwrap().is_none());
        source.close().unwrap();
    }

    #[test]
    fn empty_input_ends_immediately() {
        let mut source = ReaderSource::new(Cursor::new(Vec::new()));
        assert!(source.read().unwrap().is_none());
    }

    #[test]
    fn retries_interrupted_reads() {
        let mut source = ReaderSource::new(Interrupting {
            interrupted: false,
            data: Cursor::new(b"abc".to_vec()),
        });
        assert_eq!(source.read().unwrap(), Some(&b"abc"[..]));
    }

    #[test]
    fn read_fault_is_not_end_of_input() {
        let mut source = ReaderSource::new(Broken);
        assert!(matches!(source.read(), Err(Error::Read(_))));
    }

    #[test]
    fn missing_input_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ReaderSource::open(dir.path().join("missing.txt"));
        assert!(matches!(result, Err(Error::OpenInput { .. })));
    }

    #[test]
    fn file_sink_truncates_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "stale contents that are long").unwrap();

        let mut sink = WriterSink::create(&path).unwrap();
        sink.write(b"fresh").unwrap();
        sink.close().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"fresh");
    }

    #[test]
    fn uncreatable_output_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = WriterSink::create(dir.path().join("no/such/dir/out.txt"));
        assert!(matches!(result, Err(Error::OpenOutput { .. })));
    }

    #[test]
    fn memory_sink_collects_chunks() {
        let mut buffer = Vec::new();
        let mut sink = WriterSink::new(&mut buffer);
        sink.write(b"ab").unwrap();
        sink.write(b"").unwrap();
        sink.write(b"cd").unwrap();
        sink.close().unwrap();
        assert_eq!(buffer, b"abcd");
    }
}
