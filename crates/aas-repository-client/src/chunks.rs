//! Chunked reading of upload sources.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Default upload chunk size (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Lazy sequence of byte chunks read from an open file.
///
/// Finite and not restartable: once the file is exhausted (or a read fails)
/// the iterator yields `None` forever. The file handle is owned, so it is
/// closed when the iterator is dropped, whether or not it was drained.
#[derive(Debug)]
pub struct FileChunks {
    file: File,
    chunk_size: usize,
    done: bool,
}

impl FileChunks {
    /// Open `path` for reading.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened.
    pub fn open(path: &Path, chunk_size: usize) -> io::Result<Self> {
        Ok(Self::new(File::open(path)?, chunk_size))
    }

    /// Wrap an already open file. A zero chunk size is raised to one byte.
    #[must_use]
    pub fn new(file: File, chunk_size: usize) -> Self {
        Self {
            file,
            chunk_size: chunk_size.max(1),
            done: false,
        }
    }

    /// Turn the chunks into a `Read` for streaming request bodies.
    #[must_use]
    pub fn into_reader(self) -> ChunkReader {
        ChunkReader {
            chunks: self,
            current: Vec::new(),
            pos: 0,
        }
    }
}

impl Iterator for FileChunks {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let limit = u64::try_from(self.chunk_size).unwrap_or(u64::MAX);
        let mut chunk = Vec::with_capacity(self.chunk_size);
        match self.file.by_ref().take(limit).read_to_end(&mut chunk) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => Some(Ok(chunk)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// `Read` adapter over `FileChunks`.
#[derive(Debug)]
pub struct ChunkReader {
    chunks: FileChunks,
    current: Vec<u8>,
    pos: usize,
}

impl Read for ChunkReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.pos >= self.current.len() {
            match self.chunks.next() {
                Some(chunk) => {
                    self.current = chunk?;
                    self.pos = 0;
                }
                None => return Ok(0),
            }
        }

        let n = buf.len().min(self.current.len() - self.pos);
        buf[..n].copy_from_slice(&self.current[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn splits_into_fixed_chunks() {
        let file = temp_file(b"abcdefghij");
        let chunks: Vec<Vec<u8>> = FileChunks::open(file.path(), 4)
            .unwrap()
            .map(Result::unwrap)
            .collect();

        assert_eq!(chunks, vec![b"abcd".to_vec(), b"efgh".to_vec(), b"ij".to_vec()]);
    }

    #[test]
    fn empty_file_yields_nothing() {
        let file = temp_file(b"");
        let mut chunks = FileChunks::open(file.path(), 4).unwrap();
        assert!(chunks.next().is_none());
        assert!(chunks.next().is_none());
    }

    #[test]
    fn not_restartable() {
        let file = temp_file(b"xy");
        let mut chunks = FileChunks::open(file.path(), 8).unwrap();
        assert_eq!(chunks.next().unwrap().unwrap(), b"xy");
        assert!(chunks.next().is_none());
        assert!(chunks.next().is_none());
    }

    #[test]
    fn reader_yields_whole_content() {
        let content: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        let file = temp_file(&content);

        let mut read_back = Vec::new();
        FileChunks::open(file.path(), 333)
            .unwrap()
            .into_reader()
            .read_to_end(&mut read_back)
            .unwrap();

        assert_eq!(read_back, content);
    }
}
