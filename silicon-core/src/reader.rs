use crate::error::{ReaderError, ReaderResult};
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Sequential, fail-fast binary reader over a single file.
///
/// The cursor only ever moves forward. Every fixed-width read either consumes
/// exactly the requested number of bytes or fails with
/// [`ReaderError::ReadError`]. The underlying file handle is released when the
/// reader is dropped, whether or not parsing finished.
#[derive(Debug)]
pub struct ByteReader {
    path: PathBuf,
    stream: BufReader<File>,
    position: u64,
}

impl ByteReader {
    /// Opens `path` for reading, positioned at offset 0.
    pub fn open<P: AsRef<Path>>(path: P) -> ReaderResult<Self> {
        let path = path.as_ref().to_path_buf();

        let metadata = match std::fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ReaderError::NotFound(path));
            }
            Err(source) => return Err(ReaderError::NotReadable { path, source }),
        };

        if metadata.is_dir() {
            return Err(ReaderError::IsDirectory(path));
        }

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(source) => return Err(ReaderError::NotReadable { path, source }),
        };

        log::debug!("Opened {} ({} bytes)", path.display(), metadata.len());

        Ok(Self {
            path,
            stream: BufReader::new(file),
            position: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    fn read_with<T>(
        &mut self,
        width: u64,
        read: impl FnOnce(&mut BufReader<File>) -> io::Result<T>,
    ) -> ReaderResult<T> {
        let offset = self.position;
        match read(&mut self.stream) {
            Ok(value) => {
                self.position += width;
                Ok(value)
            }
            Err(source) => Err(ReaderError::ReadError {
                path: self.path.clone(),
                offset,
                source,
            }),
        }
    }

    /// Reads exactly `n` bytes. `n == 0` returns an empty block without touching the file.
    pub fn read_bytes(&mut self, n: usize) -> ReaderResult<Vec<u8>> {
        if n == 0 {
            return Ok(Vec::new());
        }

        // Grow with the data actually present rather than trusting `n` up front.
        let offset = self.position;
        let mut buf = Vec::new();
        let got = match self.stream.by_ref().take(n as u64).read_to_end(&mut buf) {
            Ok(got) => got,
            Err(source) => {
                return Err(ReaderError::ReadError {
                    path: self.path.clone(),
                    offset,
                    source,
                });
            }
        };
        self.position += got as u64;

        if got != n {
            return Err(ReaderError::ReadError {
                path: self.path.clone(),
                offset,
                source: io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("wanted {n} bytes, got {got}"),
                ),
            });
        }
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> ReaderResult<u8> {
        self.read_with(1, |s| s.read_u8())
    }

    pub fn read_i8(&mut self) -> ReaderResult<i8> {
        self.read_with(1, |s| s.read_i8())
    }

    pub fn read_u16_be(&mut self) -> ReaderResult<u16> {
        self.read_with(2, |s| s.read_u16::<BigEndian>())
    }

    pub fn read_u16_le(&mut self) -> ReaderResult<u16> {
        self.read_with(2, |s| s.read_u16::<LittleEndian>())
    }

    pub fn read_u32_be(&mut self) -> ReaderResult<u32> {
        self.read_with(4, |s| s.read_u32::<BigEndian>())
    }

    pub fn read_u32_le(&mut self) -> ReaderResult<u32> {
        self.read_with(4, |s| s.read_u32::<LittleEndian>())
    }

    pub fn read_u64_be(&mut self) -> ReaderResult<u64> {
        self.read_with(8, |s| s.read_u64::<BigEndian>())
    }

    pub fn read_u64_le(&mut self) -> ReaderResult<u64> {
        self.read_with(8, |s| s.read_u64::<LittleEndian>())
    }

    /// Reads bytes up to and including a NUL terminator. Each byte becomes one
    /// `char` (Latin-1); the terminator is not part of the result.
    pub fn read_cstring(&mut self) -> ReaderResult<String> {
        let mut s = String::new();
        loop {
            match self.read_u8()? {
                0 => break,
                c => s.push(char::from(c)),
            }
        }
        Ok(s)
    }
}
