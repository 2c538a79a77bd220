use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type ReaderResult<T> = Result<T, ReaderError>;

/// Failures raised by [`ByteReader`](crate::ByteReader).
#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("{} is a directory", .0.display())]
    IsDirectory(PathBuf),
    #[error("{} is not readable", .path.display())]
    NotReadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Short read: the file ended before the requested bytes were available.
    #[error("read error in {} at offset {offset:#x}", .path.display())]
    ReadError {
        path: PathBuf,
        offset: u64,
        #[source]
        source: io::Error,
    },
}

/// Why a probe failed. `ArchitectureProbe::probe` flattens all of these into `None`.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("unrecognized magic number {0:#010x}")]
    InvalidMagic(u32),
    #[error(transparent)]
    Io(#[from] ReaderError),
}
