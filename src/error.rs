//! Errors that can arise while compressing, decompressing, or moving files around.
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Everything that can go wrong in the codec and its tools.
#[derive(Debug)]
pub enum SlyError {
    /// Bad or missing command line arguments.
    Configuration(String),
    /// A file could not be opened, read, or written.
    Io { path: PathBuf, source: io::Error },
    /// The compressed stream is malformed or truncated.
    Format { offset: usize, reason: &'static str },
    /// A zero-length source was given where data is required.
    EmptyInput,
    /// A batch job panicked. Holds the panic message when there was one.
    Panicked(String),
}

pub type Result<T> = std::result::Result<T, SlyError>;

impl SlyError {
    /// Attach a path to an I/O error.
    pub fn io<P: AsRef<Path>>(path: P, source: io::Error) -> Self {
        SlyError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for SlyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlyError::Configuration(msg) => write!(f, "{}", msg),
            SlyError::Io { path, source } => {
                write!(f, "Failed to access {}: {}", path.display(), source)
            }
            SlyError::Format { offset, reason } => {
                write!(f, "Malformed compressed stream at byte {}: {}", offset, reason)
            }
            SlyError::EmptyInput => write!(f, "Empty input file"),
            SlyError::Panicked(msg) => write!(f, "Job panicked: {}", msg),
        }
    }
}

impl std::error::Error for SlyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SlyError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for SlyError {
    fn from(error: io::Error) -> Self {
        SlyError::Io {
            path: PathBuf::new(),
            source: error,
        }
    }
}
