//! Error type and integer status codes.

use std::io;
use std::path::PathBuf;

use aes_core::KeyError;
use thiserror::Error;

/// Failures raised by the stream, padding and file codecs.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller error detected before any work was done.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The key could not be built from the supplied input.
    #[error(transparent)]
    InvalidKey(#[from] KeyError),

    /// A buffer that must be block aligned was not.
    #[error("{context} length {actual} is not a multiple of 16 bytes")]
    MalformedLength {
        /// What was being processed.
        context: &'static str,
        /// The offending length.
        actual: u64,
    },

    /// Padding removal found a pad count that cannot be valid.
    #[error("invalid padding byte {value:#04x} for a {len}-byte buffer")]
    InvalidPadding {
        /// Value of the last decrypted byte.
        value: u8,
        /// Length of the decrypted buffer.
        len: usize,
    },

    /// The input file could not be opened.
    #[error("cannot open input {}: {source}", .path.display())]
    OpenInput {
        /// Input path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The output file could not be created.
    #[error("cannot create output {}: {source}", .path.display())]
    CreateOutput {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The input file has no content.
    #[error("input {} is empty", .0.display())]
    EmptyInput(PathBuf),

    /// Read or write failure after both files were opened.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Small integer status codes, one per failure class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Status {
    /// Success.
    Ok = 0x00,
    /// Input file missing or unreadable.
    InputUnavailable = 0x01,
    /// Input file is empty.
    EmptyInput = 0x02,
    /// Ciphertext length not a multiple of 16.
    MalformedLength = 0x03,
    /// Output file could not be created.
    OutputUnavailable = 0x04,
    /// Read or write failure mid-stream.
    Io = 0x05,
    /// Padding rejected on removal.
    InvalidPadding = 0x06,
    /// Caller error.
    InvalidArgument = 0x0a,
}

impl Status {
    /// Numeric form of the status.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl Error {
    /// Maps the error onto its status code.
    pub fn status(&self) -> Status {
        match self {
            Error::InvalidArgument(_) | Error::InvalidKey(_) => Status::InvalidArgument,
            Error::MalformedLength { .. } => Status::MalformedLength,
            Error::InvalidPadding { .. } => Status::InvalidPadding,
            Error::OpenInput { .. } => Status::InputUnavailable,
            Error::CreateOutput { .. } => Status::OutputUnavailable,
            Error::EmptyInput(_) => Status::EmptyInput,
            Error::Io(_) => Status::Io,
        }
    }
}

impl<T> From<&Result<T>> for Status {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Status::Ok,
            Err(err) => err.status(),
        }
    }
}

/// Rejects `len` unless it is a whole number of blocks.
pub(crate) fn ensure_aligned(context: &'static str, len: usize) -> Result<()> {
    if len % aes_core::BLOCK_SIZE != 0 {
        return Err(Error::MalformedLength {
            context,
            actual: len as u64,
        });
    }
    Ok(())
}
