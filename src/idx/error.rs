use std::fmt;
use std::io;

use thiserror::Error;

use super::dtype::ElementKind;

// ---------------------------------------------------------------------------
// Stream failures
// ---------------------------------------------------------------------------

/// Failure of the underlying seekable stream during a positioned read.
#[derive(Error, Debug)]
pub enum IoError {
    #[error("truncated read at offset {offset}: expected {expected} bytes, got {actual}")]
    Truncated { offset: u64, expected: u64, actual: u64 },

    #[error("failed to seek to offset {offset}: {source}")]
    SeekFailed {
        offset: u64,
        #[source]
        source: io::Error,
    },

    #[error("read failed at offset {offset}: {source}")]
    Read {
        offset: u64,
        #[source]
        source: io::Error,
    },
}

// ---------------------------------------------------------------------------
// Decode failures
// ---------------------------------------------------------------------------

/// Everything that can go wrong while decoding an IDX file.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed magic number: leading bytes {0:#06x} are not zero")]
    MalformedMagic(u16),

    #[error("unknown IDX data type tag {tag:#04x}")]
    UnknownDataType { tag: u8 },

    #[error("header declares zero dimensions")]
    NoDimensions,

    #[error("dimension {index} is missing or truncated")]
    MalformedDimension { index: usize },

    #[error("expected a rank-{expected} tensor, found rank {found}")]
    UnexpectedRank { expected: usize, found: usize },

    #[error("record index {index} out of range (file holds {count} records)")]
    IndexOutOfRange { index: u64, count: u64 },

    #[error("inconsistent number of images and labels: {images} != {labels}")]
    RecordCountMismatch { images: u64, labels: u64 },

    #[error("labels of type {kind} are not supported")]
    UnsupportedLabelType { kind: ElementKind },

    #[error("record address for index {index} overflows a 64-bit offset")]
    AddressOverflow { index: u64 },

    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Header(#[from] HeaderErrors),
}

// ---------------------------------------------------------------------------
// Collected header errors
// ---------------------------------------------------------------------------

/// All structural problems found in one pass over a header, in file order.
///
/// Never empty: a header pass that finds nothing wrong yields a `Header`.
#[derive(Error, Debug)]
#[error("malformed IDX header: {}", join(.0))]
pub struct HeaderErrors(Vec<DecodeError>);

impl HeaderErrors {
    /// Wrap collected errors; `None` when nothing went wrong.
    pub(crate) fn from_vec(errors: Vec<DecodeError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(HeaderErrors(errors))
        }
    }

    pub(crate) fn single(error: DecodeError) -> Self {
        HeaderErrors(vec![error])
    }

    pub fn errors(&self) -> &[DecodeError] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<DecodeError> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn join(errors: &[DecodeError]) -> JoinedErrors<'_> {
    JoinedErrors(errors)
}

struct JoinedErrors<'a>(&'a [DecodeError]);

impl fmt::Display for JoinedErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}
