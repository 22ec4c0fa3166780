use std::io::{Read, Seek, SeekFrom};

use serde::Serialize;

use super::address::fill;
use super::dtype::{decode_type_tag, DataType};
use super::error::{DecodeError, HeaderErrors, IoError};

/// Size of the magic number: two zero bytes, the type tag, the dimension count.
pub const MAGIC_LEN: u64 = 4;

// ---------------------------------------------------------------------------
// Header – decoded magic number and dimension list
// ---------------------------------------------------------------------------

/// A validated IDX header.
///
/// Only constructed by [`decode_header`], so the zero prefix and a non-empty
/// dimension list are guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    data_type: DataType,
    /// `dimensions[0]` is the record count, the rest is the per-record shape.
    dimensions: Vec<u32>,
}

impl Header {
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// All dimension sizes, leading record count first. Never empty.
    pub fn dimensions(&self) -> &[u32] {
        &self.dimensions
    }

    pub fn dimension_count(&self) -> usize {
        self.dimensions.len()
    }

    /// Number of records along the leading dimension.
    pub fn record_count(&self) -> u64 {
        u64::from(self.dimensions[0])
    }

    /// Shape of a single record (empty for scalar records).
    pub fn record_shape(&self) -> &[u32] {
        &self.dimensions[1..]
    }

    /// Byte offset of the first payload byte: `4 + 4 * dimension_count`.
    pub fn header_byte_size(&self) -> u64 {
        MAGIC_LEN + 4 * self.dimensions.len() as u64
    }

    /// Elements per record; `None` if the product overflows.
    pub fn record_element_count(&self) -> Option<u64> {
        self.record_shape()
            .iter()
            .try_fold(1u64, |acc, d| acc.checked_mul(u64::from(*d)))
    }

    /// Bytes per record; `None` if the product overflows.
    pub fn record_byte_size(&self) -> Option<u64> {
        self.record_element_count()?
            .checked_mul(self.data_type.width_bytes())
    }

    /// Fail unless the tensor has exactly `rank` dimensions.
    pub fn expect_rank(&self, rank: usize) -> Result<(), DecodeError> {
        if self.dimensions.len() == rank {
            Ok(())
        } else {
            Err(DecodeError::UnexpectedRank {
                expected: rank,
                found: self.dimensions.len(),
            })
        }
    }

    /// Fail unless `index` addresses an existing record.
    pub fn check_index(&self, index: u64) -> Result<(), DecodeError> {
        let count = self.record_count();
        if index < count {
            Ok(())
        } else {
            Err(DecodeError::IndexOutOfRange { index, count })
        }
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// Decode the header at the start of `stream`.
///
/// The stream is rewound to offset 0 first, whatever its current position.
/// Structural problems are collected over the whole pass and reported
/// together; only a stream failure on the magic number stops the pass early.
pub fn decode_header<R: Read + Seek>(stream: &mut R) -> Result<Header, HeaderErrors> {
    if let Err(source) = stream.seek(SeekFrom::Start(0)) {
        return Err(HeaderErrors::single(
            IoError::SeekFailed { offset: 0, source }.into(),
        ));
    }

    let mut magic = [0u8; MAGIC_LEN as usize];
    match fill(stream, &mut magic) {
        Ok(n) if n == magic.len() => {}
        Ok(n) => {
            return Err(HeaderErrors::single(
                IoError::Truncated {
                    offset: 0,
                    expected: MAGIC_LEN,
                    actual: n as u64,
                }
                .into(),
            ));
        }
        Err(source) => {
            return Err(HeaderErrors::single(
                IoError::Read { offset: 0, source }.into(),
            ));
        }
    }

    let mut errors = Vec::new();

    let prefix = u16::from_be_bytes([magic[0], magic[1]]);
    if prefix != 0 {
        errors.push(DecodeError::MalformedMagic(prefix));
    }

    let data_type = match decode_type_tag(magic[2]) {
        Ok(dt) => Some(dt),
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let dimension_count = usize::from(magic[3]);
    if dimension_count == 0 {
        errors.push(DecodeError::NoDimensions);
    }

    let mut dimensions = Vec::with_capacity(dimension_count);
    for index in 0..dimension_count {
        let mut buf = [0u8; 4];
        match fill(stream, &mut buf) {
            Ok(4) => dimensions.push(u32::from_be_bytes(buf)),
            _ => errors.push(DecodeError::MalformedDimension { index }),
        }
    }

    let data_type = match (data_type, HeaderErrors::from_vec(errors)) {
        (Some(data_type), None) => data_type,
        (_, Some(errors)) => return Err(errors),
        (None, None) => {
            return Err(HeaderErrors::single(DecodeError::UnknownDataType {
                tag: magic[2],
            }))
        }
    };

    let header = Header {
        data_type,
        dimensions,
    };
    log::debug!(
        "decoded IDX header: {} dims {:?}",
        header.data_type,
        header.dimensions
    );
    Ok(header)
}
