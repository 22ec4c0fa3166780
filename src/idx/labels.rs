use std::io::{Read, Seek};

use super::address::{read_record_bytes, record_range};
use super::dtype::{DataType, ElementKind};
use super::error::DecodeError;
use super::header::{decode_header, Header};

/// Validate that `header` describes a file of integer scalars.
pub fn check_label_header(header: &Header) -> Result<(), DecodeError> {
    header.expect_rank(1)?;
    if !header.data_type().is_integer() {
        return Err(DecodeError::UnsupportedLabelType {
            kind: header.data_type().kind,
        });
    }
    Ok(())
}

/// Decode one big-endian integer scalar. `bytes` holds exactly one element.
fn decode_scalar(data_type: DataType, bytes: &[u8]) -> Result<i64, DecodeError> {
    let value = match (data_type.kind, bytes) {
        (ElementKind::Unsigned8, [b]) => i64::from(*b),
        (ElementKind::Signed8, [b]) => i64::from(*b as i8),
        (ElementKind::Short16, [a, b]) => i64::from(i16::from_be_bytes([*a, *b])),
        (ElementKind::Int32, [a, b, c, d]) => i64::from(i32::from_be_bytes([*a, *b, *c, *d])),
        (kind, _) => return Err(DecodeError::UnsupportedLabelType { kind }),
    };
    Ok(value)
}

pub(crate) fn read_label_at<R: Read + Seek>(
    stream: &mut R,
    header: &Header,
    index: u64,
) -> Result<i64, DecodeError> {
    header.check_index(index)?;
    let range = record_range(header, 1, index)?;
    let bytes = read_record_bytes(stream, range)?;
    decode_scalar(header.data_type(), &bytes)
}

/// Read the label at `index`.
pub fn read_label<R: Read + Seek>(stream: &mut R, index: u64) -> Result<i64, DecodeError> {
    let header = decode_header(stream)?;
    check_label_header(&header)?;
    read_label_at(stream, &header, index)
}

/// Read the labels at `indices`, in the given order.
pub fn read_labels<R: Read + Seek>(
    stream: &mut R,
    indices: &[u64],
) -> Result<Vec<i64>, DecodeError> {
    let header = decode_header(stream)?;
    check_label_header(&header)?;
    indices
        .iter()
        .map(|&index| read_label_at(stream, &header, index))
        .collect()
}

/// Read every label in the file, in index order.
pub fn read_all_labels<R: Read + Seek>(stream: &mut R) -> Result<Vec<i64>, DecodeError> {
    let header = decode_header(stream)?;
    check_label_header(&header)?;
    (0..header.record_count())
        .map(|index| read_label_at(stream, &header, index))
        .collect()
}
