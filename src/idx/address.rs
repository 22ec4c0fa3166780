use std::io::{self, Read, Seek, SeekFrom};
use std::ops::Range;

use super::error::{DecodeError, IoError};
use super::header::Header;

// ---------------------------------------------------------------------------
// Offset arithmetic
// ---------------------------------------------------------------------------

/// Absolute byte range of record `index`, where each record holds
/// `per_record_element_count` elements of the header's data type.
///
/// Pure arithmetic: the index is not checked against the record count and
/// no stream is touched.
pub fn record_range(
    header: &Header,
    per_record_element_count: u64,
    index: u64,
) -> Result<Range<u64>, DecodeError> {
    let overflow = || DecodeError::AddressOverflow { index };

    let record_size = header
        .data_type()
        .width_bytes()
        .checked_mul(per_record_element_count)
        .ok_or_else(overflow)?;
    let start = record_size
        .checked_mul(index)
        .and_then(|offset| offset.checked_add(header.header_byte_size()))
        .ok_or_else(overflow)?;
    let end = start.checked_add(record_size).ok_or_else(overflow)?;

    Ok(start..end)
}

// ---------------------------------------------------------------------------
// Positioned reads
// ---------------------------------------------------------------------------

/// Read the bytes of `range` from `stream`.
///
/// Always seeks to the absolute offset `range.start`, so the result never
/// depends on where earlier calls left the stream.
pub fn read_record_bytes<R: Read + Seek>(
    stream: &mut R,
    range: Range<u64>,
) -> Result<Vec<u8>, IoError> {
    let offset = range.start;
    let expected = range.end.saturating_sub(range.start);

    stream
        .seek(SeekFrom::Start(offset))
        .map_err(|source| IoError::SeekFailed { offset, source })?;

    // Bounded by `take` so a lying header cannot force a huge allocation.
    let mut bytes = Vec::new();
    stream
        .by_ref()
        .take(expected)
        .read_to_end(&mut bytes)
        .map_err(|source| IoError::Read { offset, source })?;

    if bytes.len() as u64 != expected {
        return Err(IoError::Truncated {
            offset,
            expected,
            actual: bytes.len() as u64,
        });
    }
    Ok(bytes)
}

/// Fill `buf` from the current position; returns how many bytes were read
/// before end of stream.
pub(crate) fn fill<R: Read>(stream: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match stream.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
