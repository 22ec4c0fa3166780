use std::io::{Read, Seek};

use super::address::{read_record_bytes, record_range};
use super::dtype::DataType;
use super::error::DecodeError;
use super::header::{decode_header, Header};

// ---------------------------------------------------------------------------
// ByteImage – one decoded image record
// ---------------------------------------------------------------------------

/// A single image record: row-major element bytes plus its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteImage {
    /// Columns (`dimensions[2]`).
    pub width: u32,
    /// Rows (`dimensions[1]`).
    pub height: u32,
    pub data_type: DataType,
    /// `width * height * data_type.width` raw big-endian bytes.
    pub bytes: Vec<u8>,
}

impl ByteImage {
    /// Bytes in one row of the image.
    pub fn row_stride(&self) -> usize {
        self.width as usize * usize::from(self.data_type.width)
    }

    /// The image as a matrix of row slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        // `max(1)` keeps `chunks` happy for zero-width images, which have no bytes.
        self.bytes.chunks(self.row_stride().max(1))
    }

    /// Raw bytes of the element at (`row`, `col`), if inside the image.
    pub fn element(&self, row: u32, col: u32) -> Option<&[u8]> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let w = usize::from(self.data_type.width);
        let start = row as usize * self.row_stride() + col as usize * w;
        self.bytes.get(start..start + w)
    }
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Per-record shape of a rank-3 image file.
pub(crate) struct ImageShape {
    rows: u32,
    cols: u32,
}

impl ImageShape {
    pub(crate) fn from_header(header: &Header) -> Result<Self, DecodeError> {
        header.expect_rank(3)?;
        Ok(ImageShape {
            rows: header.dimensions()[1],
            cols: header.dimensions()[2],
        })
    }

    fn element_count(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.cols)
    }
}

pub(crate) fn read_at<R: Read + Seek>(
    stream: &mut R,
    header: &Header,
    shape: &ImageShape,
    index: u64,
) -> Result<ByteImage, DecodeError> {
    header.check_index(index)?;
    let range = record_range(header, shape.element_count(), index)?;
    let bytes = read_record_bytes(stream, range)?;
    Ok(ByteImage {
        width: shape.cols,
        height: shape.rows,
        data_type: header.data_type(),
        bytes,
    })
}

/// Read the image at `index`.
pub fn read_image<R: Read + Seek>(stream: &mut R, index: u64) -> Result<ByteImage, DecodeError> {
    let header = decode_header(stream)?;
    let shape = ImageShape::from_header(&header)?;
    read_at(stream, &header, &shape, index)
}

/// Read the images at `indices`, in the given order.
///
/// Duplicates and any ordering are allowed; element `k` of the result is the
/// record at `indices[k]`.
pub fn read_images<R: Read + Seek>(
    stream: &mut R,
    indices: &[u64],
) -> Result<Vec<ByteImage>, DecodeError> {
    let header = decode_header(stream)?;
    let shape = ImageShape::from_header(&header)?;
    log::debug!("reading {} of {} images", indices.len(), header.record_count());
    indices
        .iter()
        .map(|&index| read_at(stream, &header, &shape, index))
        .collect()
}

/// Read every image in the file, in index order.
pub fn read_all_images<R: Read + Seek>(stream: &mut R) -> Result<Vec<ByteImage>, DecodeError> {
    let header = decode_header(stream)?;
    let shape = ImageShape::from_header(&header)?;
    log::debug!("reading all {} images", header.record_count());
    (0..header.record_count())
        .map(|index| read_at(stream, &header, &shape, index))
        .collect()
}
