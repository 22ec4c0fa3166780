/// IDX layer: binary layout, header decoding, and positioned record reads.
///
/// Architecture:
/// ```text
///   seekable stream (File, Cursor, ...)
///        │
///        ▼
///   ┌──────────┐
///   │  header   │  magic + dims → Header   (dtype: tag → DataType)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  address  │  (Header, index) → absolute byte range → bytes
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  images   │   │  labels   │
///   └──────────┘   └──────────┘
///        │              │
///        └──────┬───────┘
///               ▼
///         ┌──────────┐
///         │  paired   │  index-for-index image + label
///         └──────────┘
/// ```

pub mod address;
pub mod dtype;
pub mod error;
pub mod header;
pub mod images;
pub mod labels;
pub mod paired;

pub use dtype::{decode_type_tag, DataType, ElementKind};
pub use error::{DecodeError, HeaderErrors, IoError};
pub use header::{decode_header, Header};
pub use images::{read_all_images, read_image, read_images, ByteImage};
pub use labels::{read_all_labels, read_label, read_labels};
pub use paired::{read_all_paired, read_paired, read_paired_many, LabelledImage};

/// Builders for in-memory IDX streams used by the unit tests.
#[cfg(test)]
pub(crate) mod testutil {
    use std::io::Cursor;

    /// Assemble a raw IDX file: zero prefix, tag, dimension list, payload.
    pub fn idx_bytes(tag: u8, dims: &[u32], payload: &[u8]) -> Vec<u8> {
        let mut out = vec![0, 0, tag, dims.len() as u8];
        for d in dims {
            out.extend_from_slice(&d.to_be_bytes());
        }
        out.extend_from_slice(payload);
        out
    }

    /// `count` u8 images of `rows x cols`; every pixel of image `i` is `i as u8`.
    pub fn image_stream(count: u32, rows: u32, cols: u32) -> Cursor<Vec<u8>> {
        let per = (rows * cols) as usize;
        let payload: Vec<u8> = (0..count)
            .flat_map(|i| std::iter::repeat(i as u8).take(per))
            .collect();
        Cursor::new(idx_bytes(0x08, &[count, rows, cols], &payload))
    }

    /// A u8 label file holding exactly `labels`.
    pub fn label_stream(labels: &[u8]) -> Cursor<Vec<u8>> {
        Cursor::new(idx_bytes(0x08, &[labels.len() as u32], labels))
    }
}
