use std::io::{Read, Seek};

use super::error::DecodeError;
use super::header::decode_header;
use super::images::{self, read_image, read_images, ByteImage, ImageShape};
use super::labels::{check_label_header, read_label, read_label_at};

/// An image and the label stored at the same index of the parallel label file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelledImage {
    pub image: ByteImage,
    pub label: i64,
}

/// Read the image and label at `index`.
///
/// The image is read first; if it fails the label stream is left untouched.
pub fn read_paired<I, L>(
    image_stream: &mut I,
    label_stream: &mut L,
    index: u64,
) -> Result<LabelledImage, DecodeError>
where
    I: Read + Seek,
    L: Read + Seek,
{
    let image = read_image(image_stream, index)?;
    let label = read_label(label_stream, index)?;
    Ok(LabelledImage { image, label })
}

/// Read the pairs at `indices`, in the given order.
pub fn read_paired_many<I, L>(
    image_stream: &mut I,
    label_stream: &mut L,
    indices: &[u64],
) -> Result<Vec<LabelledImage>, DecodeError>
where
    I: Read + Seek,
    L: Read + Seek,
{
    let images = read_images(image_stream, indices)?;
    let label_header = decode_header(label_stream)?;
    check_label_header(&label_header)?;

    images
        .into_iter()
        .zip(indices)
        .map(|(image, &index)| {
            let label = read_label_at(label_stream, &label_header, index)?;
            Ok(LabelledImage { image, label })
        })
        .collect()
}

/// Pair every image with its label.
///
/// Fails with [`DecodeError::RecordCountMismatch`] when the two files do not
/// hold the same number of records.
pub fn read_all_paired<I, L>(
    image_stream: &mut I,
    label_stream: &mut L,
) -> Result<Vec<LabelledImage>, DecodeError>
where
    I: Read + Seek,
    L: Read + Seek,
{
    let image_header = decode_header(image_stream)?;
    let label_header = decode_header(label_stream)?;

    let count = image_header.record_count();
    if count != label_header.record_count() {
        return Err(DecodeError::RecordCountMismatch {
            images: count,
            labels: label_header.record_count(),
        });
    }

    let shape = ImageShape::from_header(&image_header)?;
    check_label_header(&label_header)?;
    log::debug!("pairing all {count} records");

    (0..count)
        .map(|index| {
            let image = images::read_at(image_stream, &image_header, &shape, index)?;
            let label = read_label_at(label_stream, &label_header, index)?;
            Ok(LabelledImage { image, label })
        })
        .collect()
}
