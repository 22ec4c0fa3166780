use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use crate::idx::{ByteImage, ElementKind};

// ---------------------------------------------------------------------------
// PNG export of decoded image records
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("only unsigned8 images can be exported as PNG, got {0}")]
    UnsupportedType(ElementKind),

    #[error("{width}x{height} image carries {len} bytes")]
    Dimensions { width: u32, height: u32, len: usize },

    #[error("writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Encode `record` as an 8-bit grayscale PNG into `writer`.
pub fn encode_png<W: Write>(record: &ByteImage, writer: W) -> Result<(), ExportError> {
    if record.data_type.kind != ElementKind::Unsigned8 {
        return Err(ExportError::UnsupportedType(record.data_type.kind));
    }
    let expected = record.width as usize * record.height as usize;
    if record.bytes.len() != expected {
        return Err(ExportError::Dimensions {
            width: record.width,
            height: record.height,
            len: record.bytes.len(),
        });
    }

    PngEncoder::new(writer).write_image(
        &record.bytes,
        record.width,
        record.height,
        ExtendedColorType::L8,
    )?;
    Ok(())
}

/// Write `record` to `path` as a PNG file. Returns the path written.
pub fn write_png(record: &ByteImage, path: &Path) -> Result<PathBuf, ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    encode_png(record, &mut writer)?;
    writer.flush().map_err(io_err)?;

    log::debug!("wrote {}x{} PNG to {}", record.width, record.height, path.display());
    Ok(path.to_path_buf())
}
