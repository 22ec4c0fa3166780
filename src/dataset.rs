use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::config::{DatasetLayout, Split};
use crate::idx::{self, ByteImage, Header, LabelledImage};

// ---------------------------------------------------------------------------
// MnistSplit – an opened image/label file pair
// ---------------------------------------------------------------------------

/// The image and label files of one split, opened and validated.
///
/// Owns both file handles; every read goes through the positioned-read core,
/// so calls may come in any order.
pub struct MnistSplit {
    split: Split,
    images_path: PathBuf,
    labels_path: PathBuf,
    images: File,
    labels: File,
    image_header: Header,
    label_header: Header,
}

fn open_idx(path: &Path, what: &str) -> Result<(File, Header)> {
    let mut file =
        File::open(path).with_context(|| format!("opening {what} file {}", path.display()))?;
    let header = idx::decode_header(&mut file)
        .with_context(|| format!("decoding {what} header of {}", path.display()))?;
    Ok((file, header))
}

impl MnistSplit {
    /// Open the files `layout` names for `split` and check they pair up.
    pub fn open(layout: &DatasetLayout, split: Split) -> Result<Self> {
        let paths = layout.paths(split);
        let (images, image_header) = open_idx(&paths.images, "image")?;
        let (labels, label_header) = open_idx(&paths.labels, "label")?;

        if image_header.dimension_count() != 3 {
            bail!(
                "{}: expected rank-3 image tensor, found dimensions {:?}",
                paths.images.display(),
                image_header.dimensions()
            );
        }
        idx::labels::check_label_header(&label_header)
            .with_context(|| format!("validating label file {}", paths.labels.display()))?;
        if image_header.record_count() != label_header.record_count() {
            return Err(idx::DecodeError::RecordCountMismatch {
                images: image_header.record_count(),
                labels: label_header.record_count(),
            })
            .with_context(|| format!("pairing {split} split"));
        }

        log::info!(
            "Opened {split} split: {} images of {}x{} ({}), {} labels",
            image_header.record_count(),
            image_header.dimensions()[1],
            image_header.dimensions()[2],
            image_header.data_type().kind,
            label_header.record_count()
        );

        Ok(MnistSplit {
            split,
            images_path: paths.images,
            labels_path: paths.labels,
            images,
            labels,
            image_header,
            label_header,
        })
    }

    pub fn split(&self) -> Split {
        self.split
    }

    /// Number of image/label pairs.
    pub fn len(&self) -> u64 {
        self.image_header.record_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn image_header(&self) -> &Header {
        &self.image_header
    }

    pub fn label_header(&self) -> &Header {
        &self.label_header
    }

    pub fn image(&mut self, index: u64) -> Result<ByteImage> {
        idx::read_image(&mut self.images, index)
            .with_context(|| format!("image {index} of {}", self.images_path.display()))
    }

    pub fn label(&mut self, index: u64) -> Result<i64> {
        idx::read_label(&mut self.labels, index)
            .with_context(|| format!("label {index} of {}", self.labels_path.display()))
    }

    pub fn pair(&mut self, index: u64) -> Result<LabelledImage> {
        idx::read_paired(&mut self.images, &mut self.labels, index)
            .with_context(|| format!("{} pair {index}", self.split))
    }

    pub fn pairs(&mut self, indices: &[u64]) -> Result<Vec<LabelledImage>> {
        idx::read_paired_many(&mut self.images, &mut self.labels, indices)
            .with_context(|| format!("{} pairs {indices:?}", self.split))
    }

    pub fn all_pairs(&mut self) -> Result<Vec<LabelledImage>> {
        idx::read_all_paired(&mut self.images, &mut self.labels)
            .with_context(|| format!("all {} pairs", self.split))
    }
}
