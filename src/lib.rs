//! Random-access reader for IDX tensor files.
//!
//! The [`idx`] module is the decoder proper: header parsing, record
//! addressing, and the image, label, and paired views built on positioned
//! reads. [`export`], [`config`], and [`dataset`] layer PNG output and the
//! on-disk MNIST layout on top of it.

pub mod config;
pub mod dataset;
pub mod export;
pub mod idx;

pub use config::{DatasetLayout, Split};
pub use dataset::MnistSplit;
pub use idx::{ByteImage, DataType, DecodeError, ElementKind, Header, LabelledImage};
