use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Split – which half of the MNIST distribution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Test,
}

impl FromStr for Split {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "train" => Ok(Split::Train),
            "test" | "t10k" => Ok(Split::Test),
            other => bail!("Unknown split '{other}' (expected 'train' or 'test')"),
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Split::Train => f.write_str("train"),
            Split::Test => f.write_str("test"),
        }
    }
}

// ---------------------------------------------------------------------------
// DatasetLayout – where the decompressed IDX files live
// ---------------------------------------------------------------------------

/// Resolved image and label paths of one split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPaths {
    pub images: PathBuf,
    pub labels: PathBuf,
}

/// Local layout of an MNIST-style dataset.
///
/// The decoder never downloads anything; `remote` is carried for whichever
/// tool populates `root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetLayout {
    /// Directory holding the decompressed files.
    pub root: PathBuf,
    /// Base URL of the gzip archives.
    pub remote: String,
    pub train_images: String,
    pub train_labels: String,
    pub test_images: String,
    pub test_labels: String,
}

impl Default for DatasetLayout {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./data"),
            remote: "http://yann.lecun.com/exdb/mnist/".to_string(),
            train_images: "train-images-idx3-ubyte.idx".to_string(),
            train_labels: "train-labels-idx1-ubyte.idx".to_string(),
            test_images: "t10k-images-idx3-ubyte.idx".to_string(),
            test_labels: "t10k-labels-idx1-ubyte.idx".to_string(),
        }
    }
}

impl DatasetLayout {
    /// Load a layout from a JSON file; missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading dataset config {}", path.display()))?;
        let layout: DatasetLayout = serde_json::from_str(&text)
            .with_context(|| format!("parsing dataset config {}", path.display()))?;
        Ok(layout)
    }

    /// Image and label paths for `split`.
    pub fn paths(&self, split: Split) -> SplitPaths {
        let (images, labels) = match split {
            Split::Train => (&self.train_images, &self.train_labels),
            Split::Test => (&self.test_images, &self.test_labels),
        };
        SplitPaths {
            images: self.root.join(images),
            labels: self.root.join(labels),
        }
    }
}
