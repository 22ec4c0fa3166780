use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use rusty_idx::config::{DatasetLayout, Split};
use rusty_idx::dataset::MnistSplit;
use rusty_idx::export::write_png;
use rusty_idx::idx::{self, Header};

/// Inspect IDX tensor files and export their records
#[derive(Parser, Debug)]
#[command(name = "rusty-idx")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the decoded header as JSON, or every header problem found
    Header {
        /// IDX file to inspect
        file: PathBuf,
    },

    /// Print the labels stored at the given indices
    Labels {
        /// IDX label file (rank 1)
        file: PathBuf,
        /// Record indices, in the order to print them
        #[arg(required = true)]
        indices: Vec<u64>,
    },

    /// Write the images at the given indices as grayscale PNG files
    Export {
        /// IDX image file (rank 3, unsigned bytes)
        file: PathBuf,
        /// Record indices to export
        #[arg(required = true)]
        indices: Vec<u64>,
        /// Output directory
        #[arg(short = 'o', long = "out", default_value = "./test-results")]
        out: PathBuf,
    },

    /// Open an image/label split and print its shape and first labels
    Summary {
        /// JSON dataset layout; defaults to ./data with the standard MNIST names
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
        /// Which split to open
        #[arg(short = 's', long = "split", default_value = "test")]
        split: Split,
        /// How many leading labels to print
        #[arg(short = 'n', long = "head", default_value_t = 10)]
        head: u64,
    },
}

/// Header plus the offsets derived from it.
#[derive(Serialize)]
struct HeaderReport<'a> {
    #[serde(flatten)]
    header: &'a Header,
    header_byte_size: u64,
    record_byte_size: Option<u64>,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Header { file } => print_header(&file),
        Command::Labels { file, indices } => print_labels(&file, &indices),
        Command::Export { file, indices, out } => export_images(&file, &indices, &out),
        Command::Summary {
            config,
            split,
            head,
        } => summary(config.as_deref(), split, head),
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("opening {}", path.display()))
}

fn print_header(path: &Path) -> Result<()> {
    let mut file = open(path)?;
    match idx::decode_header(&mut file) {
        Ok(header) => {
            let report = HeaderReport {
                header: &header,
                header_byte_size: header.header_byte_size(),
                record_byte_size: header.record_byte_size(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(errors) => {
            for e in errors.errors() {
                println!("{}: {e}", path.display());
            }
            bail!("{} header problem(s) in {}", errors.len(), path.display())
        }
    }
}

fn print_labels(path: &Path, indices: &[u64]) -> Result<()> {
    let mut file = open(path)?;
    let labels = idx::read_labels(&mut file, indices)
        .with_context(|| format!("reading labels from {}", path.display()))?;
    for (index, label) in indices.iter().zip(labels) {
        println!("{index}\t{label}");
    }
    Ok(())
}

fn export_images(path: &Path, indices: &[u64], out: &Path) -> Result<()> {
    let mut file = open(path)?;
    let images = idx::read_images(&mut file, indices)
        .with_context(|| format!("reading images from {}", path.display()))?;

    std::fs::create_dir_all(out)
        .with_context(|| format!("creating output directory {}", out.display()))?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");

    for (index, image) in indices.iter().zip(&images) {
        let target = out.join(format!("{stem}-{index}.png"));
        let written = write_png(image, &target)
            .with_context(|| format!("exporting image {index}"))?;
        println!("{}", written.display());
    }
    log::info!("Exported {} images to {}", images.len(), out.display());
    Ok(())
}

fn summary(config: Option<&Path>, split: Split, head: u64) -> Result<()> {
    let layout = match config {
        Some(path) => DatasetLayout::from_json_file(path)?,
        None => DatasetLayout::default(),
    };
    let mut data = MnistSplit::open(&layout, split)?;
    let dims = data.image_header().dimensions();
    println!(
        "{split}: {} records, images {}x{} {}",
        data.len(),
        dims[1],
        dims[2],
        data.image_header().data_type().kind
    );

    let indices: Vec<u64> = (0..head.min(data.len())).collect();
    for pair in data.pairs(&indices)? {
        println!("  {}x{} -> {}", pair.image.height, pair.image.width, pair.label);
    }
    Ok(())
}
