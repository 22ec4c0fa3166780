use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::Command;

use rusty_idx::config::{DatasetLayout, Split};
use rusty_idx::dataset::MnistSplit;
use rusty_idx::export::write_png;
use rusty_idx::idx::{self, DecodeError};
use tempfile::tempdir;

/// Leading labels of the canonical t10k label file.
const T10K_HEAD: [i64; 6] = [7, 2, 1, 0, 4, 1];

fn idx_bytes(tag: u8, dims: &[u32], payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0, 0, tag, dims.len() as u8];
    for d in dims {
        out.extend_from_slice(&d.to_be_bytes());
    }
    out.extend_from_slice(payload);
    out
}

/// Image `i` has pixel `p` equal to `(i * 31 + p) as u8`.
fn write_images(path: &Path, count: u32, rows: u32, cols: u32) {
    let per = (rows * cols) as usize;
    let payload: Vec<u8> = (0..count as usize)
        .flat_map(|i| (0..per).map(move |p| (i * 31 + p) as u8))
        .collect();
    fs::write(path, idx_bytes(0x08, &[count, rows, cols], &payload)).unwrap();
}

/// 10 000 labels whose first six match the canonical test file.
fn synthetic_t10k_labels() -> Vec<u8> {
    let mut labels: Vec<u8> = (0..10_000u32).map(|i| (i * 7 % 10) as u8).collect();
    for (slot, v) in labels.iter_mut().zip(T10K_HEAD) {
        *slot = v as u8;
    }
    labels
}

fn write_layout(dir: &Path, images: u32, labels: &[u8]) -> DatasetLayout {
    let layout = DatasetLayout {
        root: dir.to_path_buf(),
        ..DatasetLayout::default()
    };
    let paths = layout.paths(Split::Test);
    write_images(&paths.images, images, 28, 28);
    fs::write(
        &paths.labels,
        idx_bytes(0x08, &[labels.len() as u32], labels),
    )
    .unwrap();
    layout
}

#[test]
fn label_values_do_not_depend_on_query_history() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("labels.idx");
    let labels = synthetic_t10k_labels();
    fs::write(&path, idx_bytes(0x08, &[10_000], &labels)).unwrap();

    let mut file = File::open(&path).unwrap();
    for warmup in [9999u64, 5555, 0, 6666] {
        idx::read_label(&mut file, warmup).unwrap();
        let head: Vec<i64> = (0..6).map(|i| idx::read_label(&mut file, i).unwrap()).collect();
        assert_eq!(head, T10K_HEAD);
    }
}

#[test]
fn canonical_t10k_labels_when_present() {
    let path = PathBuf::from("data/t10k-labels-idx1-ubyte.idx");
    if !path.exists() {
        eprintln!("skipping: {} not present", path.display());
        return;
    }
    let mut file = File::open(&path).unwrap();
    let header = idx::decode_header(&mut file).unwrap();
    assert_eq!(header.dimensions(), &[10_000]);
    idx::read_label(&mut file, 7777).unwrap();
    let head = idx::read_labels(&mut file, &[0, 1, 2, 3, 4, 5]).unwrap();
    assert_eq!(head, T10K_HEAD);
}

#[test]
fn file_reads_are_order_independent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("images.idx");
    write_images(&path, 100, 28, 28);

    let mut file = File::open(&path).unwrap();
    let forward = idx::read_images(&mut file, &[5, 42, 99]).unwrap();
    let shuffled = idx::read_images(&mut file, &[99, 5, 42, 5]).unwrap();
    assert_eq!(forward[0], shuffled[1]);
    assert_eq!(forward[0], shuffled[3]);
    assert_eq!(forward[1], shuffled[2]);
    assert_eq!(forward[2], shuffled[0]);

    let first = idx::read_image(&mut file, 0).unwrap();
    assert_eq!((first.width, first.height, first.bytes.len()), (28, 28, 784));
    assert_eq!(first.bytes[1], 1);
    assert_eq!(forward[0].bytes[0], (5 * 31) as u8);
}

#[test]
fn split_pairs_images_with_labels() {
    let dir = tempdir().unwrap();
    let labels = [3u8, 1, 4, 1, 5];
    let layout = write_layout(dir.path(), 5, &labels);

    let mut split = MnistSplit::open(&layout, Split::Test).unwrap();
    assert_eq!(split.len(), 5);
    assert_eq!(split.label(2).unwrap(), 4);

    let pairs = split.all_pairs().unwrap();
    assert_eq!(pairs.len(), 5);
    for (i, pair) in pairs.iter().enumerate() {
        assert_eq!(pair.label, i64::from(labels[i]));
        assert_eq!(pair.image.bytes[0], (i * 31) as u8);
    }
    assert_eq!(split.pair(3).unwrap(), pairs[3]);
}

#[test]
fn split_rejects_mismatched_counts() {
    let dir = tempdir().unwrap();
    let layout = write_layout(dir.path(), 4, &[1, 2, 3]);

    let err = MnistSplit::open(&layout, Split::Test).err().unwrap();
    let decode = err.downcast_ref::<DecodeError>().unwrap();
    assert!(matches!(
        decode,
        DecodeError::RecordCountMismatch {
            images: 4,
            labels: 3
        }
    ));
}

#[test]
fn split_rejects_label_files_that_are_not_integer_vectors() {
    let dir = tempdir().unwrap();
    let layout = write_layout(dir.path(), 3, &[0, 1, 2]);
    let labels = layout.paths(Split::Test).labels;

    fs::write(&labels, idx_bytes(0x08, &[3, 1, 1], &[0; 3])).unwrap();
    let err = MnistSplit::open(&layout, Split::Test).err().unwrap();
    assert!(matches!(
        err.downcast_ref::<DecodeError>(),
        Some(DecodeError::UnexpectedRank {
            expected: 1,
            found: 3
        })
    ));
    assert!(format!("{err:#}").contains("validating label file"));

    fs::write(&labels, idx_bytes(0x0D, &[3], &[0; 12])).unwrap();
    let err = MnistSplit::open(&layout, Split::Test).err().unwrap();
    assert!(matches!(
        err.downcast_ref::<DecodeError>(),
        Some(DecodeError::UnsupportedLabelType {
            kind: idx::ElementKind::Float32
        })
    ));
}

#[test]
fn missing_files_name_the_path() {
    let dir = tempdir().unwrap();
    let layout = DatasetLayout {
        root: dir.path().join("nowhere"),
        ..DatasetLayout::default()
    };
    let err = MnistSplit::open(&layout, Split::Train).err().unwrap();
    assert!(format!("{err:#}").contains("train-images-idx3-ubyte.idx"));
}

#[test]
fn exported_png_decodes_back_to_the_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("images.idx");
    write_images(&path, 3, 4, 5);

    let mut file = File::open(&path).unwrap();
    let record = idx::read_image(&mut file, 2).unwrap();
    let png = write_png(&record, &dir.path().join("image-2.png")).unwrap();

    let decoded = image::open(&png).unwrap().into_luma8();
    assert_eq!(decoded.dimensions(), (5, 4));
    assert_eq!(decoded.into_raw(), record.bytes);
}

#[test]
fn layout_loads_from_json() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("layout.json");
    fs::write(
        &config,
        format!(r#"{{ "root": {:?} }}"#, dir.path().display().to_string()),
    )
    .unwrap();

    let layout = DatasetLayout::from_json_file(&config).unwrap();
    assert_eq!(layout.root, dir.path());
    assert_eq!(layout.test_images, DatasetLayout::default().test_images);
}

#[test]
fn cli_prints_header_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("images.idx");
    write_images(&path, 2, 3, 3);

    let output = Command::new(env!("CARGO_BIN_EXE_rusty-idx"))
        .arg("header")
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["dimensions"], serde_json::json!([2, 3, 3]));
    assert_eq!(json["data_type"]["kind"], "unsigned8");
    assert_eq!(json["header_byte_size"], 16);
    assert_eq!(json["record_byte_size"], 9);
}

#[test]
fn cli_reports_every_header_problem() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.idx");
    fs::write(&path, [0x01, 0x00, 0x42, 0x02]).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_rusty-idx"))
        .arg("header")
        .arg(&path)
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 4);

    // The failure summary goes to stderr once, through the logger.
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stderr.matches("4 header problem(s)").count(), 1);
    assert!(!stderr.contains("Error:"));
}
