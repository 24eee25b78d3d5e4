// ============================================================
// Layer 4 - Dataset Download and Cache
// ============================================================
// Fashion-MNIST is published as four gzip-compressed IDX files.
// They are fetched once and cached, decompressed, under
//
//   <root>/FashionMNIST/raw/
//     train-images-idx3-ubyte
//     train-labels-idx1-ubyte
//     t10k-images-idx3-ubyte
//     t10k-labels-idx1-ubyte
//
// Later runs find the files and never touch the network.
// Each file is written to a temporary name first and renamed
// into place, so an interrupted download never leaves a
// half-written file that would be mistaken for a cache hit.

use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
};

/// Where the compressed archives are served from
pub const MIRROR: &str = "http://fashion-mnist.s3-website.eu-central-1.amazonaws.com/";

/// Which half of the dataset to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    /// 60,000 training images
    Train,
    /// 10,000 test images
    Test,
}

impl Split {
    pub fn images_file(self) -> &'static str {
        match self {
            Split::Train => "train-images-idx3-ubyte",
            Split::Test  => "t10k-images-idx3-ubyte",
        }
    }

    pub fn labels_file(self) -> &'static str {
        match self {
            Split::Train => "train-labels-idx1-ubyte",
            Split::Test  => "t10k-labels-idx1-ubyte",
        }
    }
}

/// Paths of the two decompressed files that make up one split
#[derive(Debug, Clone)]
pub struct SplitFiles {
    pub images: PathBuf,
    pub labels: PathBuf,
}

/// Directory holding the decompressed files for a given root
pub fn raw_dir(root: &Path) -> PathBuf {
    root.join("FashionMNIST").join("raw")
}

/// Make sure both files of `split` exist under `root`.
///
/// Missing files are downloaded when `download` is true;
/// otherwise the call fails and points at the `--download` flag.
pub fn ensure_split(root: &Path, split: Split, download: bool) -> Result<SplitFiles> {
    let dir = raw_dir(root);
    let files = SplitFiles {
        images: dir.join(split.images_file()),
        labels: dir.join(split.labels_file()),
    };

    for path in [&files.images, &files.labels] {
        if path.exists() {
            tracing::debug!("Cache hit: {}", path.display());
            continue;
        }
        if !download {
            bail!(
                "Dataset file '{}' not found. Re-run with --download to fetch Fashion-MNIST.",
                path.display()
            );
        }
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;
        fetch_and_extract(path)?;
    }

    Ok(files)
}

/// Download `<MIRROR>/<file name>.gz`, gunzip it and store it at `target`.
fn fetch_and_extract(target: &Path) -> Result<()> {
    let name = target
        .file_name()
        .and_then(|n| n.to_str())
        .context("dataset path has no file name")?;
    let url = format!("{MIRROR}{name}.gz");

    tracing::info!("Downloading {}", url);
    let compressed = reqwest::blocking::get(&url)
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.bytes())
        .with_context(|| format!("Failed to download '{url}'"))?;

    let raw = gunzip(&compressed)
        .with_context(|| format!("Failed to decompress '{url}'"))?;
    tracing::info!("Extracted {} ({} bytes)", name, raw.len());

    let partial = target.with_extension("partial");
    fs::write(&partial, &raw)
        .with_context(|| format!("Cannot write '{}'", partial.display()))?;
    fs::rename(&partial, target)
        .with_context(|| format!("Cannot move '{}' into place", target.display()))?;
    Ok(())
}

/// Decompress a complete gzip member held in memory.
pub fn gunzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    #[test]
    fn test_gunzip() {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(b"fashion").unwrap();
        let gz = enc.finish().unwrap();
        assert_eq!(gunzip(&gz).unwrap(), b"fashion");
    }

    #[test]
    fn test_missing_files_without_download() {
        let dir = tempfile::tempdir().unwrap();
        let err = ensure_split(dir.path(), Split::Test, false).unwrap_err();
        assert!(err.to_string().contains("--download"));
    }

    #[test]
    fn test_cached_files_are_reused() {
        let dir = tempfile::tempdir().unwrap();
        let raw = raw_dir(dir.path());
        fs::create_dir_all(&raw).unwrap();
        fs::write(raw.join(Split::Train.images_file()), b"x").unwrap();
        fs::write(raw.join(Split::Train.labels_file()), b"y").unwrap();

        // download=true would hit the network if the cache were ignored
        let files = ensure_split(dir.path(), Split::Train, true).unwrap();
        assert_eq!(fs::read(files.images).unwrap(), b"x");
    }
}
