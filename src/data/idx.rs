// ============================================================
// Layer 4 - IDX File Format
// ============================================================
// Fashion-MNIST ships in the IDX format inherited from MNIST:
//
//   images: magic 0x00000803 | count | rows | cols | count*rows*cols bytes
//   labels: magic 0x00000801 | count | count bytes
//
// Every header field is a big-endian u32. Pixel and label
// payloads are raw unsigned bytes.

use std::io::{self, Read, Write};
use thiserror::Error;

use crate::domain::image::GrayImage;

/// Magic number of an idx3-ubyte image file
pub const IMAGE_MAGIC: u32 = 2051;

/// Magic number of an idx1-ubyte label file
pub const LABEL_MAGIC: u32 = 2049;

/// Largest image accepted from a header, in pixels
pub const MAX_IMAGE_PIXELS: usize = 1 << 20;

// Header counts are untrusted; preallocation never exceeds this many items
const PREALLOC_LIMIT: usize = 1 << 16;

pub type Result<T> = std::result::Result<T, IdxError>;

#[derive(Debug, Error)]
pub enum IdxError {
    #[error("bad magic number: expected {expected}, found {found}")]
    BadMagic { expected: u32, found: u32 },

    #[error("file ended early: expected {expected} bytes of payload")]
    Truncated { expected: usize },

    #[error("{images} images but {labels} labels")]
    CountMismatch { images: usize, labels: usize },

    #[error("invalid image dimensions {rows}x{cols}")]
    BadDimensions { rows: usize, cols: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Read every image from an idx3-ubyte stream.
pub fn read_images<R: Read>(reader: &mut R) -> Result<Vec<GrayImage>> {
    expect_magic(reader, IMAGE_MAGIC)?;

    let count = read_u32_be(reader)? as usize;
    let rows  = read_u32_be(reader)? as usize;
    let cols  = read_u32_be(reader)? as usize;
    let pixels_per_image = rows
        .checked_mul(cols)
        .filter(|&n| n > 0 && n <= MAX_IMAGE_PIXELS)
        .ok_or(IdxError::BadDimensions { rows, cols })?;
    let payload = count
        .checked_mul(pixels_per_image)
        .ok_or(IdxError::BadDimensions { rows, cols })?;

    let mut images = Vec::with_capacity(count.min(PREALLOC_LIMIT));

    for _ in 0..count {
        let mut buffer = vec![0u8; pixels_per_image];
        read_payload(reader, &mut buffer, payload)?;
        // The length check inside GrayImage::new cannot fail here
        let image = GrayImage::new(rows, cols, buffer)
            .map_err(|_| IdxError::BadDimensions { rows, cols })?;
        images.push(image);
    }

    Ok(images)
}

/// Read every label from an idx1-ubyte stream.
pub fn read_labels<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    expect_magic(reader, LABEL_MAGIC)?;

    let count = read_u32_be(reader)? as usize;
    let mut labels = Vec::with_capacity(count.min(PREALLOC_LIMIT));
    reader.take(count as u64).read_to_end(&mut labels)?;
    if labels.len() < count {
        return Err(IdxError::Truncated { expected: count });
    }

    Ok(labels)
}

/// Write images in idx3-ubyte layout. All images must share one size.
pub fn write_images<W: Write>(writer: &mut W, images: &[GrayImage]) -> Result<()> {
    let (rows, cols) = images
        .first()
        .map(|img| (img.rows(), img.cols()))
        .unwrap_or((28, 28));

    writer.write_all(&IMAGE_MAGIC.to_be_bytes())?;
    writer.write_all(&(images.len() as u32).to_be_bytes())?;
    writer.write_all(&(rows as u32).to_be_bytes())?;
    writer.write_all(&(cols as u32).to_be_bytes())?;

    for img in images {
        if img.rows() != rows || img.cols() != cols {
            return Err(IdxError::BadDimensions { rows: img.rows(), cols: img.cols() });
        }
        writer.write_all(img.pixels())?;
    }
    Ok(())
}

/// Write labels in idx1-ubyte layout.
pub fn write_labels<W: Write>(writer: &mut W, labels: &[u8]) -> Result<()> {
    writer.write_all(&LABEL_MAGIC.to_be_bytes())?;
    writer.write_all(&(labels.len() as u32).to_be_bytes())?;
    writer.write_all(labels)?;
    Ok(())
}

/// Fail unless the image and label counts of one split agree.
pub fn check_counts(images: usize, labels: usize) -> Result<()> {
    if images != labels {
        return Err(IdxError::CountMismatch { images, labels });
    }
    Ok(())
}

fn expect_magic<R: Read>(reader: &mut R, expected: u32) -> Result<()> {
    let found = read_u32_be(reader)?;
    if found != expected {
        return Err(IdxError::BadMagic { expected, found });
    }
    Ok(())
}

fn read_payload<R: Read>(reader: &mut R, buf: &mut [u8], expected: usize) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => IdxError::Truncated { expected },
        _ => IdxError::Io(e),
    })
}

fn read_u32_be<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    read_payload(reader, &mut buf, 4)?;
    Ok(u32::from_be_bytes(buf))
}
