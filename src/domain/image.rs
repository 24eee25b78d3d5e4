// ============================================================
// Layer 3 - Grayscale Image
// ============================================================
// A single Fashion-MNIST picture: 28 x 28 bytes, row-major,
// where 0 is background and 255 is full ink.
//
// There is no plotting library in this project, so images are
// previewed in the terminal as ASCII art. Each pixel becomes one
// character picked from a ramp of increasingly dense glyphs.

use anyhow::{bail, Result};

/// Glyphs from lightest to darkest
const SHADE_RAMP: &[u8] = b" .:-=+*#%@";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayImage {
    rows:   usize,
    cols:   usize,
    pixels: Vec<u8>,
}

impl GrayImage {
    /// Build an image from row-major pixels.
    /// Fails if the pixel count does not equal rows * cols.
    pub fn new(rows: usize, cols: usize, pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != rows * cols {
            bail!(
                "image of {}x{} needs {} pixels, got {}",
                rows, cols, rows * cols, pixels.len()
            );
        }
        Ok(Self { rows, cols, pixels })
    }

    pub fn rows(&self) -> usize { self.rows }

    pub fn cols(&self) -> usize { self.cols }

    pub fn pixels(&self) -> &[u8] { &self.pixels }

    /// Pixel at (row, col), or None when out of bounds
    pub fn pixel(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.pixels.get(row * self.cols + col).copied()
    }

    /// Average intensity in [0, 255]; 0.0 for an empty image
    pub fn mean_intensity(&self) -> f32 {
        if self.pixels.is_empty() {
            return 0.0;
        }
        let total: u64 = self.pixels.iter().map(|&p| p as u64).sum();
        total as f32 / self.pixels.len() as f32
    }

    /// Render the image as text, one line per row.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.rows * (self.cols + 1));
        for row in self.pixels.chunks(self.cols.max(1)) {
            for &p in row {
                out.push(shade(p));
            }
            out.push('\n');
        }
        out
    }
}

fn shade(pixel: u8) -> char {
    let idx = pixel as usize * (SHADE_RAMP.len() - 1) / 255;
    SHADE_RAMP[idx] as char
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_wrong_pixel_count() {
        assert!(GrayImage::new(2, 2, vec![0; 3]).is_err());
    }

    #[test]
    fn test_pixel_lookup() {
        let img = GrayImage::new(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(img.pixel(1, 2), Some(6));
        assert_eq!(img.pixel(2, 0), None);
    }

    #[test]
    fn test_ascii_extremes() {
        let img = GrayImage::new(1, 2, vec![0, 255]).unwrap();
        assert_eq!(img.to_ascii(), " @\n");
    }

    #[test]
    fn test_mean_intensity() {
        let img = GrayImage::new(1, 4, vec![0, 100, 200, 100]).unwrap();
        assert_eq!(img.mean_intensity(), 100.0);
    }
}
