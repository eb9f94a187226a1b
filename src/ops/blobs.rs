//! Connected-component sprite extraction.
//!
//! Pulls individual sprites out of loosely laid-out AI sheets where the
//! cells do not align to a fixed grid. Anything magenta or near-black is
//! treated as separator; everything else is flood-filled into blobs and
//! cropped out with padding.

use std::collections::VecDeque;
use std::path::Path;

use image::{imageops, Rgba, RgbaImage};

use crate::core::{PipelineError, Result};

/// Minimum width and height for a blob to count as a sprite rather than
/// stray noise.
const MIN_EXTENT: u32 = 20;

/// Padding added around each blob's bounding box, clamped to the image.
const PADDING: u32 = 10;

/// Vertical band height used to sort blobs into reading order.
const ROW_BAND: u32 = 150;

/// Bounding box of one connected sprite blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blob {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Blob {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0 + 1
    }
}

/// Separator pixel: the magenta matte or a dark dividing line.
pub fn is_separator(p: Rgba<u8>) -> bool {
    let (r, g, b) = (p.0[0], p.0[1], p.0[2]);
    if r > 100 && b > 90 && g < 120 {
        return true;
    }
    r < 85 && g < 85 && b < 85
}

/// Find sprite blobs by 4-connected flood fill over non-separator
/// pixels, returned in reading order (coarse row bands, then x).
///
/// Seeding scans every 4th pixel; the fill itself is exact, so sprites
/// wider than the stride are never missed.
pub fn find_blobs(img: &RgbaImage) -> Vec<Blob> {
    let (w, h) = img.dimensions();
    let idx = |x: u32, y: u32| (y * w + x) as usize;
    let mut visited = vec![false; (w * h) as usize];
    let mut blobs = Vec::new();

    for sy in (0..h).step_by(4) {
        for sx in (0..w).step_by(4) {
            if visited[idx(sx, sy)] || is_separator(*img.get_pixel(sx, sy)) {
                continue;
            }

            let (mut x0, mut y0, mut x1, mut y1) = (sx, sy, sx, sy);
            let mut queue = VecDeque::new();
            visited[idx(sx, sy)] = true;
            queue.push_back((sx, sy));

            while let Some((x, y)) = queue.pop_front() {
                x0 = x0.min(x);
                y0 = y0.min(y);
                x1 = x1.max(x);
                y1 = y1.max(y);
                let neighbors = [
                    (x.wrapping_sub(1), y),
                    (x + 1, y),
                    (x, y.wrapping_sub(1)),
                    (x, y + 1),
                ];
                for (nx, ny) in neighbors {
                    if nx < w
                        && ny < h
                        && !visited[idx(nx, ny)]
                        && !is_separator(*img.get_pixel(nx, ny))
                    {
                        visited[idx(nx, ny)] = true;
                        queue.push_back((nx, ny));
                    }
                }
            }

            let blob = Blob { x0, y0, x1, y1 };
            if blob.width() > MIN_EXTENT && blob.height() > MIN_EXTENT {
                blobs.push(blob);
            }
        }
    }

    blobs.sort_by_key(|b| (b.y0 / ROW_BAND, b.x0));
    blobs
}

/// Crop one blob out of the image with padding.
pub fn crop_blob(img: &RgbaImage, blob: &Blob) -> RgbaImage {
    let (w, h) = img.dimensions();
    let x = blob.x0.saturating_sub(PADDING);
    let y = blob.y0.saturating_sub(PADDING);
    let x_end = (blob.x1 + 1 + PADDING).min(w);
    let y_end = (blob.y1 + 1 + PADDING).min(h);
    imageops::crop_imm(img, x, y, x_end - x, y_end - y).to_image()
}

/// Extract every blob from a sheet file into `{prefix}_{i:03}.png` under
/// `out_dir`. Returns the number of sprites written.
pub fn extract_blobs(input: &Path, out_dir: &Path, prefix: &str) -> Result<u32> {
    if !input.exists() {
        return Err(PipelineError::AssetNotFound(input.to_path_buf()));
    }
    std::fs::create_dir_all(out_dir)?;

    let img = image::open(input)?.to_rgba8();
    let blobs = find_blobs(&img);
    let mut count = 0u32;
    for blob in &blobs {
        let sprite = crop_blob(&img, blob);
        sprite.save(out_dir.join(format!("{prefix}_{count:03}.png")))?;
        count += 1;
    }
    tracing::info!(count, input = %input.display(), "extracted sprite blobs");
    Ok(count)
}
