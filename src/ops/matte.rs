//! Background removal.
//!
//! Two passes from the art cleanup pipeline: a distance-threshold keyer
//! for assets on a flat detected background, and a heavier "matte finish"
//! for AI-generated grids with magenta mattes and dark separator lines,
//! which flood-fills the connected background inward from the border and
//! recenters the surviving content.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use image::{imageops, Rgba, RgbaImage};

use crate::core::{PipelineError, Result};
use crate::generate::compositor::content_bounds;

/// Euclidean distance between two colors in RGB space.
pub fn color_distance(a: Rgba<u8>, b: Rgba<u8>) -> f32 {
    let dr = a.0[0] as f32 - b.0[0] as f32;
    let dg = a.0[1] as f32 - b.0[1] as f32;
    let db = a.0[2] as f32 - b.0[2] as f32;
    (dr * dr + dg * dg + db * db).sqrt()
}

fn near_white(p: Rgba<u8>) -> bool {
    p.0[0] > 250 && p.0[1] > 250 && p.0[2] > 250
}

/// Detect the background color by majority vote over the four corners;
/// ties go to the top-left corner.
pub fn detect_background(img: &RgbaImage) -> Rgba<u8> {
    let (w, h) = img.dimensions();
    let corners = [
        *img.get_pixel(0, 0),
        *img.get_pixel(w - 1, 0),
        *img.get_pixel(0, h - 1),
        *img.get_pixel(w - 1, h - 1),
    ];
    let mut best = corners[0];
    let mut best_count = 0;
    for &candidate in &corners {
        let count = corners.iter().filter(|&&c| c == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Key out the background: any pixel within `threshold` RGB distance of
/// `bg` becomes fully transparent; every other pixel is left untouched.
/// When the background itself is near-white, compression-artifact whites
/// are keyed as well.
pub fn key_out(img: &mut RgbaImage, bg: Rgba<u8>, threshold: f32) {
    let key_whites = near_white(bg);
    for pixel in img.pixels_mut() {
        if color_distance(*pixel, bg) < threshold || (key_whites && near_white(*pixel)) {
            pixel.0[3] = 0;
        }
    }
}

/// Detect and key out the background of one file, writing the result as
/// `<stem>_clean.png` beside it. Returns the written path.
pub fn clean_file(path: &Path, threshold: f32) -> Result<PathBuf> {
    if !path.exists() {
        return Err(PipelineError::AssetNotFound(path.to_path_buf()));
    }
    let mut img = image::open(path)?.to_rgba8();
    let bg = detect_background(&img);
    tracing::info!(path = %path.display(), bg = ?bg.0, "keying background");
    key_out(&mut img, bg, threshold);

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".into());
    let out = path.with_file_name(format!("{stem}_clean.png"));
    img.save(&out)?;
    Ok(out)
}

/// Magenta-family matte pixel (the AI grid background).
pub fn is_magenta(p: Rgba<u8>) -> bool {
    let (r, g, b) = (p.0[0] as f32, p.0[1] as f32, p.0[2] as f32);
    if r > 110.0 && b > 90.0 && r > g * 1.15 && b > g * 1.15 {
        return true;
    }
    // Darker pink compression artifacts.
    r > 60.0 && b > 50.0 && r > g * 1.5 && b > g * 1.5
}

/// Dark grid separator line pixel.
pub fn is_dark_line(p: Rgba<u8>) -> bool {
    p.0[0] < 75 && p.0[1] < 75 && p.0[2] < 75
}

/// Clear the dark separator lines connected to the image border.
///
/// Seeds are the two-pixel border frame; the fill follows transparent
/// pixels (already-cleared matte) and dark-line pixels, so interior dark
/// details that never touch the border survive.
fn clear_border_lines(img: &mut RgbaImage) {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return;
    }
    let idx = |x: u32, y: u32| (y * w + x) as usize;
    let mut visited = vec![false; (w * h) as usize];
    let mut queue = VecDeque::new();

    let mut seed = |x: u32, y: u32, img: &RgbaImage, visited: &mut Vec<bool>, queue: &mut VecDeque<(u32, u32)>| {
        let p = *img.get_pixel(x, y);
        if !visited[idx(x, y)] && (p.0[3] == 0 || is_dark_line(p)) {
            visited[idx(x, y)] = true;
            queue.push_back((x, y));
        }
    };
    // Seed columns/rows can coincide or fall outside narrow images.
    for x in [0, 1, w.saturating_sub(2), w - 1] {
        if x >= w {
            continue;
        }
        for y in 0..h {
            seed(x, y, img, &mut visited, &mut queue);
        }
    }
    for y in [0, 1, h.saturating_sub(2), h - 1] {
        if y >= h {
            continue;
        }
        for x in 0..w {
            seed(x, y, img, &mut visited, &mut queue);
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        let neighbors = [
            (x.wrapping_sub(1), y),
            (x + 1, y),
            (x, y.wrapping_sub(1)),
            (x, y + 1),
        ];
        for (nx, ny) in neighbors {
            if nx < w && ny < h && !visited[idx(nx, ny)] {
                let p = *img.get_pixel(nx, ny);
                if p.0[3] == 0 || is_dark_line(p) {
                    visited[idx(nx, ny)] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
    }

    for y in 0..h {
        for x in 0..w {
            if visited[idx(x, y)] {
                img.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            }
        }
    }
}

/// Full matte finish: clear magenta globally, flood out border-connected
/// grid lines, then trim, scale (capped at 2x) and center the surviving
/// content on a transparent `target`-sized canvas.
///
/// Returns `None` when nothing but background survives.
pub fn finish_matte(src: &RgbaImage, target: u32) -> Option<RgbaImage> {
    let mut img = src.clone();
    for pixel in img.pixels_mut() {
        if is_magenta(*pixel) {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }
    clear_border_lines(&mut img);

    let (x0, y0, x1, y1) = content_bounds(&img)?;
    let content = imageops::crop_imm(&img, x0, y0, x1 - x0, y1 - y0).to_image();
    let (cw, ch) = content.dimensions();

    let limit = target.saturating_sub(20).max(1) as f32;
    let scale = (limit / cw as f32).min(limit / ch as f32).min(2.0);
    let nw = ((cw as f32 * scale) as u32).max(1);
    let nh = ((ch as f32 * scale) as u32).max(1);
    let scaled = imageops::resize(&content, nw, nh, imageops::FilterType::Lanczos3);

    let mut canvas = RgbaImage::new(target, target);
    let ox = (target - nw.min(target)) / 2;
    let oy = (target - nh.min(target)) / 2;
    imageops::overlay(&mut canvas, &scaled, ox as i64, oy as i64);
    Some(canvas)
}

/// Matte-finish one file in place.
pub fn finish_matte_file(path: &Path, target: u32) -> Result<bool> {
    let img = image::open(path)?.to_rgba8();
    match finish_matte(&img, target) {
        Some(out) => {
            out.save(path)?;
            Ok(true)
        }
        None => {
            tracing::warn!(path = %path.display(), "no content survived matte pass");
            Ok(false)
        }
    }
}
