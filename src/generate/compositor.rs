//! Frame compositing.
//!
//! Stacks layer sheets back-to-front into one RGBA frame. Source sheets
//! come in several LPC-era geometries (64, 128 and 192 px frames, 1 to 21
//! rows), so the per-asset frame size is inferred from pixel dimensions
//! and the action row is located through a priority list of fallbacks when
//! the primary crop turns out to be empty.

use std::path::PathBuf;

use image::{imageops, RgbaImage};

/// One element of a composite stack.
#[derive(Debug, Clone)]
pub struct LayerEntry {
    pub path: PathBuf,
    /// Drawn before the body rather than after.
    pub behind: bool,
}

/// Canvas edge length for one composited frame, in pixels.
pub const TARGET_SIZE: u32 = 128;

/// Paste offset for 64 px source frames on the 128 px canvas.
const CHAR_OFFSET: i64 = 32;

/// Row indices per action in full 21-row LPC sheets.
fn lpc_row_21(action: &str) -> u32 {
    match action {
        "spellcast" => 2,
        "thrust" => 6,
        "walk" => 10,
        "slash" => 14,
        "shoot" => 18,
        "hurt" => 20,
        _ => 10,
    }
}

/// Infer an asset sheet's frame size from its pixel dimensions.
///
/// Tuned against the shipped art set: 64-divisible sheets with 1/2/4/21
/// rows are 64 px; 6/9/13-column 128 px sheets are recognized by width;
/// otherwise plain 128/192 divisibility decides.
pub fn infer_frame_size(width: u32, height: u32) -> u32 {
    if width % 64 == 0 && height % 64 == 0 {
        let rows_64 = height / 64;
        if matches!(rows_64, 1 | 2 | 4 | 21) {
            64
        } else if matches!(width / 128, 6 | 9 | 13) {
            128
        } else {
            64
        }
    } else if width % 128 == 0 {
        128
    } else if width % 192 == 0 {
        192
    } else {
        64
    }
}

/// Row within the asset for the requested action, by sheet height.
pub fn action_row(action: &str, asset_rows: u32) -> u32 {
    if asset_rows >= 21 {
        lpc_row_21(action)
    } else if asset_rows >= 4 {
        2
    } else {
        0
    }
}

/// Bounding box of non-transparent content, half-open (x0, y0, x1, y1).
pub fn content_bounds(img: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel.0[3] > 0 {
            bounds = Some(match bounds {
                None => (x, y, x + 1, y + 1),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
            });
        }
    }
    bounds
}

/// True when the image has no pixel with non-zero alpha.
pub fn is_blank(img: &RgbaImage) -> bool {
    img.pixels().all(|p| p.0[3] == 0)
}

/// Crop one frame out of an asset sheet, with its canvas paste offset.
///
/// Returns `None` for out-of-range rows/columns. 192 px frames contribute
/// their centered 128 px window.
fn crop_asset_frame(
    sheet: &RgbaImage,
    frame_size: u32,
    row: u32,
    col: u32,
) -> Option<(RgbaImage, (i64, i64))> {
    let (width, height) = sheet.dimensions();
    let rows = height / frame_size;
    let cols = width / frame_size;
    if row >= rows || col >= cols {
        return None;
    }
    let sx = col * frame_size;
    let sy = row * frame_size;
    match frame_size {
        64 => {
            let crop = imageops::crop_imm(sheet, sx, sy, 64, 64).to_image();
            Some((crop, (CHAR_OFFSET, CHAR_OFFSET)))
        }
        128 => {
            let crop = imageops::crop_imm(sheet, sx, sy, 128, 128).to_image();
            Some((crop, (0, 0)))
        }
        192 => {
            let crop = imageops::crop_imm(sheet, sx + 32, sy + 32, 128, 128).to_image();
            Some((crop, (0, 0)))
        }
        _ => None,
    }
}

/// Locate a usable frame for `action` at column `col` within an opened
/// sheet, applying the fallback row/frame search when the primary crop is
/// fully transparent.
pub fn locate_frame(sheet: &RgbaImage, action: &str, col: u32) -> Option<(RgbaImage, (i64, i64))> {
    let (width, height) = sheet.dimensions();
    let frame_size = infer_frame_size(width, height);
    let rows = height / frame_size;
    let cols = width / frame_size;
    if rows == 0 || cols == 0 {
        return None;
    }

    let row = action_row(action, rows);
    let primary = crop_asset_frame(sheet, frame_size, row, col % cols);
    if let Some((frame, pos)) = primary {
        if !is_blank(&frame) {
            return Some((frame, pos));
        }
    }

    // Heuristic recovery scan: preferred rows first, then a bounded sweep.
    // Can silently substitute a nearby frame; that beats dropping the layer.
    for search_row in [2, 0, 1, 3] {
        if search_row < rows {
            if let Some((frame, pos)) = crop_asset_frame(sheet, frame_size, search_row, 0) {
                if !is_blank(&frame) {
                    return Some((frame, pos));
                }
            }
        }
    }
    for r in 0..rows.min(8) {
        for c in 0..cols.min(8) {
            if let Some((frame, pos)) = crop_asset_frame(sheet, frame_size, r, c) {
                if !is_blank(&frame) {
                    return Some((frame, pos));
                }
            }
        }
    }
    None
}

/// Composite one frame from an ordered layer stack.
///
/// Layers whose file is missing or unreadable are skipped with a debug
/// diagnostic; an all-transparent layer contributes nothing.
pub fn composite_frame(stack: &[LayerEntry], action: &str, col: u32) -> RgbaImage {
    let mut canvas = RgbaImage::new(TARGET_SIZE, TARGET_SIZE);
    for entry in stack {
        if !entry.path.exists() {
            tracing::debug!(path = %entry.path.display(), "layer sheet missing, skipped");
            continue;
        }
        let sheet = match image::open(&entry.path) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                tracing::debug!(path = %entry.path.display(), error = %e, "unreadable layer sheet, skipped");
                continue;
            }
        };
        if let Some((frame, (ox, oy))) = locate_frame(&sheet, action, col) {
            imageops::overlay(&mut canvas, &frame, ox, oy);
        }
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn opaque_block(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32) {
        for dy in 0..h {
            for dx in 0..w {
                img.put_pixel(x + dx, y + dy, Rgba([200, 100, 50, 255]));
            }
        }
    }

    #[test]
    fn test_infer_frame_size_heuristic() {
        // 9x4 walk sheet of 64 px frames.
        assert_eq!(infer_frame_size(576, 256), 64);
        // 21-row universal sheet.
        assert_eq!(infer_frame_size(832, 1344), 64);
        // 13-column 128 px sheet (13*128 = 1664, rows_64 = 10).
        assert_eq!(infer_frame_size(1664, 640), 128);
        // Oversize weapon sheet; height off the 64 grid forces the
        // coarse divisibility checks.
        assert_eq!(infer_frame_size(1344, 288), 192);
    }

    #[test]
    fn test_action_row_by_sheet_height() {
        assert_eq!(action_row("walk", 21), 10);
        assert_eq!(action_row("slash", 21), 14);
        assert_eq!(action_row("hurt", 21), 20);
        assert_eq!(action_row("walk", 4), 2);
        assert_eq!(action_row("walk", 1), 0);
    }

    #[test]
    fn test_locate_frame_primary_hit() {
        // 4-row 64 px sheet with content only in row 2 (the primary row).
        let mut sheet = RgbaImage::new(576, 256);
        opaque_block(&mut sheet, 3 * 64 + 10, 2 * 64 + 10, 8, 8);
        let (frame, pos) = locate_frame(&sheet, "walk", 3).unwrap();
        assert_eq!(pos, (32, 32));
        assert!(!is_blank(&frame));
        assert_eq!(frame.dimensions(), (64, 64));
    }

    #[test]
    fn test_locate_frame_fallback_priority() {
        // Primary (row 2, col 0) empty; rows 0 and 3 both have content.
        // The fallback order [2, 0, 1, 3] must pick row 0.
        let mut sheet = RgbaImage::new(576, 256);
        opaque_block(&mut sheet, 4, 4, 4, 4); // row 0, col 0
        opaque_block(&mut sheet, 4, 3 * 64 + 4, 4, 4); // row 3, col 0
        sheet.put_pixel(4, 3 * 64 + 4, Rgba([1, 2, 3, 255]));

        let (frame, _) = locate_frame(&sheet, "walk", 0).unwrap();
        // Row 0 content sits at (4,4) within the frame.
        assert!(frame.get_pixel(4, 4).0[3] > 0);
    }

    #[test]
    fn test_locate_frame_all_transparent_yields_none() {
        let sheet = RgbaImage::new(576, 256);
        assert!(locate_frame(&sheet, "walk", 0).is_none());
    }

    #[test]
    fn test_composite_skips_missing_layers() {
        let stack = vec![LayerEntry {
            path: PathBuf::from("/nonexistent/sheet.png"),
            behind: false,
        }];
        let frame = composite_frame(&stack, "walk", 0);
        assert_eq!(frame.dimensions(), (TARGET_SIZE, TARGET_SIZE));
        assert!(is_blank(&frame));
    }

    #[test]
    fn test_192_frames_use_centered_window() {
        // 192 px single-frame sheet (height off the 64 grid so the size
        // inference lands on 192).
        let mut sheet = RgbaImage::new(192, 288);
        // (96, 96) lands at (96-32, 96-32) = (64, 64) in the crop window.
        opaque_block(&mut sheet, 96, 96, 2, 2);
        let (frame, pos) = locate_frame(&sheet, "walk", 0).unwrap();
        assert_eq!(frame.dimensions(), (128, 128));
        assert_eq!(pos, (0, 0));
        assert!(frame.get_pixel(64, 64).0[3] > 0);
    }
}
