//! Batch sheet auditing.
//!
//! Checks generated sprite sheets for the failure modes seen in bulk
//! runs: wrong dimensions, empty core rows, headless characters, and
//! frames clipped against the frame edge. Offenders are written to a
//! JSON report; clean sheets produce no record at all.

use std::path::Path;

use image::{imageops, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::config::SheetConfig;
use crate::core::Result;
use crate::generate::compositor::content_bounds;

/// Fraction of the character's bounding box that must contain the head.
const HEAD_FRACTION: f32 = 0.45;

/// Characters wider or taller than this are allowed to touch the frame
/// edge without counting as clipped.
const CLIP_EXEMPT_EXTENT: u32 = 120;

/// Margin (in pixels) from the frame edge inside which content counts
/// as clipped.
const CLIP_MARGIN: u32 = 2;

/// Audit findings for one sheet. Only offenders get a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl AuditRecord {
    fn missing(id: u64) -> Self {
        AuditRecord {
            id,
            status: Some("MISSING_FILE".into()),
            errors: Vec::new(),
        }
    }

    fn unreadable(id: u64) -> Self {
        AuditRecord {
            id,
            status: Some("UNREADABLE".into()),
            errors: Vec::new(),
        }
    }
}

fn first_frame(img: &RgbaImage, row: u32, frame_size: u32) -> RgbaImage {
    imageops::crop_imm(img, 0, row * frame_size, frame_size, frame_size).to_image()
}

/// Audit one sheet image, returning every problem found.
pub fn audit_sheet(img: &RgbaImage, cfg: &SheetConfig) -> Vec<String> {
    let fs = cfg.frame_size;
    let mut errors = Vec::new();

    let (w, h) = img.dimensions();
    if w != cfg.width() || h != cfg.height() {
        errors.push(format!("Bad Dimensions: {w}x{h}"));
    }

    // Adaptive head check on the first frame of each row. The head must
    // occupy the top portion of the character's own bounding box, so a
    // low-standing character is not falsely flagged.
    for row in 0..cfg.rows {
        if (row + 1) * fs > h {
            break;
        }
        let frame = first_frame(img, row, fs);
        let Some((x0, y0, x1, y1)) = content_bounds(&frame) else {
            // Idle and walk rows must never be empty.
            if row < 2 {
                errors.push(format!("Row {row} is empty"));
            }
            continue;
        };
        let char_h = y1 - y0;
        let head_h = (char_h as f32 * HEAD_FRACTION) as u32;
        let head = imageops::crop_imm(&frame, x0, y0, x1 - x0, head_h).to_image();
        if head_h == 0 || content_bounds(&head).is_none() {
            errors.push(format!("Row {row} is headless"));
        }
    }

    // Clipping check on the walk row. Both axes use the walk frame's
    // own bounding box; oversized characters are exempt.
    if 2 * fs <= h {
        let walk = first_frame(img, 1, fs);
        if let Some((x0, y0, x1, y1)) = content_bounds(&walk) {
            let char_w = x1 - x0;
            let char_h = y1 - y0;
            if char_w < CLIP_EXEMPT_EXTENT && (x0 < CLIP_MARGIN || x1 > fs - CLIP_MARGIN) {
                errors.push("Misaligned/Clipped (X-Axis)".into());
            }
            if char_h < CLIP_EXEMPT_EXTENT && (y0 < CLIP_MARGIN || y1 > fs - CLIP_MARGIN) {
                errors.push("Misaligned/Clipped (Y-Axis)".into());
            }
        }
    }

    errors
}

/// Audit one `npc_{id:03}.png` under `dir`. Returns `None` for a clean
/// sheet.
pub fn audit_file(dir: &Path, id: u64, cfg: &SheetConfig) -> Option<AuditRecord> {
    let path = dir.join(format!("npc_{id:03}.png"));
    if !path.exists() {
        return Some(AuditRecord::missing(id));
    }
    let img = match image::open(&path) {
        Ok(img) => img.to_rgba8(),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "unreadable sheet");
            return Some(AuditRecord::unreadable(id));
        }
    };
    let errors = audit_sheet(&img, cfg);
    if errors.is_empty() {
        None
    } else {
        Some(AuditRecord {
            id,
            status: None,
            errors,
        })
    }
}

/// Audit ids `0..count` under `dir` and write the offenders to `report`
/// as a JSON array. Returns the offender records.
pub fn audit_directory(
    dir: &Path,
    count: u64,
    cfg: &SheetConfig,
    report: &Path,
) -> Result<Vec<AuditRecord>> {
    let mut broken = Vec::new();
    for id in 0..count {
        if let Some(record) = audit_file(dir, id, cfg) {
            broken.push(record);
        }
        if id % 100 == 0 {
            tracing::info!(id, "auditing");
        }
    }
    let json = serde_json::to_string_pretty(&broken)?;
    std::fs::write(report, json)?;
    tracing::info!(
        offenders = broken.len(),
        report = %report.display(),
        "audit complete"
    );
    Ok(broken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const INK: Rgba<u8> = Rgba([40, 40, 40, 255]);

    fn cfg() -> SheetConfig {
        SheetConfig::default()
    }

    fn blank_sheet() -> RgbaImage {
        let c = cfg();
        RgbaImage::new(c.width(), c.height())
    }

    /// Paint a well-formed character into the first frame of `row`:
    /// a head block over a body block, centered, clear of the edges.
    fn paint_character(img: &mut RgbaImage, row: u32) {
        let base = row * 128;
        for y in 20..50 {
            for x in 48..80 {
                img.put_pixel(x, base + y, INK);
            }
        }
        for y in 50..110 {
            for x in 40..88 {
                img.put_pixel(x, base + y, INK);
            }
        }
    }

    fn good_sheet() -> RgbaImage {
        let mut img = blank_sheet();
        for row in 0..5 {
            paint_character(&mut img, row);
        }
        img
    }

    #[test]
    fn test_clean_sheet_has_no_errors() {
        assert!(audit_sheet(&good_sheet(), &cfg()).is_empty());
    }

    #[test]
    fn test_bad_dimensions_flagged() {
        let img = RgbaImage::new(128, 128);
        let errors = audit_sheet(&img, &cfg());
        assert!(errors.iter().any(|e| e.starts_with("Bad Dimensions")));
    }

    #[test]
    fn test_empty_core_rows_flagged_others_tolerated() {
        let mut img = blank_sheet();
        // Only rows 2..5 painted; idle and walk left empty.
        for row in 2..5 {
            paint_character(&mut img, row);
        }
        let errors = audit_sheet(&img, &cfg());
        assert!(errors.contains(&"Row 0 is empty".to_string()));
        assert!(errors.contains(&"Row 1 is empty".to_string()));
        assert_eq!(errors.len(), 2);

        // An empty feed row alone is fine.
        let mut img = blank_sheet();
        for row in [0, 1, 3, 4] {
            paint_character(&mut img, row);
        }
        assert!(audit_sheet(&img, &cfg()).is_empty());
    }

    #[test]
    fn test_headless_row_flagged() {
        let mut img = good_sheet();
        // Collapse row 3's character to a 2px sliver, too short to hold
        // a head band at all.
        for y in 0..128 {
            for x in 0..128 {
                img.put_pixel(x, 3 * 128 + y, Rgba([0, 0, 0, 0]));
            }
        }
        for y in 100..102 {
            for x in 40..88 {
                img.put_pixel(x, 3 * 128 + y, INK);
            }
        }
        let errors = audit_sheet(&img, &cfg());
        assert_eq!(errors, vec!["Row 3 is headless".to_string()]);
    }

    #[test]
    fn test_clipped_walk_frame_flagged() {
        let mut img = good_sheet();
        // Push content in the walk row against the left edge.
        for y in 40..90 {
            img.put_pixel(0, 128 + y, INK);
        }
        let errors = audit_sheet(&img, &cfg());
        assert!(errors.contains(&"Misaligned/Clipped (X-Axis)".to_string()));
    }

    #[test]
    fn test_oversized_character_exempt_from_clip_check() {
        let mut img = good_sheet();
        // Walk-row character spans nearly the full frame on both axes.
        for y in 0..128 {
            for x in 0..128 {
                img.put_pixel(x, 128 + y, INK);
            }
        }
        let errors = audit_sheet(&img, &cfg());
        assert!(!errors.iter().any(|e| e.starts_with("Misaligned")));
    }

    #[test]
    fn test_missing_file_record() {
        let dir = Path::new("/nonexistent/audit");
        let record = audit_file(dir, 3, &cfg()).unwrap();
        assert_eq!(record.status.as_deref(), Some("MISSING_FILE"));
        assert!(record.errors.is_empty());
    }
}
