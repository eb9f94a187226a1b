//! Grid cropping.
//!
//! Splits a grid image into rows x cols cells using floor-division cell
//! sizes, exactly like the art tools that produced the grids: any
//! right/bottom remainder outside the R*C cell area is discarded.

use std::path::Path;

use image::{imageops, RgbaImage};

use crate::core::{PipelineError, Result};

/// One cropped cell and its offset within the source image.
#[derive(Debug)]
pub struct GridCell {
    pub image: RgbaImage,
    pub x: u32,
    pub y: u32,
}

/// Crop an image into `rows * cols` non-overlapping cells in reading
/// order (left-to-right, top-to-bottom).
pub fn crop_grid(img: &RgbaImage, rows: u32, cols: u32) -> Result<Vec<GridCell>> {
    let (width, height) = img.dimensions();
    if rows == 0 || cols == 0 {
        return Err(PipelineError::InvalidGeometry(
            "rows and cols must be positive".into(),
        ));
    }
    let cell_w = width / cols;
    let cell_h = height / rows;
    if cell_w == 0 || cell_h == 0 {
        return Err(PipelineError::InvalidGeometry(format!(
            "{width}x{height} image cannot be split into {rows}x{cols} cells"
        )));
    }

    let mut cells = Vec::with_capacity((rows * cols) as usize);
    for r in 0..rows {
        for c in 0..cols {
            let x = c * cell_w;
            let y = r * cell_h;
            cells.push(GridCell {
                image: imageops::crop_imm(img, x, y, cell_w, cell_h).to_image(),
                x,
                y,
            });
        }
    }
    Ok(cells)
}

/// Crop a grid image file and write each cell as `{prefix}_{i:03}.png`.
/// Returns the number of cells written.
pub fn crop_grid_files(
    input: &Path,
    rows: u32,
    cols: u32,
    out_dir: &Path,
    prefix: &str,
) -> Result<u32> {
    if !input.exists() {
        return Err(PipelineError::AssetNotFound(input.to_path_buf()));
    }
    std::fs::create_dir_all(out_dir)?;

    let img = image::open(input)?.to_rgba8();
    let cells = crop_grid(&img, rows, cols)?;
    let mut count = 0u32;
    for cell in &cells {
        let name = format!("{prefix}_{count:03}.png");
        cell.image.save(out_dir.join(name))?;
        count += 1;
    }
    tracing::info!(count, out = %out_dir.display(), "extracted grid cells");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use proptest::prelude::*;

    fn gradient_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([
                (x % 251) as u8,
                (y % 249) as u8,
                ((x + y) % 253) as u8,
                255,
            ])
        })
    }

    #[test]
    fn test_cell_count_and_order() {
        let img = gradient_image(120, 90);
        let cells = crop_grid(&img, 3, 4).unwrap();
        assert_eq!(cells.len(), 12);
        assert_eq!((cells[0].x, cells[0].y), (0, 0));
        assert_eq!((cells[1].x, cells[1].y), (30, 0));
        assert_eq!((cells[4].x, cells[4].y), (0, 30));
        for cell in &cells {
            assert_eq!(cell.image.dimensions(), (30, 30));
        }
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let img = gradient_image(10, 10);
        assert!(crop_grid(&img, 0, 3).is_err());
        assert!(crop_grid(&img, 3, 0).is_err());
        assert!(crop_grid(&img, 20, 1).is_err());
    }

    #[test]
    fn test_reconstruction_is_exact() {
        let img = gradient_image(64, 48);
        let cells = crop_grid(&img, 4, 4).unwrap();
        let mut rebuilt = RgbaImage::new(64, 48);
        for cell in &cells {
            image::imageops::replace(&mut rebuilt, &cell.image, cell.x as i64, cell.y as i64);
        }
        assert_eq!(img.as_raw(), rebuilt.as_raw());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Pasting every crop back at its offset reconstructs the covered
        /// region pixel-for-pixel, and crops never overlap.
        #[test]
        fn prop_grid_crops_partition_covered_region(
            rows in 1u32..6,
            cols in 1u32..6,
            extra_w in 0u32..5,
            extra_h in 0u32..5,
        ) {
            let width = cols * 7 + extra_w;
            let height = rows * 5 + extra_h;
            let img = gradient_image(width, height);
            let cells = crop_grid(&img, rows, cols).unwrap();

            prop_assert_eq!(cells.len() as u32, rows * cols);

            let cell_w = width / cols;
            let cell_h = height / rows;
            let mut covered = vec![0u8; (width * height) as usize];
            for cell in &cells {
                prop_assert_eq!(cell.image.dimensions(), (cell_w, cell_h));
                for (dx, dy, pixel) in cell.image.enumerate_pixels() {
                    let (x, y) = (cell.x + dx, cell.y + dy);
                    prop_assert_eq!(pixel, img.get_pixel(x, y));
                    covered[(y * width + x) as usize] += 1;
                }
            }
            // Each covered pixel exactly once; no overlaps.
            prop_assert!(covered.iter().all(|&c| c <= 1));
            prop_assert_eq!(
                covered.iter().filter(|&&c| c == 1).count() as u32,
                rows * cell_h * cols * cell_w
            );
        }
    }
}
