//! Initial-image pass.
//!
//! At boot the configured PNG is tiled across the whole canvas, top-left
//! aligned, and every cell owned by this instance is set to the palette
//! color nearest the sampled source pixel. Cells owned by other instances
//! are skipped. Any failure here is fatal: the worker must not serve an
//! unseeded canvas.

use std::path::Path;

use image::{ImageReader, RgbaImage};
use thiserror::Error;

use crate::domain::{CanvasMatrix, Palette, Rgba};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("cannot open initial image: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot decode initial image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("initial image has zero width or height")]
    EmptyImage,
}

/// Decode the PNG at `path` and paint it onto the owned cells of `matrix`.
pub fn draw_initial_image(
    path: impl AsRef<Path>,
    matrix: &mut CanvasMatrix,
    palette: &Palette,
) -> Result<(), SeedError> {
    let image = ImageReader::open(path)?.decode()?.to_rgba8();
    seed_from_rgba(&image, matrix, palette)
}

/// Paint a decoded image onto the owned cells of `matrix`, tiling it by
/// sampling the source at `(x mod imgW, y mod imgH)`.
pub fn seed_from_rgba(
    image: &RgbaImage,
    matrix: &mut CanvasMatrix,
    palette: &Palette,
) -> Result<(), SeedError> {
    let (image_width, image_height) = image.dimensions();
    if image_width == 0 || image_height == 0 {
        return Err(SeedError::EmptyImage);
    }

    let total = matrix.total_instances();
    let mut x = matrix.instance_number();
    while x < matrix.width() {
        for y in 0..matrix.height() {
            let pixel = image.get_pixel(x as u32 % image_width, y as u32 % image_height);
            let sample = Rgba::new(pixel[0], pixel[1], pixel[2], pixel[3]);

            let wrote = matrix.set(x, y, palette.nearest(sample));
            debug_assert!(wrote, "write to an owned in-bounds cell cannot fail");
        }
        x += total;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::domain::ColorCode;

    fn black_white_palette() -> Palette {
        Palette::from_rgba(vec![
            Rgba::new(0, 0, 0, 255),
            Rgba::new(255, 255, 255, 255),
        ])
        .unwrap()
    }

    fn solid_image(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba(rgba))
    }

    #[test]
    fn test_single_light_pixel_seeds_whole_canvas_white() {
        // given: 2x2 canvas, black/white palette, 1x1 light gray image
        let mut matrix = CanvasMatrix::new(2, 2, 0, 1);
        let palette = black_white_palette();
        let image = solid_image(1, 1, [200, 200, 200, 255]);

        // when:
        seed_from_rgba(&image, &mut matrix, &palette).unwrap();

        // then: every cell is the palette index nearest to white
        for x in 0..2 {
            for y in 0..2 {
                assert_eq!(matrix.get(x, y), Some(ColorCode(1)));
            }
        }
    }

    #[test]
    fn test_image_tiles_across_larger_canvas() {
        // given: a 2x1 black|white image on a 4x1 canvas
        let mut image = solid_image(2, 1, [0, 0, 0, 255]);
        image.put_pixel(1, 0, image::Rgba([255, 255, 255, 255]));
        let mut matrix = CanvasMatrix::new(4, 1, 0, 1);
        let palette = black_white_palette();

        // when:
        seed_from_rgba(&image, &mut matrix, &palette).unwrap();

        // then: the pattern repeats
        assert_eq!(matrix.get(0, 0), Some(ColorCode(0)));
        assert_eq!(matrix.get(1, 0), Some(ColorCode(1)));
        assert_eq!(matrix.get(2, 0), Some(ColorCode(0)));
        assert_eq!(matrix.get(3, 0), Some(ColorCode(1)));
    }

    #[test]
    fn test_sharded_instance_seeds_owned_columns_only() {
        // given: instance 1 of 2 on a 4x2 canvas, all-white image
        let mut matrix = CanvasMatrix::new(4, 2, 1, 2);
        let palette = black_white_palette();
        let image = solid_image(1, 1, [255, 255, 255, 255]);

        // when:
        seed_from_rgba(&image, &mut matrix, &palette).unwrap();

        // then: owned columns hold white, foreign columns are not readable here
        for y in 0..2 {
            assert_eq!(matrix.get(1, y), Some(ColorCode(1)));
            assert_eq!(matrix.get(3, y), Some(ColorCode(1)));
            assert_eq!(matrix.get(0, y), None);
            assert_eq!(matrix.get(2, y), None);
        }
    }

    #[test]
    fn test_draw_initial_image_decodes_png_from_disk() {
        // given: a 1x1 light gray PNG written to a temp path
        let image = solid_image(1, 1, [200, 200, 200, 255]);
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let path = std::env::temp_dir().join(format!("seed-test-{}.png", std::process::id()));
        std::fs::write(&path, &bytes).unwrap();

        let mut matrix = CanvasMatrix::new(2, 2, 0, 1);
        let palette = black_white_palette();

        // when:
        let result = draw_initial_image(&path, &mut matrix, &palette);
        std::fs::remove_file(&path).ok();

        // then:
        result.unwrap();
        assert_eq!(matrix.get(0, 0), Some(ColorCode(1)));
        assert_eq!(matrix.get(1, 1), Some(ColorCode(1)));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        // given:
        let mut matrix = CanvasMatrix::new(2, 2, 0, 1);
        let palette = black_white_palette();

        // when:
        let result = draw_initial_image("/nonexistent/initial.png", &mut matrix, &palette);

        // then:
        assert!(matches!(result, Err(SeedError::Io(_))));
    }

    #[test]
    fn test_garbage_bytes_are_a_decode_error() {
        // given: a file that is not a PNG
        let path = std::env::temp_dir().join(format!("seed-garbage-{}.png", std::process::id()));
        std::fs::write(&path, b"not a png").unwrap();

        let mut matrix = CanvasMatrix::new(2, 2, 0, 1);
        let palette = black_white_palette();

        // when:
        let result = draw_initial_image(&path, &mut matrix, &palette);
        std::fs::remove_file(&path).ok();

        // then:
        assert!(matches!(result, Err(SeedError::Decode(_))));
    }
}
