use std::path::Path;

use image::{DynamicImage, GrayImage, imageops::FilterType};
use log::debug;

/// Characters from darkest to brightest.
const RAMP: &[u8] = b" .:-=+*#%@";

/// Source image for picture-mode tiles.
#[derive(Debug, Clone)]
pub struct Picture {
    image: DynamicImage,
}

impl Picture {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, image::ImageError> {
        let image = image::open(path.as_ref())?;
        debug!(
            "Loaded picture {} ({}x{})",
            path.as_ref().display(),
            image.width(),
            image.height()
        );
        Ok(Picture::from_image(image))
    }

    pub fn from_image(image: DynamicImage) -> Self {
        Picture { image }
    }

    /// Scale the picture to a `size` x `size` board of `width` x `height` character tiles and
    /// cut it into cells, returned in row-major order.
    pub fn cells(&self, size: usize, width: u16, height: u16) -> Vec<Vec<String>> {
        let (width, height) = (width as u32, height as u32);
        let scaled = self
            .image
            .resize_exact(
                width * size as u32,
                height * size as u32,
                FilterType::Triangle,
            )
            .to_luma8();

        let mut cells = Vec::with_capacity(size * size);
        for cell_y in 0..size as u32 {
            for cell_x in 0..size as u32 {
                cells.push(cell_rows(
                    &scaled,
                    cell_x * width,
                    cell_y * height,
                    width,
                    height,
                ));
            }
        }
        cells
    }
}

fn cell_rows(image: &GrayImage, left: u32, top: u32, width: u32, height: u32) -> Vec<String> {
    (top..top + height)
        .map(|y| {
            (left..left + width)
                .map(|x| {
                    let luma = image.get_pixel(x, y)[0] as usize;
                    RAMP[(luma * (RAMP.len() - 1)) / 255] as char
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_cells_shape() {
        let image = GrayImage::from_fn(40, 30, |x, y| Luma([((x + y) % 256) as u8]));
        let picture = Picture::from_image(DynamicImage::ImageLuma8(image));

        let cells = picture.cells(3, 5, 2);
        assert_eq!(cells.len(), 9);
        for cell in &cells {
            assert_eq!(cell.len(), 2);
            assert!(cell.iter().all(|row| row.chars().count() == 5));
        }
    }

    #[test]
    fn test_cells_follow_brightness() {
        // Left half black, right half white
        let image = GrayImage::from_fn(8, 4, |x, _| Luma([if x < 4 { 0 } else { 255 }]));
        let picture = Picture::from_image(DynamicImage::ImageLuma8(image));

        let cells = picture.cells(2, 4, 2);
        assert_eq!(cells[0], vec!["    ", "    "]);
        assert_eq!(cells[1], vec!["@@@@", "@@@@"]);
        assert_eq!(cells[2], cells[0]);
        assert_eq!(cells[3], cells[1]);
    }

    #[test]
    fn test_open_missing_file() {
        assert!(Picture::open("no_such_picture.png").is_err());
    }
}
