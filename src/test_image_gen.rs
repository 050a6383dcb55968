use image::{Rgb, RgbImage};

/// Stain color inside the default color window (in both channel orders).
pub const CELL_COLOR: Rgb<u8> = Rgb([200, 80, 200]);
/// Background color outside the default color window.
pub const BACKGROUND_COLOR: Rgb<u8> = Rgb([10, 10, 10]);

/// An axis-aligned square "cell" painted onto a synthetic slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquareCell {
    pub x: u32,
    pub y: u32,
    pub side: u32,
}

impl SquareCell {
    pub fn new(x: u32, y: u32, side: u32) -> Self {
        Self { x, y, side }
    }
}

/// Generates a dark slide with square cells of [`CELL_COLOR`].
///
/// Squares make expected boundary areas easy to derive by hand. Parts of a
/// square falling outside the slide are clipped.
pub fn synthetic_slide(width: u32, height: u32, cells: &[SquareCell]) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND_COLOR);
    for cell in cells {
        for y in cell.y..cell.y.saturating_add(cell.side).min(height) {
            for x in cell.x..cell.x.saturating_add(cell.side).min(width) {
                img.put_pixel(x, y, CELL_COLOR);
            }
        }
    }
    img
}
