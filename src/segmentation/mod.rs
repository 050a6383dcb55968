//! Turns a color micrograph into a list of foreground regions.
//!
//! Color threshold, then morphological cleanup, then external boundary tracing.

pub mod color_filter;
pub use color_filter::filter;
pub mod morphology;
pub use morphology::{StructuringElement, clean};
pub mod regions;
pub use regions::{Region, extract_regions};

use image::GrayImage;

/// Binary foreground mask: `FOREGROUND` or `BACKGROUND` per pixel.
pub type Mask = GrayImage;

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

pub fn foreground_count(mask: &Mask) -> usize {
    mask.as_raw().iter().filter(|&&px| px != BACKGROUND).count()
}
