//! Draws classified region outlines over the source image.

use image::RgbImage;
use imageproc::drawing::draw_line_segment_mut;

use crate::config::CountConfig;
use crate::estimate::ClassifiedRegion;

/// Copy of `source` with each region's closed boundary stroked in its display
/// color (clusters and single cells differ), `outline_thickness` pixels wide.
pub fn draw_overlay(
    source: &RgbImage,
    regions: &[ClassifiedRegion],
    config: &CountConfig,
) -> RgbImage {
    let mut canvas = source.clone();
    let thickness = config.outline_thickness.max(1) as i32;
    let lo = -(thickness - 1) / 2;
    let hi = thickness / 2;

    for classified in regions {
        let color = classified.display_color(config);
        let points = classified.region.boundary();
        let n = points.len();
        for i in 0..n {
            let a = points[i];
            let b = points[(i + 1) % n];
            for oy in lo..=hi {
                for ox in lo..=hi {
                    draw_line_segment_mut(
                        &mut canvas,
                        ((a.x + ox) as f32, (a.y + oy) as f32),
                        ((b.x + ox) as f32, (b.y + oy) as f32),
                        color,
                    );
                }
            }
        }
    }

    canvas
}
