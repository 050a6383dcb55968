use plotters::prelude::*;

use crate::config::CountConfig;
use crate::estimate::RunResult;

const MARGIN: i32 = 12;

fn rgb_to_plotters(c: [u8; 3]) -> RGBColor {
    RGBColor(c[0], c[1], c[2])
}

/// Renders the cluster-size histogram in-memory as an RGB pixel buffer.
///
/// One bar per cluster size, smallest size on the left, bar height
/// proportional to its occurrence count. Single cells use the single-cell
/// color, clusters the cluster color. No text is drawn.
pub fn render_histogram_rgb(
    result: &RunResult,
    config: &CountConfig,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, String> {
    if width == 0 || height == 0 {
        return Ok(Vec::new());
    }

    let pixel_count = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| "width*height overflow".to_string())?;
    let mut rgb = vec![255u8; pixel_count * 3];

    {
        let root = BitMapBackend::with_buffer(&mut rgb, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let left = MARGIN;
        let right = (width as i32 - MARGIN).max(left + 1);
        let top = MARGIN;
        let baseline = (height as i32 - MARGIN).max(top + 1);

        root.draw(&PathElement::new(
            [(left, baseline), (right, baseline)],
            RGBColor(120, 120, 120),
        ))
        .map_err(|e| e.to_string())?;

        let bars: Vec<(u32, u32)> = result.histogram.iter().collect();
        let max_count = bars.iter().map(|&(_, count)| count).max().unwrap_or(0);
        if max_count > 0 {
            let slot = ((right - left) / bars.len() as i32).max(1);
            let bar_width = (slot * 7 / 10).max(1);
            let usable = (baseline - top) as f64;

            for (i, &(size, count)) in bars.iter().enumerate() {
                let x0 = left + i as i32 * slot + (slot - bar_width) / 2;
                let bar_height = (usable * count as f64 / max_count as f64).round() as i32;
                let color = if size > 1 {
                    rgb_to_plotters(config.cluster_color)
                } else {
                    rgb_to_plotters(config.single_color)
                };
                root.draw(&Rectangle::new(
                    [(x0, baseline - bar_height.max(1)), (x0 + bar_width, baseline)],
                    color.filled(),
                ))
                .map_err(|e| e.to_string())?;
            }
        }

        root.present().map_err(|e| e.to_string())?;
    }

    Ok(rgb)
}
