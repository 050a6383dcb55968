use cell_counter::config::{ChannelOrder, CountConfig};
use cell_counter::segmentation::{FOREGROUND, color_filter::filter, foreground_count};
use image::{Rgb, RgbImage};

fn default_bounds() -> ([u8; 3], [u8; 3]) {
    CountConfig::default().rgb_bounds()
}

#[test]
fn image_outside_bounds_gives_empty_mask() {
    let img = RgbImage::from_pixel(8, 6, Rgb([0, 0, 0]));
    let (lower, upper) = default_bounds();
    let mask = filter(&img, lower, upper).expect("filter failed");
    assert_eq!(mask.dimensions(), (8, 6));
    assert_eq!(foreground_count(&mask), 0);
}

#[test]
fn image_inside_bounds_gives_full_mask() {
    let img = RgbImage::from_pixel(8, 6, Rgb([255, 255, 255]));
    let (lower, upper) = default_bounds();
    let mask = filter(&img, lower, upper).expect("filter failed");
    assert!(mask.pixels().all(|p| p.0[0] == FOREGROUND));
}

#[test]
fn bounds_are_inclusive() {
    // default lower bound (45, 0, 50) is blue-green-red, i.e. rgb (50, 0, 45)
    let mut img = RgbImage::new(3, 1);
    img.put_pixel(0, 0, Rgb([50, 0, 45]));
    img.put_pixel(1, 0, Rgb([49, 0, 45]));
    img.put_pixel(2, 0, Rgb([50, 0, 44]));
    let (lower, upper) = default_bounds();
    let mask = filter(&img, lower, upper).expect("filter failed");
    assert_eq!(mask.get_pixel(0, 0).0[0], FOREGROUND);
    assert_eq!(mask.get_pixel(1, 0).0[0], 0);
    assert_eq!(mask.get_pixel(2, 0).0[0], 0);
}

#[test]
fn channel_order_changes_which_channel_is_bounded() {
    let img = RgbImage::from_pixel(2, 2, Rgb([60, 0, 46]));

    let bgr = CountConfig::default();
    let (lower, upper) = bgr.rgb_bounds();
    assert_eq!(foreground_count(&filter(&img, lower, upper).expect("filter")), 4);

    let rgb = CountConfig {
        channel_order: ChannelOrder::Rgb,
        ..CountConfig::default()
    };
    let (lower, upper) = rgb.rgb_bounds();
    assert_eq!(foreground_count(&filter(&img, lower, upper).expect("filter")), 0);
}

#[test]
fn empty_image_gives_empty_mask() {
    let img = RgbImage::new(0, 0);
    let (lower, upper) = default_bounds();
    let mask = filter(&img, lower, upper).expect("filter failed");
    assert_eq!(mask.dimensions(), (0, 0));
}
