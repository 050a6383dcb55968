use cell_counter::segmentation::{FOREGROUND, Mask, extract_regions};
use image::Luma;

fn paint(mask: &mut Mask, x: u32, y: u32, w: u32, h: u32) {
    for yy in y..y + h {
        for xx in x..x + w {
            mask.put_pixel(xx, yy, Luma([FOREGROUND]));
        }
    }
}

#[test]
fn empty_mask_has_no_regions() {
    assert!(extract_regions(&Mask::new(16, 16)).is_empty());
}

#[test]
fn rectangle_area_is_polygon_area() {
    let mut mask = Mask::new(30, 20);
    paint(&mut mask, 5, 5, 10, 6);
    let regions = extract_regions(&mask);
    assert_eq!(regions.len(), 1);
    // boundary through pixel centres: 9 x 5
    assert_eq!(regions[0].area(), 45.0);
    assert_eq!(regions[0].boundary().len(), 4);
}

#[test]
fn single_pixel_has_zero_area() {
    let mut mask = Mask::new(10, 10);
    paint(&mut mask, 4, 4, 1, 1);
    let regions = extract_regions(&mask);
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].area(), 0.0);
}

#[test]
fn separate_blocks_are_separate_regions() {
    let mut mask = Mask::new(40, 20);
    paint(&mut mask, 2, 2, 5, 5);
    paint(&mut mask, 20, 2, 8, 8);
    let mut areas: Vec<f64> = extract_regions(&mask).iter().map(|r| r.area()).collect();
    areas.sort_by(|a, b| a.total_cmp(b));
    assert_eq!(areas, vec![16.0, 49.0]);
}

#[test]
fn diagonal_neighbours_are_connected() {
    let mut mask = Mask::new(12, 12);
    paint(&mut mask, 2, 2, 3, 3);
    paint(&mut mask, 5, 5, 3, 3);
    assert_eq!(extract_regions(&mask).len(), 1);
}

#[test]
fn islands_inside_holes_are_not_reported() {
    let mut mask = Mask::new(50, 50);
    paint(&mut mask, 5, 5, 30, 30);
    for y in 10..30 {
        for x in 10..30 {
            mask.put_pixel(x, y, Luma([0]));
        }
    }
    paint(&mut mask, 17, 17, 6, 6);
    paint(&mut mask, 40, 40, 5, 5);

    let mut areas: Vec<f64> = extract_regions(&mask).iter().map(|r| r.area()).collect();
    areas.sort_by(|a, b| a.total_cmp(b));
    // the ring's outer boundary encloses its hole
    assert_eq!(areas, vec![16.0, 841.0]);
}

#[test]
fn region_touching_image_corner() {
    let mut mask = Mask::new(10, 10);
    paint(&mut mask, 0, 0, 5, 5);
    let regions = extract_regions(&mask);
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].area(), 16.0);
}

#[test]
fn full_frame_mask_is_one_region() {
    let mut mask = Mask::new(40, 30);
    paint(&mut mask, 0, 0, 40, 30);
    let regions = extract_regions(&mask);
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].area(), 39.0 * 29.0);
    assert!(regions[0].boundary().iter().all(|p| p.x >= 0 && p.y >= 0 && p.x < 40 && p.y < 30));
}

#[test]
fn full_width_band_is_one_region() {
    let mut mask = Mask::new(100, 100);
    paint(&mut mask, 0, 40, 100, 20);
    let regions = extract_regions(&mask);
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].area(), 99.0 * 19.0);
}

#[test]
fn left_half_is_one_region() {
    let mut mask = Mask::new(30, 20);
    paint(&mut mask, 0, 0, 15, 20);
    let regions = extract_regions(&mask);
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].area(), 14.0 * 19.0);
}
