use {
    base::Vec2,
    image::{Image, PixelFormat},
    lane::*,
};

fn count(image: &Image, color: [u8; 3]) -> usize {
    image.data.chunks_exact(3).filter(|c| *c == color).count()
}

// black floor with white tape stripes over the full frame height
fn track_frame(stripes: &[(usize, usize)]) -> Image {
    let (width, height) = (320, 240);
    let mut data = vec![0u8; width * height * 3];
    for y in 0..height {
        for &(from, to) in stripes {
            for x in from..to {
                let idx = (y * width + x) * 3;
                data[idx..idx + 3].copy_from_slice(&[255, 255, 255]);
            }
        }
    }
    Image::new(Vec2::new(width, height), data, PixelFormat::Rgb8)
}

#[test]
fn test_two_stripes_give_dual() {
    let pipeline = LanePipeline::default();
    let output = pipeline.process(&track_frame(&[(96, 104), (216, 224)]), 15).unwrap();
    assert_eq!(output.scan.mode, Mode::Dual);
    let left = output.scan.left_x.unwrap();
    let right = output.scan.right_x.unwrap();
    assert!((95..=110).contains(&left), "left {left}");
    assert!((210..=226).contains(&right), "right {right}");
    assert_eq!(output.offsets.right_offset(), -output.offsets.left_offset());
    assert_eq!(output.annotated.size, Vec2::new(320, 240));
}

#[test]
fn test_blank_floor_is_lost() {
    let output = LanePipeline::default().process(&track_frame(&[]), 15).unwrap();
    assert_eq!(output.scan.mode, Mode::Lost);
    assert_eq!(output.offsets, SteeringOffsets::zero());
    assert!(count(&output.annotated, image::RED) > 0);
}

#[test]
fn test_lost_view_carries_red_marker() {
    let config = LaneConfig::default();
    let mask = EdgeMask::empty(Vec2::new(320, 240));
    let result = scan(&mask, &config).unwrap();
    let view = annotate(&mask, &result, &config);
    assert!(count(&view, image::RED) > 50);
    assert_eq!(image::get_pixel(&view, 0, 180), Some(image::GRAY));
}

#[test]
fn test_dual_view_marks_lane_center() {
    let config = LaneConfig::default();
    let mut mask = EdgeMask::empty(Vec2::new(320, 240));
    mask.set(100, 180, 255);
    mask.set(240, 180, 255);
    let result = scan(&mask, &config).unwrap();
    let view = annotate(&mask, &result, &config);
    assert_eq!(image::get_pixel(&view, 170, 180), Some(image::RED));
    assert_eq!(image::get_pixel(&view, 100, 180), Some(image::GREEN));
    assert_eq!(image::get_pixel(&view, 240, 180), Some(image::GREEN));
    assert_eq!(image::get_pixel(&view, 160, 170), Some(image::WHITE));
}

#[test]
fn test_single_side_point_colors() {
    let config = LaneConfig::default();
    let mut mask = EdgeMask::empty(Vec2::new(320, 240));
    mask.set(100, 180, 255);
    let result = scan(&mask, &config).unwrap();
    let view = annotate(&mask, &result, &config);
    assert_eq!(image::get_pixel(&view, 100, 180), Some(image::YELLOW));

    let mut mask = EdgeMask::empty(Vec2::new(320, 240));
    mask.set(250, 180, 255);
    let result = scan(&mask, &config).unwrap();
    let view = annotate(&mask, &result, &config);
    assert_eq!(image::get_pixel(&view, 250, 180), Some(image::MAGENTA));
}

#[test]
fn test_process_mask_skips_extraction() {
    let mut mask = EdgeMask::empty(Vec2::new(320, 240));
    mask.set(100, 180, 255);
    let pipeline = LanePipeline::default().with_lane_config(LaneConfig::default().with_gain(0.5));
    let output = pipeline.process_mask(&mask, 15).unwrap();
    assert_eq!(output.scan.steering, 50);
    assert_eq!(output.offsets.left_offset(), 25);
}
