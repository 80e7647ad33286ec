use {
    base::Vec2,
    image::{Image, PixelFormat},
    lane::*,
};

fn step_frame(width: usize, height: usize, step_x: usize) -> Image {
    let mut data = Vec::with_capacity(width * height * 3);
    for _ in 0..height {
        for x in 0..width {
            let v = if x < step_x { 0 } else { 255 };
            data.extend_from_slice(&[v, v, v]);
        }
    }
    Image::new(Vec2::new(width, height), data, PixelFormat::Rgb8)
}

#[test]
fn test_uniform_frame_has_no_edges() {
    let frame = Image::new(
        Vec2::new(40, 30),
        vec![128; 40 * 30 * 3],
        PixelFormat::Rgb8,
    );
    let mask = extract_edges(&frame, &EdgeConfig::default()).unwrap();
    assert_eq!(mask.size(), frame.size);
    assert_eq!(mask.edge_count(), 0);
}

#[test]
fn test_vertical_step_is_found_on_every_row() {
    let frame = step_frame(32, 24, 16);
    let mask = extract_edges(&frame, &EdgeConfig::default()).unwrap();
    assert_eq!(mask.size(), Vec2::new(32, 24));
    for y in 0..24 {
        for x in 13..=17 {
            assert_eq!(mask.get(x, y), 255, "missing edge at {x},{y}");
        }
        assert_eq!(mask.get(12, y), 0);
        assert_eq!(mask.get(18, y), 0);
        assert_eq!(mask.get(0, y), 0);
        assert_eq!(mask.get(31, y), 0);
    }
}

#[test]
fn test_mask_is_binary() {
    let frame = step_frame(32, 24, 10);
    let mask = extract_edges(&frame, &EdgeConfig::default()).unwrap();
    assert!(mask.data().iter().all(|&v| v == 0 || v == 255));
}

#[test]
fn test_weak_step_below_thresholds_is_ignored() {
    let mut frame = step_frame(32, 24, 16);
    // step of 8 grey levels peaks well below the low threshold
    for v in frame.data.iter_mut() {
        *v = if *v == 0 { 100 } else { 108 };
    }
    let mask = extract_edges(&frame, &EdgeConfig::default()).unwrap();
    assert_eq!(mask.edge_count(), 0);
}

#[test]
fn test_empty_frame_is_rejected() {
    let frame = Image::new(Vec2::new(0, 0), Vec::new(), PixelFormat::Rgb8);
    assert!(matches!(
        extract_edges(&frame, &EdgeConfig::default()),
        Err(LaneError::InvalidFrame(_))
    ));
}

#[test]
fn test_short_frame_is_rejected() {
    let frame = Image::new(Vec2::new(10, 10), vec![0; 299], PixelFormat::Rgb8);
    assert!(matches!(
        extract_edges(&frame, &EdgeConfig::default()),
        Err(LaneError::InvalidFrame(_))
    ));
}

#[test]
fn test_gray_frame_is_rejected() {
    let frame = Image::new(Vec2::new(10, 10), vec![0; 100], PixelFormat::Gray8);
    assert!(extract_edges(&frame, &EdgeConfig::default()).is_err());
}

#[test]
fn test_thresholds_are_ordered() {
    let config = EdgeConfig::default().with_thresholds(200, 50);
    assert_eq!(config.low_threshold(), 50);
    assert_eq!(config.high_threshold(), 200);
}

#[test]
fn test_mask_size_is_checked() {
    assert!(EdgeMask::new(Vec2::new(4, 4), vec![0; 15]).is_err());
    assert!(EdgeMask::new(Vec2::new(4, 4), vec![0; 16]).is_ok());
}

#[test]
fn test_mask_keeps_size_and_data_consistent() {
    let mut mask = EdgeMask::new(Vec2::new(3, 2), vec![0, 0, 255, 0, 0, 0]).unwrap();
    assert_eq!(mask.size(), Vec2::new(3, 2));
    assert_eq!(mask.data().len(), mask.size().area());
    assert_eq!(mask.get(2, 0), 255);
    mask.set(1, 1, 255);
    assert_eq!(mask.data(), &[0, 0, 255, 0, 255, 0]);
    assert_eq!(EdgeMask::empty(Vec2::new(5, 4)).data().len(), 20);
}
