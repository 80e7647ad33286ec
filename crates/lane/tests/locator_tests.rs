use {base::Vec2, lane::*};

const WIDTH: usize = 320;
const HEIGHT: usize = 240;
const ROW: usize = 180;

fn mask_with_edges(columns: &[usize]) -> EdgeMask {
    let mut mask = EdgeMask::empty(Vec2::new(WIDTH, HEIGHT));
    for &x in columns {
        mask.set(x, ROW, 255);
    }
    mask
}

#[test]
fn test_dual_edges_centered() {
    let result = scan(&mask_with_edges(&[100, 220]), &LaneConfig::default()).unwrap();
    assert_eq!(result.row, ROW);
    assert_eq!(result.center_x, 160);
    assert_eq!(result.mode, Mode::Dual);
    assert_eq!(result.left_x, Some(100));
    assert_eq!(result.right_x, Some(220));
    assert_eq!(result.lane_center, Some(160));
    assert_eq!(result.steering, 0);
    assert_eq!(steer(&result, 15, &LaneConfig::default()), SteeringOffsets::zero());
}

#[test]
fn test_left_edge_only() {
    let result = scan(&mask_with_edges(&[100]), &LaneConfig::default()).unwrap();
    assert_eq!(result.mode, Mode::LeftOnly);
    assert_eq!(result.left_x, Some(100));
    assert_eq!(result.right_x, None);
    assert_eq!(result.lane_center, None);
    assert_eq!(result.steering, 50);

    let config = LaneConfig::default().with_gain(0.5);
    let offsets = steer(&result, 15, &config);
    assert_eq!(offsets.left_offset(), 25);
    assert_eq!(offsets.right_offset(), -25);
}

#[test]
fn test_right_edge_only() {
    let result = scan(&mask_with_edges(&[300]), &LaneConfig::default()).unwrap();
    assert_eq!(result.mode, Mode::RightOnly);
    assert_eq!(result.right_x, Some(300));
    // boundary is 140 px out, 30 px further than ideal
    assert_eq!(result.steering, 30);

    let result = scan(&mask_with_edges(&[200]), &LaneConfig::default()).unwrap();
    assert_eq!(result.steering, -70);
}

#[test]
fn test_no_edges_is_lost() {
    let result = scan(&mask_with_edges(&[]), &LaneConfig::default()).unwrap();
    assert_eq!(result.mode, Mode::Lost);
    assert_eq!(result.steering, 0);
    assert_eq!(result.lane_center, None);
    assert_eq!(steer(&result, 80, &LaneConfig::default()), SteeringOffsets::zero());
}

#[test]
fn test_edges_off_the_scan_row_are_ignored() {
    let mut mask = EdgeMask::empty(Vec2::new(WIDTH, HEIGHT));
    mask.set(100, ROW - 1, 255);
    mask.set(220, ROW + 1, 255);
    let result = scan(&mask, &LaneConfig::default()).unwrap();
    assert_eq!(result.mode, Mode::Lost);
}

#[test]
fn test_edge_at_center_is_seen_by_both_scans() {
    let result = scan(&mask_with_edges(&[160]), &LaneConfig::default()).unwrap();
    assert_eq!(result.mode, Mode::Dual);
    assert_eq!(result.left_x, Some(160));
    assert_eq!(result.right_x, Some(160));
    assert_eq!(result.steering, 0);
}

#[test]
fn test_column_zero_is_not_a_left_edge() {
    let result = scan(&mask_with_edges(&[0]), &LaneConfig::default()).unwrap();
    assert_eq!(result.mode, Mode::Lost);

    let result = scan(&mask_with_edges(&[0, 1]), &LaneConfig::default()).unwrap();
    assert_eq!(result.left_x, Some(1));
}

#[test]
fn test_nearest_edges_win() {
    let result = scan(&mask_with_edges(&[40, 120, 200, 280]), &LaneConfig::default()).unwrap();
    assert_eq!(result.left_x, Some(120));
    assert_eq!(result.right_x, Some(200));
}

#[test]
fn test_threshold_is_exclusive() {
    let mut mask = EdgeMask::empty(Vec2::new(WIDTH, HEIGHT));
    mask.set(100, ROW, 127);
    mask.set(220, ROW, 128);
    let result = scan(&mask, &LaneConfig::default()).unwrap();
    assert_eq!(result.mode, Mode::RightOnly);
}

#[test]
fn test_dual_sign_follows_lane_center() {
    let result = scan(&mask_with_edges(&[100, 260]), &LaneConfig::default()).unwrap();
    assert_eq!(result.lane_center, Some(180));
    assert_eq!(result.steering, 20);
    let offsets = steer(&result, 15, &LaneConfig::default());
    assert_eq!(offsets.left_offset(), 7);
    assert_eq!(offsets.right_offset(), -7);
}

#[test]
fn test_offsets_are_clamped_to_speed_plus_margin() {
    let config = LaneConfig::default();
    let result = scan(&mask_with_edges(&[100]), &config).unwrap();
    assert_eq!(result.steering, 50);
    let offsets = steer(&result, 10, &config.clone().with_gain(1.0));
    assert_eq!(offsets.left_offset(), 30);
    assert_eq!(offsets.right_offset(), -30);

    for speed in [10, 15, 40, 80] {
        for edges in [vec![1], vec![319], vec![5, 300], vec![150], vec![]] {
            let result = scan(&mask_with_edges(&edges), &config.clone().with_gain(3.0)).unwrap();
            let offsets = steer(&result, speed, &config.clone().with_gain(3.0));
            assert!(offsets.left_offset().abs() <= speed + 20);
            assert_eq!(offsets.right_offset(), -offsets.left_offset());
        }
    }
}

#[test]
fn test_clamped_offsets_follow_a_lower_speed() {
    let offsets = SteeringOffsets::from_delta(-45);
    assert_eq!(offsets.clamped(30), SteeringOffsets::from_delta(-30));
    assert_eq!(offsets.clamped(100), offsets);
    assert_eq!(offsets.clamped(-5), SteeringOffsets::zero());
}

#[test]
fn test_scan_row_outside_mask() {
    let mask = EdgeMask::empty(Vec2::new(WIDTH, 40));
    assert!(matches!(
        scan(&mask, &LaneConfig::default()),
        Err(LaneError::ScanRow { offset: 60, height: 40 })
    ));
}

#[test]
fn test_mode_display() {
    assert_eq!(Mode::Dual.to_string(), "Dual");
    assert_eq!(Mode::LeftOnly.to_string(), "Left Only");
    assert_eq!(Mode::RightOnly.to_string(), "Right Only");
    assert_eq!(Mode::Lost.to_string(), "LOST");
}
