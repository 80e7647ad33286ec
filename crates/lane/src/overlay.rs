use {
    crate::*,
    image::{CYAN, GRAY, GREEN, Image, MAGENTA, RED, WHITE, YELLOW},
};

const POINT_RADIUS: i32 = 5;
const CENTER_RADIUS: i32 = 4;
const TICK_HALF: i32 = 10;

/// Render the debug view of one cycle: the edge mask with the scan row, the
/// located boundaries and a mode/steering readout drawn on top.
pub fn annotate(mask: &EdgeMask, scan: &ScanResult, config: &LaneConfig) -> Image {
    let mut view = mask.to_rgb();
    let width = mask.width() as i32;
    let row = scan.row as i32;
    let center = scan.center_x as i32;

    image::draw_line(&mut view, 0, row, width - 1, row, GRAY);
    image::draw_line(&mut view, center, row - TICK_HALF, center, row + TICK_HALF, WHITE);

    let point_color = match scan.mode {
        Mode::Dual => GREEN,
        Mode::LeftOnly => YELLOW,
        Mode::RightOnly => MAGENTA,
        Mode::Lost => RED,
    };
    for x in [scan.left_x, scan.right_x].into_iter().flatten() {
        image::draw_filled_circle(&mut view, x as i32, row, POINT_RADIUS, point_color);
    }
    if let Some(lane_center) = scan.lane_center {
        image::draw_filled_circle(&mut view, lane_center as i32, row, CENTER_RADIUS, RED);
    }

    // where a single visible boundary is steered towards
    match (scan.mode, scan.left_x, scan.right_x) {
        (Mode::LeftOnly, Some(_), _) => {
            let target = center - config.ideal_dist();
            image::draw_line(&mut view, target, row - 4, target, row + 4, CYAN);
        }
        (Mode::RightOnly, _, Some(_)) => {
            let target = center + config.ideal_dist();
            image::draw_line(&mut view, target, row - 4, target, row + 4, CYAN);
        }
        _ => {}
    }

    if scan.mode.is_lost() {
        image::draw_text(&mut view, 10, 70, "LOST TRACK", 2, RED);
    }
    let readout = format!("MODE:{} STR:{}", scan.mode, scan.steering);
    image::draw_text(&mut view, 10, 22, &readout, 1, YELLOW);

    view
}
