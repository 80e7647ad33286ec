use {crate::*, std::fmt};

/// Which track boundaries were found on the scan row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Dual,
    LeftOnly,
    RightOnly,
    Lost,
}

impl Mode {
    pub fn from_edges(left: Option<usize>, right: Option<usize>) -> Self {
        match (left, right) {
            (Some(_), Some(_)) => Mode::Dual,
            (Some(_), None) => Mode::LeftOnly,
            (None, Some(_)) => Mode::RightOnly,
            (None, None) => Mode::Lost,
        }
    }

    pub fn is_lost(&self) -> bool {
        *self == Mode::Lost
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Dual => write!(f, "Dual"),
            Mode::LeftOnly => write!(f, "Left Only"),
            Mode::RightOnly => write!(f, "Right Only"),
            Mode::Lost => write!(f, "LOST"),
        }
    }
}

/// Outcome of scanning one row of an edge mask.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub left_x: Option<usize>,
    pub right_x: Option<usize>,
    /// Midpoint of the two boundaries, only in `Mode::Dual`.
    pub lane_center: Option<usize>,
    pub mode: Mode,
    /// Raw correction before gain and clamping. Positive steers right.
    pub steering: i32,
    pub row: usize,
    pub center_x: usize,
}

/// Differential wheel offsets. `right_offset` is always `-left_offset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SteeringOffsets {
    left_offset: i32,
    right_offset: i32,
}

impl SteeringOffsets {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_delta(delta: i32) -> Self {
        Self {
            left_offset: delta,
            right_offset: -delta,
        }
    }

    /// Bound both offsets to `[-limit, limit]`. A negative limit counts as 0.
    pub fn clamped(&self, limit: i32) -> Self {
        let limit = limit.max(0);
        Self::from_delta(self.left_offset.clamp(-limit, limit))
    }

    pub fn left_offset(&self) -> i32 {
        self.left_offset
    }

    pub fn right_offset(&self) -> i32 {
        self.right_offset
    }
}

/// Find the nearest boundary on each side of the frame center on the scan row
/// and derive the raw steering value.
///
/// Both scans start at the center column, so an edge exactly at the center
/// is reported on both sides and yields `Mode::Dual`. Column 0 is never
/// considered a left boundary.
pub fn scan(mask: &EdgeMask, config: &LaneConfig) -> Result<ScanResult, LaneError> {
    let height = mask.height();
    let offset = config.scan_offset();
    if offset == 0 || offset > height {
        return Err(LaneError::ScanRow { offset, height });
    }
    let row = height - offset;
    let width = mask.width();
    let center_x = width / 2;
    let threshold = config.edge_threshold();
    let hit = |x: usize| mask.get(x, row) > threshold;

    let left_x = (1..=center_x).rev().find(|&x| hit(x));
    let right_x = (center_x..width).find(|&x| hit(x));
    let mode = Mode::from_edges(left_x, right_x);

    let center = center_x as i32;
    let ideal = config.ideal_dist();
    let (lane_center, steering) = match (left_x, right_x) {
        (Some(l), Some(r)) => {
            let lane_center = (l + r) / 2;
            (Some(lane_center), lane_center as i32 - center)
        }
        (Some(l), None) => (None, ideal - (center - l as i32)),
        (None, Some(r)) => (None, -(ideal - (r as i32 - center))),
        (None, None) => (None, 0),
    };

    Ok(ScanResult {
        left_x,
        right_x,
        lane_center,
        mode,
        steering,
        row,
        center_x,
    })
}

/// Scale the raw steering by the gain and clamp it to `speed + clamp_margin`.
pub fn steer(scan: &ScanResult, speed: i32, config: &LaneConfig) -> SteeringOffsets {
    if scan.mode.is_lost() {
        return SteeringOffsets::zero();
    }
    let delta = (scan.steering as f32 * config.gain()).round() as i32;
    SteeringOffsets::from_delta(delta).clamped(speed + config.clamp_margin())
}
