/// Edge extractor thresholds on the L1 gradient magnitude.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeConfig {
    low_threshold: i32,
    high_threshold: i32,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            low_threshold: 70,
            high_threshold: 140,
        }
    }
}

impl EdgeConfig {
    /// Set the hysteresis thresholds. They are stored ordered low <= high.
    pub fn with_thresholds(mut self, low: i32, high: i32) -> Self {
        self.low_threshold = low.min(high);
        self.high_threshold = low.max(high);
        self
    }

    pub fn low_threshold(&self) -> i32 {
        self.low_threshold
    }

    pub fn high_threshold(&self) -> i32 {
        self.high_threshold
    }
}

/// Scan geometry and steering constants.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneConfig {
    scan_offset: usize,
    ideal_dist: i32,
    gain: f32,
    edge_threshold: u8,
    clamp_margin: i32,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            scan_offset: 60,
            ideal_dist: 110,
            gain: 0.35,
            edge_threshold: 127,
            clamp_margin: 20,
        }
    }
}

impl LaneConfig {
    /// Distance of the scan row above the bottom edge, in pixels.
    pub fn with_scan_offset(mut self, scan_offset: usize) -> Self {
        self.scan_offset = scan_offset;
        self
    }

    /// Desired distance from the frame center to a single visible boundary.
    pub fn with_ideal_dist(mut self, ideal_dist: i32) -> Self {
        self.ideal_dist = ideal_dist;
        self
    }

    /// Proportional gain from raw steering to wheel offset.
    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    /// Mask intensity a column must exceed to count as a boundary.
    pub fn with_edge_threshold(mut self, edge_threshold: u8) -> Self {
        self.edge_threshold = edge_threshold;
        self
    }

    /// Offsets are clamped to `speed + clamp_margin`.
    pub fn with_clamp_margin(mut self, clamp_margin: i32) -> Self {
        self.clamp_margin = clamp_margin;
        self
    }

    pub fn scan_offset(&self) -> usize {
        self.scan_offset
    }

    pub fn ideal_dist(&self) -> i32 {
        self.ideal_dist
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn edge_threshold(&self) -> u8 {
        self.edge_threshold
    }

    pub fn clamp_margin(&self) -> i32 {
        self.clamp_margin
    }
}
