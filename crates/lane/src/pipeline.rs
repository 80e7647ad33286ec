use {crate::*, image::Image};

/// Everything one frame produces.
#[derive(Debug, Clone)]
pub struct LaneOutput {
    pub scan: ScanResult,
    pub offsets: SteeringOffsets,
    pub annotated: Image,
}

/// Frame in, steering decision and debug view out.
#[derive(Debug, Clone, Default)]
pub struct LanePipeline {
    edge: EdgeConfig,
    lane: LaneConfig,
}

impl LanePipeline {
    pub fn new(edge: EdgeConfig, lane: LaneConfig) -> Self {
        Self { edge, lane }
    }

    pub fn with_edge_config(mut self, edge: EdgeConfig) -> Self {
        self.edge = edge;
        self
    }

    pub fn with_lane_config(mut self, lane: LaneConfig) -> Self {
        self.lane = lane;
        self
    }

    pub fn edge_config(&self) -> &EdgeConfig {
        &self.edge
    }

    pub fn lane_config(&self) -> &LaneConfig {
        &self.lane
    }

    /// Run edge extraction, scanning and steering on one `Rgb8` frame.
    pub fn process(&self, frame: &Image, speed: i32) -> Result<LaneOutput, LaneError> {
        let mask = extract_edges(frame, &self.edge)?;
        self.process_mask(&mask, speed)
    }

    /// Scan, steer and annotate an already extracted mask.
    pub fn process_mask(&self, mask: &EdgeMask, speed: i32) -> Result<LaneOutput, LaneError> {
        let scan = scan(mask, &self.lane)?;
        let offsets = steer(&scan, speed, &self.lane);
        let annotated = annotate(mask, &scan, &self.lane);
        Ok(LaneOutput {
            scan,
            offsets,
            annotated,
        })
    }
}
