//! Lane detection and steering policy.
//!
//! One frame in, one steering decision out: `extract_edges` turns an RGB
//! frame into a binary `EdgeMask`, `scan` finds the track boundaries on a
//! fixed row near the bottom of the mask, `steer` converts the raw steering
//! value into bounded differential offsets, and `annotate` renders the debug
//! view that is streamed to viewers. Nothing here touches actuators.

pub mod config;
pub mod edge;
pub mod error;
pub mod locator;
pub mod overlay;
pub mod pipeline;

pub use config::{EdgeConfig, LaneConfig};
pub use edge::{EdgeMask, extract_edges};
pub use error::LaneError;
pub use locator::{Mode, ScanResult, SteeringOffsets, scan, steer};
pub use overlay::annotate;
pub use pipeline::{LaneOutput, LanePipeline};
