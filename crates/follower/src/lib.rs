//! The line follower itself.
//!
//! A `ControlLoop` runs on its own blocking worker: capture, lane pipeline,
//! publish to the `SharedStore`, drive. The HTTP interface in `server` runs
//! on the async runtime and only ever talks to the loop through the shared
//! context objects: `RunState` for start/stop and speed, `SharedStore` for
//! the latest annotated frame and offsets, `Drive` for the single immediate
//! stop it is allowed to issue.

mod config;
mod control;
mod drive;
mod error;
mod state;
mod store;

pub mod server;

pub use config::{FollowerConfig, ServoAim};
pub use control::{ControlHandle, ControlLoop, CycleReport, FrameSource};
pub use drive::Drive;
pub use error::FollowerError;
pub use state::{RunState, RunStatus};
pub use store::{Published, SharedStore};
