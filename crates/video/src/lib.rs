//! Camera capture for the line follower.
//!
//! `VideoIn` owns a background worker that pulls frames from a backend,
//! converts them to `Rgb8`, applies the mounting orientation and hands them
//! over a small channel. Consumers that only care about the present take the
//! newest frame with `blocking_capture_latest`.

mod error;
mod videoin;

pub use error::VideoError;
pub use videoin::*;
