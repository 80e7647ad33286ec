use {
    crate::*,
    image::Image,
    lane::{LanePipeline, Mode, SteeringOffsets},
    std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    tokio::task::{JoinHandle, spawn_blocking},
    video::VideoIn,
};

/// Blocking supplier of the newest camera frame.
pub trait FrameSource: Send + 'static {
    fn capture_latest(&mut self) -> Result<Image, FollowerError>;
}

impl FrameSource for VideoIn {
    fn capture_latest(&mut self) -> Result<Image, FollowerError> {
        Ok(self.blocking_capture_latest()?)
    }
}

/// What one cycle did.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// Scan outcome, `None` when the pipeline failed and the raw frame was
    /// published instead.
    pub mode: Option<Mode>,
    pub offsets: SteeringOffsets,
    /// Whether a drive command was issued.
    pub commanded: bool,
}

pub struct ControlLoop<S: FrameSource> {
    source: S,
    pipeline: LanePipeline,
    state: Arc<RunState>,
    store: Arc<SharedStore>,
    drive: Arc<Drive>,
    config: FollowerConfig,
}

impl<S: FrameSource> ControlLoop<S> {
    pub fn new(
        source: S,
        pipeline: LanePipeline,
        state: Arc<RunState>,
        store: Arc<SharedStore>,
        drive: Arc<Drive>,
        config: FollowerConfig,
    ) -> Self {
        Self {
            source,
            pipeline,
            state,
            store,
            drive,
            config,
        }
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Capture, process, publish and, if running, drive. Only a capture
    /// failure is returned; everything after it is handled in place.
    pub fn step(&mut self) -> Result<CycleReport, FollowerError> {
        let frame = self.source.capture_latest()?;
        let speed = self.state.speed();

        let (mode, offsets) = match self.pipeline.process(&frame, speed) {
            Ok(output) => {
                self.store.publish(output.annotated, output.offsets);
                (Some(output.scan.mode), output.offsets)
            }
            Err(error) => {
                // keep steering the way the last good frame said
                let offsets = self.store.read_offsets();
                log::warn!("lane pipeline failed, publishing raw frame: {}", error);
                self.store.publish(frame, offsets);
                (None, offsets)
            }
        };

        // speed may have changed while the pipeline ran, bound by the one driven
        let margin = self.pipeline.lane_config().clamp_margin();
        let commanded = match self.drive.drive_if_running(
            &self.state,
            self.config.drive_duration(),
            |status| offsets.clamped(status.speed + margin),
        ) {
            Ok(status) => status.is_some(),
            Err(error) => {
                log::warn!("drive command failed: {}", error);
                true
            }
        };

        Ok(CycleReport {
            mode,
            offsets,
            commanded,
        })
    }

    /// Cycle until `cancel` is set.
    pub fn run(&mut self, cancel: &AtomicBool) {
        log::info!("control loop started");
        let mut last_mode = None;
        while !cancel.load(Ordering::Relaxed) {
            match self.step() {
                Ok(report) => {
                    if report.mode != last_mode {
                        log::info!(
                            "track: {}",
                            report.mode.map_or("unprocessed".to_string(), |m| m.to_string())
                        );
                        last_mode = report.mode;
                    }
                }
                Err(error) => log::warn!("capture failed: {}", error),
            }
            std::thread::sleep(self.config.loop_period());
        }
        log::info!("control loop stopped");
    }

    /// Run on a dedicated blocking worker.
    pub fn spawn(self) -> ControlHandle<S> {
        let cancel = Arc::new(AtomicBool::new(false));
        let drive = Arc::clone(&self.drive);
        let config = self.config.clone();
        let join_handle = spawn_blocking({
            let cancel = Arc::clone(&cancel);
            let mut control = self;
            move || {
                control.run(&cancel);
                control
            }
        });
        ControlHandle {
            cancel,
            join_handle,
            drive,
            config,
        }
    }
}

pub struct ControlHandle<S: FrameSource> {
    cancel: Arc<AtomicBool>,
    join_handle: JoinHandle<ControlLoop<S>>,
    drive: Arc<Drive>,
    config: FollowerConfig,
}

impl<S: FrameSource> ControlHandle<S> {
    pub fn is_finished(&self) -> bool {
        self.join_handle.is_finished()
    }

    /// Stop the loop, wait for it, then issue one stop command.
    ///
    /// Returns the frame source so the caller can close it, or `None` if the
    /// worker did not finish within the shutdown timeout.
    pub async fn shutdown(self) -> Option<S> {
        self.cancel.store(true, Ordering::Relaxed);
        let source = match tokio::time::timeout(self.config.shutdown_timeout(), self.join_handle).await
        {
            Ok(Ok(control)) => Some(control.into_source()),
            Ok(Err(error)) => {
                log::error!("control loop worker failed: {}", error);
                None
            }
            Err(_) => {
                log::error!("control loop did not stop within {:?}", self.config.shutdown_timeout());
                None
            }
        };

        let drive = self.drive;
        let stop_duration = self.config.stop_duration();
        match spawn_blocking(move || drive.stop(stop_duration)).await {
            Ok(Ok(())) => log::info!("motors stopped"),
            Ok(Err(error)) => log::warn!("final stop failed: {}", error),
            Err(error) => log::warn!("final stop task failed: {}", error),
        }
        source
    }
}
