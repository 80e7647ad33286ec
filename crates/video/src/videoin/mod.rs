use {
    crate::*,
    base::Vec2,
    image::Image,
    std::{
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        time::Duration,
    },
    tokio::{
        sync::{mpsc, oneshot},
        task::{JoinHandle, spawn_blocking},
    },
};

mod replay;
pub use replay::ReplayConfig;

#[cfg(feature = "rpicam")]
mod rpicam;
#[cfg(feature = "rpicam")]
pub use rpicam::RpiCamConfig;

// small on purpose, consumers want the newest frame
const CHANNEL_CAPACITY: usize = 2;

// delay before reconnecting after failure
const WAIT_BEFORE_RECONNECT_MS: u64 = 100;

#[derive(Debug, Clone)]
pub enum VideoInConfig {
    #[cfg(feature = "rpicam")]
    RpiCam(RpiCamConfig),
    Replay(ReplayConfig),
}

impl VideoInConfig {
    /// The board camera, when built with one.
    #[cfg(feature = "rpicam")]
    pub fn platform_default() -> Option<Self> {
        Some(VideoInConfig::RpiCam(RpiCamConfig::default()))
    }

    #[cfg(not(feature = "rpicam"))]
    pub fn platform_default() -> Option<Self> {
        None
    }
}

/// How the camera is mounted. Flips are applied to every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation {
    pub hflip: bool,
    pub vflip: bool,
}

impl Default for Orientation {
    // the camera sits upside down on the pan/tilt mount
    fn default() -> Self {
        Self {
            hflip: true,
            vflip: true,
        }
    }
}

impl Orientation {
    pub fn upright() -> Self {
        Self {
            hflip: false,
            vflip: false,
        }
    }

    pub fn apply(&self, image: Image) -> Image {
        image.flipped(self.hflip, self.vflip)
    }
}

pub(crate) trait VideoInDevice: Send {
    /// Open the device, returning the configuration that was actually applied.
    fn open(&mut self, config: &VideoInConfig) -> Result<VideoInConfig, VideoError>;
    /// Close the device if it is open.
    fn close(&mut self);
    /// Wait for the next frame, in whatever format the device produces.
    fn blocking_capture(&mut self) -> Result<Image, VideoError>;
}

pub struct VideoIn {
    receiver: mpsc::Receiver<Image>,
    cancel: Arc<AtomicBool>,
    size: Vec2<usize>,
    frame_rate: f32,
    join_handle: Option<JoinHandle<()>>,
}

impl VideoIn {
    fn create_device(config: &VideoInConfig) -> Box<dyn VideoInDevice> {
        match config {
            #[cfg(feature = "rpicam")]
            VideoInConfig::RpiCam(_) => Box::new(rpicam::RpiCam::new()),
            VideoInConfig::Replay(_) => Box::new(replay::Replay::new()),
        }
    }

    fn decode_config(config: &VideoInConfig) -> (Vec2<usize>, f32) {
        match config {
            #[cfg(feature = "rpicam")]
            VideoInConfig::RpiCam(config) => (config.size(), config.frame_rate()),
            VideoInConfig::Replay(config) => (config.size().unwrap_or_default(), config.frame_rate()),
        }
    }

    // Forward one captured frame. Returns false when the receiving side is gone.
    fn forward(sender: &mpsc::Sender<Image>, orientation: Orientation, raw: Image) -> bool {
        let frame = match image::to_rgb(raw) {
            Ok(frame) => orientation.apply(frame),
            Err(error) => {
                log::warn!("video worker: dropping unusable frame: {}", error);
                return true;
            }
        };
        if sender.blocking_send(frame).is_err() {
            log::info!("video worker: receiver closed");
            return false;
        }
        true
    }

    /// Open the device and start capturing.
    ///
    /// The device is opened on the worker thread; an open failure is returned
    /// here and no worker is left running.
    pub async fn open(config: VideoInConfig, orientation: Orientation) -> Result<Self, VideoError> {
        let (sender, receiver) = mpsc::channel::<Image>(CHANNEL_CAPACITY);
        let cancel = Arc::new(AtomicBool::new(false));
        let mut device = Self::create_device(&config);
        let (init_tx, init_rx) = oneshot::channel::<Result<VideoInConfig, VideoError>>();

        let join_handle = spawn_blocking({
            let cancel = Arc::clone(&cancel);
            move || {
                let mut config = match device.open(&config) {
                    Ok(config) => {
                        let _ = init_tx.send(Ok(config.clone()));
                        config
                    }
                    Err(error) => {
                        let _ = init_tx.send(Err(error));
                        return;
                    }
                };

                while !cancel.load(Ordering::Relaxed) {
                    log::info!("video worker: starting capture loop");
                    while !cancel.load(Ordering::Relaxed) {
                        match device.blocking_capture() {
                            Ok(raw) => {
                                if !Self::forward(&sender, orientation, raw) {
                                    device.close();
                                    return;
                                }
                            }
                            Err(error) => {
                                log::error!("video worker: capture failed: {}", error);
                                break;
                            }
                        }
                    }

                    // close, wait, and reopen the device
                    while !cancel.load(Ordering::Relaxed) {
                        log::info!("video worker: reconnecting...");
                        device.close();
                        std::thread::sleep(Duration::from_millis(WAIT_BEFORE_RECONNECT_MS));
                        match device.open(&config) {
                            Ok(new_config) => {
                                config = new_config;
                                break;
                            }
                            Err(error) => log::warn!("video worker: reopen failed: {}", error),
                        }
                    }
                }
                device.close();
                log::info!("video worker: stopped");
            }
        });

        let config = init_rx
            .await
            .map_err(|_| VideoError::Device("worker died while opening the device".to_string()))??;
        let (size, frame_rate) = Self::decode_config(&config);
        log::info!("video: opened {} at {} fps", size, frame_rate);

        Ok(Self {
            receiver,
            cancel,
            size,
            frame_rate,
            join_handle: Some(join_handle),
        })
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn frame_rate(&self) -> f32 {
        self.frame_rate
    }

    /// Wait for the next `Rgb8` frame.
    pub async fn capture(&mut self) -> Result<Image, VideoError> {
        self.receiver
            .recv()
            .await
            .ok_or_else(|| VideoError::Stream("video input channel closed".to_string()))
    }

    /// Block until a frame is available, then return the newest one queued.
    ///
    /// Must not be called from inside an async context.
    pub fn blocking_capture_latest(&mut self) -> Result<Image, VideoError> {
        let mut frame = self
            .receiver
            .blocking_recv()
            .ok_or_else(|| VideoError::Stream("video input channel closed".to_string()))?;
        while let Ok(newer) = self.receiver.try_recv() {
            frame = newer;
        }
        Ok(frame)
    }

    /// Stop the worker and release the device.
    pub async fn close(mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        // unblocks a worker waiting on a full channel
        self.receiver.close();
        if let Some(join_handle) = self.join_handle.take() {
            if let Err(error) = join_handle.await {
                log::warn!("video: worker ended abnormally: {}", error);
            }
        }
    }
}

impl Drop for VideoIn {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        self.receiver.close();
    }
}
