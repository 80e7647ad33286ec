use {
    crate::*,
    base::Vec2,
    image::Image,
    std::{
        fs,
        path::{Path, PathBuf},
        time::{Duration, Instant},
    },
};

const EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Plays a directory of still images as a camera, in file name order, looping.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    dir: PathBuf,
    frame_rate: f32,
    size: Option<Vec2<usize>>,
}

impl ReplayConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            frame_rate: 30.0,
            size: None,
        }
    }

    pub fn with_frame_rate(mut self, frame_rate: f32) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn frame_rate(&self) -> f32 {
        self.frame_rate
    }

    /// Size of the first image, known once opened.
    pub fn size(&self) -> Option<Vec2<usize>> {
        self.size
    }
}

pub(crate) struct Replay {
    frames: Vec<Image>,
    next: usize,
    period: Duration,
    last: Option<Instant>,
}

impl Replay {
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            next: 0,
            period: Duration::ZERO,
            last: None,
        }
    }

    fn load(dir: &Path) -> Result<Vec<Image>, VideoError> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            })
            .collect();
        paths.sort();

        let mut frames = Vec::with_capacity(paths.len());
        for path in paths {
            let data = fs::read(&path)?;
            match image::decode_rgb(&data) {
                Ok(frame) => frames.push(frame),
                Err(error) => log::warn!("replay: skipping {}: {}", path.display(), error),
            }
        }
        Ok(frames)
    }
}

impl VideoInDevice for Replay {
    fn open(&mut self, config: &VideoInConfig) -> Result<VideoInConfig, VideoError> {
        self.close();

        #[allow(irrefutable_let_patterns)]
        let VideoInConfig::Replay(config) = config else {
            return Err(VideoError::Device(
                "Replay::open requires VideoInConfig::Replay".to_string(),
            ));
        };

        let frames = Self::load(config.dir())?;
        let Some(first) = frames.first() else {
            return Err(VideoError::Device(format!(
                "no images in {}",
                config.dir().display()
            )));
        };
        let size = first.size;
        log::info!(
            "replay: {} frames from {}",
            frames.len(),
            config.dir().display()
        );

        self.frames = frames;
        self.period = if config.frame_rate() > 0.0 {
            Duration::from_secs_f32(1.0 / config.frame_rate())
        } else {
            Duration::ZERO
        };

        let mut resolved = config.clone();
        resolved.size = Some(size);
        Ok(VideoInConfig::Replay(resolved))
    }

    fn close(&mut self) {
        self.frames.clear();
        self.next = 0;
        self.last = None;
    }

    fn blocking_capture(&mut self) -> Result<Image, VideoError> {
        if self.frames.is_empty() {
            return Err(VideoError::Stream("replay not open".to_string()));
        }
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.period {
                std::thread::sleep(self.period - elapsed);
            }
        }
        self.last = Some(Instant::now());

        let frame = self.frames[self.next].clone();
        self.next = (self.next + 1) % self.frames.len();
        Ok(frame)
    }
}
