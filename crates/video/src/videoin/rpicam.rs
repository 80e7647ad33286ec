use {
    crate::*,
    base::Vec2,
    image::{Image, PixelFormat},
    shiguredo_libcamera::{
        Camera, CameraManager, ConfigStatus, FrameBuffer, FrameBufferAllocator, FrameStatus,
        PixelFormat as LibcameraFormat, Request, Size, Stream, StreamRole,
    },
    std::{
        sync::{Arc, mpsc},
        time::Duration,
    },
};

// lets the worker notice cancellation while the sensor is stalled
const CAPTURE_TIMEOUT: Duration = Duration::from_secs(1);

/// Raspberry Pi camera through libcamera.
#[derive(Debug, Clone)]
pub struct RpiCamConfig {
    index: usize,
    size: Vec2<usize>,
    format: PixelFormat,
    frame_rate: f32,
}

impl Default for RpiCamConfig {
    fn default() -> Self {
        Self {
            index: 0,
            size: Vec2::new(320, 240),
            format: PixelFormat::Yu12,
            frame_rate: 30.0,
        }
    }
}

impl RpiCamConfig {
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn with_size(mut self, size: Vec2<usize>) -> Self {
        self.size = size;
        self
    }

    /// Capture format, `Yu12` or `Yuyv`.
    pub fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_frame_rate(mut self, frame_rate: f32) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn frame_rate(&self) -> f32 {
        self.frame_rate
    }
}

// Read-only mapping of one DMA buffer plane.
struct PlaneMap {
    base: *mut libc::c_void,
    base_len: usize,
    offset: usize,
    len: usize,
}

unsafe impl Send for PlaneMap {}
unsafe impl Sync for PlaneMap {}

impl PlaneMap {
    fn map(fd: i32, offset: usize, len: usize) -> Result<Self, VideoError> {
        let base_len = offset + len;
        let base = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                base_len,
                libc::PROT_READ,
                libc::MAP_SHARED,
                fd,
                0,
            )
        };
        if base == libc::MAP_FAILED {
            return Err(VideoError::Io(std::io::Error::last_os_error()));
        }
        Ok(Self {
            base,
            base_len,
            offset,
            len,
        })
    }

    fn bytes(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts((self.base as *const u8).add(self.offset), self.len) }
    }
}

impl Drop for PlaneMap {
    fn drop(&mut self) {
        unsafe {
            libc::munmap(self.base, self.base_len);
        }
    }
}

struct Completed {
    cookie: usize,
    image: Image,
}

pub(crate) struct RpiCam {
    manager: Option<CameraManager>,
    camera: Option<Camera>,
    allocator: Option<FrameBufferAllocator>,
    buffers: Vec<FrameBuffer>,
    requests: Vec<Request>,
    maps: Arc<Vec<PlaneMap>>,
    stream: Option<Stream>,
    completed: Option<mpsc::Receiver<Completed>>,
}

impl RpiCam {
    pub fn new() -> Self {
        Self {
            manager: None,
            camera: None,
            allocator: None,
            buffers: Vec::new(),
            requests: Vec::new(),
            maps: Arc::new(Vec::new()),
            stream: None,
            completed: None,
        }
    }
}

impl VideoInDevice for RpiCam {
    fn open(&mut self, config: &VideoInConfig) -> Result<VideoInConfig, VideoError> {
        self.close();

        let VideoInConfig::RpiCam(config) = config else {
            return Err(VideoError::Device(
                "RpiCam::open requires VideoInConfig::RpiCam".to_string(),
            ));
        };
        if !matches!(config.format(), PixelFormat::Yu12 | PixelFormat::Yuyv) {
            return Err(VideoError::Device(format!(
                "capture format {:?} is not supported, use Yu12 or Yuyv",
                config.format()
            )));
        }

        let manager = CameraManager::new().map_err(VideoError::device)?;
        if manager.cameras_count() == 0 {
            return Err(VideoError::Device("no cameras found".to_string()));
        }
        let mut camera = manager
            .get_camera(config.index())
            .map_err(VideoError::device)?;
        camera.acquire().map_err(VideoError::device)?;

        let mut cam_config = camera
            .generate_configuration(&[StreamRole::VideoRecording])
            .map_err(VideoError::device)?;
        {
            let mut stream_config = cam_config.at(0).map_err(VideoError::device)?;
            stream_config.set_pixel_format(LibcameraFormat::from_fourcc(config.format().as_fourcc()));
            stream_config.set_size(Size::new(config.size().x as u32, config.size().y as u32));
        }
        if let ConfigStatus::Invalid = cam_config.validate().map_err(VideoError::device)? {
            return Err(VideoError::Device("invalid camera configuration".to_string()));
        }
        camera
            .configure(&mut cam_config)
            .map_err(VideoError::device)?;

        // libcamera may have adjusted size and format
        let (format, size, stream) = {
            let stream_config = cam_config.at(0).map_err(VideoError::device)?;
            let fourcc = stream_config.pixel_format().fourcc;
            let format = PixelFormat::from_fourcc(fourcc).ok_or_else(|| {
                VideoError::Device(format!(
                    "camera chose unsupported format {}",
                    image::fourcc_to_string(fourcc)
                ))
            })?;
            let actual = stream_config.size();
            let stream = stream_config
                .stream()
                .ok_or_else(|| VideoError::Device("no stream available".to_string()))?;
            (
                format,
                Vec2::new(actual.width as usize, actual.height as usize),
                stream,
            )
        };

        let allocator = FrameBufferAllocator::new(&camera);
        let count = allocator.allocate(&stream).map_err(VideoError::device)?;
        let mut buffers = Vec::with_capacity(count);
        let mut maps = Vec::with_capacity(count);
        for i in 0..count {
            let buffer = allocator
                .get_buffer(&stream, i)
                .map_err(VideoError::device)?;
            let plane = buffer
                .plane(0)
                .ok_or_else(|| VideoError::Device(format!("buffer {i} has no planes")))?;
            maps.push(PlaneMap::map(
                plane.fd,
                plane.offset as usize,
                plane.length as usize,
            )?);
            buffers.push(buffer);
        }
        let maps = Arc::new(maps);

        let mut requests = Vec::with_capacity(count);
        for (i, buffer) in buffers.iter().enumerate() {
            let request = camera
                .create_request(i as u64)
                .map_err(VideoError::device)?;
            request
                .add_buffer(&stream, buffer)
                .map_err(VideoError::device)?;
            requests.push(request);
        }

        // copy each completed buffer out of the mapping so it can be requeued
        let (completed_tx, completed_rx) = mpsc::channel::<Completed>();
        let callback_maps = Arc::clone(&maps);
        let callback_stream = stream.clone();
        let frame_len = format.frame_len(size);
        camera.on_request_completed(move |request| {
            let Some(buffer) = request.find_buffer(&callback_stream) else {
                return;
            };
            if buffer.metadata().status != FrameStatus::Success {
                return;
            }
            let cookie = request.cookie() as usize;
            let Some(map) = callback_maps.get(cookie) else {
                return;
            };
            let bytes = map.bytes();
            let data = bytes[..frame_len.min(bytes.len())].to_vec();
            let _ = completed_tx.send(Completed {
                cookie,
                image: Image::new(size, data, format),
            });
        });

        camera.start().map_err(VideoError::device)?;
        for request in &requests {
            camera
                .queue_request(request)
                .map_err(VideoError::device)?;
        }
        log::info!("rpicam: camera {} streaming {} {:?}", config.index(), size, format);

        self.manager = Some(manager);
        self.camera = Some(camera);
        self.allocator = Some(allocator);
        self.buffers = buffers;
        self.requests = requests;
        self.maps = maps;
        self.stream = Some(stream);
        self.completed = Some(completed_rx);

        Ok(VideoInConfig::RpiCam(
            config.clone().with_size(size).with_format(format),
        ))
    }

    fn close(&mut self) {
        if let Some(camera) = self.camera.take() {
            let _ = camera.stop();
            let _ = camera.release();
        }
        self.completed.take();
        self.requests.clear();
        self.maps = Arc::new(Vec::new());
        self.buffers.clear();
        self.stream.take();
        self.allocator.take();
        self.manager.take();
    }

    fn blocking_capture(&mut self) -> Result<Image, VideoError> {
        let completed = self
            .completed
            .as_ref()
            .ok_or_else(|| VideoError::Stream("camera not open".to_string()))?;
        let Completed { cookie, image } = match completed.recv_timeout(CAPTURE_TIMEOUT) {
            Ok(completed) => completed,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                return Err(VideoError::Stream("capture timeout".to_string()));
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                return Err(VideoError::Stream("camera callback gone".to_string()));
            }
        };

        if let (Some(camera), Some(stream)) = (self.camera.as_ref(), self.stream.as_ref()) {
            if let (Some(request), Some(buffer)) =
                (self.requests.get(cookie), self.buffers.get(cookie))
            {
                request.reuse();
                request
                    .add_buffer(stream, buffer)
                    .map_err(|e| VideoError::Stream(format!("failed to re-add buffer: {e}")))?;
                camera
                    .queue_request(request)
                    .map_err(|e| VideoError::Stream(format!("failed to requeue request: {e}")))?;
            }
        }

        Ok(image)
    }
}
