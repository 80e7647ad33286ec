//! HTTP interface: control page, MJPEG stream and the command API.

use {
    crate::*,
    axum::{
        Json, Router,
        body::{Body, Bytes},
        extract::State,
        http::header,
        response::{Html, IntoResponse, Response},
        routing::{get, post},
    },
    futures_util::{Stream, stream},
    serde::Serialize,
    std::{convert::Infallible, future::Future, net::SocketAddr, sync::Arc, time::Duration},
    tokio::{net::TcpListener, time::Instant},
};

const INDEX_HTML: &str = include_str!("index.html");

pub const MJPEG_BOUNDARY: &str = "frame";

/// Everything the handlers share with the control loop.
#[derive(Clone)]
pub struct AppState {
    pub state: Arc<RunState>,
    pub store: Arc<SharedStore>,
    pub drive: Arc<Drive>,
    pub config: FollowerConfig,
}

#[derive(Debug, Serialize)]
struct StatusReply {
    status: &'static str,
    speed: i32,
}

#[derive(Debug, Serialize)]
struct SpeedReply {
    speed: i32,
}

#[derive(Debug, Serialize)]
struct DetailReply {
    status: &'static str,
    speed: i32,
    left_offset: i32,
    right_offset: i32,
}

pub fn router(app: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/video_feed", get(video_feed))
        .route("/api/start", post(api_start))
        .route("/api/stop", post(api_stop))
        .route("/api/speed_up", post(api_speed_up))
        .route("/api/speed_down", post(api_speed_down))
        .route("/api/status", get(api_status))
        .with_state(app)
}

/// Serve until `shutdown` resolves, then drain open connections.
pub async fn serve(
    app: AppState,
    bind: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), FollowerError> {
    let listener = TcpListener::bind(bind).await?;
    serve_on(listener, app, shutdown).await
}

/// Serve on an already bound listener.
///
/// When `shutdown` resolves the store is closed, which ends every open video
/// stream so the drain can finish.
pub async fn serve_on(
    listener: TcpListener,
    app: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), FollowerError> {
    log::info!("http: listening on {}", listener.local_addr()?);
    let store = Arc::clone(&app.store);
    axum::serve(listener, router(app))
        .with_graceful_shutdown(async move {
            shutdown.await;
            store.close();
        })
        .await?;
    log::info!("http: stopped");
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn video_feed(State(app): State<AppState>) -> Response {
    let parts = mjpeg_parts(
        app.store,
        app.config.jpeg_quality(),
        app.config.stream_interval(),
        app.config.stream_poll(),
    );
    (
        [(
            header::CONTENT_TYPE,
            format!("multipart/x-mixed-replace; boundary={MJPEG_BOUNDARY}"),
        )],
        Body::from_stream(parts),
    )
        .into_response()
}

async fn api_start(State(app): State<AppState>) -> Json<StatusReply> {
    let status = app.state.start();
    log::info!("start at speed {}", status.speed);
    Json(StatusReply {
        status: status.label(),
        speed: status.speed,
    })
}

async fn api_stop(State(app): State<AppState>) -> Json<StatusReply> {
    log::info!("stop");
    let drive = Arc::clone(&app.drive);
    let state = Arc::clone(&app.state);
    let duration = app.config.stop_duration();
    let status = match tokio::task::spawn_blocking(move || drive.stop_running(&state, duration)).await
    {
        Ok(Ok(status)) => status,
        Ok(Err(error)) => {
            log::warn!("stop command failed: {}", error);
            app.state.snapshot()
        }
        Err(error) => {
            log::warn!("stop task failed: {}", error);
            app.state.stop()
        }
    };
    Json(StatusReply {
        status: status.label(),
        speed: status.speed,
    })
}

async fn api_speed_up(State(app): State<AppState>) -> Json<SpeedReply> {
    let status = app.state.speed_up();
    log::info!("speed {}", status.speed);
    Json(SpeedReply {
        speed: status.speed,
    })
}

async fn api_speed_down(State(app): State<AppState>) -> Json<SpeedReply> {
    let status = app.state.speed_down();
    log::info!("speed {}", status.speed);
    Json(SpeedReply {
        speed: status.speed,
    })
}

async fn api_status(State(app): State<AppState>) -> Json<DetailReply> {
    let status = app.state.snapshot();
    let offsets = app.store.read_offsets();
    Json(DetailReply {
        status: status.label(),
        speed: status.speed,
        left_offset: offsets.left_offset(),
        right_offset: offsets.right_offset(),
    })
}

/// One multipart part holding a JPEG image.
pub fn mjpeg_part(jpeg: &[u8]) -> Bytes {
    let header = format!("--{MJPEG_BOUNDARY}\r\nContent-Type: image/jpeg\r\n\r\n");
    let mut part = Vec::with_capacity(header.len() + jpeg.len() + 2);
    part.extend_from_slice(header.as_bytes());
    part.extend_from_slice(jpeg);
    part.extend_from_slice(b"\r\n");
    Bytes::from(part)
}

struct StreamCursor {
    store: Arc<SharedStore>,
    quality: u8,
    interval: Duration,
    poll: Duration,
    sequence: u64,
    last_sent: Option<Instant>,
}

impl StreamCursor {
    // None once the store is closed
    async fn next_part(&mut self) -> Option<Bytes> {
        loop {
            if let Some(last_sent) = self.last_sent {
                tokio::time::sleep_until(last_sent + self.interval).await;
            }
            if self.store.is_closed() {
                return None;
            }

            let mut published = self.store.snapshot();
            if published.frame.is_some() && published.sequence == self.sequence {
                // give the loop one interval to publish something newer
                self.store
                    .wait_for_publish(self.sequence, self.interval)
                    .await;
                published = self.store.snapshot();
            }
            if self.store.is_closed() {
                return None;
            }
            let Some(frame) = published.frame else {
                self.store
                    .wait_for_publish(published.sequence, self.poll)
                    .await;
                continue;
            };

            match image::encode_jpeg(frame, self.quality).await {
                Ok(jpeg) => {
                    self.sequence = published.sequence;
                    self.last_sent = Some(Instant::now());
                    return Some(mjpeg_part(&jpeg));
                }
                Err(error) => {
                    log::warn!("stream: JPEG encoding failed: {}", error);
                    self.last_sent = Some(Instant::now());
                }
            }
        }
    }
}

/// Stream of multipart parts, each the latest published frame. Ends when the
/// store is closed.
pub fn mjpeg_parts(
    store: Arc<SharedStore>,
    quality: u8,
    interval: Duration,
    poll: Duration,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
    let cursor = StreamCursor {
        store,
        quality,
        interval,
        poll,
        sequence: 0,
        last_sent: None,
    };
    stream::unfold(cursor, |mut cursor| async move {
        let part = cursor.next_part().await?;
        Some((Ok(part), cursor))
    })
}
