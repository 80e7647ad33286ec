use {
    anyhow::Context,
    base::log,
    clap::Parser,
    follower::{ControlLoop, Drive, FollowerConfig, RunState, SharedStore, server},
    lane::LanePipeline,
    robot::{Motors, Pca9685Config, Pca9685Motors, SimulatedMotors},
    std::{net::SocketAddr, path::PathBuf, sync::Arc},
    tokio::sync::oneshot,
    video::{Orientation, ReplayConfig, VideoIn, VideoInConfig},
};

/// Camera line follower with a browser control page.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Address of the control page and API
    #[arg(long, default_value = "0.0.0.0:5000")]
    bind: SocketAddr,

    /// Play still images from this directory instead of using the camera
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Frame rate for --replay
    #[arg(long, default_value_t = 15.0)]
    replay_fps: f32,

    /// Log motor commands instead of driving the PCA9685
    #[arg(long)]
    simulate_motors: bool,

    /// Write dated log files here instead of stdout
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Initial speed (10..=80)
    #[arg(long, default_value_t = 15)]
    speed: i32,

    /// Camera is mounted upright
    #[arg(long)]
    no_flip: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    match &args.log_dir {
        Some(dir) => base::init_file_logger(dir)
            .with_context(|| format!("cannot log to {}", dir.display()))?,
        None => base::init_stdout_logger(),
    }

    let config = FollowerConfig::default()
        .with_bind(args.bind)
        .with_initial_speed(args.speed);
    log::info!("line follower starting, speed {}", config.initial_speed());

    let motors: Box<dyn Motors> = if args.simulate_motors {
        Box::new(SimulatedMotors::new().with_realtime(true))
    } else {
        match Pca9685Motors::open(Pca9685Config::default()) {
            Ok(motors) => Box::new(motors),
            Err(error) => base::log_fatal!("motors: {}", error),
        }
    };
    let drive = Arc::new(Drive::from_boxed(motors));

    let video_config = match &args.replay {
        Some(dir) => VideoInConfig::Replay(ReplayConfig::new(dir).with_frame_rate(args.replay_fps)),
        None => VideoInConfig::platform_default()
            .context("built without camera support, pass --replay <dir>")?,
    };
    let orientation = if args.no_flip {
        Orientation::upright()
    } else {
        Orientation::default()
    };
    let camera = match VideoIn::open(video_config, orientation).await {
        Ok(camera) => camera,
        Err(error) => base::log_fatal!("camera: {}", error),
    };

    tokio::task::spawn_blocking({
        let drive = Arc::clone(&drive);
        let config = config.clone();
        move || drive.aim_camera(&config)
    })
    .await?
    .context("aiming camera")?;

    let state = Arc::new(RunState::new(&config));
    let store = Arc::new(SharedStore::new());
    let control = ControlLoop::new(
        camera,
        LanePipeline::default(),
        Arc::clone(&state),
        Arc::clone(&store),
        Arc::clone(&drive),
        config.clone(),
    )
    .spawn();

    let app = server::AppState {
        state,
        store,
        drive,
        config: config.clone(),
    };

    // motors stop first, then the server drains its viewers
    let (abort_tx, abort_rx) = oneshot::channel::<()>();
    let (stopped_tx, stopped_rx) = oneshot::channel::<()>();
    let shutdown = tokio::spawn(async move {
        tokio::select! {
            _ = interrupted() => log::info!("shutting down"),
            _ = abort_rx => log::info!("http server gone, shutting down"),
        }
        tokio::spawn(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                base::log_fatal!("interrupted again, exiting without cleanup");
            }
        });
        let camera = control.shutdown().await;
        let _ = stopped_tx.send(());
        if let Some(camera) = camera {
            camera.close().await;
        }
    });

    let served = server::serve(app, config.bind(), async move {
        let _ = stopped_rx.await;
    })
    .await;

    drop(abort_tx);
    if let Err(error) = shutdown.await {
        log::error!("shutdown task failed: {}", error);
    }
    log::info!("bye");
    served.context("http server")
}

async fn interrupted() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        log::error!("cannot listen for Ctrl-C: {}", error);
        std::future::pending::<()>().await;
    }
}
