use {
    base::Vec2,
    image::PixelFormat,
    std::path::PathBuf,
    video::{Orientation, ReplayConfig, VideoError, VideoIn, VideoInConfig},
};

const RED: [u8; 3] = [255, 0, 0];

fn replay_dir(name: &str, frames: usize) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("replay-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    for i in 0..frames {
        // red marker in the top-left corner, frame index in the green channel
        let img = crates_image::RgbImage::from_fn(8, 6, |x, y| {
            if x == 0 && y == 0 {
                crates_image::Rgb(RED)
            } else {
                crates_image::Rgb([0, i as u8 * 10, 0])
            }
        });
        img.save(dir.join(format!("frame{i:03}.png"))).unwrap();
    }
    std::fs::write(dir.join("notes.txt"), "not a frame").unwrap();
    dir
}

fn config(dir: &PathBuf) -> VideoInConfig {
    VideoInConfig::Replay(ReplayConfig::new(dir).with_frame_rate(200.0))
}

fn pixel(frame: &image::Image, x: usize, y: usize) -> [u8; 3] {
    image::get_pixel(frame, x, y).unwrap()
}

#[tokio::test]
async fn test_replay_upright_frames() {
    let dir = replay_dir("upright", 2);
    let mut videoin = VideoIn::open(config(&dir), Orientation::upright()).await.unwrap();
    assert_eq!(videoin.size(), Vec2::new(8, 6));
    assert_eq!(videoin.frame_rate(), 200.0);

    let first = videoin.capture().await.unwrap();
    assert_eq!(first.format, PixelFormat::Rgb8);
    assert_eq!(first.size, Vec2::new(8, 6));
    assert_eq!(pixel(&first, 0, 0), RED);
    assert_eq!(pixel(&first, 3, 3), [0, 0, 0]);

    let second = videoin.capture().await.unwrap();
    assert_eq!(pixel(&second, 3, 3), [0, 10, 0]);

    // loops back to the start
    let third = videoin.capture().await.unwrap();
    assert_eq!(pixel(&third, 3, 3), [0, 0, 0]);

    videoin.close().await;
    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_replay_applies_flips() {
    let dir = replay_dir("flipped", 1);
    let mut videoin = VideoIn::open(config(&dir), Orientation::default()).await.unwrap();
    let frame = videoin.capture().await.unwrap();
    assert_eq!(pixel(&frame, 7, 5), RED);
    assert_eq!(pixel(&frame, 0, 0), [0, 0, 0]);
    videoin.close().await;
    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_blocking_capture_latest() {
    let dir = replay_dir("latest", 3);
    let videoin = VideoIn::open(config(&dir), Orientation::upright()).await.unwrap();
    let (videoin, frame) = tokio::task::spawn_blocking(move || {
        let mut videoin = videoin;
        let frame = videoin.blocking_capture_latest();
        (videoin, frame)
    })
    .await
    .unwrap();
    let frame = frame.unwrap();
    assert_eq!(frame.size, Vec2::new(8, 6));
    assert_eq!(pixel(&frame, 0, 0), RED);
    videoin.close().await;
    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_empty_dir_fails_to_open() {
    let dir = replay_dir("empty", 0);
    let result = VideoIn::open(config(&dir), Orientation::default()).await;
    assert!(matches!(result, Err(VideoError::Device(_))));
    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_missing_dir_fails_to_open() {
    let dir = std::env::temp_dir().join("replay-does-not-exist-42");
    let result = VideoIn::open(config(&dir), Orientation::default()).await;
    assert!(matches!(result, Err(VideoError::Io(_))));
}

#[test]
fn test_orientation_default_flips_both() {
    let orientation = Orientation::default();
    assert!(orientation.hflip && orientation.vflip);
    assert_eq!(Orientation::upright(), Orientation { hflip: false, vflip: false });
}
