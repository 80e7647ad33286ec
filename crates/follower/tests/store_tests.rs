use {
    base::Vec2,
    follower::SharedStore,
    image::{Image, PixelFormat},
    lane::SteeringOffsets,
    std::{sync::Arc, time::Duration},
};

fn frame() -> Image {
    Image::new(Vec2::new(2, 2), vec![9; 12], PixelFormat::Rgb8)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_wait_wakes_on_publish_from_another_thread() {
    let store = Arc::new(SharedStore::new());
    let publisher = {
        let store = Arc::clone(&store);
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            store.publish(frame(), SteeringOffsets::from_delta(1));
        })
    };
    let sequence = store.wait_for_publish(0, Duration::from_secs(5)).await;
    assert_eq!(sequence, 1);
    publisher.join().unwrap();
}

#[tokio::test]
async fn test_wait_times_out_without_publish() {
    let store = SharedStore::new();
    let sequence = store.wait_for_publish(0, Duration::from_millis(10)).await;
    assert_eq!(sequence, 0);
}

#[tokio::test]
async fn test_wait_returns_at_once_when_already_newer() {
    let store = SharedStore::new();
    store.publish(frame(), SteeringOffsets::zero());
    store.publish(frame(), SteeringOffsets::zero());
    let sequence = store.wait_for_publish(1, Duration::from_secs(60)).await;
    assert_eq!(sequence, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_close_releases_waiters() {
    let store = Arc::new(SharedStore::new());
    store.publish(frame(), SteeringOffsets::from_delta(2));
    let closer = {
        let store = Arc::clone(&store);
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            store.close();
        })
    };
    let sequence = tokio::time::timeout(
        Duration::from_secs(5),
        store.wait_for_publish(1, Duration::from_secs(60)),
    )
    .await
    .unwrap();
    assert_eq!(sequence, 1);
    assert!(store.is_closed());
    assert_eq!(store.read_offsets(), SteeringOffsets::from_delta(2));
    closer.join().unwrap();
}

#[test]
fn test_concurrent_readers_see_whole_publishes() {
    let store = Arc::new(SharedStore::new());
    let writer = {
        let store = Arc::clone(&store);
        std::thread::spawn(move || {
            for i in 0..200u8 {
                let image = Image::new(Vec2::new(1, 1), vec![i; 3], PixelFormat::Rgb8);
                store.publish(image, SteeringOffsets::from_delta(i as i32));
            }
        })
    };
    for _ in 0..200 {
        let snapshot = store.snapshot();
        if let Some(frame) = snapshot.frame {
            assert_eq!(frame.data[0] as i32, snapshot.offsets.left_offset());
        }
    }
    writer.join().unwrap();
}
