use {
    image::Image,
    lane::SteeringOffsets,
    std::{
        sync::{
            Arc, RwLock,
            atomic::{AtomicBool, Ordering},
        },
        time::Duration,
    },
    tokio::sync::watch,
};

/// What one publish left in the store. Frame and offsets always come from
/// the same cycle.
#[derive(Debug, Clone, Default)]
pub struct Published {
    pub frame: Option<Arc<Image>>,
    pub offsets: SteeringOffsets,
    /// Number of publishes so far, 0 before the first one.
    pub sequence: u64,
}

/// Latest annotated frame and steering offsets, replaced as a unit.
#[derive(Debug)]
pub struct SharedStore {
    published: RwLock<Published>,
    sequence: watch::Sender<u64>,
    closed: AtomicBool,
}

impl Default for SharedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedStore {
    pub fn new() -> Self {
        let (sequence, _) = watch::channel(0);
        Self {
            published: RwLock::new(Published::default()),
            sequence,
            closed: AtomicBool::new(false),
        }
    }

    /// Replace frame and offsets together and wake stream readers.
    pub fn publish(&self, frame: impl Into<Arc<Image>>, offsets: SteeringOffsets) -> u64 {
        let frame = frame.into();
        let sequence = {
            let mut published = self.published.write().unwrap_or_else(|e| e.into_inner());
            published.sequence += 1;
            published.frame = Some(frame);
            published.offsets = offsets;
            published.sequence
        };
        self.sequence.send_replace(sequence);
        sequence
    }

    pub fn read_frame(&self) -> Option<Arc<Image>> {
        self.published
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .frame
            .clone()
    }

    pub fn read_offsets(&self) -> SteeringOffsets {
        self.published
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .offsets
    }

    pub fn snapshot(&self) -> Published {
        self.published
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn sequence(&self) -> u64 {
        *self.sequence.borrow()
    }

    /// Release everyone waiting on the store. Streams end once they see this;
    /// the last publish stays readable.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Relaxed);
        self.sequence.send_modify(|_| {});
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }

    /// Wait until something newer than `after` is published, the store is
    /// closed, or `timeout` passes. Returns the sequence number current at
    /// return.
    pub async fn wait_for_publish(&self, after: u64, timeout: Duration) -> u64 {
        let mut receiver = self.sequence.subscribe();
        if *receiver.borrow_and_update() <= after && !self.is_closed() {
            // the sender lives as long as self, so wait_for cannot fail here
            let _ = tokio::time::timeout(
                timeout,
                receiver.wait_for(|&sequence| sequence > after || self.is_closed()),
            )
            .await;
        }
        self.sequence()
    }
}

#[cfg(test)]
mod tests {
    use {super::*, base::Vec2, image::PixelFormat};

    fn frame(value: u8) -> Image {
        Image::new(Vec2::new(4, 2), vec![value; 24], PixelFormat::Rgb8)
    }

    #[test]
    fn test_empty_store() {
        let store = SharedStore::new();
        assert!(store.read_frame().is_none());
        assert_eq!(store.read_offsets(), SteeringOffsets::zero());
        assert_eq!(store.snapshot().sequence, 0);
    }

    #[test]
    fn test_publish_replaces_both() {
        let store = SharedStore::new();
        store.publish(frame(1), SteeringOffsets::from_delta(4));
        assert_eq!(store.publish(frame(2), SteeringOffsets::from_delta(-6)), 2);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.sequence, 2);
        assert_eq!(snapshot.frame.unwrap().data[0], 2);
        assert_eq!(snapshot.offsets.left_offset(), -6);
        assert_eq!(store.read_offsets().right_offset(), 6);
    }

    #[test]
    fn test_republishing_same_values_is_idempotent() {
        let store = SharedStore::new();
        let shared = Arc::new(frame(7));
        store.publish(Arc::clone(&shared), SteeringOffsets::from_delta(3));
        let first = store.snapshot();
        store.publish(Arc::clone(&shared), SteeringOffsets::from_delta(3));
        let second = store.snapshot();
        assert_eq!(first.frame, second.frame);
        assert_eq!(first.offsets, second.offsets);
    }
}
