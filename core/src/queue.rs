//! Bounded FIFO between the normalizer and the classifier workers.
//!
//! Built on a `sync_channel`: [`Producer::push`] blocks while the queue is full,
//! [`Consumer::pop`] blocks while it is empty and returns `None` once the
//! producer is gone and every queued task has been handed out.

use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Arc, Mutex, PoisonError};

pub struct Producer<T> {
    tx: SyncSender<T>,
}

/// Cloneable handle shared by all workers.
pub struct Consumer<T> {
    rx: Arc<Mutex<Receiver<T>>>,
}

/// Creates a queue holding at most `capacity` items (at least one).
pub fn bounded<T>(capacity: usize) -> (Producer<T>, Consumer<T>) {
    let (tx, rx) = mpsc::sync_channel(capacity.max(1));
    (
        Producer { tx },
        Consumer {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

impl<T> Producer<T> {
    /// Blocks until there is room. Gives the item back if no consumer is left.
    pub fn push(&self, item: T) -> Result<(), T> {
        self.tx.send(item).map_err(|e| e.0)
    }

    /// Signals that no more items will arrive.
    pub fn close(self) {}
}

impl<T> Consumer<T> {
    /// Next item, or `None` once the queue is closed and drained.
    pub fn pop(&self) -> Option<T> {
        let rx = self.rx.lock().unwrap_or_else(PoisonError::into_inner);
        rx.recv().ok()
    }
}

impl<T> Clone for Consumer<T> {
    fn clone(&self) -> Self {
        Self {
            rx: Arc::clone(&self.rx),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn fifo_then_drained() {
        let (producer, consumer) = bounded(4);
        for i in 0..3 {
            producer.push(i).unwrap();
        }
        producer.close();

        assert_eq!(consumer.pop(), Some(0));
        assert_eq!(consumer.pop(), Some(1));
        assert_eq!(consumer.pop(), Some(2));
        assert_eq!(consumer.pop(), None);
    }

    #[test]
    fn push_fails_without_consumers() {
        let (producer, consumer) = bounded::<u8>(1);
        drop(consumer);
        assert_eq!(producer.push(9), Err(9));
    }

    #[test]
    fn producer_blocks_when_full() {
        let (producer, consumer) = bounded(1);
        let pushed = Arc::new(AtomicUsize::new(0));

        let counter = pushed.clone();
        let handle = thread::spawn(move || {
            for i in 0..3 {
                producer.push(i).unwrap();
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        thread::sleep(Duration::from_millis(100));
        assert_eq!(pushed.load(Ordering::SeqCst), 1);

        let drained: Vec<i32> = std::iter::from_fn(|| consumer.pop()).collect();
        handle.join().unwrap();
        assert_eq!(drained, vec![0, 1, 2]);
    }

    #[test]
    fn every_item_is_delivered_once_across_workers() {
        let (producer, consumer) = bounded(8);
        let seen = Arc::new(AtomicUsize::new(0));

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let consumer = consumer.clone();
                let seen = seen.clone();
                thread::spawn(move || {
                    while consumer.pop().is_some() {
                        seen.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        drop(consumer);

        for i in 0..1_000 {
            producer.push(i).unwrap();
        }
        producer.close();

        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(seen.load(Ordering::SeqCst), 1_000);
    }
}
