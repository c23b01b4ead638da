//! Subscriptions
//!
//! A standing watch on a document or query. The first value arrives
//! immediately after subscribing; later values arrive on every source
//! change. Cancellation is explicit, idempotent, and also fired on drop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Buffer depth for watch channels; pushes beyond this apply backpressure
/// to the watch task rather than dropping values.
pub(crate) const WATCH_CHANNEL_CAPACITY: usize = 16;

/// A live stream of values from a watch, plus its cancellation handle
pub struct Subscription<T> {
    rx: mpsc::Receiver<T>,
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Subscription<T> {
    pub(crate) fn new(rx: mpsc::Receiver<T>, task: JoinHandle<()>) -> Self {
        Self {
            rx,
            cancelled: Arc::new(AtomicBool::new(false)),
            task,
        }
    }

    /// Receive the next pushed value; `None` once the watch has ended.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Stop the watch. Safe to call more than once; only the first call
    /// tears the task down.
    pub fn unsubscribe(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.task.abort();
        }
    }

    /// Adapt each pushed value through `f`, returning a new subscription.
    ///
    /// Dropping the returned subscription cancels the inner one as well.
    pub fn map<U, F>(mut self, f: F) -> Subscription<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
        let task = tokio::spawn(async move {
            while let Some(value) = self.recv().await {
                if tx.send(f(value)).await.is_err() {
                    break;
                }
            }
        });
        Subscription::new(rx, task)
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel_subscription() -> (mpsc::Sender<u32>, Subscription<u32>) {
        let (tx, rx) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
        let task = tokio::spawn(async { std::future::pending::<()>().await });
        (tx, Subscription::new(rx, task))
    }

    #[tokio::test]
    async fn test_recv_delivers_in_order() {
        let (tx, mut sub) = channel_subscription();
        tx.send(1).await.unwrap();
        tx.send(2).await.unwrap();
        assert_eq!(sub.recv().await, Some(1));
        assert_eq!(sub.recv().await, Some(2));
    }

    #[tokio::test]
    async fn test_unsubscribe_is_idempotent() {
        let (_tx, sub) = channel_subscription();
        sub.unsubscribe();
        sub.unsubscribe();
    }

    #[tokio::test]
    async fn test_map_transforms_values() {
        let (tx, sub) = channel_subscription();
        let mut mapped = sub.map(|v| v * 10);
        tx.send(3).await.unwrap();
        assert_eq!(mapped.recv().await, Some(30));
    }
}
