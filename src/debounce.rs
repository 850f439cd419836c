//! Input debouncing.

use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};

/// Default quiet period before a query is run.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// Sending half of a debounced channel.
#[derive(Debug)]
pub struct DebounceSender<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Clone for DebounceSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> DebounceSender<T> {
    /// Submit a value. Returns `false` when the receiving side is gone.
    pub fn send(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

/// Collapses bursts of inputs into the last one.
#[derive(Debug)]
pub struct Debouncer<T> {
    rx: mpsc::UnboundedReceiver<T>,
    delay: Duration,
}

/// Create a debounced channel that settles after `delay` without input.
pub fn channel<T>(delay: Duration) -> (DebounceSender<T>, Debouncer<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (DebounceSender { tx }, Debouncer { rx, delay })
}

impl<T> Debouncer<T> {
    /// Wait for the next value that is not followed by another within the
    /// delay. Pending input is flushed when every sender is dropped; `None`
    /// once the channel is closed and drained.
    pub async fn next_settled(&mut self) -> Option<T> {
        let mut latest = self.rx.recv().await?;
        loop {
            tokio::select! {
                next = self.rx.recv() => match next {
                    Some(value) => latest = value,
                    None => return Some(latest),
                },
                () = sleep(self.delay) => return Some(latest),
            }
        }
    }
}
