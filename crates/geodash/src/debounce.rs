//! Trailing-edge debouncing of fast-changing values.
//!
//! Each [`Debouncer::set`] restarts a quiet-period timer; a value is published
//! to subscribers only once no newer value has arrived for the whole period.
//! The timer runs on a background task that is aborted when the debouncer is
//! dropped, so a pending value never outlives its owner.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::trace;

/// Quiet period used by the dashboard filter box.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Debounces values of type `T`.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    generation: Arc<AtomicU64>,
    input: mpsc::UnboundedSender<(u64, T)>,
    output: Arc<watch::Sender<T>>,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a debouncer whose settled value starts as `initial`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(initial: T, delay: Duration) -> Self {
        let (input, rx) = mpsc::unbounded_channel();
        let (output, _) = watch::channel(initial);
        let output = Arc::new(output);
        let generation = Arc::new(AtomicU64::new(0));

        let task = tokio::spawn(run(
            rx,
            Arc::clone(&output),
            Arc::clone(&generation),
            delay,
        ));

        Self {
            delay,
            generation,
            input,
            output,
            task,
        }
    }

    /// The quiet period.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Offer a new value, restarting the quiet period.
    pub fn set(&self, value: T) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        // The receiver only goes away with the task, which lives as long as self.
        let _ = self.input.send((generation, value));
    }

    /// Publish a value immediately, discarding anything still pending.
    pub fn set_now(&self, value: T) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.output.send_replace(value);
    }

    /// The most recently settled value.
    #[must_use]
    pub fn current(&self) -> T {
        self.output.borrow().clone()
    }

    /// Subscribe to settled values.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.subscribe()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T>(
    mut rx: mpsc::UnboundedReceiver<(u64, T)>,
    output: Arc<watch::Sender<T>>,
    generation: Arc<AtomicU64>,
    delay: Duration,
) {
    let mut pending: Option<(u64, T)> = None;
    loop {
        let Some((stamp, value)) = pending.take() else {
            match rx.recv().await {
                Some(next) => pending = Some(next),
                None => return,
            }
            continue;
        };

        tokio::select! {
            next = rx.recv() => match next {
                Some(next) => pending = Some(next),
                None => return,
            },
            () = tokio::time::sleep(delay) => {
                // A set_now after this value was queued supersedes it.
                if generation.load(Ordering::SeqCst) == stamp {
                    trace!("debounced value settled");
                    output.send_replace(value);
                }
            }
        }
    }
}
