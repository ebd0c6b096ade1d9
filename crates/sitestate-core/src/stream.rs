// ── State subscriptions ──
//
// Readers of a `Store` never block dispatch: they hold the `Arc<R>` that
// was current when they last looked.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Handle returned by [`Store::subscribe`](crate::Store::subscribe).
pub struct StateStream<R: Clone + Send + Sync + 'static> {
    current: Arc<R>,
    receiver: watch::Receiver<Arc<R>>,
}

impl<R: Clone + Send + Sync + 'static> StateStream<R> {
    pub(crate) fn new(receiver: watch::Receiver<Arc<R>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// State as of subscribing, or as of the last `changed()`.
    pub fn current(&self) -> &Arc<R> {
        &self.current
    }

    pub fn latest(&self) -> Arc<R> {
        self.receiver.borrow().clone()
    }

    /// Next dispatched state; `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Arc<R>> {
        self.receiver.changed().await.ok()?;
        let state = self.receiver.borrow_and_update().clone();
        self.current = state.clone();
        Some(state)
    }

    pub fn into_stream(self) -> StateWatchStream<R> {
        StateWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// Yields the state at subscription time, then one item per change.
/// Intermediate states may be skipped when dispatch outpaces the reader.
pub struct StateWatchStream<R: Clone + Send + Sync + 'static> {
    inner: WatchStream<Arc<R>>,
}

impl<R: Clone + Send + Sync + 'static> Stream for StateWatchStream<R> {
    type Item = Arc<R>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
