// ── Action dispatcher ──
//
// Holds the current state on a `watch` channel. Each dispatch runs the
// reducer inside `send_modify`, so actions are applied one at a time
// in arrival order and subscribers always observe whole states.

use std::fmt::Debug;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::reducer::Reducer;
use crate::stream::StateStream;

/// Serialized, observable owner of a reducer's state.
///
/// The reducers don't know about this type; it is one possible host for
/// them. Cloning the state out is cheap (`Arc`).
pub struct Store<R: Reducer> {
    state: watch::Sender<Arc<R>>,
    dispatched: watch::Sender<u64>,
    last_dispatch: watch::Sender<Option<DateTime<Utc>>>,
}

impl<R> Store<R>
where
    R: Reducer + Send + Sync + 'static,
    R::Action: Debug,
{
    pub fn new(initial: R) -> Self {
        let (state, _) = watch::channel(Arc::new(initial));
        let (dispatched, _) = watch::channel(0u64);
        let (last_dispatch, _) = watch::channel(None);

        Self {
            state,
            dispatched,
            last_dispatch,
        }
    }

    /// Apply one action and broadcast the resulting state.
    pub fn dispatch(&self, action: R::Action) {
        tracing::trace!(?action, "dispatch");
        // `send_modify` updates unconditionally, even with zero receivers.
        self.state
            .send_modify(|current| *current = Arc::new(current.reduce(action)));
        self.dispatched.send_modify(|n| *n += 1);
        self.last_dispatch.send_replace(Some(Utc::now()));
    }

    /// Apply actions in order. Returns how many were applied.
    pub fn dispatch_all<I>(&self, actions: I) -> usize
    where
        I: IntoIterator<Item = R::Action>,
    {
        let mut applied = 0;
        for action in actions {
            self.dispatch(action);
            applied += 1;
        }
        applied
    }

    /// Current state (cheap `Arc` clone).
    pub fn state(&self) -> Arc<R> {
        self.state.borrow().clone()
    }

    /// Replace the whole state, e.g. after restoring a snapshot.
    pub fn replace(&self, state: R) {
        self.state.send_replace(Arc::new(state));
    }

    pub fn subscribe(&self) -> StateStream<R> {
        StateStream::new(self.state.subscribe())
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn dispatched(&self) -> u64 {
        *self.dispatched.borrow()
    }

    pub fn last_dispatch(&self) -> Option<DateTime<Utc>> {
        *self.last_dispatch.borrow()
    }
}

impl<R> Default for Store<R>
where
    R: Reducer + Send + Sync + 'static,
    R::Action: Debug,
{
    fn default() -> Self {
        Self::new(R::default())
    }
}
