// ── Per-resource synchronization cells ──
//
// One `SyncCell` per backend resource, owned by the controller instance
// (never module-global, so two views of the same resource can't contaminate
// each other's diff state). Consumers observe a `ResourceState` through
// `watch` channels; background polls only touch the channel when the
// payload content actually changed.

mod stream;

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::watch;

pub use stream::{ResourceStream, ResourceWatchStream};

// ── Observable state ─────────────────────────────────────────────────

/// View-facing lifecycle phase.
///
/// Transitions: Idle → Loading → {Ready, Error}. Ready returns to Loading
/// only via an explicit foreground refresh; the silent path updates data in
/// place and never leaves Ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Error,
}

/// The `{data, loading, error}` triple a view renders from.
///
/// `data` is last-known-good: a failed fetch never blanks it.
#[derive(Debug)]
pub struct ResourceState<T> {
    pub phase: Phase,
    pub data: Option<Arc<T>>,
    pub error: Option<String>,
}

impl<T> ResourceState<T> {
    fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            data: None,
            error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }
}

// Manual impl: `data` is an `Arc`, so no `T: Clone` bound is needed.
impl<T> Clone for ResourceState<T> {
    fn clone(&self) -> Self {
        Self {
            phase: self.phase,
            data: self.data.clone(),
            error: self.error.clone(),
        }
    }
}

// ── Fetch tickets ────────────────────────────────────────────────────

/// Monotonic sequence ticket taken before a fetch is issued.
///
/// Commits carrying a ticket older than the last committed one are
/// discarded, so a slow response can never overwrite fresher state.
#[derive(Debug, Clone, Copy)]
pub struct FetchTicket {
    seq: u64,
}

// ── SyncCell ─────────────────────────────────────────────────────────

#[derive(Debug)]
struct Committed {
    seq: u64,
    /// Fingerprint of the last committed payload. `None` after an error
    /// so the next success always notifies.
    fingerprint: Option<u64>,
}

/// Reactive cell for a single backend resource.
///
/// Two commit paths:
/// - **foreground** (`set_loading` + `commit` / `fail`) — visible loading
///   and error states for mount and manual refresh;
/// - **silent** (`commit_silent`) — background polling; suppresses the
///   notification entirely when the serialized payload is unchanged, and
///   callers swallow errors (the next tick self-heals).
pub struct SyncCell<T> {
    state: watch::Sender<ResourceState<T>>,
    next_seq: AtomicU64,
    committed: Mutex<Committed>,
}

impl<T: Serialize + Send + Sync + 'static> SyncCell<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ResourceState::idle());
        Self {
            state,
            next_seq: AtomicU64::new(0),
            committed: Mutex::new(Committed {
                seq: 0,
                fingerprint: None,
            }),
        }
    }

    /// Take a sequence ticket for a fetch about to be issued.
    pub fn begin(&self) -> FetchTicket {
        FetchTicket {
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed) + 1,
        }
    }

    /// Enter the visible loading phase (foreground fetches only).
    /// Keeps last-known-good data so the view never blanks.
    pub fn set_loading(&self) {
        self.state.send_modify(|s| {
            s.phase = Phase::Loading;
            s.error = None;
        });
    }

    /// Foreground commit: replace data, clear error, phase Ready.
    /// Returns `false` if the ticket is stale (a newer commit already landed).
    pub fn commit(&self, ticket: FetchTicket, value: T) -> bool {
        let mut committed = self.committed.lock().expect("sync cell lock poisoned");
        if ticket.seq <= committed.seq {
            tracing::debug!(seq = ticket.seq, "discarding out-of-order commit");
            return false;
        }
        committed.seq = ticket.seq;
        committed.fingerprint = fingerprint(&value);
        drop(committed);

        self.state.send_modify(|s| {
            s.phase = Phase::Ready;
            s.data = Some(Arc::new(value));
            s.error = None;
        });
        true
    }

    /// Silent commit: update data only if the serialized content differs
    /// from the last committed payload. Returns `true` when visible state
    /// changed (exactly once per content change), `false` on no-op or
    /// stale ticket.
    pub fn commit_silent(&self, ticket: FetchTicket, value: T) -> bool {
        let mut committed = self.committed.lock().expect("sync cell lock poisoned");
        if ticket.seq <= committed.seq {
            tracing::debug!(seq = ticket.seq, "discarding out-of-order silent commit");
            return false;
        }
        committed.seq = ticket.seq;

        let fp = fingerprint(&value);
        if fp.is_some() && fp == committed.fingerprint {
            // Identical content: no state replacement, no re-render signal.
            return false;
        }
        committed.fingerprint = fp;
        drop(committed);

        self.state.send_modify(|s| {
            // Data changes in place; a healthy silent path never leaves
            // Ready. It does heal an earlier Error once fresh data lands.
            s.phase = Phase::Ready;
            s.data = Some(Arc::new(value));
            s.error = None;
        });
        true
    }

    /// Foreground failure: surface the error, keep last-known-good data.
    /// Returns `false` if the ticket is stale.
    pub fn fail(&self, ticket: FetchTicket, message: impl Into<String>) -> bool {
        let mut committed = self.committed.lock().expect("sync cell lock poisoned");
        if ticket.seq <= committed.seq {
            return false;
        }
        committed.seq = ticket.seq;
        committed.fingerprint = None;
        drop(committed);

        self.state.send_modify(|s| {
            s.phase = Phase::Error;
            s.error = Some(message.into());
        });
        true
    }

    /// Current state snapshot (cheap clone, data behind `Arc`).
    pub fn current(&self) -> ResourceState<T> {
        self.state.borrow().clone()
    }

    /// Subscribe to raw watch notifications.
    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.state.subscribe()
    }

    /// Subscribe via the higher-level stream handle.
    pub fn stream(&self) -> ResourceStream<T> {
        ResourceStream::new(self.state.subscribe())
    }
}

impl<T: Serialize + Send + Sync + 'static> Default for SyncCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Content hash of the serialized payload, used to suppress no-op updates.
/// `None` when serialization fails, which forces the commit through.
fn fingerprint<T: Serialize>(value: &T) -> Option<u64> {
    let json = serde_json::to_string(value).ok()?;
    let mut hasher = DefaultHasher::new();
    json.hash(&mut hasher);
    Some(hasher.finish())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let cell: SyncCell<String> = SyncCell::new();
        let state = cell.current();
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.data.is_none());
        assert!(state.error.is_none());
    }

    #[test]
    fn foreground_fetch_walks_the_state_machine() {
        let cell: SyncCell<String> = SyncCell::new();
        let ticket = cell.begin();
        cell.set_loading();
        assert!(cell.current().is_loading());

        assert!(cell.commit(ticket, "hello".into()));
        let state = cell.current();
        assert!(state.is_ready());
        assert_eq!(state.data.as_deref(), Some(&"hello".to_owned()));
    }

    #[test]
    fn identical_silent_payload_does_not_notify() {
        let cell: SyncCell<String> = SyncCell::new();
        cell.commit(cell.begin(), "same".into());

        let mut rx = cell.subscribe();
        rx.borrow_and_update();

        let before = cell.current().data;
        assert!(!cell.commit_silent(cell.begin(), "same".into()));
        assert!(!rx.has_changed().unwrap());

        // State identity unchanged: same Arc, no replacement happened.
        let after = cell.current().data;
        assert!(Arc::ptr_eq(before.as_ref().unwrap(), after.as_ref().unwrap()));
    }

    #[test]
    fn changed_silent_payload_notifies_exactly_once() {
        let cell: SyncCell<String> = SyncCell::new();
        cell.commit(cell.begin(), "old".into());

        let mut rx = cell.subscribe();
        rx.borrow_and_update();

        assert!(cell.commit_silent(cell.begin(), "new".into()));
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            rx.borrow_and_update().data.as_deref(),
            Some(&"new".to_owned())
        );
        assert!(!rx.has_changed().unwrap());

        let state = cell.current();
        assert!(state.is_ready());
    }

    #[test]
    fn out_of_order_completion_is_discarded() {
        let cell: SyncCell<String> = SyncCell::new();
        let slow = cell.begin();
        let fast = cell.begin();

        assert!(cell.commit_silent(fast, "fresh".into()));
        // The older request resolves late with stale data.
        assert!(!cell.commit_silent(slow, "stale".into()));
        assert_eq!(
            cell.current().data.as_deref(),
            Some(&"fresh".to_owned())
        );
    }

    #[test]
    fn foreground_failure_preserves_last_known_good() {
        let cell: SyncCell<String> = SyncCell::new();
        cell.commit(cell.begin(), "good".into());

        let ticket = cell.begin();
        cell.set_loading();
        assert!(cell.fail(ticket, "backend unreachable"));

        let state = cell.current();
        assert_eq!(state.phase, Phase::Error);
        assert_eq!(state.error.as_deref(), Some("backend unreachable"));
        assert_eq!(state.data.as_deref(), Some(&"good".to_owned()));
    }

    #[test]
    fn silent_commit_heals_after_error() {
        let cell: SyncCell<String> = SyncCell::new();
        cell.commit(cell.begin(), "good".into());

        let ticket = cell.begin();
        cell.fail(ticket, "transient");

        // Same content as before the error -- the error cleared the
        // fingerprint, so this must commit and return to Ready.
        assert!(cell.commit_silent(cell.begin(), "good".into()));
        let state = cell.current();
        assert!(state.is_ready());
        assert!(state.error.is_none());
    }

    #[test]
    fn stale_failure_cannot_overwrite_newer_data() {
        let cell: SyncCell<String> = SyncCell::new();
        let slow = cell.begin();
        let fast = cell.begin();

        cell.commit(fast, "fresh".into());
        assert!(!cell.fail(slow, "old request timed out"));
        assert!(cell.current().is_ready());
    }
}
