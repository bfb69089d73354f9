//! Credential storage and session signalling
//!
//! The bearer token lives in exactly one place: an in-memory slot owned
//! by [`CredentialStore`]. It is set on login or refresh, cleared on
//! logout or refresh failure, and never persisted — a fresh process must
//! re-authenticate or rely on the server-side refresh cookie.
//!
//! Cross-component signalling goes through [`SessionEvents`], an explicit
//! broadcast channel that auth-state holders subscribe to instead of a
//! process-wide ambient event.

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

/// Refresh state machine phase for the credential slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Normal operation; requests use the slot as-is
    Normal,
    /// A refresh is in flight; concurrent 401s queue behind it
    Refreshing,
    /// The last refresh failed; authenticated calls fail fast until a
    /// new credential is installed
    Failed,
}

/// Single-slot, in-memory bearer credential store.
///
/// Effectively a single-writer register: ordinary requests only read the
/// slot, and writes happen on login, on refresh (serialized by the
/// client's refresh gate) and on invalidation.
pub struct CredentialStore {
    slot: RwLock<Option<String>>,
    phase: RwLock<SessionPhase>,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore {
    pub fn new() -> Self {
        Self { slot: RwLock::new(None), phase: RwLock::new(SessionPhase::Normal) }
    }

    /// Install a credential and return the session to normal operation.
    pub fn set(&self, token: impl Into<String>) {
        *self.slot.write() = Some(token.into());
        *self.phase.write() = SessionPhase::Normal;
        debug!("access credential installed");
    }

    /// Current credential, if any.
    pub fn get(&self) -> Option<String> {
        self.slot.read().clone()
    }

    /// Drop the credential (logout or explicit invalidation). The phase
    /// returns to normal: the next authenticated flow starts clean.
    pub fn clear(&self) {
        *self.slot.write() = None;
        *self.phase.write() = SessionPhase::Normal;
        debug!("access credential cleared");
    }

    pub fn is_authenticated(&self) -> bool {
        self.slot.read().is_some()
    }

    pub fn phase(&self) -> SessionPhase {
        *self.phase.read()
    }

    pub(crate) fn set_phase(&self, phase: SessionPhase) {
        *self.phase.write() = phase;
    }

    /// Drop the credential and latch the failed phase: a refresh just
    /// failed, so authenticated calls short-circuit until a new login.
    pub(crate) fn invalidate(&self) {
        *self.slot.write() = None;
        *self.phase.write() = SessionPhase::Failed;
        debug!("access credential invalidated after failed refresh");
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the token itself
        f.debug_struct("CredentialStore")
            .field("authenticated", &self.is_authenticated())
            .field("phase", &self.phase())
            .finish()
    }
}

/// Session lifecycle notifications emitted by the API client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The access credential was silently renewed
    Refreshed,
    /// The session could not be renewed; interested UI should redirect
    /// to login
    Ended,
}

/// Broadcast channel for [`SessionEvent`]s.
///
/// Subscribers receive every event emitted after they subscribe; with no
/// subscribers an emit is a no-op.
#[derive(Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        debug!(?event, "session event");
        // Err means no live subscribers, which is fine
        let _ = self.sender.send(event);
    }
}

impl std::fmt::Debug for SessionEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEvents").field("subscribers", &self.sender.receiver_count()).finish()
    }
}
