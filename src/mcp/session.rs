/// Sessions and the session registry
///
/// The registry keeps one table per transport kind. Identifiers only have to
/// be unique within their own table.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::mcp::channel::SessionChannel;

/// Which wire protocol a session belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// Streamable HTTP (`/mcp`)
    Streamable,
    /// Legacy HTTP+SSE (`/sse` + `/messages`)
    Sse,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Streamable => write!(f, "streamable-http"),
            TransportKind::Sse => write!(f, "sse"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Active,
    /// Terminal
    Closed,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session {id} already exists for the {kind} transport")]
    Duplicate { kind: TransportKind, id: String },
}

/// One logical client conversation
pub struct Session {
    id: String,
    kind: TransportKind,
    channel: Arc<dyn SessionChannel>,
    state: Mutex<SessionState>,
    created_at: DateTime<Utc>,
    last_active: Mutex<DateTime<Utc>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("state", &self.state())
            .field("created_at", &self.created_at)
            .field("last_active", &self.last_active())
            .finish_non_exhaustive()
    }
}

impl Session {
    fn new(kind: TransportKind, id: String, channel: Arc<dyn SessionChannel>) -> Self {
        let now = Utc::now();
        Self {
            id,
            kind,
            channel,
            state: Mutex::new(SessionState::Uninitialized),
            created_at: now,
            last_active: Mutex::new(now),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    pub fn channel(&self) -> Arc<dyn SessionChannel> {
        self.channel.clone()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        *self.last_active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record client activity on this session
    pub fn touch(&self) {
        *self.last_active.lock().unwrap_or_else(PoisonError::into_inner) = Utc::now();
    }

    /// Idle since `cutoff` with no subscriber attached
    fn is_idle_since(&self, cutoff: DateTime<Utc>) -> bool {
        !self.channel.is_subscribed() && self.last_active() <= cutoff
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_active(&self) -> bool {
        self.state() == SessionState::Active
    }

    fn activate(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == SessionState::Uninitialized {
            *state = SessionState::Active;
        }
    }

    /// Close the channel; a closed session never becomes active again
    pub fn close(&self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = SessionState::Closed;
        self.channel.close();
    }
}

/// Fresh opaque session identifier
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Live sessions, one table per transport kind
#[derive(Debug, Default)]
pub struct SessionRegistry {
    streamable: RwLock<HashMap<String, Arc<Session>>>,
    sse: RwLock<HashMap<String, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, kind: TransportKind) -> &RwLock<HashMap<String, Arc<Session>>> {
        match kind {
            TransportKind::Streamable => &self.streamable,
            TransportKind::Sse => &self.sse,
        }
    }

    /// Register an active session under `id`.
    ///
    /// Fails without touching the table if `id` is already taken for `kind`.
    pub fn create(
        &self,
        kind: TransportKind,
        id: impl Into<String>,
        channel: Arc<dyn SessionChannel>,
    ) -> Result<Arc<Session>, SessionError> {
        let id = id.into();
        let mut table = self.table(kind).write().unwrap_or_else(PoisonError::into_inner);
        if table.contains_key(&id) {
            return Err(SessionError::Duplicate { kind, id });
        }

        let session = Arc::new(Session::new(kind, id.clone(), channel));
        session.activate();
        table.insert(id, session.clone());
        info!(session_id = %session.id, transport = %kind, "Session created");
        Ok(session)
    }

    pub fn lookup(&self, kind: TransportKind, id: &str) -> Option<Arc<Session>> {
        self.table(kind)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Close and drop a session; no-op when it is already gone
    pub fn remove(&self, kind: TransportKind, id: &str) -> Option<Arc<Session>> {
        let removed = self
            .table(kind)
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);

        match &removed {
            Some(session) => {
                session.close();
                info!(session_id = %id, transport = %kind, "Session closed");
            }
            None => debug!(session_id = %id, transport = %kind, "Session already removed"),
        }
        removed
    }

    /// Close and drop every session that saw no activity for `max_idle`.
    ///
    /// Sessions with an attached subscriber are kept. Returns how many were
    /// removed.
    pub fn expire_idle(&self, kind: TransportKind, max_idle: Duration) -> usize {
        let cutoff = match chrono::Duration::from_std(max_idle)
            .ok()
            .and_then(|idle| Utc::now().checked_sub_signed(idle))
        {
            Some(cutoff) => cutoff,
            None => return 0,
        };

        let expired: Vec<Arc<Session>> = {
            let mut table = self.table(kind).write().unwrap_or_else(PoisonError::into_inner);
            let ids: Vec<String> = table
                .values()
                .filter(|session| session.is_idle_since(cutoff))
                .map(|session| session.id.clone())
                .collect();
            ids.iter().filter_map(|id| table.remove(id)).collect()
        };

        for session in &expired {
            session.close();
            info!(session_id = %session.id, transport = %kind, "Idle session expired");
        }
        expired.len()
    }

    /// Close and drop every session of both kinds; returns how many were open
    pub fn close_all(&self) -> usize {
        let mut closed = 0;
        for kind in [TransportKind::Streamable, TransportKind::Sse] {
            let drained: Vec<Arc<Session>> = self
                .table(kind)
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .drain()
                .map(|(_, session)| session)
                .collect();

            for session in drained {
                session.close();
                debug!(session_id = %session.id, transport = %kind, "Session closed");
                closed += 1;
            }
        }
        closed
    }

    pub fn len(&self, kind: TransportKind) -> usize {
        self.table(kind).read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self, kind: TransportKind) -> bool {
        self.len(kind) == 0
    }
}
