//! Per-session context and the process-wide session store.
//!
//! The source app kept one global session; here every logical user gets an
//! isolated context keyed by session id, with a single writer enforced by
//! the mutex around each context.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::info;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::core::Config;
use crate::features::agents::AgentRegistry;
use crate::features::chat::ChatSession;
use crate::features::debate::DebateSession;
use crate::providers::{PersonaDeriver, ResponseGenerator};

use super::View;

pub type SessionId = Uuid;

/// Everything one logical user session owns: its registry, chat and debate
/// state, current view, and handles to the external collaborators.
pub struct SessionContext {
    pub id: SessionId,
    pub registry: AgentRegistry,
    pub chat: ChatSession,
    pub debate: DebateSession,
    pub created_at: DateTime<Utc>,
    pub(crate) view: View,
    pub(crate) deriver: Arc<dyn PersonaDeriver>,
    pub(crate) generator: Arc<dyn ResponseGenerator>,
    pub(crate) request_timeout: Duration,
}

impl SessionContext {
    pub fn new(
        config: &Config,
        deriver: Arc<dyn PersonaDeriver>,
        generator: Arc<dyn ResponseGenerator>,
    ) -> Self {
        SessionContext {
            id: Uuid::new_v4(),
            registry: AgentRegistry::new(),
            chat: ChatSession::new(),
            debate: DebateSession::new(config.opening_line.clone(), config.debate_pacing),
            created_at: Utc::now(),
            view: View::Home,
            deriver,
            generator,
            request_timeout: config.request_timeout,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }
}

/// Tracks every live session, keyed by session id.
pub struct SessionStore {
    sessions: DashMap<SessionId, Arc<Mutex<SessionContext>>>,
    config: Config,
    deriver: Arc<dyn PersonaDeriver>,
    generator: Arc<dyn ResponseGenerator>,
}

impl SessionStore {
    pub fn new(
        config: Config,
        deriver: Arc<dyn PersonaDeriver>,
        generator: Arc<dyn ResponseGenerator>,
    ) -> Self {
        SessionStore {
            sessions: DashMap::new(),
            config,
            deriver,
            generator,
        }
    }

    /// Open a new isolated session.
    pub fn create_session(&self) -> (SessionId, Arc<Mutex<SessionContext>>) {
        let context = SessionContext::new(
            &self.config,
            Arc::clone(&self.deriver),
            Arc::clone(&self.generator),
        );
        let id = context.id;
        let handle = Arc::new(Mutex::new(context));
        self.sessions.insert(id, Arc::clone(&handle));
        info!("Session {} opened ({} live)", id, self.sessions.len());
        (id, handle)
    }

    pub fn get(&self, id: &SessionId) -> Option<Arc<Mutex<SessionContext>>> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn remove(&self, id: &SessionId) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            info!("Session {} closed ({} live)", id, self.sessions.len());
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
