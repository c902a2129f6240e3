use super::manager::SessionManager;
use crate::api::ModelApi;
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub struct Session {
    pub session_id: Uuid,
    pub started_at: DateTime<Local>,
    pub manager: SessionManager,
}

/// One conversation per session id. Every session shares the client built at
/// startup but never another session's log.
pub struct SessionRegistry {
    client: Option<Arc<dyn ModelApi>>,
    sessions: HashMap<Uuid, Session>,
}

impl SessionRegistry {
    pub fn new(client: Option<Arc<dyn ModelApi>>) -> Self {
        Self {
            client,
            sessions: HashMap::new(),
        }
    }

    pub fn start(&mut self) -> Uuid {
        let session_id = Uuid::new_v4();
        self.sessions.insert(
            session_id,
            Session {
                session_id,
                started_at: Local::now(),
                manager: SessionManager::new(self.client.clone()),
            },
        );
        log::debug!("Started session {}", session_id);
        session_id
    }

    pub fn get(&self, session_id: &Uuid) -> Option<&Session> {
        self.sessions.get(session_id)
    }

    pub fn get_mut(&mut self, session_id: &Uuid) -> Option<&mut Session> {
        self.sessions.get_mut(session_id)
    }

    /// Drop the session and its log. Returns false for unknown ids.
    pub fn end(&mut self, session_id: &Uuid) -> bool {
        let removed = self.sessions.remove(session_id).is_some();
        if removed {
            log::debug!("Ended session {}", session_id);
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
