// Credential/tenant session context.
//
// The bearer token and hotel identifier live here for the whole process:
// set at login, cleared at logout. In-flight requests read an immutable
// snapshot, so a logout that races a running request never half-updates
// the headers that request sends.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::storage::{KeyValueStore, AUTH_TOKEN_KEY, TENANT_ID_KEY};

/// Immutable per-request view of the credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub hotel_id: Option<String>,
}

pub struct SessionContext {
    current: RwLock<Option<Session>>,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl SessionContext {
    /// Context with no persistence; credentials live only in memory.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
            store: None,
        }
    }

    /// Context backed by the shell's key-value storage. Any credentials
    /// already persisted there are restored immediately.
    pub fn with_store(store: Arc<dyn KeyValueStore>) -> Self {
        let restored = store.get(AUTH_TOKEN_KEY).map(|token| Session {
            token,
            hotel_id: store.get(TENANT_ID_KEY),
        });
        if restored.is_some() {
            debug!("session restored from storage");
        }
        Self {
            current: RwLock::new(restored),
            store: Some(store),
        }
    }

    pub fn login(&self, token: impl Into<String>, hotel_id: Option<String>) {
        let session = Session {
            token: token.into(),
            hotel_id,
        };
        if let Some(store) = &self.store {
            store.set(AUTH_TOKEN_KEY, &session.token);
            match &session.hotel_id {
                Some(id) => store.set(TENANT_ID_KEY, id),
                None => store.remove(TENANT_ID_KEY),
            }
        }
        *self.current.write() = Some(session);
        debug!("session established");
    }

    pub fn logout(&self) {
        if let Some(store) = &self.store {
            store.remove(AUTH_TOKEN_KEY);
            store.remove(TENANT_ID_KEY);
        }
        *self.current.write() = None;
        debug!("session cleared");
    }

    /// Read-only copy for one request's lifetime.
    pub fn snapshot(&self) -> Option<Session> {
        self.current.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_some()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn login_then_logout_round_trip() {
        let ctx = SessionContext::new();
        assert!(!ctx.is_authenticated());

        ctx.login("token-abc", Some("hotel-7".to_string()));
        let session = ctx.snapshot().unwrap();
        assert_eq!(session.token, "token-abc");
        assert_eq!(session.hotel_id.as_deref(), Some("hotel-7"));

        ctx.logout();
        assert!(ctx.snapshot().is_none());
    }

    #[test]
    fn persists_and_restores_credentials() {
        let store = Arc::new(MemoryStore::new());
        {
            let ctx = SessionContext::with_store(store.clone());
            ctx.login("token-abc", Some("hotel-7".to_string()));
        }
        assert_eq!(store.get(AUTH_TOKEN_KEY).as_deref(), Some("token-abc"));

        let restored = SessionContext::with_store(store.clone());
        let session = restored.snapshot().unwrap();
        assert_eq!(session.token, "token-abc");
        assert_eq!(session.hotel_id.as_deref(), Some("hotel-7"));

        restored.logout();
        assert_eq!(store.get(AUTH_TOKEN_KEY), None);
        assert_eq!(store.get(TENANT_ID_KEY), None);
    }

    #[test]
    fn snapshot_is_unaffected_by_later_logout() {
        let ctx = SessionContext::new();
        ctx.login("token-abc", None);
        let snapshot = ctx.snapshot().unwrap();
        ctx.logout();
        // The request that took the snapshot keeps its credentials.
        assert_eq!(snapshot.token, "token-abc");
    }
}
