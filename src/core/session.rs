use crate::domain::model::Principal;
use crate::utils::error::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Bumped whenever the serialized shape changes; a stored session with a
/// different version is discarded instead of migrated.
pub const SESSION_SCHEMA_VERSION: u32 = 1;

pub const DEFAULT_TTL_HOURS: i64 = 24;

/// The current login, as persisted between invocations. Carries an explicit
/// schema version and expiry; there is no token and no server-side state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub schema_version: u32,
    pub principal: Principal,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn issue(principal: Principal, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            schema_version: SESSION_SCHEMA_VERSION,
            principal,
            issued_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.schema_version == SESSION_SCHEMA_VERSION && !self.is_expired(now)
    }
}

/// Where the single current session lives. Injected into the services;
/// nothing reads ambient global state.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>>;
    fn save(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Resolves the acting principal. An absent, expired or schema-mismatched
/// session means Anonymous; stale sessions are cleared on sight.
pub fn current_principal(store: &dyn SessionStore, now: DateTime<Utc>) -> Result<Principal> {
    match store.load()? {
        Some(session) if session.is_usable(now) => Ok(session.principal),
        Some(_) => {
            tracing::debug!("stored session expired or unusable, clearing");
            store.clear()?;
            Ok(Principal::Anonymous)
        }
        None => Ok(Principal::Anonymous),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Role, User};
    use std::sync::Mutex;

    struct MemorySessionStore {
        session: Mutex<Option<Session>>,
    }

    impl MemorySessionStore {
        fn new(session: Option<Session>) -> Self {
            Self {
                session: Mutex::new(session),
            }
        }
    }

    impl SessionStore for MemorySessionStore {
        fn load(&self) -> Result<Option<Session>> {
            Ok(self.session.lock().unwrap().clone())
        }

        fn save(&self, session: &Session) -> Result<()> {
            *self.session.lock().unwrap() = Some(session.clone());
            Ok(())
        }

        fn clear(&self) -> Result<()> {
            *self.session.lock().unwrap() = None;
            Ok(())
        }
    }

    fn user_principal() -> Principal {
        Principal::User(User {
            id: "9".to_string(),
            name: "Ana".to_string(),
            user_name: "ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "secret".to_string(),
            city: "Madrid".to_string(),
            age: 28,
            role: Role::User,
            version: 0,
        })
    }

    #[test]
    fn fresh_session_resolves_to_its_principal() {
        let now = Utc::now();
        let session = Session::issue(user_principal(), Duration::hours(24), now);
        let store = MemorySessionStore::new(Some(session));

        let principal = current_principal(&store, now + Duration::hours(1)).unwrap();
        assert!(matches!(principal, Principal::User(_)));
    }

    #[test]
    fn expired_session_resolves_to_anonymous_and_is_cleared() {
        let now = Utc::now();
        let session = Session::issue(user_principal(), Duration::hours(24), now);
        let store = MemorySessionStore::new(Some(session));

        let principal = current_principal(&store, now + Duration::hours(25)).unwrap();
        assert!(principal.is_anonymous());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn expiry_boundary_is_exclusive_of_the_expiry_instant() {
        let now = Utc::now();
        let session = Session::issue(user_principal(), Duration::hours(24), now);
        assert!(!session.is_expired(now + Duration::hours(24) - Duration::seconds(1)));
        assert!(session.is_expired(now + Duration::hours(24)));
    }

    #[test]
    fn schema_mismatch_is_treated_as_no_session() {
        let now = Utc::now();
        let mut session = Session::issue(user_principal(), Duration::hours(24), now);
        session.schema_version = SESSION_SCHEMA_VERSION + 1;
        let store = MemorySessionStore::new(Some(session));

        let principal = current_principal(&store, now).unwrap();
        assert!(principal.is_anonymous());
    }

    #[test]
    fn missing_session_is_anonymous() {
        let store = MemorySessionStore::new(None);
        let principal = current_principal(&store, Utc::now()).unwrap();
        assert!(principal.is_anonymous());
    }
}
