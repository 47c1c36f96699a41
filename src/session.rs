use crate::directory::User;
use std::sync::RwLock;

/// The signed-in user and the token sent with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Source of the current session. Injected into the API client so tests can swap it.
pub trait SessionProvider: Send + Sync {
    fn current(&self) -> Option<Session>;
    fn login(&self, session: Session);
    fn logout(&self);
}

/// Session held in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemorySession {
    inner: RwLock<Option<Session>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(session: Session) -> Self {
        Self {
            inner: RwLock::new(Some(session)),
        }
    }
}

impl SessionProvider for MemorySession {
    fn current(&self) -> Option<Session> {
        // A poisoned lock still holds the last written session.
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn login(&self, session: Session) {
        log::info!("Signed in as '{}'", session.user.username);
        match self.inner.write() {
            Ok(mut guard) => *guard = Some(session),
            Err(poisoned) => *poisoned.into_inner() = Some(session),
        }
    }

    fn logout(&self) {
        match self.inner.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_logout_cycle() {
        let provider = MemorySession::new();
        assert!(provider.current().is_none());

        provider.login(Session::new("abc", User::new("u-1", "ada")));
        let session = provider.current().unwrap();
        assert_eq!(session.bearer(), "Bearer abc");
        assert_eq!(session.user.username, "ada");

        provider.logout();
        assert!(provider.current().is_none());
    }
}
