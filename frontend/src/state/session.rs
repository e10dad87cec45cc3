//! Auth session store.
//!
//! ```text
//!              login()                         token saved
//! Anonymous ───────────► Authenticating ─────────────────► Authenticated
//!     ▲                        │ failure                         │
//!     └────────────────────────┘                                 │
//!     └────────────── logout() / 401 on any request ─────────────┘
//! ```
//!
//! The store is an explicit object handed around through context. Views
//! subscribe to it instead of reading a global.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{ApiError, ApiResult};
use crate::services::http::{ApiClient, GlooTransport, Transport};
use crate::types::User;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthPhase {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated,
}

/// Snapshot of the authentication state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    pub phase: AuthPhase,
}

impl Session {
    fn from_token(token: Option<String>) -> Self {
        let mut session = Self {
            token,
            ..Self::default()
        };
        session.phase = session.settled_phase();
        session
    }

    /// True iff a non-empty token is held.
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.is_empty())
    }

    pub fn credits(&self) -> Option<i64> {
        self.user.as_ref().map(|user| user.credits)
    }

    fn settled_phase(&self) -> AuthPhase {
        if self.is_authenticated() {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Anonymous
        }
    }
}

type Listener = Rc<dyn Fn(&Session)>;

/// Owns the session and its transitions.
pub struct SessionStore<T: Transport> {
    api: ApiClient<T>,
    state: RefCell<Session>,
    listeners: RefCell<Vec<Listener>>,
}

/// Session store used by the application.
pub type WebSession = SessionStore<GlooTransport>;

impl<T: Transport + 'static> SessionStore<T> {
    /// Build the store from the persisted token, if any.
    ///
    /// Also registers itself with `api` so a 401 on any request drops the
    /// session.
    pub fn new(api: ApiClient<T>) -> Rc<Self> {
        let session = Session::from_token(api.tokens().load());
        let store = Rc::new(Self {
            api,
            state: RefCell::new(session),
            listeners: RefCell::new(Vec::new()),
        });

        let weak = Rc::downgrade(&store);
        store.api.set_unauthorized_hook(move || {
            if let Some(store) = weak.upgrade() {
                store.invalidate();
            }
        });
        store
    }
}

impl<T: Transport> SessionStore<T> {
    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Call `listener` after every state change.
    pub fn subscribe(&self, listener: impl Fn(&Session) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    fn update(&self, change: impl FnOnce(&mut Session)) {
        change(&mut self.state.borrow_mut());
        let snapshot = self.session();
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    /// Log in and persist the token, then load the user.
    ///
    /// Failing to load the user does not undo the login.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<()> {
        self.update(|s| s.phase = AuthPhase::Authenticating);

        let response = match self.api.login(email, password).await {
            Ok(response) => response,
            Err(err) => {
                log::warn!("Login failed: {}", err);
                self.settle();
                return Err(err);
            }
        };
        let Some(token) = response.access_token.filter(|token| !token.is_empty()) else {
            self.settle();
            return Err(ApiError::Unknown("No token received from login".to_string()));
        };

        self.api.tokens().save(&token);
        self.update(|s| {
            s.token = Some(token);
            s.phase = AuthPhase::Authenticated;
        });
        log::info!("🔑 Logged in as {}", email);

        self.fetch_user().await;
        Ok(())
    }

    /// Create an account, then log into it.
    pub async fn register(&self, email: &str, password: &str) -> ApiResult<()> {
        self.api.register(email, password).await?;
        log::info!("Registered {}", email);
        self.login(email, password).await
    }

    /// Refresh the cached user.
    ///
    /// A 401 ends the session; any other failure is logged and leaves the
    /// session as it was.
    pub async fn fetch_user(&self) {
        match self.api.me().await {
            Ok(user) => {
                let token = self.api.tokens().load();
                self.update(|s| {
                    s.user = Some(user);
                    s.token = token;
                    s.phase = s.settled_phase();
                });
            }
            Err(ApiError::Unauthorized { .. }) => {
                log::warn!("Session expired while fetching user");
                self.invalidate();
            }
            Err(err) => log::error!("Failed to fetch user: {}", err),
        }
    }

    pub fn logout(&self) {
        self.api.tokens().clear();
        self.update(|s| *s = Session::default());
        log::info!("Logged out");
    }

    /// Drop the session after the backend rejected the token.
    fn invalidate(&self) {
        self.api.tokens().clear();
        self.update(|s| *s = Session::default());
    }

    /// Leave `Authenticating` for whatever the stored token implies.
    fn settle(&self) {
        let token = self.api.tokens().load();
        self.update(|s| {
            s.token = token;
            if s.token.is_none() {
                s.user = None;
            }
            s.phase = s.settled_phase();
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use futures::executor::block_on;

    use super::*;
    use crate::services::storage::{MemoryTokenStore, TokenStore};
    use crate::testing::{client, user_json, FakeTransport};

    #[test]
    fn test_initial_state_follows_persisted_token() {
        let transport = FakeTransport::default();
        let anonymous = SessionStore::new(client(&transport, &MemoryTokenStore::default()));
        assert!(!anonymous.is_authenticated());
        assert_eq!(anonymous.session().phase, AuthPhase::Anonymous);

        let restored = SessionStore::new(client(&transport, &MemoryTokenStore::with_token("tok")));
        assert!(restored.is_authenticated());
        assert_eq!(restored.session().phase, AuthPhase::Authenticated);
    }

    #[test]
    fn test_login_stores_token_and_fetches_user() {
        let transport = FakeTransport::default();
        transport.reply(200, r#"{"access_token": "tok-1", "token_type": "bearer"}"#);
        transport.reply(200, &user_json(42).to_string());
        let tokens = MemoryTokenStore::default();
        let store = SessionStore::new(client(&transport, &tokens));

        block_on(store.login("ada@example.com", "hunter2")).unwrap();

        assert_eq!(tokens.load().as_deref(), Some("tok-1"));
        assert!(store.is_authenticated());
        assert_eq!(store.session().phase, AuthPhase::Authenticated);
        assert_eq!(store.session().credits(), Some(42));
        assert_eq!(transport.requests()[1].bearer.as_deref(), Some("tok-1"));
    }

    #[test]
    fn test_login_rejected_keeps_anonymous() {
        let transport = FakeTransport::default();
        transport.reply(401, r#"{"detail": "Incorrect email or password"}"#);
        let tokens = MemoryTokenStore::default();
        let store = SessionStore::new(client(&transport, &tokens));

        let err = block_on(store.login("ada@example.com", "wrong")).unwrap_err();

        assert_eq!(err.user_message(), "Incorrect email or password");
        assert_eq!(tokens.load(), None);
        assert!(!store.is_authenticated());
        assert_eq!(store.session().phase, AuthPhase::Anonymous);
    }

    #[test]
    fn test_login_without_token_fails() {
        let transport = FakeTransport::default();
        transport.reply(200, r#"{"token_type": "bearer"}"#);
        let store = SessionStore::new(client(&transport, &MemoryTokenStore::default()));

        let err = block_on(store.login("ada@example.com", "hunter2")).unwrap_err();

        assert_eq!(err, ApiError::Unknown("No token received from login".into()));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_failed_user_fetch_keeps_login() {
        let transport = FakeTransport::default();
        transport.reply(200, r#"{"access_token": "tok-1"}"#);
        transport.reply(500, r#"{"detail": "boom"}"#);
        let store = SessionStore::new(client(&transport, &MemoryTokenStore::default()));

        block_on(store.login("ada@example.com", "hunter2")).unwrap();

        assert!(store.is_authenticated());
        assert_eq!(store.session().user, None);
    }

    #[test]
    fn test_fetch_user_unauthorized_logs_out() {
        let transport = FakeTransport::default();
        transport.reply(401, r#"{"detail": "Could not validate credentials"}"#);
        let tokens = MemoryTokenStore::with_token("expired");
        let store = SessionStore::new(client(&transport, &tokens));

        block_on(store.fetch_user());

        assert_eq!(tokens.load(), None);
        assert_eq!(store.session(), Session::default());
    }

    #[test]
    fn test_any_401_drops_the_session() {
        let transport = FakeTransport::default();
        transport.reply(401, r#"{"detail": "Not authenticated"}"#);
        let store = SessionStore::new(client(&transport, &MemoryTokenStore::with_token("tok")));

        let err = block_on(store.api().list_jobs()).unwrap_err();

        assert!(err.is_unauthorized());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_register_then_login() {
        let transport = FakeTransport::default();
        transport.reply(200, &user_json(10).to_string());
        transport.reply(200, r#"{"access_token": "tok-new"}"#);
        transport.reply(200, &user_json(10).to_string());
        let store = SessionStore::new(client(&transport, &MemoryTokenStore::default()));

        block_on(store.register("ada@example.com", "hunter2")).unwrap();

        let urls: Vec<_> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://api.test/api/v1/auth/register",
                "http://api.test/api/v1/auth/login",
                "http://api.test/api/v1/auth/me",
            ]
        );
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_logout_and_listeners() {
        let transport = FakeTransport::default();
        let tokens = MemoryTokenStore::with_token("tok");
        let store = SessionStore::new(client(&transport, &tokens));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |s| sink.borrow_mut().push(s.phase));

        store.logout();

        assert_eq!(tokens.load(), None);
        assert!(!store.is_authenticated());
        assert_eq!(*seen.borrow(), vec![AuthPhase::Anonymous]);
    }
}
