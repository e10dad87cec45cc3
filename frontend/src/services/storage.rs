//! Bearer token persistence.
//!
//! The token is the only client-side state that survives a reload. In the
//! browser it lives in `localStorage`; outside of one (tests, native builds)
//! [`LocalTokenStore`] does nothing and [`MemoryTokenStore`] stands in.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::TOKEN_STORAGE_KEY;

/// Where the bearer token is kept between requests.
pub trait TokenStore {
    /// Current token, `None` when absent or empty.
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// `localStorage`-backed token store.
#[derive(Debug, Clone, Copy)]
pub struct LocalTokenStore {
    key: &'static str,
}

impl Default for LocalTokenStore {
    fn default() -> Self {
        Self {
            key: TOKEN_STORAGE_KEY,
        }
    }
}

impl LocalTokenStore {
    #[cfg(target_arch = "wasm32")]
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|window| window.local_storage().ok().flatten())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn storage() -> Option<web_sys::Storage> {
        None
    }
}

impl TokenStore for LocalTokenStore {
    fn load(&self) -> Option<String> {
        Self::storage()?
            .get_item(self.key)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
    }

    fn save(&self, token: &str) {
        let Some(storage) = Self::storage() else {
            return;
        };
        if let Err(e) = storage.set_item(self.key, token) {
            log::warn!("Could not persist token: {:?}", e);
        }
    }

    fn clear(&self) {
        let Some(storage) = Self::storage() else {
            return;
        };
        if let Err(e) = storage.remove_item(self.key) {
            log::warn!("Could not remove token: {:?}", e);
        }
    }
}

/// In-memory token store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    token: Rc<RefCell<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        let store = Self::default();
        store.save(token);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.borrow().clone().filter(|token| !token.is_empty())
    }

    fn save(&self, token: &str) {
        *self.token.borrow_mut() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.borrow_mut() = None;
    }
}
