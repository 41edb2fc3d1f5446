//! Process-wide session token storage.
//!
//! The token is issued server-side after OTP verification; the console only
//! stores it opaquely. Access is always explicit (`set`/`get`/`clear`), and
//! `clear` is the logout teardown.

use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        let mut guard = self.inner.write().expect("token store lock poisoned");
        *guard = Some(token.into());
    }

    pub fn get(&self) -> Option<String> {
        self.inner
            .read()
            .expect("token store lock poisoned")
            .clone()
    }

    pub fn clear(&self) {
        let mut guard = self.inner.write().expect("token store lock poisoned");
        *guard = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }
}
