use std::sync::Arc;

use crate::{
    core::{
        Credential,
        MemoError,
    },
    persistence::KeyValueStore,
};

pub const TOKEN_KEY: &str = "token";
pub const USERNAME_KEY: &str = "username";

/// Token and username kept side by side in persistent storage.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn save(&self, username: &str, token: &str) -> Result<(), MemoError> {
        self.store.set_entries(&[(TOKEN_KEY, token), (USERNAME_KEY, username)])
    }

    /// Returns the stored pair, or `None` when either half is missing or the
    /// storage can't be read.
    pub fn load(&self) -> Option<Credential> {
        let read = || -> Result<(Option<String>, Option<String>), MemoError> {
            Ok((self.store.get(TOKEN_KEY)?, self.store.get(USERNAME_KEY)?))
        };

        match read() {
            Ok((Some(token), Some(username))) if !token.is_empty() => {
                Some(Credential { username, token })
            }
            Ok((None, None)) => None,
            Ok(_) => {
                tracing::debug!("ignoring partial credential pair");
                None
            }
            Err(e) => {
                tracing::warn!("Credential storage unreadable, treating as logged out: {}", e);
                None
            }
        }
    }

    pub fn clear(&self) -> Result<(), MemoError> {
        self.store.remove_entries(&[TOKEN_KEY, USERNAME_KEY])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_save_load_clear() {
        let credentials = CredentialStore::new(Arc::new(MemoryStore::new()));
        assert_eq!(credentials.load(), None);

        credentials.save("anna", "t0k3n").unwrap();
        // idempotent
        credentials.save("anna", "t0k3n").unwrap();
        assert_eq!(
            credentials.load(),
            Some(Credential { username: "anna".to_string(), token: "t0k3n".to_string() })
        );

        credentials.clear().unwrap();
        assert_eq!(credentials.load(), None);
    }

    #[test]
    fn test_partial_pair_is_not_a_session() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "orphan").unwrap();

        let credentials = CredentialStore::new(store);
        assert_eq!(credentials.load(), None);
    }

    #[test]
    fn test_unavailable_storage_reads_as_logged_out() {
        let store = Arc::new(MemoryStore::new());
        let credentials = CredentialStore::new(store.clone());
        credentials.save("anna", "t0k3n").unwrap();

        store.set_available(false);
        assert_eq!(credentials.load(), None);
    }
}
