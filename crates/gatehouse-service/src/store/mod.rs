use crate::errors::GateError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;

/// A stored credential record.
///
/// `secret` holds either the plaintext secret or a bcrypt hash of it,
/// depending on the configured secret scheme. Either way it must not leak
/// into logs, so Debug redacts it.
#[derive(Clone)]
pub struct Credential {
    pub username: String,
    pub secret: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Read-side lookup of credentials by username.
///
/// The authenticator only ever needs point lookups, so that is the whole
/// contract. Implementations decide where the records live.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetch the credential for `username`, or `None` if unknown.
    async fn lookup(&self, username: &str) -> Result<Option<Credential>, GateError>;
}

/// In-memory credential store backed by a `HashMap`.
///
/// Populated once at startup from configuration and never mutated after,
/// so lookups need no locking.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    users: HashMap<String, Credential>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an iterator of credentials. Later duplicates of a
    /// username replace earlier ones.
    pub fn with_users(users: impl IntoIterator<Item = Credential>) -> Self {
        let mut store = Self::new();
        for credential in users {
            store.insert(credential);
        }
        store
    }

    /// Insert a credential, replacing any existing entry for its username.
    pub fn insert(&mut self, credential: Credential) {
        self.users.insert(credential.username.clone(), credential);
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn lookup(&self, username: &str) -> Result<Option<Credential>, GateError> {
        Ok(self.users.get(username).cloned())
    }
}

/// Test doubles for the credential store.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store whose every lookup fails, for exercising 500 paths.
    #[derive(Debug, Default)]
    pub struct FailingStore;

    #[async_trait]
    impl CredentialStore for FailingStore {
        async fn lookup(&self, _username: &str) -> Result<Option<Credential>, GateError> {
            Err(GateError::Store("lookup failed".to_string()))
        }
    }

    /// Store that counts lookups while delegating to an in-memory store.
    #[derive(Debug)]
    pub struct RecordingStore {
        inner: MemoryCredentialStore,
        lookups: AtomicUsize,
    }

    impl RecordingStore {
        pub fn new(inner: MemoryCredentialStore) -> Self {
            Self {
                inner,
                lookups: AtomicUsize::new(0),
            }
        }

        pub fn lookup_count(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CredentialStore for RecordingStore {
        async fn lookup(&self, username: &str) -> Result<Option<Credential>, GateError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.lookup(username).await
        }
    }
}
