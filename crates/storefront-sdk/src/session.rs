//! Session context: where the bearer credential lives and what happens when
//! the server rejects it.
//!
//! The client never owns the credential. It reads it from the injected
//! [`CredentialStore`] before every request and, on a 401, asks the
//! [`Session`] to tear itself down.

use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Key under which the token is persisted by file-backed stores.
pub const TOKEN_KEY: &str = "authToken";

/// Storage for the bearer credential.
///
/// Implementations must be cheap to read and must not fail loudly: a store
/// that cannot produce a token simply reports none.
pub trait CredentialStore: Send + Sync + fmt::Debug {
    /// Read the current token, if any.
    fn token(&self) -> Option<SecretString>;

    /// Replace the stored token.
    fn set_token(&self, token: SecretString);

    /// Remove the stored token. Clearing an empty store is a no-op.
    fn clear(&self);
}

/// Hook for sending the user to the login screen.
pub trait Navigator: Send + Sync + fmt::Debug {
    /// Navigate to `path`.
    fn navigate(&self, path: &str);
}

/// Credential store held in process memory.
#[derive(Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<SecretString>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(SecretString::new(token.into()))),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn token(&self) -> Option<SecretString> {
        self.token.read().clone()
    }

    fn set_token(&self, token: SecretString) {
        *self.token.write() = Some(token);
    }

    fn clear(&self) {
        *self.token.write() = None;
    }
}

impl fmt::Debug for MemoryCredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCredentialStore")
            .field("has_token", &self.token.read().is_some())
            .finish()
    }
}

/// Credential store persisted to a single file.
///
/// The file holds the raw token and nothing else. It is read once, on first
/// use; later reads are served from memory and kept in step by
/// [`set_token`](CredentialStore::set_token) and
/// [`clear`](CredentialStore::clear), so the request path does no file I/O
/// after the first call. Read errors other than a missing file are logged and
/// treated as "no token".
pub struct FileCredentialStore {
    path: PathBuf,
    cache: RwLock<Option<Option<SecretString>>>,
}

impl FileCredentialStore {
    /// Create a store backed by `path`. The file does not need to exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    /// Create a store named [`TOKEN_KEY`] inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(TOKEN_KEY))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `token`, reporting a failed write to the caller.
    ///
    /// The in-memory copy is only updated once the file is written.
    pub fn try_set(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }
        *self.cache.write() = Some(Some(SecretString::new(token.to_string())));
        Ok(())
    }

    fn load(&self) -> Option<SecretString> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| SecretString::new(token.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read credential");
                None
            }
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn token(&self) -> Option<SecretString> {
        if let Some(cached) = self.cache.read().as_ref() {
            return cached.clone();
        }
        let mut cache = self.cache.write();
        cache.get_or_insert_with(|| self.load()).clone()
    }

    fn set_token(&self, token: SecretString) {
        if let Err(e) = self.try_set(token.expose_secret()) {
            warn!(path = %self.path.display(), error = %e, "Failed to persist credential");
            *self.cache.write() = Some(Some(token));
        }
    }

    fn clear(&self) {
        *self.cache.write() = Some(None);
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to remove credential");
            }
        }
    }
}

impl fmt::Debug for FileCredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileCredentialStore")
            .field("path", &self.path)
            .finish()
    }
}

/// Store for headless contexts: never holds a token.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCredentialStore;

impl CredentialStore for NoopCredentialStore {
    fn token(&self) -> Option<SecretString> {
        None
    }

    fn set_token(&self, _token: SecretString) {}

    fn clear(&self) {}
}

/// Navigator for headless contexts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _path: &str) {}
}

/// The session context injected into a [`Client`](crate::Client).
#[derive(Debug, Clone)]
pub struct Session {
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
}

impl Session {
    /// Create a session from a store and a navigator.
    pub fn new(store: Arc<dyn CredentialStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    /// A session with no storage and no navigation.
    pub fn headless() -> Self {
        Self::new(Arc::new(NoopCredentialStore), Arc::new(NoopNavigator))
    }

    /// An in-memory session without navigation.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCredentialStore::new()), Arc::new(NoopNavigator))
    }

    /// The underlying credential store.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Check whether a credential is currently stored.
    pub fn is_authenticated(&self) -> bool {
        self.store.token().is_some()
    }

    /// Read the credential for an outgoing request.
    pub fn bearer(&self) -> Option<SecretString> {
        self.store.token()
    }

    /// Store a credential obtained from a successful login.
    pub fn sign_in(&self, token: impl Into<String>) {
        self.store.set_token(SecretString::new(token.into()));
        debug!("Stored session credential");
    }

    /// Forget the credential without navigating.
    pub fn sign_out(&self) {
        self.store.clear();
        debug!("Cleared session credential");
    }

    /// Clear the credential and navigate to `login_path`.
    ///
    /// Safe to call repeatedly and from concurrent tasks.
    pub fn teardown(&self, login_path: &str) {
        warn!(login_path, "Authentication rejected, tearing down session");
        self.store.clear();
        self.navigator.navigate(login_path);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::headless()
    }
}
