//! Signed-in user and bearer token, persisted between runs.
//!
//! `AuthContext` is an explicit object: build it once with `hydrate`, pass it
//! by reference to whatever needs the current user.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{AuthResponse, User};

/// The persisted sign-in record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAuth {
    pub user: User,
    pub token: String,
}

impl From<AuthResponse> for StoredAuth {
    fn from(response: AuthResponse) -> Self {
        Self {
            user: response.user,
            token: response.token,
        }
    }
}

/// Where the sign-in record lives.
///
/// Records are opaque strings here; `AuthContext` owns the format.
pub trait CredentialStore {
    /// Read the raw record, `None` if nothing is stored.
    fn read(&self) -> Result<Option<String>>;

    /// Replace the stored record.
    fn write(&self, record: &str) -> Result<()>;

    /// Delete the stored record. Deleting nothing is not an error.
    fn remove(&self) -> Result<()>;
}

/// Record kept in a JSON file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/survey-client/auth.json`
    pub fn default_location() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("survey-client").join("auth.json"))
    }

    /// Store at the default location.
    pub fn open_default() -> Result<Self> {
        let path = Self::default_location()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read auth file '{}'", self.path.display()))?;
        Ok(Some(contents))
    }

    fn write(&self, record: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create auth directory '{}'", parent.display())
            })?;
        }
        fs::write(&self.path, record)
            .with_context(|| format!("Failed to write auth file '{}'", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).with_context(
                || format!("Failed to set permissions on '{}'", self.path.display()),
            )?;
        }
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to remove auth file '{}'", self.path.display())),
        }
    }
}

/// Record kept in memory.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    record: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `record` already stored.
    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            record: Mutex::new(Some(record.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn read(&self) -> Result<Option<String>> {
        Ok(self
            .record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn write(&self, record: &str) -> Result<()> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = Some(record.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        self.record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

/// Who is signed in, kept in step with a [`CredentialStore`].
#[derive(Debug)]
pub struct AuthContext<S> {
    store: S,
    current: Option<StoredAuth>,
}

impl<S: CredentialStore> AuthContext<S> {
    /// Load the persisted record once.
    ///
    /// A record that does not parse is removed and the context starts signed
    /// out. Read failures are returned.
    pub fn hydrate(store: S) -> Result<Self> {
        let current = match store.read()? {
            None => None,
            Some(raw) => match serde_json::from_str::<StoredAuth>(&raw) {
                Ok(auth) => {
                    debug!(user = %auth.user.username, "restored sign-in");
                    Some(auth)
                }
                Err(err) => {
                    warn!(error = %err, "discarding corrupt sign-in record");
                    store.remove()?;
                    None
                }
            },
        };
        Ok(Self { store, current })
    }

    /// Record a successful login or registration.
    pub fn sign_in(&mut self, response: AuthResponse) -> Result<&User> {
        let auth = StoredAuth::from(response);
        let record = serde_json::to_string(&auth).context("Failed to encode sign-in record")?;
        self.store.write(&record)?;
        debug!(user = %auth.user.username, "signed in");
        Ok(&self.current.insert(auth).user)
    }

    /// Forget the signed-in user, in memory and in the store.
    pub fn logout(&mut self) -> Result<()> {
        self.store.remove()?;
        if let Some(auth) = self.current.take() {
            debug!(user = %auth.user.username, "signed out");
        }
        Ok(())
    }

    pub fn user(&self) -> Option<&User> {
        self.current.as_ref().map(|a| &a.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|a| a.token.as_str())
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user().map(|u| u.id.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
