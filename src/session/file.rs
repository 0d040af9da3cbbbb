use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::Error;

use super::{Session, TokenStore};

/// On-disk layout of a persisted session.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct PersistedSession {
    #[serde(flatten)]
    session: Session,
    #[serde(default)]
    updated_at: Option<Timestamp>,
}

/// Token store backed by a JSON file. Every write goes to disk before returning, so
/// tokens survive a restart of the client.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    cached: RwLock<Session>,
}

impl FileTokenStore {
    /// Opens the store at `path`, loading any session persisted by an earlier run.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let session = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str::<PersistedSession>(&contents)?.session,
            Err(err) if err.kind() == ErrorKind::NotFound => Session::default(),
            Err(err) => return Err(err.into()),
        };
        debug!(path = %path.display(), restored = !session.is_empty(), "session.store.open");
        Ok(Self {
            path,
            cached: RwLock::new(session),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, session: &Session) -> Result<(), Error> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let record = PersistedSession {
            session: session.clone(),
            updated_at: Some(Timestamp::now()),
        };
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&record)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Session {
        self.cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, access: Option<String>, refresh: Option<String>) -> Result<(), Error> {
        let mut cached = self.cached.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = cached.clone();
        next.apply(access, refresh);
        self.persist(&next)?;
        *cached = next;
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        let mut cached = self.cached.write().unwrap_or_else(PoisonError::into_inner);
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        *cached = Session::default();
        Ok(())
    }
}
