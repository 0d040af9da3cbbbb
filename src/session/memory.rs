use std::sync::{PoisonError, RwLock};

use crate::errors::Error;

use super::{Session, TokenStore};

/// Process-local token store. Tokens are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    session: RwLock<Session>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(session),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Session {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, access: Option<String>, refresh: Option<String>) -> Result<(), Error> {
        self.session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(access, refresh);
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Session::default();
        Ok(())
    }
}
