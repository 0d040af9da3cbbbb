mod file;
mod memory;

use serde::{Deserialize, Serialize};

use crate::errors::Error;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

/// The pair of tokens representing an authenticated client.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

impl Session {
    pub fn new(access: Option<String>, refresh: Option<String>) -> Self {
        Self { access, refresh }
    }

    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none()
    }

    /// Overwrites the provided values, leaving `None` arguments untouched.
    pub(crate) fn apply(&mut self, access: Option<String>, refresh: Option<String>) {
        if let Some(access) = access {
            self.access = Some(access);
        }
        if let Some(refresh) = refresh {
            self.refresh = Some(refresh);
        }
    }
}

/// Opaque storage for the session tokens, shared by every in-flight request.
///
/// Implementations never inspect token contents. A successful `set` or `clear` must be
/// visible to the next `get` from any task holding the same store.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Session;

    fn set(&self, access: Option<String>, refresh: Option<String>) -> Result<(), Error>;

    fn clear(&self) -> Result<(), Error>;
}
