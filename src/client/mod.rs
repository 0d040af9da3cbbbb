use std::sync::Arc;

use reqwest::Client;

use crate::config::Config;
use crate::observer::SessionObserver;
use crate::session::TokenStore;

mod impls;

/// HTTP client for the school administration API.
///
/// Cloning is cheap; clones share the token store, so a refresh performed by one clone
/// is seen by every other.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: Arc<Config>,
    session: Arc<dyn TokenStore>,
    observer: Arc<dyn SessionObserver>,
}
