#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use schooladmin_client::{ApiClient, Config, MemoryTokenStore, Session, SessionObserver, TokenStore};

pub fn config(server_uri: &str) -> Config {
    Config::from_values(format!("{}/api", server_uri), None, None, None)
}

pub fn client(
    server_uri: &str,
    access: Option<&str>,
    refresh: Option<&str>,
) -> (ApiClient, Arc<MemoryTokenStore>) {
    client_with_config(config(server_uri), access, refresh)
}

pub fn client_with_config(
    config: Config,
    access: Option<&str>,
    refresh: Option<&str>,
) -> (ApiClient, Arc<MemoryTokenStore>) {
    let store = Arc::new(MemoryTokenStore::with_session(Session::new(
        access.map(str::to_string),
        refresh.map(str::to_string),
    )));
    let shared: Arc<dyn TokenStore> = store.clone();
    let client = ApiClient::new(config, shared).expect("client");
    (client, store)
}

/// Records every login route the client redirects to.
#[derive(Default)]
pub struct RecordingObserver {
    pub routes: Mutex<Vec<String>>,
}

impl SessionObserver for RecordingObserver {
    fn session_expired(&self, login_route: &str) {
        self.routes.lock().unwrap().push(login_route.to_string());
    }
}

pub fn bearer_of(req: &wiremock::Request) -> Option<String> {
    req.headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}
