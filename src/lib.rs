//! Async client for the school administration REST API.
//!
//! Every protected call carries the stored access token as a bearer credential. A 401 on a
//! protected call triggers one refresh-token exchange and one retry; if the exchange fails
//! the stored session is cleared and the [`SessionObserver`] is told to send the user back
//! to the login route.

mod augment;
mod client;
mod config;
mod endpoints;
mod errors;
mod intercept;
mod observer;
mod request_context;
mod resources;
mod session;
mod telemetry;
mod types;

pub use augment::authorize;
pub use client::ApiClient;
pub use config::{Config, DEFAULT_BASE_URL, DEFAULT_LOGIN_ROUTE};
pub use endpoints::{LOGIN_PATH, PublicEndpoints, REFRESH_PATH, REGISTER_PATH};
pub use errors::Error;
pub use intercept::{AttemptOutcome, AttemptState};
pub use observer::{NoopObserver, SessionObserver};
pub use request_context::{ApiRequest, MAX_RETRIES, RequestMeta};
pub use resources::{Resource, ResourceClient};
pub use session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
pub use types::TokenPair;

#[cfg(test)]
mod tests;
