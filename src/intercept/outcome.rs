use std::time::Duration;

use reqwest::Method;
use tracing::Level;
use tracing::event;
use uuid::Uuid;

use super::AttemptState;

#[derive(Debug, Clone)]
pub struct AttemptOutcome {
    pub request_id: Uuid,
    pub method: Method,
    pub path: String,
    pub attempts: u8,
    pub final_state: AttemptState,
    pub elapsed: Duration,
}

impl AttemptOutcome {
    pub fn log(&self) {
        event!(
            Level::INFO,
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
            attempts = self.attempts,
            final_state = %self.final_state,
            elapsed_ms = self.elapsed.as_millis() as u64,
            "request.outcome"
        );
    }
}
