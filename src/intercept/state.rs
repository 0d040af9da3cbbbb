use std::fmt;

use reqwest::StatusCode;
use tracing::debug;

use crate::request_context::RequestMeta;

/// Lifecycle of one logical request across its (at most one) retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Initial,
    /// Any response other than 401. Terminal.
    Success,
    /// 401 on a protected request that may still be retried.
    Unauthorized,
    Refreshing,
    /// The refreshed credential was obtained and the request re-issued.
    Retried,
    RefreshFailed,
    /// Tokens were cleared after a failed refresh. Terminal.
    SessionCleared,
    /// 401 on a public or already-retried request. Terminal.
    Rejected,
}

impl AttemptState {
    /// Decides where a response moves the request. Only `Success`, `Unauthorized` and
    /// `Rejected` can come out of here.
    pub fn on_response(status: StatusCode, meta: RequestMeta, public: bool) -> Self {
        if status != StatusCode::UNAUTHORIZED {
            AttemptState::Success
        } else if public || !meta.can_retry() {
            AttemptState::Rejected
        } else {
            AttemptState::Unauthorized
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AttemptState::Success | AttemptState::SessionCleared | AttemptState::Rejected
        )
    }
}

impl fmt::Display for AttemptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttemptState::Initial => "initial",
            AttemptState::Success => "success",
            AttemptState::Unauthorized => "unauthorized",
            AttemptState::Refreshing => "refreshing",
            AttemptState::Retried => "retried",
            AttemptState::RefreshFailed => "refresh_failed",
            AttemptState::SessionCleared => "session_cleared",
            AttemptState::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Tracks the current state of a request and logs every transition.
#[derive(Debug)]
pub struct Attempt {
    meta: RequestMeta,
    state: AttemptState,
}

impl Attempt {
    pub fn new(meta: RequestMeta) -> Self {
        Self {
            meta,
            state: AttemptState::Initial,
        }
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn meta(&self) -> RequestMeta {
        self.meta
    }

    pub fn advance(&mut self, next: AttemptState) {
        debug!(
            request_id = %self.meta.id(),
            attempt = self.meta.attempt(),
            from = %self.state,
            to = %next,
            "attempt.transition"
        );
        self.state = next;
    }

    /// Carries the attempt over to the retried request metadata.
    pub fn retry_with(&mut self, meta: RequestMeta) {
        self.meta = meta;
        self.advance(AttemptState::Retried);
    }
}

#[cfg(test)]
mod tests {
    use reqwest::{Method, Request, Url};

    use super::*;
    use crate::request_context::ApiRequest;

    fn first_and_retry() -> (RequestMeta, RequestMeta) {
        let req = ApiRequest::new(Request::new(
            Method::GET,
            Url::parse("http://localhost/api/students/").unwrap(),
        ));
        let first = req.meta();
        (first, req.into_retry().meta())
    }

    #[test]
    fn non_401_is_success_even_when_error() {
        let (first, retry) = first_and_retry();
        for status in [
            StatusCode::OK,
            StatusCode::NO_CONTENT,
            StatusCode::FORBIDDEN,
            StatusCode::INTERNAL_SERVER_ERROR,
        ] {
            assert_eq!(
                AttemptState::on_response(status, first, false),
                AttemptState::Success
            );
            assert_eq!(
                AttemptState::on_response(status, retry, true),
                AttemptState::Success
            );
        }
    }

    #[test]
    fn first_protected_401_triggers_refresh() {
        let (first, _) = first_and_retry();
        assert_eq!(
            AttemptState::on_response(StatusCode::UNAUTHORIZED, first, false),
            AttemptState::Unauthorized
        );
    }

    #[test]
    fn public_or_retried_401_is_rejected() {
        let (first, retry) = first_and_retry();
        assert_eq!(
            AttemptState::on_response(StatusCode::UNAUTHORIZED, first, true),
            AttemptState::Rejected
        );
        assert_eq!(
            AttemptState::on_response(StatusCode::UNAUTHORIZED, retry, false),
            AttemptState::Rejected
        );
    }

    #[test]
    fn terminal_states() {
        assert!(AttemptState::Success.is_terminal());
        assert!(AttemptState::Rejected.is_terminal());
        assert!(AttemptState::SessionCleared.is_terminal());
        assert!(!AttemptState::Unauthorized.is_terminal());
        assert!(!AttemptState::Refreshing.is_terminal());
        assert!(!AttemptState::Retried.is_terminal());
    }
}
