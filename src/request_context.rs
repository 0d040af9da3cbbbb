use reqwest::{Method, Request, Url};
use uuid::Uuid;

/// Retries allowed after a refreshed credential. A request is re-issued at most once.
pub const MAX_RETRIES: u8 = 1;

/// Per-request metadata that travels with an outbound call across its retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestMeta {
    id: Uuid,
    attempt: u8,
}

impl RequestMeta {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            attempt: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Zero for the first dispatch, incremented on every retry.
    pub fn attempt(&self) -> u8 {
        self.attempt
    }

    pub fn can_retry(&self) -> bool {
        self.attempt < MAX_RETRIES
    }

    fn next_attempt(self) -> Self {
        Self {
            id: self.id,
            attempt: self.attempt.saturating_add(1),
        }
    }
}

impl Default for RequestMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// An outbound HTTP call plus the metadata the interceptor needs to drive it.
#[derive(Debug)]
pub struct ApiRequest {
    inner: Request,
    meta: RequestMeta,
}

impl ApiRequest {
    pub fn new(inner: Request) -> Self {
        Self {
            inner,
            meta: RequestMeta::new(),
        }
    }

    pub fn meta(&self) -> RequestMeta {
        self.meta
    }

    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    pub fn url(&self) -> &Url {
        self.inner.url()
    }

    /// Copies the request for a later retry. Streaming bodies cannot be copied.
    pub fn try_clone(&self) -> Option<Self> {
        self.inner.try_clone().map(|inner| Self {
            inner,
            meta: self.meta,
        })
    }

    /// Marks this copy as the retry of its original dispatch.
    pub fn into_retry(self) -> Self {
        Self {
            inner: self.inner,
            meta: self.meta.next_attempt(),
        }
    }

    pub(crate) fn inner_mut(&mut self) -> &mut Request {
        &mut self.inner
    }

    pub(crate) fn into_inner(self) -> Request {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ApiRequest {
        ApiRequest::new(Request::new(
            Method::GET,
            Url::parse("http://localhost/api/students/").unwrap(),
        ))
    }

    #[test]
    fn fresh_request_may_retry_once() {
        let req = request();
        assert_eq!(req.meta().attempt(), 0);
        assert!(req.meta().can_retry());

        let retry = req.into_retry();
        assert_eq!(retry.meta().attempt(), 1);
        assert!(!retry.meta().can_retry());
    }

    #[test]
    fn clone_keeps_request_identity() {
        let req = request();
        let copy = req.try_clone().expect("GET without body is cloneable");
        assert_eq!(copy.meta(), req.meta());
        assert_eq!(copy.url(), req.url());

        let retry = copy.into_retry();
        assert_eq!(retry.meta().id(), req.meta().id());
        assert_ne!(retry.meta(), req.meta());
    }
}
