use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("transport error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("http error {0}: {1}")]
    Http(StatusCode, String),
    #[error("unauthorized: {0}")]
    Auth(String),
    #[error("token refresh failed: {0}")]
    Refresh(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid header: {0}")]
    Header(String),
}

impl Error {
    /// Status code carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Http(status, _) => Some(*status),
            Error::Auth(_) => Some(StatusCode::UNAUTHORIZED),
            Error::Reqwest(err) => err.status(),
            _ => None,
        }
    }
}
