use serde::Deserialize;

pub const REGISTER_PATH: &str = "auth/register/";
pub const LOGIN_PATH: &str = "auth/token/";
pub const REFRESH_PATH: &str = "auth/token/refresh/";

/// Ordered URL substrings that must never carry a bearer credential and must never
/// trigger a refresh cycle. The refresh endpoint has to be listed here or a failing
/// refresh would recurse.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct PublicEndpoints(Vec<String>);

impl PublicEndpoints {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(patterns.into_iter().map(Into::into).collect())
    }

    pub fn is_public(&self, url: &str) -> bool {
        self.0.iter().any(|pattern| url.contains(pattern.as_str()))
    }

    pub fn patterns(&self) -> &[String] {
        &self.0
    }
}

impl Default for PublicEndpoints {
    fn default() -> Self {
        Self::new([REGISTER_PATH, LOGIN_PATH, REFRESH_PATH].map(|p| format!("/{p}")))
    }
}
