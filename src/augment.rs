use reqwest::Request;
use reqwest::header::{AUTHORIZATION, HeaderValue};

use crate::endpoints::PublicEndpoints;
use crate::errors::Error;
use crate::session::Session;

/// Attaches the session's access token as a bearer credential unless the request targets a
/// public endpoint. Returns whether a credential was attached.
pub fn authorize(
    request: &mut Request,
    session: &Session,
    public: &PublicEndpoints,
) -> Result<bool, Error> {
    if public.is_public(request.url().as_str()) {
        return Ok(false);
    }
    let Some(access) = session.access.as_deref() else {
        return Ok(false);
    };
    let mut value = HeaderValue::from_str(&format!("Bearer {}", access))
        .map_err(|e| Error::Header(format!("access token is not a valid header value: {}", e)))?;
    value.set_sensitive(true);
    request.headers_mut().insert(AUTHORIZATION, value);
    Ok(true)
}
