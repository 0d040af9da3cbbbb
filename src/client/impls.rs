use std::sync::Arc;
use std::time::SystemTime;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::{
    ApiClient,
    augment,
    config::Config,
    endpoints::{LOGIN_PATH, REFRESH_PATH, REGISTER_PATH},
    errors::Error,
    intercept::{Attempt, AttemptOutcome, AttemptState},
    observer::{NoopObserver, SessionObserver},
    request_context::ApiRequest,
    resources::{Resource, ResourceClient},
    session::{FileTokenStore, MemoryTokenStore, Session, TokenStore},
    telemetry::refresh::RefreshTelemetry,
    types::{LoginRequest, RefreshRequest, RefreshResponse, TokenPair},
};

impl ApiClient {
    /// Create a client around an explicitly provided token store.
    /// # Arguments
    /// * `config` - Explicit configuration, typically loaded via `Config::from_file` or `Config::from_env`.
    /// * `session` - Token store shared by every request this client (and its clones) sends.
    pub fn new(config: Config, session: Arc<dyn TokenStore>) -> Result<Self, Error> {
        config.validate()?;
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
            session,
            observer: Arc::new(NoopObserver),
        })
    }

    /// Create a client whose token store is picked from the configuration: a file store
    /// when `session_path` is set, otherwise an in-memory store.
    pub fn from_config(config: Config) -> Result<Self, Error> {
        let session: Arc<dyn TokenStore> = match config.session_path.as_ref() {
            Some(path) => Arc::new(FileTokenStore::open(path)?),
            None => Arc::new(MemoryTokenStore::new()),
        };
        Self::new(config, session)
    }

    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Snapshot of the stored tokens.
    pub fn session(&self) -> Session {
        self.session.get()
    }

    pub fn store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.session)
    }

    pub fn resource(&self, resource: Resource) -> ResourceClient<'_> {
        ResourceClient::new(self, resource)
    }

    /// Starts a request against an API-relative path.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, Error> {
        Ok(self.http.request(method, self.config.endpoint(path)?))
    }

    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, Error> {
        self.execute(ApiRequest::new(builder.build()?)).await
    }

    /// Sends a request, running at most one refresh-and-retry cycle on 401.
    ///
    /// Non-2xx responses other than a handled 401 come back as `Error::Http`; a 401 that
    /// cannot be recovered comes back as `Error::Auth`.
    pub async fn execute(&self, request: ApiRequest) -> Result<Response, Error> {
        let start = Instant::now();
        let method = request.method().clone();
        let path = request.url().path().to_string();
        let public = self
            .config
            .public_endpoints
            .is_public(request.url().as_str());
        let mut attempt = Attempt::new(request.meta());
        let mut attempts: u8 = 0;
        let mut pending = request;

        let result = loop {
            let retry = pending.try_clone();
            attempts += 1;
            let response = match self.dispatch(pending).await {
                Ok(response) => response,
                Err(err) => break Err(err),
            };

            let next = AttemptState::on_response(response.status(), attempt.meta(), public);
            attempt.advance(next);
            match next {
                AttemptState::Success => break check_status(response).await,
                AttemptState::Unauthorized => {}
                _ => break Err(unauthorized(&method, &path, response).await),
            }

            let original = unauthorized(&method, &path, response).await;
            warn!(
                request_id = %attempt.meta().id(),
                "{} {} returned 401; refreshing access token",
                method,
                path
            );
            attempt.advance(AttemptState::Refreshing);
            let telemetry = RefreshTelemetry::new(format!("{} {}", method, path));
            if self.refresh_access_token(&telemetry).await.is_err() {
                attempt.advance(AttemptState::RefreshFailed);
                self.tear_down_session(&telemetry);
                attempt.advance(AttemptState::SessionCleared);
                break Err(original);
            }

            // Streaming bodies cannot be re-sent; the new token is kept for the next call.
            let Some(retry) = retry else {
                warn!(
                    request_id = %attempt.meta().id(),
                    "request body cannot be replayed; returning original 401"
                );
                attempt.advance(AttemptState::Rejected);
                break Err(original);
            };
            let retry = retry.into_retry();
            attempt.retry_with(retry.meta());
            pending = retry;
        };

        AttemptOutcome {
            request_id: attempt.meta().id(),
            method,
            path,
            attempts,
            final_state: attempt.state(),
            elapsed: start.elapsed(),
        }
        .log();
        result
    }

    async fn dispatch(&self, mut request: ApiRequest) -> Result<Response, Error> {
        let session = self.session.get();
        let bearer = augment::authorize(
            request.inner_mut(),
            &session,
            &self.config.public_endpoints,
        )?;
        debug!(
            request_id = %request.meta().id(),
            attempt = request.meta().attempt(),
            method = %request.method(),
            url = %request.url(),
            bearer,
            "request.dispatch"
        );
        Ok(self.http.execute(request.into_inner()).await?)
    }

    /// Exchanges the stored refresh token for a new access token without tearing down
    /// the session on failure.
    pub async fn refresh_session(&self) -> Result<String, Error> {
        self.refresh_access_token(&RefreshTelemetry::new("refresh_session"))
            .await
    }

    async fn refresh_access_token(&self, telemetry: &RefreshTelemetry) -> Result<String, Error> {
        let Some(refresh) = self.session.get().refresh else {
            let err = Error::Refresh("no refresh token stored".to_string());
            telemetry.emit_skipped(&err);
            return Err(err);
        };
        telemetry.emit_start(SystemTime::now());
        match self.exchange_refresh_token(&refresh).await {
            Ok(access) => {
                telemetry.emit_success(SystemTime::now());
                Ok(access)
            }
            Err(err) => {
                telemetry.emit_failure(&err, SystemTime::now());
                Err(err)
            }
        }
    }

    async fn exchange_refresh_token(&self, refresh: &str) -> Result<String, Error> {
        let url = self.config.endpoint(REFRESH_PATH)?;
        let resp = self
            .http
            .post(url)
            .json(&RefreshRequest { refresh })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Refresh(format!("{}: {}", status, body)));
        }
        let RefreshResponse { access } = resp.json().await?;
        self.session.set(Some(access.clone()), None)?;
        info!("access token refreshed (len={})", access.len());
        Ok(access)
    }

    fn tear_down_session(&self, telemetry: &RefreshTelemetry) {
        if let Err(err) = self.session.clear() {
            error!(error = %err, "failed to clear session tokens");
        }
        warn!(
            refresh_attempt = %telemetry.attempt_id(),
            login_route = %self.config.login_route,
            "session.expired"
        );
        self.observer.session_expired(&self.config.login_route);
    }

    /// Obtains a token pair for the given credentials and stores both tokens.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, Error> {
        let builder = self
            .request(Method::POST, LOGIN_PATH)?
            .json(&LoginRequest { username, password });
        let pair: TokenPair = self.send(builder).await?.json().await?;
        self.session
            .set(Some(pair.access.clone()), Some(pair.refresh.clone()))?;
        info!("logged in as '{}'", username);
        Ok(pair)
    }

    pub async fn register<B, T>(&self, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.post_json(REGISTER_PATH, body).await
    }

    pub fn logout(&self) -> Result<(), Error> {
        self.session.clear()?;
        info!("logged out");
        Ok(())
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.get_json_with_query(path, &[]).await
    }

    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        let builder = self.request(Method::GET, path)?.query(query);
        Ok(self.send(builder).await?.json().await?)
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path)?.json(body);
        Ok(self.send(builder).await?.json().await?)
    }

    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PATCH, path)?.json(body);
        Ok(self.send(builder).await?.json().await?)
    }

    pub async fn delete(&self, path: &str) -> Result<(), Error> {
        let builder = self.request(Method::DELETE, path)?;
        self.send(builder).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    error!("request failed: status={} body='{}'", status, body);
    Err(Error::Http(status, body))
}

async fn unauthorized(method: &Method, path: &str, response: Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Error::Auth(format!("{} {} returned {}: {}", method, path, status, body))
}
