//! Client layer: the login/send state machine on top of an [`HttpTransport`].

mod http;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, trace};
use url::Url;

use crate::domain::{
    Credentials, PortalConfig, Session, SmsRequest, SuccessMarker, ValidationError,
};
use crate::transport::{self, ScrapeError};

pub use http::{BoxFuture, HttpResponse, HttpTransport, ReqwestTransport, TransportError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
/// Why a login attempt did not produce a usable session.
pub enum LoginError {
    /// The login response did not carry the expected session cookie (usually
    /// wrong credentials).
    #[error("session cookie {name} was not set by the login response")]
    SessionCookieMissing { name: String },

    /// The home page has no input carrying the anti-forgery token.
    #[error("input {field}: not found")]
    TokenNotFound { field: &'static str },

    /// The token input exists but has no `value` attribute.
    #[error("input {field}: value attribute not found")]
    TokenValueMissing { field: &'static str },
}

impl LoginError {
    fn from_scrape(err: ScrapeError) -> Self {
        match err {
            ScrapeError::NotFound { field } => Self::TokenNotFound { field },
            ScrapeError::ValueMissing { field } => Self::TokenValueMissing { field },
        }
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`LabasClient`].
///
/// Login failures, transport failures and unconfirmed sends are separate
/// variants so callers can tell "could not authenticate" apart from
/// "authenticated but the portal never confirmed the message".
pub enum LabasError {
    /// Logging in to the portal failed. Not retried.
    #[error("login failed: {0}")]
    Login(#[from] LoginError),

    /// HTTP client / transport failure (DNS, TLS, timeouts, etc). Not retried.
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    /// Every attempt was submitted but none of the responses contained the
    /// success marker.
    #[error("sms was not confirmed by the portal after {attempts} attempt(s)")]
    SendExhausted { attempts: u32 },

    /// The deadline given to [`LabasClient::send_sms_with_timeout`] elapsed.
    #[error("sms send did not finish within {0:?}")]
    Timeout(Duration),

    /// A configured URL could not be parsed.
    #[error("invalid portal url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A configured value was rejected.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Clone)]
/// Builder for [`LabasClient`].
///
/// Use this when you need to point the client at another portal deployment,
/// change the retry budget, or tune the HTTP stack.
pub struct LabasClientBuilder {
    credentials: Credentials,
    config: PortalConfig,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    proxy: Option<reqwest::Proxy>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl LabasClientBuilder {
    /// Create a builder with the live portal's settings.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            config: PortalConfig::default(),
            timeout: None,
            user_agent: None,
            proxy: None,
            transport: None,
        }
    }

    /// Replace all portal settings at once, e.g. with a deserialized config.
    pub fn config(mut self, config: PortalConfig) -> Self {
        self.config = config;
        self
    }

    /// Portal address; the home page and the SMS form live here.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Login form action, appended to the base URL (a path prefix on the base
    /// URL is kept).
    pub fn login_path(mut self, login_path: impl Into<String>) -> Self {
        self.config.login_path = login_path.into();
        self
    }

    /// Name of the cookie whose presence means the login succeeded.
    pub fn session_cookie(mut self, name: impl Into<String>) -> Self {
        self.config.session_cookie = name.into();
        self
    }

    /// Text the portal shows after accepting an SMS.
    pub fn success_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.success_marker = marker.into();
        self
    }

    /// Number of submissions per send, including the first one. Must be at least 1.
    pub fn attempts(mut self, attempts: u32) -> Self {
        self.config.attempts = attempts;
        self
    }

    /// Set an HTTP client timeout applied to each request.
    ///
    /// Ignored when a custom transport is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    ///
    /// Ignored when a custom transport is supplied.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Route requests through a proxy.
    ///
    /// Ignored when a custom transport is supplied.
    pub fn proxy(mut self, proxy: reqwest::Proxy) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Use a custom [`HttpTransport`] instead of the built-in reqwest one.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build a [`LabasClient`].
    pub fn build(self) -> Result<LabasClient, LabasError> {
        let base_url = Url::parse(&self.config.base_url)?;
        let login_url = append_path(&base_url, &self.config.login_path)?;

        if self.config.session_cookie.is_empty() {
            return Err(ValidationError::Empty {
                field: "session_cookie",
            }
            .into());
        }
        let success_marker = SuccessMarker::new(self.config.success_marker)?;
        if self.config.attempts == 0 {
            return Err(ValidationError::ZeroAttempts.into());
        }

        let http: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(user_agent) = self.user_agent {
                    builder = builder.user_agent(user_agent);
                }
                if let Some(proxy) = self.proxy {
                    builder = builder.proxy(proxy);
                }
                let transport =
                    ReqwestTransport::from_builder(builder).map_err(LabasError::Transport)?;
                Arc::new(transport)
            }
        };

        Ok(LabasClient {
            credentials: self.credentials,
            home_url: base_url.to_string(),
            login_url: login_url.to_string(),
            session_cookie: self.config.session_cookie,
            success_marker,
            attempts: self.config.attempts,
            http,
            session: Arc::new(Mutex::new(None)),
        })
    }
}

#[derive(Clone)]
/// Client for sending SMS through the portal's web form.
///
/// The first send logs in; later sends reuse the session until the portal
/// stops confirming submissions, at which point the client logs in again and
/// retries. Sends are serialized: clones share one session and one lock, so
/// concurrent callers never race each other's logins.
pub struct LabasClient {
    credentials: Credentials,
    home_url: String,
    login_url: String,
    session_cookie: String,
    success_marker: SuccessMarker,
    attempts: u32,
    http: Arc<dyn HttpTransport>,
    session: Arc<Mutex<Option<Session>>>,
}

impl LabasClient {
    /// Create a client for the live portal.
    ///
    /// For more customization, use [`LabasClient::builder`].
    pub fn new(credentials: Credentials) -> Result<Self, LabasError> {
        LabasClientBuilder::new(credentials).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> LabasClientBuilder {
        LabasClientBuilder::new(credentials)
    }

    /// Send `message` to `recipient`.
    ///
    /// Both values are submitted as given. Dropping the returned future cancels
    /// the in-flight request and releases the session lock.
    ///
    /// Errors:
    /// - [`LabasError::Login`] when logging in fails,
    /// - [`LabasError::Transport`] when a request fails,
    /// - [`LabasError::SendExhausted`] when the portal never confirmed the SMS.
    pub async fn send_sms(
        &self,
        recipient: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<(), LabasError> {
        self.send(&SmsRequest::new(recipient, message)).await
    }

    /// Like [`LabasClient::send_sms`], but gives up with [`LabasError::Timeout`]
    /// once `timeout` elapses. The deadline covers waiting for other sends too.
    pub async fn send_sms_with_timeout(
        &self,
        recipient: impl Into<String>,
        message: impl Into<String>,
        timeout: Duration,
    ) -> Result<(), LabasError> {
        tokio::time::timeout(timeout, self.send_sms(recipient, message))
            .await
            .map_err(|_| LabasError::Timeout(timeout))?
    }

    /// Send a prepared [`SmsRequest`].
    #[tracing::instrument(skip_all, fields(attempts = self.attempts))]
    pub async fn send(&self, request: &SmsRequest) -> Result<(), LabasError> {
        let mut state = self.session.lock().await;

        let cached = state.clone();
        let mut session = match cached {
            Some(session) => session,
            None => self.login(&mut state).await?,
        };

        for attempt in 1..=self.attempts {
            trace!(attempt, "submitting sms");
            if self.submit(&session, request).await? {
                debug!(attempt, "sms confirmed by portal");
                return Ok(());
            }

            if attempt < self.attempts {
                debug!(attempt, "sms not confirmed, logging in again");
                session = self.login(&mut state).await?;
            }
        }

        Err(LabasError::SendExhausted {
            attempts: self.attempts,
        })
    }

    /// Log in and store the new session in `state`.
    ///
    /// The previous session is dropped first, so a failed login leaves the
    /// client logged out rather than holding a stale token.
    async fn login(&self, state: &mut Option<Session>) -> Result<Session, LabasError> {
        *state = None;
        debug!(url = %self.login_url, "logging in");

        let response = self
            .http
            .post_form(
                &self.login_url,
                transport::encode_login_form(&self.credentials),
                Vec::new(),
            )
            .await
            .map_err(LabasError::Transport)?;
        trace!(status = response.status, "login form submitted");

        let cookie = transport::find_session_cookie(&response.cookies, &self.session_cookie)
            .ok_or_else(|| LoginError::SessionCookieMissing {
                name: self.session_cookie.clone(),
            })?;

        let home = self
            .http
            .get(&self.home_url, vec![transport::session_cookie_header(&cookie)])
            .await
            .map_err(LabasError::Transport)?;
        trace!(status = home.status, "home page fetched");

        let token = transport::extract_token(&String::from_utf8_lossy(&home.body))
            .map_err(LoginError::from_scrape)?;

        let session = Session::new(cookie, token);
        *state = Some(session.clone());
        debug!("portal session established");
        Ok(session)
    }

    /// Submit the SMS form once; `Ok(true)` when the portal confirmed it.
    async fn submit(&self, session: &Session, request: &SmsRequest) -> Result<bool, LabasError> {
        let response = self
            .http
            .post_form(
                &self.home_url,
                transport::encode_send_sms_form(request, session.token()),
                vec![transport::session_cookie_header(session.cookie())],
            )
            .await
            .map_err(LabasError::Transport)?;
        trace!(status = response.status, "sms form submitted");

        Ok(transport::is_confirmed(&response.body, &self.success_marker))
    }
}

/// `https://host/app` + `/login` gives `https://host/app/login`.
fn append_path(base_url: &Url, path: &str) -> Result<Url, url::ParseError> {
    let base = base_url.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Url::parse(&format!("{base}/{path}"))
}
