//! HTTP seam between the client and the network.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use reqwest::header::LOCATION;
use reqwest::{Method, StatusCode, Url};

/// Boxed future returned by [`HttpTransport`] methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Error type produced by [`HttpTransport`] implementations.
pub type TransportError = Box<dyn StdError + Send + Sync>;

/// What the client needs to know about a portal response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Cookies set by this exchange, redirect hops included, as `(name, value)`
    /// pairs in the order they were set. Cookies from earlier exchanges must
    /// not be repeated here.
    pub cookies: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Minimal HTTP capability the portal client is written against.
///
/// Implement this to run the client against a fake portal or to route requests
/// through a custom stack. Headers passed in must be sent as given; the client
/// uses them to attach the session cookie.
pub trait HttpTransport: Send + Sync {
    /// `POST` an `application/x-www-form-urlencoded` body.
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
        headers: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>>;

    fn get<'a>(
        &'a self,
        url: &'a str,
        headers: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>>;
}

/// Redirect hops followed before giving up.
const MAX_REDIRECTS: usize = 10;

#[derive(Debug, thiserror::Error)]
#[error("too many redirects")]
struct TooManyRedirects;

/// [`HttpTransport`] backed by `reqwest`.
///
/// Redirects are followed by hand so that cookies set on every hop (the portal
/// redirects after login) are reported in [`HttpResponse::cookies`], and only
/// those: cookies from earlier exchanges never show up again.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport with reqwest's default settings.
    pub fn new() -> Result<Self, TransportError> {
        Self::from_builder(reqwest::Client::builder())
    }

    /// Finish a pre-configured reqwest builder.
    ///
    /// Automatic redirects are switched off and a cookie store is installed
    /// for the non-session cookies the portal sets along the way.
    pub fn from_builder(builder: reqwest::ClientBuilder) -> Result<Self, TransportError> {
        let client = builder
            .redirect(reqwest::redirect::Policy::none())
            .cookie_store(true)
            .build()?;
        Ok(Self { client })
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        form: Option<&[(String, String)]>,
        headers: &[(String, String)],
    ) -> Result<HttpResponse, TransportError> {
        let mut url = Url::parse(url)?;
        let origin = url.origin();
        let mut method = method;
        let mut cookies = Vec::new();

        for _ in 0..=MAX_REDIRECTS {
            let mut request = self.client.request(method.clone(), url.clone());
            if let Some(params) = form.filter(|_| method == Method::POST) {
                request = request.form(params);
            }
            // Caller headers carry the session cookie; never leak them off-origin.
            if url.origin() == origin {
                for (name, value) in headers {
                    request = request.header(name, value);
                }
            }

            let response = request.send().await?;
            cookies.extend(
                response
                    .cookies()
                    .map(|cookie| (cookie.name().to_owned(), cookie.value().to_owned())),
            );

            let status = response.status();
            if status.is_redirection() {
                if let Some(location) = response.headers().get(LOCATION) {
                    url = url.join(location.to_str()?)?;
                    if !matches!(
                        status,
                        StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT
                    ) {
                        method = Method::GET;
                    }
                    continue;
                }
            }

            let body = response.bytes().await?.to_vec();
            return Ok(HttpResponse {
                status: status.as_u16(),
                cookies,
                body,
            });
        }

        Err(TooManyRedirects.into())
    }
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
        headers: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(async move {
            self.execute(Method::POST, url, Some(params.as_slice()), &headers)
                .await
        })
    }

    fn get<'a>(
        &'a self,
        url: &'a str,
        headers: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportError>> {
        Box::pin(async move { self.execute(Method::GET, url, None, &headers).await })
    }
}
