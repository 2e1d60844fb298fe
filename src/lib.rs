//! Async Rust client for sending SMS through the mano.labas.lt web portal.
//!
//! The portal has no API: the client logs in through the same form a browser
//! uses, scrapes the anti-forgery token from the home page and submits the SMS
//! form with it. A send that is not confirmed by the portal is retried after a
//! fresh login, up to a small attempt budget.
//!
//! The crate is split into a domain layer of plain types, a transport layer for
//! the portal's wire-format quirks (form fields, cookies, HTML scraping), and a
//! small client layer orchestrating the login/send state machine.
//!
//! ```rust,no_run
//! use labas::{Credentials, LabasClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), labas::LabasError> {
//!     let client = LabasClient::new(Credentials::new("user", "secret")?)?;
//!     client.send_sms("+37060000000", "hello").await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    BoxFuture, HttpResponse, HttpTransport, LabasClient, LabasClientBuilder, LabasError,
    LoginError, ReqwestTransport, TransportError,
};
pub use domain::{
    Credentials, MessageText, Password, PortalConfig, Recipient, SessionCookie, SmsRequest,
    SuccessMarker, Token, Username, ValidationError,
};
