//! Domain layer: strong types with validation and invariants (no I/O).

mod config;
mod request;
mod session;
mod validation;
mod value;

pub use config::{
    DEFAULT_ATTEMPTS, DEFAULT_BASE_URL, DEFAULT_LOGIN_PATH, DEFAULT_SESSION_COOKIE,
    DEFAULT_SUCCESS_MARKER, PortalConfig,
};
pub use request::SmsRequest;
pub use session::Session;
pub use validation::ValidationError;
pub use value::{
    Credentials, MessageText, Password, Recipient, SessionCookie, SuccessMarker, Token, Username,
};
