//! Transport layer: the portal's wire-format details (form fields, cookies, HTML).

mod form;
mod html;

pub use form::{
    encode_login_form, encode_send_sms_form, find_session_cookie, is_confirmed,
    session_cookie_header,
};
pub use html::{ScrapeError, extract_token};
