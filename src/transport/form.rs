use crate::domain::{
    Credentials, MessageText, Password, Recipient, SessionCookie, SmsRequest, SuccessMarker, Token,
    Username,
};

pub fn encode_login_form(credentials: &Credentials) -> Vec<(String, String)> {
    vec![
        (
            Username::FIELD.to_owned(),
            credentials.username().as_str().to_owned(),
        ),
        (
            Password::FIELD.to_owned(),
            credentials.password().as_str().to_owned(),
        ),
    ]
}

pub fn encode_send_sms_form(request: &SmsRequest, token: &Token) -> Vec<(String, String)> {
    vec![
        (
            Recipient::FIELD.to_owned(),
            request.recipient().as_str().to_owned(),
        ),
        (
            MessageText::FIELD.to_owned(),
            request.message().as_str().to_owned(),
        ),
        (Token::FIELD.to_owned(), token.as_str().to_owned()),
    ]
}

/// Render the `Cookie` request header carrying the session cookie.
pub fn session_cookie_header(cookie: &SessionCookie) -> (String, String) {
    (
        "Cookie".to_owned(),
        format!("{}={}", cookie.name(), cookie.value()),
    )
}

/// Pick the named cookie out of the cookies a transport reported.
///
/// Cookies are listed in the order they were set, so the last cookie with an
/// exactly matching name wins (a redirect hop may replace an earlier value).
pub fn find_session_cookie(cookies: &[(String, String)], name: &str) -> Option<SessionCookie> {
    cookies
        .iter()
        .rfind(|(key, _)| key == name)
        .map(|(key, value)| SessionCookie::new(key.as_str(), value.as_str()))
}

/// Whether a submission response body confirms delivery.
pub fn is_confirmed(body: &[u8], marker: &SuccessMarker) -> bool {
    let needle = marker.as_bytes();
    body.windows(needle.len()).any(|window| window == needle)
}
