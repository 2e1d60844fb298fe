use crate::domain::value::{SessionCookie, Token};

/// Authenticated portal session: the cookie issued by the login form and the
/// anti-forgery token scraped with that cookie.
///
/// Both halves always come from the same login. The client keeps this as
/// `Option<Session>`, so "logged in" and "not logged in" are the only states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    cookie: SessionCookie,
    token: Token,
}

impl Session {
    pub fn new(cookie: SessionCookie, token: Token) -> Self {
        Self { cookie, token }
    }

    pub fn cookie(&self) -> &SessionCookie {
        &self.cookie
    }

    pub fn token(&self) -> &Token {
        &self.token
    }
}
