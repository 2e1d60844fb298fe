use std::fmt;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Portal account username.
///
/// Invariant: non-empty after trimming.
pub struct Username(String);

impl Username {
    /// Login form field name used by the portal (`_username`).
    pub const FIELD: &'static str = "_username";

    /// Create a validated [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated username.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Portal account password.
///
/// Invariant: must not be empty (whitespace is preserved and allowed). The
/// `Debug` representation never shows the value.
pub struct Password(String);

impl Password {
    /// Login form field name used by the portal (`_password`).
    pub const FIELD: &'static str = "_password";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Username and password pair used for the portal's form login.
pub struct Credentials {
    username: Username,
    password: Password,
}

impl Credentials {
    /// Validate both parts and pair them.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            password: Password::new(password)?,
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS recipient as typed into the portal's form.
///
/// The value is passed through untouched; the portal does its own validation.
pub struct Recipient(String);

impl Recipient {
    /// SMS form field name used by the portal.
    pub const FIELD: &'static str = "sms_submit[recipientNumber]";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message body, passed through untouched.
pub struct MessageText(String);

impl MessageText {
    /// SMS form field name used by the portal.
    pub const FIELD: &'static str = "sms_submit[textMessage]";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Anti-forgery token scraped from the portal's home page.
///
/// The token is opaque and may legitimately be empty; it is compared and sent
/// byte-for-byte.
pub struct Token(String);

impl Token {
    /// Name of the hidden input carrying the token, also used as the form field
    /// name when submitting an SMS.
    pub const FIELD: &'static str = "sms_submit[_token]";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Session cookie issued by the portal after a successful form login.
pub struct SessionCookie {
    name: String,
    value: String,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCookie")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Literal text whose presence in the SMS submission response means the portal
/// accepted the message.
///
/// Invariant: non-empty. No trimming is applied; matching is exact.
pub struct SuccessMarker(String);

impl SuccessMarker {
    /// Name used in validation errors.
    pub const FIELD: &'static str = "success_marker";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_is_trimmed_and_password_is_not() {
        let creds = Credentials::new("  user ", " pass ").unwrap();
        assert_eq!(creds.username().as_str(), "user");
        assert_eq!(creds.password().as_str(), " pass ");
    }

    #[test]
    fn secrets_are_redacted_in_debug_output() {
        let creds = Credentials::new("user", "hunter2").unwrap();
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("user"));
        assert!(!rendered.contains("hunter2"));

        let token = Token::new("tok-123");
        assert!(!format!("{token:?}").contains("tok-123"));

        let cookie = SessionCookie::new("PHPSESSID", "abc");
        let rendered = format!("{cookie:?}");
        assert!(rendered.contains("PHPSESSID"));
        assert!(!rendered.contains("abc"));
    }

    #[test]
    fn success_marker_keeps_whitespace() {
        let marker = SuccessMarker::new(" sent ").unwrap();
        assert_eq!(marker.as_str(), " sent ");
        assert!(SuccessMarker::new("").is_err());
    }
}
