use serde::Deserialize;

/// Default portal address.
pub const DEFAULT_BASE_URL: &str = "https://mano.labas.lt";
/// Default path of the login form's action.
pub const DEFAULT_LOGIN_PATH: &str = "/prisijungimo_patikrinimas";
/// Default name of the session cookie set by a successful login.
pub const DEFAULT_SESSION_COOKIE: &str = "PHPSESSID";
/// Default confirmation text shown by the portal after an SMS is accepted.
pub const DEFAULT_SUCCESS_MARKER: &str = "SMS išsiųsta";
/// Default number of submit attempts per send (one initial try plus relogins).
pub const DEFAULT_ATTEMPTS: u32 = 2;

/// Portal settings that can be loaded from a config file.
///
/// Every field is optional when deserializing; missing fields fall back to the
/// values used by the live portal. Values are validated when the client is
/// built, not here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub base_url: String,
    pub login_path: String,
    pub session_cookie: String,
    pub success_marker: String,
    pub attempts: u32,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_owned(),
            success_marker: DEFAULT_SUCCESS_MARKER.to_owned(),
            attempts: DEFAULT_ATTEMPTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: PortalConfig =
            serde_json::from_str(r#"{ "attempts": 5, "success_marker": "sent" }"#).unwrap();
        assert_eq!(config.attempts, 5);
        assert_eq!(config.success_marker, "sent");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.login_path, DEFAULT_LOGIN_PATH);
        assert_eq!(config.session_cookie, DEFAULT_SESSION_COOKIE);
    }

    #[test]
    fn empty_document_is_the_default_config() {
        let config: PortalConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PortalConfig::default());
    }
}
