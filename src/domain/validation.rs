use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    ZeroAttempts,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::ZeroAttempts => write!(f, "attempts must be at least 1"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "_username" };
        assert_eq!(err.to_string(), "_username must not be empty");

        let err = ValidationError::ZeroAttempts;
        assert_eq!(err.to_string(), "attempts must be at least 1");
    }
}
