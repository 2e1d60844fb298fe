use crate::domain::value::{MessageText, Recipient};

/// A single SMS to submit through the portal.
///
/// Neither part is validated; the portal decides what it accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsRequest {
    recipient: Recipient,
    message: MessageText,
}

impl SmsRequest {
    pub fn new(recipient: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            recipient: Recipient::new(recipient),
            message: MessageText::new(message),
        }
    }

    pub fn recipient(&self) -> &Recipient {
        &self.recipient
    }

    pub fn message(&self) -> &MessageText {
        &self.message
    }
}
