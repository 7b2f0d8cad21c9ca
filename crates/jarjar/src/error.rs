use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, JarjarError>;

#[derive(Debug, Error)]
pub enum JarjarError {
    #[error("message must be text, got {0}")]
    InvalidMessage(&'static str),

    #[error("attachment must be a mapping of title to value, got {0}")]
    InvalidAttachment(&'static str),

    #[error("no webhook configured: pass one explicitly or set a default")]
    MissingWebhook,

    #[error("webhook URL '{url}' is malformed: {reason}")]
    MalformedWebhook { url: String, reason: String },

    #[error("could not reach webhook {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("webhook {url} rejected the message with status {status}: {body}")]
    Rejected {
        url: String,
        status: StatusCode,
        body: String,
    },
}

impl JarjarError {
    /// True when a caller passed a value of the wrong shape.
    pub fn is_type_error(&self) -> bool {
        matches!(self, Self::InvalidMessage(_) | Self::InvalidAttachment(_))
    }

    /// True when the webhook could not be reached, including URLs that never
    /// made it onto the wire because they do not parse.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::MalformedWebhook { .. })
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Name of a JSON value's kind, for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_type_errors() {
        assert!(JarjarError::InvalidMessage("a number").is_type_error());
        assert!(JarjarError::InvalidAttachment("an array").is_type_error());
        assert!(!JarjarError::MissingWebhook.is_type_error());
    }

    #[test]
    fn malformed_webhook_counts_as_connection_error() {
        let err = JarjarError::MalformedWebhook {
            url: "nope".into(),
            reason: "relative URL without a base".into(),
        };
        assert!(err.is_connection_error());
        assert!(!err.is_type_error());
    }

    #[test]
    fn rejected_exposes_status() {
        let err = JarjarError::Rejected {
            url: "https://hooks.example/".into(),
            status: StatusCode::NOT_FOUND,
            body: "channel_not_found".into(),
        };
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(
            err.to_string(),
            "webhook https://hooks.example/ rejected the message with status 404 Not Found: channel_not_found"
        );
    }

    #[test]
    fn describes_json_kinds() {
        assert_eq!(json_kind(&json!(1)), "a number");
        assert_eq!(json_kind(&json!([1])), "an array");
        assert_eq!(
            JarjarError::InvalidMessage(json_kind(&json!(true))).to_string(),
            "message must be text, got a boolean"
        );
    }
}
