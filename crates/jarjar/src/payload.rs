//! Message requests and the Slack webhook payload they resolve to.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::config::Defaults;
use crate::error::{json_kind, JarjarError, Result};

/// Text sent when neither a message nor an attachment resolves.
pub const FALLBACK_TEXT: &str = "Meesa jarjar binks!";

/// Title → value pairs rendered as the fields of a single Slack attachment.
///
/// Titles are kept sorted so that the same attachment always renders the
/// same payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attachment(BTreeMap<String, Value>);

impl Attachment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, title: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(title.into(), value.into())
    }

    /// Chaining form of [`Attachment::insert`].
    pub fn with(mut self, title: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(title, value);
        self
    }

    pub fn get(&self, title: &str) -> Option<&Value> {
        self.0.get(title)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> Vec<Field> {
        self.0
            .iter()
            .map(|(title, value)| Field {
                title: title.clone(),
                value: field_text(value),
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Attachment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl TryFrom<Value> for Attachment {
    type Error = JarjarError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map.into_iter().collect())),
            other => Err(JarjarError::InvalidAttachment(json_kind(&other))),
        }
    }
}

/// Strings go out verbatim, everything else in compact JSON form.
fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A single send. Every field left unset falls back to the helper's defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageRequest {
    pub message: Option<String>,
    pub attach: Option<Attachment>,
    pub channel: Option<String>,
    pub webhook: Option<String>,
}

impl MessageRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn attach(mut self, attach: Attachment) -> Self {
        self.attach = Some(attach);
        self
    }

    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn webhook(mut self, webhook: impl Into<String>) -> Self {
        self.webhook = Some(webhook.into());
        self
    }

    /// Build a request from untyped values, e.g. parsed from JSON input.
    ///
    /// `null` counts as absent. A message that is not a string or an
    /// attachment that is not an object is rejected with a type error rather
    /// than coerced.
    pub fn from_values(
        message: Option<Value>,
        attach: Option<Value>,
        channel: Option<String>,
        webhook: Option<String>,
    ) -> Result<Self> {
        let message = match message {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(other) => return Err(JarjarError::InvalidMessage(json_kind(&other))),
        };
        let attach = match attach {
            None | Some(Value::Null) => None,
            Some(value) => Some(Attachment::try_from(value)?),
        };
        Ok(Self {
            message,
            attach,
            channel,
            webhook,
        })
    }
}

/// The JSON body posted to the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentBlock {
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub title: String,
    pub value: String,
}

/// Empty strings count as absent.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Resolve `request` against `defaults`. Call-time values win; the fallback
/// text is only used when there is no attachment either.
pub fn build_payload(defaults: &Defaults, request: &MessageRequest) -> Payload {
    let attach = request.attach.as_ref().filter(|a| !a.is_empty());

    let channel = present(&request.channel)
        .or_else(|| present(&defaults.channel))
        .map(str::to_owned);

    let text = present(&request.message)
        .or_else(|| present(&defaults.message))
        .or_else(|| attach.is_none().then_some(FALLBACK_TEXT))
        .map(str::to_owned);

    let attachments = attach
        .map(|a| vec![AttachmentBlock { fields: a.fields() }])
        .unwrap_or_default();

    Payload {
        channel,
        text,
        attachments,
    }
}
