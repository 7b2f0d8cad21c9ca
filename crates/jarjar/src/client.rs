use reqwest::{StatusCode, Url};
use tracing::{debug, info, warn};

use crate::config::Defaults;
use crate::error::{JarjarError, Result};
use crate::payload::{build_payload, present, MessageRequest, Payload};

/// Entry point used for a send.
///
/// Both methods resolve and post identically; `Attach` exists for callers
/// that lead with the attachment rather than the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Method {
    Text,
    Attach,
}

impl Method {
    pub const ALL: [Method; 2] = [Method::Text, Method::Attach];

    pub fn name(self) -> &'static str {
        match self {
            Method::Text => "text",
            Method::Attach => "attach",
        }
    }
}

/// A message the webhook accepted.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub url: Url,
    pub status: StatusCode,
    pub payload: Payload,
}

/// Posts messages to a Slack incoming webhook, filling in anything the
/// caller leaves out from the defaults it was built with.
#[derive(Debug, Clone)]
pub struct Jarjar {
    defaults: Defaults,
    client: reqwest::Client,
}

impl Jarjar {
    pub fn new(defaults: Defaults) -> Self {
        Self::with_client(defaults, reqwest::Client::new())
    }

    pub fn with_client(defaults: Defaults, client: reqwest::Client) -> Self {
        Self { defaults, client }
    }

    pub fn default_message(&self) -> Option<&str> {
        present(&self.defaults.message)
    }

    pub fn default_channel(&self) -> Option<&str> {
        present(&self.defaults.channel)
    }

    pub fn default_webhook(&self) -> Option<&str> {
        present(&self.defaults.webhook)
    }

    /// The payload `request` would be sent as. No I/O.
    pub fn build_payload(&self, request: &MessageRequest) -> Payload {
        build_payload(&self.defaults, request)
    }

    /// Call-time webhook, else the default one. Only http(s) URLs are accepted.
    pub fn resolve_webhook(&self, request: &MessageRequest) -> Result<Url> {
        let raw = present(&request.webhook)
            .or_else(|| self.default_webhook())
            .ok_or(JarjarError::MissingWebhook)?;

        let url = Url::parse(raw).map_err(|e| JarjarError::MalformedWebhook {
            url: raw.to_owned(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(JarjarError::MalformedWebhook {
                url: raw.to_owned(),
                reason: format!("unsupported scheme '{other}'"),
            }),
        }
    }

    pub async fn text(&self, request: MessageRequest) -> Result<Delivery> {
        self.post(Method::Text, request).await
    }

    pub async fn attach(&self, request: MessageRequest) -> Result<Delivery> {
        self.post(Method::Attach, request).await
    }

    pub async fn send(&self, method: Method, request: MessageRequest) -> Result<Delivery> {
        match method {
            Method::Text => self.text(request).await,
            Method::Attach => self.attach(request).await,
        }
    }

    #[tracing::instrument(name = "post", skip_all, fields(method = method.name()))]
    async fn post(&self, method: Method, request: MessageRequest) -> Result<Delivery> {
        let url = self.resolve_webhook(&request)?;
        let payload = self.build_payload(&request);
        debug!(
            channel = ?payload.channel,
            text = ?payload.text,
            attachments = payload.attachments.len(),
            "posting to webhook"
        );

        let response = self
            .client
            .post(url.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|source| JarjarError::Connection {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = rejection_body(response.text().await);
            warn!(%status, %body, "webhook rejected message");
            return Err(JarjarError::Rejected {
                url: url.to_string(),
                status,
                body,
            });
        }

        info!(%status, "message delivered");
        Ok(Delivery {
            url,
            status,
            payload,
        })
    }
}

/// Body of a rejected response. A body that cannot be read is logged and
/// described in its place.
fn rejection_body(body: reqwest::Result<String>) -> String {
    match body {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "failed to read rejection body");
            format!("<unreadable body: {e}>")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Attachment;
    use assert_matches::assert_matches;

    fn jarjar() -> Jarjar {
        Jarjar::new(Defaults {
            message: None,
            channel: Some("#general".into()),
            webhook: Some("https://hooks.example/T000/B000".into()),
        })
    }

    #[test]
    fn webhook_falls_back_to_default() {
        let url = jarjar().resolve_webhook(&MessageRequest::new()).unwrap();
        assert_eq!(url.as_str(), "https://hooks.example/T000/B000");
    }

    #[test]
    fn call_time_webhook_wins() {
        let request = MessageRequest::new().webhook("http://localhost:9000/hook");
        let url = jarjar().resolve_webhook(&request).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/hook");
    }

    #[test]
    fn missing_webhook_errors() {
        let jj = Jarjar::new(Defaults::default());
        assert_matches!(
            jj.resolve_webhook(&MessageRequest::new()),
            Err(JarjarError::MissingWebhook)
        );
        assert_eq!(jj.default_webhook(), None);
    }

    #[test]
    fn malformed_webhooks_are_connection_errors() {
        for raw in ["not a url", "ftp://hooks.example/x"] {
            let err = jarjar()
                .resolve_webhook(&MessageRequest::new().webhook(raw))
                .unwrap_err();
            assert!(err.is_connection_error(), "{raw}: {err}");
        }
    }

    #[test]
    fn build_payload_uses_construction_defaults() {
        let payload =
            jarjar().build_payload(&MessageRequest::new().attach(Attachment::new().with("a", 1)));
        assert_eq!(payload.channel.as_deref(), Some("#general"));
        assert_eq!(payload.attachments[0].fields[0].value, "1");
    }

    #[test]
    fn method_names() {
        let names: Vec<_> = Method::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(names, ["text", "attach"]);
    }

    #[test]
    fn unreadable_rejection_body_is_described() {
        let err = reqwest::Client::new().get("not a url").build().unwrap_err();
        let body = rejection_body(Err(err));
        assert!(body.starts_with("<unreadable body: "), "{body}");
        assert_eq!(rejection_body(Ok("channel_not_found".into())), "channel_not_found");
    }

    #[tokio::test]
    async fn unreachable_webhook_is_connection_error() {
        // Port 1 on loopback is never listening in test environments.
        let err = jarjar()
            .text(MessageRequest::new().message("hi").webhook("http://127.0.0.1:1/"))
            .await
            .unwrap_err();
        assert_matches!(err, JarjarError::Connection { .. });
    }
}
