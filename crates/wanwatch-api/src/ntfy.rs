// ntfy publishing client
//
// Posts a plain-text message to `{base}/{topic}` with the title, tags and
// priority carried as `X-*` headers. Status classification is the
// caller's business: this client only fails on transport errors.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// A message ready to publish to an ntfy topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NtfyMessage {
    pub title: String,
    /// Comma-separated emoji shortcodes or tags (`X-Tags`).
    pub tags: String,
    /// `X-Priority` (1-5). `None` leaves the server default (3).
    pub priority: Option<u8>,
    pub body: String,
}

/// HTTP client for one ntfy topic.
pub struct NtfyClient {
    http: reqwest::Client,
    url: Url,
    basic_auth: Option<(String, SecretString)>,
}

impl NtfyClient {
    /// Create a client publishing to `{base_url}/{topic}`.
    pub fn new(
        base_url: &Url,
        topic: &str,
        basic_auth: Option<(String, SecretString)>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url, topic, basic_auth)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &Url,
        topic: &str,
        basic_auth: Option<(String, SecretString)>,
    ) -> Result<Self, Error> {
        let base = base_url.as_str().trim_end_matches('/');
        let url = Url::parse(&format!("{base}/{topic}"))?;
        Ok(Self {
            http,
            url,
            basic_auth,
        })
    }

    /// The full topic URL messages are posted to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Publish one message and return the server's status code.
    pub async fn publish(&self, message: &NtfyMessage) -> Result<reqwest::StatusCode, Error> {
        debug!(title = %message.title, "POST {}", self.url);

        let mut builder = self
            .http
            .post(self.url.clone())
            .header("X-Title", &message.title)
            .header("X-Tags", &message.tags)
            .body(message.body.clone());

        if let Some(priority) = message.priority {
            builder = builder.header("X-Priority", priority.to_string());
        }

        if let Some((ref user, ref password)) = self.basic_auth {
            builder = builder.basic_auth(user, Some(password.expose_secret()));
        }

        let resp = builder.send().await?;
        Ok(resp.status())
    }
}
