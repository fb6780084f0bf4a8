// Controller HTTP client
//
// Wraps `reqwest::Client` with UniFi-specific URL construction, envelope
// unwrapping, and platform-aware path prefixing. Endpoint methods live
// in sibling files as inherent impls.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::ControllerPlatform;
use crate::controller::models::Envelope;
use crate::error::Error;
use crate::transport::TransportConfig;

/// UniFi OS wraps some errors as `{"error":{"code":N,"message":"..."}}` with HTTP 200.
#[derive(serde::Deserialize)]
struct UnifiOsError {
    error: Option<UnifiOsErrorInner>,
}

#[derive(serde::Deserialize)]
struct UnifiOsErrorInner {
    code: u16,
    message: Option<String>,
}

/// HTTP client for one UniFi controller session.
///
/// Owns its own cookie jar: a client is only useful after [`login`]
/// succeeds, and a fresh client means a fresh session.
///
/// [`login`]: ControllerClient::login
pub struct ControllerClient {
    http: reqwest::Client,
    base_url: Url,
    site: String,
    platform: ControllerPlatform,
}

impl ControllerClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// (session auth requires cookies). The `base_url` should be the
    /// controller root, e.g. `https://192.168.1.1`.
    pub fn new(
        base_url: Url,
        site: String,
        platform: ControllerPlatform,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self::with_client(http, base_url, site, platform))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        site: String,
        platform: ControllerPlatform,
    ) -> Self {
        Self {
            http,
            base_url,
            site,
            platform,
        }
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn platform(&self) -> ControllerPlatform {
        self.platform
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Join a root-level path (login) onto the base URL.
    pub(crate) fn root_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    /// Build a site-scoped URL: `{base}{prefix}/api/s/{site}/{path}`
    pub(crate) fn site_url(&self, path: &str) -> Result<Url, Error> {
        let prefix = self.platform.network_prefix();
        self.root_url(&format!("{prefix}/api/s/{}/{path}", self.site))
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and return the envelope's `data` entries untyped.
    pub(crate) async fn get_data(&self, url: Url) -> Result<Vec<serde_json::Value>, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        self.parse_envelope(resp).await
    }

    /// Parse the `{ meta, data }` envelope, returning `data` on success.
    ///
    /// Anything but HTTP 200 is an error, as is an envelope with
    /// `meta.rc != "ok"` or a UniFi OS `{"error": {...}}` body.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<Vec<T>, Error> {
        let status = resp.status();

        if status != reqwest::StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                body: preview(&body).to_owned(),
            });
        }

        let body = resp.text().await?;

        if let Ok(UnifiOsError {
            error: Some(err), ..
        }) = serde_json::from_str::<UnifiOsError>(&body)
        {
            return Err(Error::Controller {
                message: format!(
                    "UniFi OS error {}: {}",
                    err.code,
                    err.message.unwrap_or_default()
                ),
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            Error::Deserialization {
                message: format!("{e} (body preview: {:?})", preview(&body)),
                body: body.clone(),
            }
        })?;

        match envelope.meta {
            Some(meta) if meta.rc != "ok" => Err(Error::Controller {
                message: meta.msg.unwrap_or_else(|| format!("rc={}", meta.rc)),
            }),
            _ => Ok(envelope.data),
        }
    }
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
