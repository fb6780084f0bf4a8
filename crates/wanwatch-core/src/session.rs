// ── Session Manager & Alert Fetcher ──
//
// Logs into the controller and reads its alarm log. Neither step retries:
// the poll loop decides when to authenticate again.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use wanwatch_api::transport::{TlsMode, TransportConfig};
use wanwatch_api::{ControllerClient, RawAlarm};

use crate::config::{ControllerConfig, TlsVerification};
use crate::error::{AuthError, FetchError};
use crate::poll::AlertSource;

/// An authenticated controller session.
///
/// Replaced wholesale on re-authentication; the old one is simply dropped.
pub struct Session {
    client: ControllerClient,
    established_at: DateTime<Utc>,
}

impl Session {
    pub fn client(&self) -> &ControllerClient {
        &self.client
    }

    pub fn established_at(&self) -> DateTime<Utc> {
        self.established_at
    }
}

/// Creates sessions against one controller.
pub struct SessionManager {
    config: ControllerConfig,
    transport: TransportConfig,
}

impl SessionManager {
    /// Warns once, here, when TLS verification is disabled.
    pub fn new(config: ControllerConfig) -> Self {
        if config.tls == TlsVerification::DangerAcceptInvalid {
            warn!("Running with unverified TLS. DO NOT use outside trusted networks!");
        }
        let transport = build_transport(&config);
        Self { config, transport }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Log in with a fresh cookie jar and return the new session.
    pub async fn authenticate(&self) -> Result<Session, AuthError> {
        let result = async {
            let client = ControllerClient::new(
                self.config.url.clone(),
                self.config.site.clone(),
                self.config.platform,
                &self.transport,
            )?;
            client
                .login(&self.config.username, &self.config.password)
                .await?;
            Ok::<_, wanwatch_api::Error>(client)
        }
        .await;

        match result {
            Ok(client) => {
                info!("Authenticated at UniFi controller");
                Ok(Session {
                    client,
                    established_at: Utc::now(),
                })
            }
            Err(err) => {
                let err = AuthError::from(err);
                match err {
                    AuthError::Rejected { status } => error!(
                        status,
                        "Could not authenticate at UniFi controller! HTTP error code {status}"
                    ),
                    ref other => error!("Could not authenticate at UniFi controller: {other}"),
                }
                Err(err)
            }
        }
    }

    /// Read the current alarm log through `session`.
    pub async fn fetch_alerts(&self, session: &Session) -> Result<Vec<RawAlarm>, FetchError> {
        match session.client.list_alarms().await {
            Ok(alarms) => {
                debug!(count = alarms.len(), "fetched alarms");
                Ok(alarms)
            }
            Err(err) => {
                let err = FetchError::from(err);
                match err {
                    FetchError::Status { status } => error!(
                        status,
                        "Could not read alerts on UniFi controller! HTTP error code {status}"
                    ),
                    ref other => error!("Could not read alerts on UniFi controller: {other}"),
                }
                Err(err)
            }
        }
    }
}

impl AlertSource for SessionManager {
    type Session = Session;

    async fn authenticate(&self) -> Result<Session, AuthError> {
        SessionManager::authenticate(self).await
    }

    async fn fetch_alerts(&self, session: &Session) -> Result<Vec<RawAlarm>, FetchError> {
        SessionManager::fetch_alerts(self, session).await
    }
}

fn build_transport(config: &ControllerConfig) -> TransportConfig {
    TransportConfig {
        tls: match config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
        cookie_jar: None, // ControllerClient::new adds a fresh one per session
    }
}
