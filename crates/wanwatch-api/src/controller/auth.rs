// Controller session login
//
// The login endpoint sets a session cookie in the client's jar;
// subsequent requests use that cookie automatically.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::controller::client::ControllerClient;
use crate::error::Error;

impl ControllerClient {
    /// Authenticate with the controller using username/password.
    ///
    /// Only HTTP 200 counts as success. The endpoint differs by platform:
    /// - UniFi OS: `POST /api/auth/login`
    /// - Standalone: `POST /api/login`
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.root_url(self.platform().login_path())?;

        debug!(username, "auth request at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self.http().post(url).json(&body).send().await?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                status: status.as_u16(),
                message: body,
            });
        }

        debug!("login successful");
        Ok(())
    }
}
