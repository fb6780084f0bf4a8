// Alarm log endpoint

use tracing::{debug, warn};

use crate::controller::client::ControllerClient;
use crate::controller::models::RawAlarm;
use crate::error::Error;

impl ControllerClient {
    /// List alarms from the controller's alarm log.
    ///
    /// `GET {prefix}/api/s/{site}/stat/alarm`
    ///
    /// Entries that don't decode as an alarm object are dropped with a
    /// warning instead of failing the whole batch.
    pub async fn list_alarms(&self) -> Result<Vec<RawAlarm>, Error> {
        let url = self.site_url("stat/alarm")?;
        let entries = self.get_data(url).await?;
        debug!(count = entries.len(), "received alarms");

        Ok(entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<RawAlarm>(entry) {
                Ok(alarm) => Some(alarm),
                Err(e) => {
                    warn!(error = %e, "skipping undecodable alarm entry");
                    None
                }
            })
            .collect())
    }
}
