// wanwatch-api: HTTP clients for the UniFi controller alarm log and ntfy

pub mod auth;
pub mod controller;
pub mod error;
pub mod ntfy;
pub mod transport;

pub use auth::ControllerPlatform;
pub use controller::{ControllerClient, RawAlarm};
pub use error::Error;
pub use ntfy::{NtfyClient, NtfyMessage};
pub use reqwest::StatusCode;
pub use transport::{TlsMode, TransportConfig};
