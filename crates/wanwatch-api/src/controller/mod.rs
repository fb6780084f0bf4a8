// UniFi controller client modules
//
// Session login and the site-scoped alarm log (`stat/alarm`), wrapped in
// the controller's `{ meta: { rc, msg }, data: [...] }` envelope.

pub mod alarms;
pub mod auth;
pub mod client;
pub mod models;

pub use client::ControllerClient;
pub use models::RawAlarm;
