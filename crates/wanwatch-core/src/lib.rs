// wanwatch-core: WAN transition tracking and delivery between wanwatch-api and the binary.

pub mod config;
pub mod error;
pub mod model;
pub mod notifier;
pub mod poll;
pub mod retry;
pub mod session;
pub mod store;
pub mod tracker;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ControllerConfig, MonitorConfig, NtfyConfig, TlsVerification};
pub use error::{AuthError, CoreError, FetchError, MalformedAlert, NotifyError};
pub use model::{AlertRecord, TrackedState, TransitionEvent, WanState};
pub use notifier::{NotificationRequest, Notifier, Publisher};
pub use poll::{AlertSource, LoopState, PollLoop, TickOutcome};
pub use retry::RetryPolicy;
pub use session::{Session, SessionManager};
pub use store::{MemoryStore, StateStore};
pub use tracker::{StateTracker, WAN_TRANSITION_KEY};

pub use wanwatch_api::RawAlarm;
