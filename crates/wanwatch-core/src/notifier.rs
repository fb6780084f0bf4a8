// ── Notifier ──
//
// Turns a WAN state into an ntfy message and delivers it under a capped
// retry policy. 200 is success, 4xx gives up at once, 5xx and transport
// failures are retried with a fixed delay.

use std::future::Future;

use tracing::{debug, error, info};

use wanwatch_api::{NtfyClient, NtfyMessage, StatusCode};

use crate::error::NotifyError;
use crate::model::WanState;
use crate::retry::RetryPolicy;

const TITLE: &str = "Unifi WAN";

/// Anything that can hand an [`NtfyMessage`] to a push service.
///
/// Only transport failures are `Err`; HTTP statuses come back as-is so the
/// notifier can classify them.
pub trait Publisher {
    fn publish(
        &self,
        message: &NtfyMessage,
    ) -> impl Future<Output = Result<StatusCode, wanwatch_api::Error>> + Send;
}

impl Publisher for NtfyClient {
    fn publish(
        &self,
        message: &NtfyMessage,
    ) -> impl Future<Output = Result<StatusCode, wanwatch_api::Error>> + Send {
        NtfyClient::publish(self, message)
    }
}

/// The notification derived from a state value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub state: WanState,
    pub title: &'static str,
    pub tags: &'static str,
    /// `None` keeps the ntfy default priority.
    pub priority: Option<u8>,
    pub message: &'static str,
}

impl NotificationRequest {
    pub fn for_state(state: WanState) -> Self {
        match state {
            WanState::Active => Self {
                state,
                title: TITLE,
                tags: "green_circle",
                priority: Some(2),
                message: "Primary WAN was restored",
            },
            WanState::Inactive => Self {
                state,
                title: TITLE,
                tags: "orange_circle",
                priority: None,
                message: "Primary WAN went DOWN",
            },
        }
    }

    pub fn to_message(&self) -> NtfyMessage {
        NtfyMessage {
            title: self.title.into(),
            tags: self.tags.into(),
            priority: self.priority,
            body: self.message.into(),
        }
    }
}

/// Result of a single delivery attempt.
enum Attempt {
    Delivered,
    Fatal(NotifyError),
    Retryable(String),
}

fn classify(result: Result<StatusCode, wanwatch_api::Error>) -> Attempt {
    match result {
        Ok(StatusCode::OK) => Attempt::Delivered,
        Ok(status) if status.is_server_error() => Attempt::Retryable(format!("HTTP {status}")),
        Ok(status) => Attempt::Fatal(NotifyError::Rejected {
            status: status.as_u16(),
        }),
        Err(e) if e.is_malformed_request() => Attempt::Fatal(NotifyError::Malformed {
            message: e.to_string(),
        }),
        Err(e) => Attempt::Retryable(e.to_string()),
    }
}

/// Delivers state-change notifications.
pub struct Notifier<P> {
    publisher: P,
    policy: RetryPolicy,
}

impl<P: Publisher> Notifier<P> {
    pub fn new(publisher: P, policy: RetryPolicy) -> Self {
        Self { publisher, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Deliver one notification, returning how many attempts it took.
    pub async fn deliver(&self, state: WanState) -> Result<u32, NotifyError> {
        let message = NotificationRequest::for_state(state).to_message();
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let failure = match classify(self.publisher.publish(&message).await) {
                Attempt::Delivered => return Ok(attempt),
                Attempt::Fatal(err) => return Err(err),
                Attempt::Retryable(failure) => failure,
            };

            if attempt >= max_attempts {
                return Err(NotifyError::Exhausted {
                    attempts: attempt,
                    last_failure: failure,
                });
            }

            debug!(
                %failure,
                remaining = max_attempts - attempt,
                "server error - retrying"
            );
            tokio::time::sleep(self.policy.delay).await;
        }
    }

    /// Fire-and-forget delivery: failures are logged, never returned.
    pub async fn notify(&self, state: WanState) {
        match self.deliver(state).await {
            Ok(attempts) => info!(%state, attempts, "notification sent"),
            Err(err @ NotifyError::Exhausted { .. }) => {
                error!("Could not send notification! Is the ntfy server offline? {err}");
            }
            Err(err) => error!("Could not send notification! {err}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;

    /// Replays a fixed list of outcomes and records when each attempt happened.
    struct Scripted {
        outcomes: Mutex<VecDeque<Result<u16, wanwatch_api::Error>>>,
        attempts: Mutex<Vec<Instant>>,
    }

    impl Scripted {
        fn new(outcomes: Vec<Result<u16, wanwatch_api::Error>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                attempts: Mutex::new(Vec::new()),
            }
        }

        fn statuses(codes: &[u16]) -> Self {
            Self::new(codes.iter().map(|c| Ok(*c)).collect())
        }

        fn attempts(&self) -> Vec<Instant> {
            self.attempts.lock().unwrap().clone()
        }
    }

    impl Publisher for Scripted {
        fn publish(
            &self,
            _message: &NtfyMessage,
        ) -> impl Future<Output = Result<StatusCode, wanwatch_api::Error>> + Send {
            self.attempts.lock().unwrap().push(Instant::now());
            let next = self.outcomes.lock().unwrap().pop_front().unwrap_or(Ok(200));
            async move { next.map(|code| StatusCode::from_u16(code).unwrap()) }
        }
    }

    fn gaps(attempts: &[Instant]) -> Vec<Duration> {
        attempts.windows(2).map(|w| w[1] - w[0]).collect()
    }

    #[test]
    fn restored_message_has_low_priority_green_tag() {
        let req = NotificationRequest::for_state(WanState::Active);
        assert_eq!(req.tags, "green_circle");
        assert_eq!(req.priority, Some(2));
        assert_eq!(req.to_message().body, "Primary WAN was restored");
    }

    #[test]
    fn down_message_has_default_priority_orange_tag() {
        let msg = NotificationRequest::for_state(WanState::Inactive).to_message();
        assert_eq!(msg.title, "Unifi WAN");
        assert_eq!(msg.tags, "orange_circle");
        assert_eq!(msg.priority, None);
        assert_eq!(msg.body, "Primary WAN went DOWN");
    }

    #[tokio::test(start_paused = true)]
    async fn first_attempt_success() {
        let notifier = Notifier::new(Scripted::statuses(&[200]), RetryPolicy::default());

        assert_eq!(notifier.deliver(WanState::Inactive).await.unwrap(), 1);
        assert_eq!(notifier.publisher().attempts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_two_server_errors() {
        let notifier = Notifier::new(Scripted::statuses(&[503, 503, 200]), RetryPolicy::default());

        let attempts = notifier.deliver(WanState::Inactive).await.unwrap();

        assert_eq!(attempts, 3);
        assert_eq!(
            gaps(&notifier.publisher().attempts()),
            vec![Duration::from_secs(2); 2]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn client_error_is_not_retried() {
        let notifier = Notifier::new(Scripted::statuses(&[400]), RetryPolicy::default());

        let err = notifier.deliver(WanState::Active).await.unwrap_err();

        assert!(matches!(err, NotifyError::Rejected { status: 400 }));
        assert_eq!(notifier.publisher().attempts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_four_server_errors() {
        let notifier = Notifier::new(
            Scripted::statuses(&[503, 503, 503, 503, 200]),
            RetryPolicy::default(),
        );

        let err = notifier.deliver(WanState::Inactive).await.unwrap_err();

        assert!(matches!(err, NotifyError::Exhausted { attempts: 4, .. }));
        let attempts = notifier.publisher().attempts();
        assert_eq!(attempts.len(), 4);
        assert_eq!(gaps(&attempts), vec![Duration::from_secs(2); 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_failures_are_retried() {
        let notifier = Notifier::new(
            Scripted::new(vec![
                Err(wanwatch_api::Error::Tls("connection reset".into())),
                Ok(200),
            ]),
            RetryPolicy::default(),
        );

        assert_eq!(notifier.deliver(WanState::Active).await.unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_request_is_not_retried() {
        let notifier = Notifier::new(
            Scripted::new(vec![Err(wanwatch_api::Error::InvalidUrl(
                url::ParseError::EmptyHost,
            ))]),
            RetryPolicy::default(),
        );

        let err = notifier.deliver(WanState::Active).await.unwrap_err();

        assert!(matches!(err, NotifyError::Malformed { .. }));
        assert_eq!(notifier.publisher().attempts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn redirect_is_not_success() {
        let notifier = Notifier::new(Scripted::statuses(&[302]), RetryPolicy::default());

        let err = notifier.deliver(WanState::Active).await.unwrap_err();
        assert!(matches!(err, NotifyError::Rejected { status: 302 }));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_delay_policy_does_not_sleep() {
        let notifier = Notifier::new(Scripted::statuses(&[500, 500, 200]), RetryPolicy::immediate(3));

        notifier.deliver(WanState::Active).await.unwrap();

        assert_eq!(gaps(&notifier.publisher().attempts()), vec![Duration::ZERO; 2]);
    }
}
