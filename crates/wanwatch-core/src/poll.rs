// ── Poll Loop ──
//
// Sleep, fetch, track, notify; re-authenticate whenever a fetch fails.
// Everything runs strictly in sequence on the caller's task: one fetch per
// cycle, notifications sent one after another, no overlap between cycles.

use std::convert::Infallible;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use wanwatch_api::RawAlarm;

use crate::error::{AuthError, CoreError, FetchError};
use crate::model::TrackedState;
use crate::notifier::{Notifier, Publisher};
use crate::store::StateStore;
use crate::tracker::StateTracker;

/// Login plus alarm retrieval, the two controller operations the loop needs.
pub trait AlertSource {
    type Session;

    fn authenticate(&self) -> impl Future<Output = Result<Self::Session, AuthError>> + Send;

    fn fetch_alerts(
        &self,
        session: &Self::Session,
    ) -> impl Future<Output = Result<Vec<RawAlarm>, FetchError>> + Send;
}

/// Whether the loop currently holds a usable session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Authenticated,
    Unauthenticated,
}

/// What one poll cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Alarms were fetched and tracked; `notified` transitions were sent.
    Processed { notified: usize },
    /// The fetch failed and forced a new login, which worked.
    Reauthenticated,
    /// The new login failed too. The next cycle tries again.
    ReauthFailed,
}

/// The top-level control loop.
pub struct PollLoop<A: AlertSource, P, S> {
    source: A,
    tracker: StateTracker,
    notifier: Notifier<P>,
    store: S,
    poll_interval: Duration,
    session: Option<A::Session>,
    tracked: TrackedState,
}

impl<A, P, S> PollLoop<A, P, S>
where
    A: AlertSource,
    P: Publisher,
    S: StateStore,
{
    /// Seeds the tracked state from `store`, or `{now, active}` when empty.
    pub fn new(
        source: A,
        tracker: StateTracker,
        notifier: Notifier<P>,
        store: S,
        poll_interval: Duration,
    ) -> Self {
        let tracked = store.load().unwrap_or_else(TrackedState::at_startup);
        Self {
            source,
            tracker,
            notifier,
            store,
            poll_interval,
            session: None,
            tracked,
        }
    }

    pub fn tracked(&self) -> TrackedState {
        self.tracked
    }

    pub fn state(&self) -> LoopState {
        if self.session.is_some() {
            LoopState::Authenticated
        } else {
            LoopState::Unauthenticated
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &Notifier<P> {
        &self.notifier
    }

    /// Initial authentication. Unlike later logins, failure here is fatal.
    pub async fn start(&mut self) -> Result<(), CoreError> {
        let session = self
            .source
            .authenticate()
            .await
            .map_err(CoreError::InitialAuth)?;
        self.session = Some(session);
        Ok(())
    }

    /// One poll cycle, without the leading sleep.
    ///
    /// A cycle that starts without a session logs in first and, if that
    /// works, fetches in the same cycle.
    pub async fn tick(&mut self) -> TickOutcome {
        if self.session.is_none() {
            debug!("no session, logging in before fetch");
            if self.reauthenticate().await == TickOutcome::ReauthFailed {
                return TickOutcome::ReauthFailed;
            }
        }
        let Some(session) = self.session.as_ref() else {
            return TickOutcome::ReauthFailed;
        };

        let alerts = match self.source.fetch_alerts(session).await {
            Ok(alerts) => alerts,
            Err(err) => {
                debug!(error = %err, "fetch failed, re-authenticating");
                self.session = None;
                return self.reauthenticate().await;
            }
        };

        let (tracked, events) = self.tracker.process(&alerts, self.tracked);
        if tracked != self.tracked {
            self.tracked = tracked;
            self.store.save(tracked);
        }

        for event in &events {
            self.notifier.notify(event.state).await;
        }

        TickOutcome::Processed {
            notified: events.len(),
        }
    }

    async fn reauthenticate(&mut self) -> TickOutcome {
        match self.source.authenticate().await {
            Ok(session) => {
                self.session = Some(session);
                TickOutcome::Reauthenticated
            }
            Err(_) => {
                warn!("re-authentication failed, retrying next cycle");
                TickOutcome::ReauthFailed
            }
        }
    }

    /// Authenticate, then poll forever.
    ///
    /// Only returns if the initial login fails: the `Ok` side is
    /// uninhabited because the loop has no designed exit.
    pub async fn run(mut self) -> Result<Infallible, CoreError> {
        self.start().await?;
        info!(
            iface = self.tracker.iface(),
            interval_secs = self.poll_interval.as_secs(),
            "watching primary WAN"
        );

        loop {
            tokio::time::sleep(self.poll_interval).await;
            self.tick().await;
        }
    }
}
