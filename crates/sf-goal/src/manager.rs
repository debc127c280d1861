// manager.rs - Reconciles the cached goal with the service's answer.
//
// One GoalManager is built at startup and cloned into whoever needs it.
// Readers get snapshots or a watch receiver; only the manager mutates state.
//
// initialize() answers from the cache when the cache is consistent and
// verifies in the background. Without a usable cache it races a remote check
// against the decision deadline. The deadline decides the caller's answer
// only: the check keeps running and its result still lands in state and cache.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sf_api::{GoalInput, GoalRecord, ServiceError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::cache::GoalCache;
use crate::source::GoalSource;
use crate::state::{GoalState, GoalStatus};
use crate::storage::KeyValueStore;

#[derive(Clone)]
pub struct GoalManager {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn GoalSource>,
    cache: GoalCache,
    state: watch::Sender<GoalState>,
    in_flight: AtomicUsize,
    decision_deadline: Duration,
}

impl Inner {
    fn begin_verification(&self) -> VerificationGuard<'_> {
        self.state.send_modify(|state| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            state.loading = true;
            state.error = None;
        });
        VerificationGuard { inner: self }
    }

    fn end_verification(&self) {
        self.state.send_modify(|state| {
            let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
            state.loading = remaining > 0;
        });
    }

    /// Apply a verification outcome and count it as landed.
    fn land(&self, record: Option<GoalRecord>) {
        self.state.send_modify(|state| {
            state.apply(record);
            state.verifications += 1;
        });
    }
}

/// Keeps `loading` raised while a verification is in flight, including when
/// the verifying future is dropped half way.
struct VerificationGuard<'a> {
    inner: &'a Inner,
}

impl Drop for VerificationGuard<'_> {
    fn drop(&mut self) {
        self.inner.end_verification();
    }
}

impl GoalManager {
    pub fn new(
        source: Arc<dyn GoalSource>,
        store: Arc<dyn KeyValueStore>,
        decision_deadline: Duration,
    ) -> Self {
        let (state, _) = watch::channel(GoalState::default());
        Self {
            inner: Arc::new(Inner {
                source,
                cache: GoalCache::new(store),
                state,
                in_flight: AtomicUsize::new(0),
                decision_deadline,
            }),
        }
    }

    pub fn snapshot(&self) -> GoalState {
        self.inner.state.borrow().clone()
    }

    pub fn status(&self) -> GoalStatus {
        self.inner.state.borrow().status
    }

    /// Receiver that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<GoalState> {
        self.inner.state.subscribe()
    }

    pub fn decision_deadline(&self) -> Duration {
        self.inner.decision_deadline
    }

    /// Decide whether the user has a goal. Returns true iff the decided
    /// status is `Set`.
    pub async fn initialize(&self) -> bool {
        self.clear_error();

        if self.inner.cache.is_flag_set() {
            if let Some(goal) = self.inner.cache.load() {
                self.inner.state.send_modify(|state| state.apply(Some(goal)));
                debug!("goal answered from cache, verifying in background");
                self.spawn_background_verification();
                return true;
            }
            warn!("goal flag is set but the cached goal is missing or unreadable, checking the service");
        }

        let landed_before = self.inner.state.borrow().verifications;
        let manager = self.clone();
        let mut verification = tokio::spawn(async move { manager.refresh().await });

        match tokio::time::timeout(self.inner.decision_deadline, &mut verification).await {
            Ok(Ok(goal)) => goal.is_some(),
            Ok(Err(e)) => {
                warn!(error = %e, "goal verification task failed");
                self.settle_unset_if_pending(landed_before);
                false
            }
            Err(_) => {
                info!(
                    deadline_ms = self.inner.decision_deadline.as_millis() as u64,
                    "goal check still pending at decision deadline, answering unset"
                );
                self.settle_unset_if_pending(landed_before);
                // Dropping the handle detaches the task; its result still lands.
                false
            }
        }
    }

    /// Ask the service for the goal and reconcile state and cache with the
    /// answer. On failure the error is recorded and state falls back to the
    /// confirmed cache, so a transient failure never erases a known goal.
    pub async fn refresh(&self) -> Option<GoalRecord> {
        let _verifying = self.inner.begin_verification();

        match self.inner.source.fetch_goal().await {
            Ok(Some(goal)) => {
                self.inner.cache.save(&goal);
                self.inner.land(Some(goal.clone()));
                debug!("goal confirmed by service");
                Some(goal)
            }
            Ok(None) => {
                self.inner.cache.clear();
                self.inner.land(None);
                info!("service reports no goal, cleared cached goal");
                None
            }
            Err(e) => {
                warn!(
                    kind = %e.kind(),
                    error = %e.message(),
                    "goal check failed, falling back to cached goal"
                );
                let cached = self.inner.cache.load_confirmed();
                self.inner.state.send_modify(|state| {
                    state.apply(cached.clone());
                    state.error = Some(e.user_message().to_string());
                    state.verifications += 1;
                });
                cached
            }
        }
    }

    /// Submit a new goal. On success it replaces the current one in state and
    /// cache; on failure nothing changes and the error is returned.
    pub async fn set_goal(&self, input: &GoalInput) -> Result<GoalRecord, ServiceError> {
        let goal = self
            .inner
            .source
            .submit_goal(input)
            .await
            .inspect_err(|e| warn!(error = %e, "failed to set goal"))?;

        self.inner.cache.save(&goal);
        self.inner.state.send_modify(|state| {
            state.apply(Some(goal.clone()));
            state.error = None;
            state.verifications += 1;
        });
        info!(calorie_target = goal.calorie_target, "goal saved");
        Ok(goal)
    }

    /// The decided status, or the cache flag while still undecided.
    pub fn check_goal_set(&self) -> bool {
        match self.status() {
            GoalStatus::Set => true,
            GoalStatus::Unset => false,
            GoalStatus::Unknown => self.is_goal_set_in_storage(),
        }
    }

    pub fn is_goal_set_in_storage(&self) -> bool {
        self.inner.cache.is_flag_set()
    }

    /// The goal as last confirmed in the cache, without asking the service.
    pub fn cached_goal(&self) -> Option<GoalRecord> {
        self.inner.cache.load_confirmed()
    }

    pub fn clear_error(&self) {
        self.inner.state.send_if_modified(|state| state.error.take().is_some());
    }

    fn spawn_background_verification(&self) {
        let manager = self.clone();
        tokio::spawn(async move {
            if manager.refresh().await.is_none() {
                info!("background goal verification found no goal");
            }
        });
    }

    // Only downgrade when nothing landed since the race began; a check that
    // finished right at the deadline has already decided the status.
    fn settle_unset_if_pending(&self, landed_before: u64) {
        self.inner.state.send_if_modified(|state| {
            if state.verifications != landed_before {
                return false;
            }
            state.apply(None);
            true
        });
    }
}
