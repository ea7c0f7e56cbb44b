//! Username availability checking.
//!
//! [`check_once`] is the single read used by the HTTP endpoint and the claim
//! flow. [`DebouncedChecker`] wraps it for interactive input: a lookup only
//! runs once the input has been stable for a quiet period, and results for
//! superseded input are discarded (last input wins). In-flight lookups are
//! never aborted, their results are simply ignored.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::CoreError;
use crate::username::{normalize_username, validate_username, UsernamePolicy, UsernameRejection};

/// Quiet period before a debounced lookup fires.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Read-only lookup of claimed usernames.
///
/// Implementations must be callable without an authenticated identity.
#[async_trait]
pub trait AvailabilityLookup: Send + Sync {
    /// Whether the normalized username is already claimed by anyone.
    async fn is_taken(&self, normalized: &str) -> Result<bool, CoreError>;
}

/// Outcome of an availability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Availability {
    Available,
    Taken,
    /// Failed format validation; no lookup was made.
    Invalid(UsernameRejection),
    /// The lookup failed. Callers should not block the user on this.
    Indeterminate,
}

impl Availability {
    /// `Some(true|false)` when the answer is known, `None` otherwise.
    pub fn is_available(self) -> Option<bool> {
        match self {
            Self::Available => Some(true),
            Self::Taken | Self::Invalid(_) => Some(false),
            Self::Indeterminate => None,
        }
    }
}

/// Validate, normalize and look up `raw` once.
pub async fn check_once<L>(lookup: &L, policy: &UsernamePolicy, raw: &str) -> Availability
where
    L: AvailabilityLookup + ?Sized,
{
    if let Err(reason) = validate_username(raw, policy) {
        return Availability::Invalid(reason);
    }

    let normalized = normalize_username(raw);
    match lookup.is_taken(&normalized).await {
        Ok(true) => Availability::Taken,
        Ok(false) => Availability::Available,
        Err(e) => {
            tracing::warn!(username = %normalized, error = %e, "Username availability lookup failed");
            Availability::Indeterminate
        }
    }
}

// ---------------------------------------------------------------------------
// Debounced checker
// ---------------------------------------------------------------------------

/// A published result, tagged with the input it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityUpdate {
    pub username: String,
    pub availability: Availability,
}

/// Debounced, last-input-wins availability checker.
///
/// Feed raw input with [`submit`](Self::submit) on every keystroke and
/// observe results through [`subscribe`](Self::subscribe). The background
/// task stops when the checker is dropped.
pub struct DebouncedChecker {
    input_tx: watch::Sender<Option<String>>,
    result_rx: watch::Receiver<Option<AvailabilityUpdate>>,
    task: JoinHandle<()>,
}

impl DebouncedChecker {
    /// Spawn the checker task on the current tokio runtime.
    pub fn spawn<L>(lookup: Arc<L>, policy: UsernamePolicy, quiet_period: Duration) -> Self
    where
        L: AvailabilityLookup + ?Sized + 'static,
    {
        let (input_tx, input_rx) = watch::channel(None);
        let (result_tx, result_rx) = watch::channel(None);

        let task = tokio::spawn(run_checker(
            lookup,
            policy,
            quiet_period,
            input_rx,
            result_tx,
        ));

        Self {
            input_tx,
            result_rx,
            task,
        }
    }

    /// Replace the pending input. Restarts the quiet period.
    pub fn submit(&self, input: impl Into<String>) {
        self.input_tx.send_replace(Some(input.into()));
    }

    /// Receiver for published results.
    pub fn subscribe(&self) -> watch::Receiver<Option<AvailabilityUpdate>> {
        self.result_rx.clone()
    }

    /// Most recently published result, if any.
    pub fn latest(&self) -> Option<AvailabilityUpdate> {
        self.result_rx.borrow().clone()
    }
}

impl Drop for DebouncedChecker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_checker<L>(
    lookup: Arc<L>,
    policy: UsernamePolicy,
    quiet_period: Duration,
    mut input_rx: watch::Receiver<Option<String>>,
    result_tx: watch::Sender<Option<AvailabilityUpdate>>,
) where
    L: AvailabilityLookup + ?Sized + 'static,
{
    loop {
        if input_rx.changed().await.is_err() {
            return;
        }

        // Every change during the quiet period restarts it.
        loop {
            tokio::select! {
                changed = input_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                () = tokio::time::sleep(quiet_period) => break,
            }
        }

        let Some(input) = input_rx.borrow_and_update().clone() else {
            continue;
        };

        let availability = check_once(lookup.as_ref(), &policy, &input).await;

        match input_rx.has_changed() {
            Ok(false) => {
                tracing::debug!(username = %input, ?availability, "Availability check resolved");
                result_tx.send_replace(Some(AvailabilityUpdate {
                    username: input,
                    availability,
                }));
            }
            Ok(true) => {
                tracing::debug!(username = %input, "Discarding stale availability result");
            }
            Err(_) => return,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
