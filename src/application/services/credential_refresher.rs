//! Single-flight access token renewal.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{broadcast, watch};

use super::token_store::TokenStore;
use crate::api::dto::auth::{RefreshRequest, RefreshResponse};
use crate::domain::repositories::{ApiRequest, HttpMethod, HttpTransport};
use crate::domain::session_event::SessionEvent;
use crate::error::AppError;

pub const REFRESH_PATH: &str = "/refresh-token";

const SESSION_EVENTS_CAPACITY: usize = 16;
const NO_REFRESH_TOKEN: &str = "No refresh token available";
const SESSION_EXPIRED: &str = "Session expired, please log in again";

/// New access token, or the reason the exchange was rejected.
type Outcome = Result<String, String>;

enum Phase {
    Idle,
    Refreshing(watch::Receiver<Option<Outcome>>),
    Failed,
}

/// Coalesces concurrent credential refreshes into one exchange.
///
/// The first caller that reports an expired access token starts a
/// `POST /refresh-token` exchange in a spawned task; every caller arriving
/// while it runs waits on the same outcome. A failed exchange clears the
/// [`TokenStore`], moves the refresher into a terminal failed phase and
/// broadcasts [`SessionEvent::Invalidated`].
///
/// # Example
///
/// ```no_run
/// # use std::sync::Arc;
/// # use shortener_dashboard::prelude::*;
/// # async fn run(refresher: Arc<CredentialRefresher>) -> Result<(), AppError> {
/// let fresh = refresher.refresh("expired-access-token").await?;
/// # Ok(())
/// # }
/// ```
pub struct CredentialRefresher {
    transport: Arc<dyn HttpTransport>,
    store: Arc<TokenStore>,
    phase: Mutex<Phase>,
    events: broadcast::Sender<SessionEvent>,
    exchanges: AtomicU64,
}

impl CredentialRefresher {
    pub fn new(transport: Arc<dyn HttpTransport>, store: Arc<TokenStore>) -> Self {
        let (events, _) = broadcast::channel(SESSION_EVENTS_CAPACITY);
        Self {
            transport,
            store,
            phase: Mutex::new(Phase::Idle),
            events,
            exchanges: AtomicU64::new(0),
        }
    }

    /// Returns a usable access token after `stale` was rejected.
    ///
    /// If another caller already renewed the token since `stale` was
    /// attached, the current token is returned without a new exchange.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AuthRejected`] if the exchange fails or the
    /// session was already invalidated.
    pub async fn refresh(self: &Arc<Self>, stale: &str) -> Result<String, AppError> {
        let mut outcome = {
            let mut phase = self.lock_phase();
            match *phase {
                Phase::Failed => return Err(AppError::auth_rejected(SESSION_EXPIRED)),
                Phase::Refreshing(ref outcome) => outcome.clone(),
                Phase::Idle => {
                    if let Some(current) = self.store.access_token()
                        && current != stale
                    {
                        tracing::debug!("Access token already renewed, reusing it");
                        return Ok(current);
                    }

                    let (tx, rx) = watch::channel(None);
                    *phase = Phase::Refreshing(rx.clone());

                    let this = Arc::clone(self);
                    tokio::spawn(async move {
                        let result = this.exchange().await;
                        this.settle(&result);
                        let _ = tx.send(Some(result));
                    });

                    rx
                }
            }
        };

        let settled = outcome
            .wait_for(Option::is_some)
            .await
            .map_err(|_| AppError::auth_rejected("Credential refresh was interrupted"))?
            .clone();

        match settled {
            Some(Ok(token)) => Ok(token),
            Some(Err(reason)) => Err(AppError::auth_rejected(reason)),
            None => Err(AppError::auth_rejected(SESSION_EXPIRED)),
        }
    }

    /// Terminates the session after the server rejected a renewed token.
    pub fn invalidate(&self, reason: &str) {
        self.fail(reason);
    }

    /// Returns to the idle phase after a new session was established.
    pub fn reset(&self) {
        *self.lock_phase() = Phase::Idle;
    }

    /// Subscribes to session lifecycle notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Publishes a session event to every subscriber.
    pub fn notify(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Number of refresh exchanges started so far.
    pub fn exchange_count(&self) -> u64 {
        self.exchanges.load(Ordering::Relaxed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(*self.lock_phase(), Phase::Failed)
    }

    async fn exchange(&self) -> Outcome {
        self.exchanges.fetch_add(1, Ordering::Relaxed);

        let refresh_token = self
            .store
            .refresh_token()
            .ok_or_else(|| NO_REFRESH_TOKEN.to_string())?;

        let body = serde_json::to_value(RefreshRequest {
            refresh_token: &refresh_token,
        })
        .map_err(|e| e.to_string())?;

        tracing::debug!("Exchanging refresh token");
        let response = self
            .transport
            .send(ApiRequest::new(HttpMethod::Post, REFRESH_PATH, Some(body)))
            .await
            .map_err(|e| e.to_string())?;

        if !response.is_success() {
            let error = AppError::from_status(response.status, response.body);
            return Err(match error {
                AppError::AuthExpired => "Invalid or expired refresh token".to_string(),
                other => other.to_string(),
            });
        }

        let renewed: RefreshResponse =
            serde_json::from_value(response.body).map_err(|e| e.to_string())?;

        let pair = self
            .store
            .replace_access(renewed.access_token, renewed.refresh_token, renewed.expires_in)
            .map_err(|e| e.to_string())?;

        Ok(pair.access_token)
    }

    fn settle(&self, result: &Outcome) {
        match result {
            Ok(_) => {
                *self.lock_phase() = Phase::Idle;
                tracing::info!("Access token renewed");
                self.notify(SessionEvent::Renewed);
            }
            Err(reason) => self.fail(reason),
        }
    }

    fn fail(&self, reason: &str) {
        if let Err(e) = self.store.clear() {
            tracing::error!("Failed to clear credentials: {e}");
        }
        *self.lock_phase() = Phase::Failed;
        tracing::warn!(reason, "Session invalidated");
        self.notify(SessionEvent::invalidated(reason));
    }

    fn lock_phase(&self) -> MutexGuard<'_, Phase> {
        self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
