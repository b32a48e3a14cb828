use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::form::{FormError, FormEvent, FormState};

struct Session {
    form: FormState,
    last_touched: Instant,
}

impl Session {
    fn touch(&mut self) -> &mut FormState {
        self.last_touched = Instant::now();
        &mut self.form
    }
}

/// In-memory registry of open form sessions.
///
/// Each operation holds the write lock for its whole duration, so events on one
/// session are applied one at a time and no half-applied state is observable.
/// Sessions that nobody touches for the configured idle time are dropped by
/// `sweep_idle`.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new session and returns its id with the initial form. Seeded
    /// sessions start with one blank entry per section.
    pub async fn create(&self, seed_entries: bool) -> (Uuid, FormState) {
        let form = if seed_entries {
            FormState::seeded()
        } else {
            FormState::new()
        };
        let id = Uuid::new_v4();
        let session = Session {
            form: form.clone(),
            last_touched: Instant::now(),
        };
        self.sessions.write().await.insert(id, session);
        info!("Opened form session {id}");
        (id, form)
    }

    /// Ends a session. Returns `false` if it did not exist.
    pub async fn end(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!("Closed form session {id}");
        }
        removed
    }

    /// Reads count as activity, so the write lock is taken to refresh the
    /// idle clock.
    pub async fn read<T>(&self, id: Uuid, f: impl FnOnce(&FormState) -> T) -> Result<T, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
        Ok(f(session.touch()))
    }

    /// Applies one form operation and drains the render events it produced.
    pub async fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut FormState) -> Result<T, FormError>,
    ) -> Result<(T, Vec<FormEvent>), AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
        let state = session.touch();
        let value = f(state).map_err(|e| {
            debug!("Form operation on session {id} failed: {e}");
            AppError::from(e)
        })?;
        let events = state.drain_events();
        debug!("Session {id}: {} render event(s)", events.len());
        Ok((value, events))
    }

    /// Drops every session untouched for longer than `max_idle`. Returns how
    /// many were dropped.
    pub async fn sweep_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, session| {
            let keep = session.last_touched.elapsed() <= max_idle;
            if !keep {
                debug!("Expiring idle form session {id}");
            }
            keep
        });
        let expired = before - sessions.len();
        if expired > 0 {
            info!("Expired {expired} idle form session(s)");
        }
        expired
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Runs `sweep_idle` forever, checking a few times per idle period.
pub async fn run_idle_sweeper(store: SessionStore, max_idle: Duration) {
    let period = (max_idle / 4).max(Duration::from_secs(1));
    let mut ticker = tokio::time::interval(period);
    loop {
        ticker.tick().await;
        store.sweep_idle(max_idle).await;
    }
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}
