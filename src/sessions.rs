use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::workflow::{BookingWorkflow, SubmissionStatus, WorkflowStep, WorkflowView};

/// One open booking view
#[derive(Debug)]
pub struct BookingSession {
    pub owner: String,
    pub workflow: BookingWorkflow,
    pub last_touched: Instant,
}

impl BookingSession {
    fn is_submitting(&self) -> bool {
        *self.workflow.submission_status() == SubmissionStatus::Pending
    }
}

/// Booking views currently open, keyed by session id
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, BookingSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self, owner: &str, workflow: BookingWorkflow) -> (Uuid, WorkflowView) {
        let id = Uuid::new_v4();
        let view = workflow.view();
        self.inner.write().await.insert(
            id,
            BookingSession {
                owner: owner.to_string(),
                workflow,
                last_touched: Instant::now(),
            },
        );
        tracing::debug!(session_id = %id, owner = %owner, "Booking session opened");
        (id, view)
    }

    /// Run `f` against the caller's session and return its result. A session
    /// whose workflow ends up confirmed is discarded afterwards.
    pub async fn with_session<T>(
        &self,
        id: Uuid,
        owner: &str,
        f: impl FnOnce(&mut BookingWorkflow) -> T,
    ) -> AppResult<T> {
        let mut sessions = self.inner.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Booking session not found".to_string()))?;

        if session.owner != owner {
            return Err(AppError::Forbidden(
                "You can only access your own booking sessions".to_string(),
            ));
        }

        let result = f(&mut session.workflow);
        session.last_touched = Instant::now();

        if session.workflow.step() == WorkflowStep::Confirmation {
            sessions.remove(&id);
            tracing::debug!(session_id = %id, "Booking session confirmed and discarded");
        }
        Ok(result)
    }

    pub async fn close(&self, id: Uuid, owner: &str) -> AppResult<()> {
        let mut sessions = self.inner.write().await;
        match sessions.get(&id) {
            None => Err(AppError::NotFound("Booking session not found".to_string())),
            Some(session) if session.owner != owner => Err(AppError::Forbidden(
                "You can only access your own booking sessions".to_string(),
            )),
            Some(session) if session.is_submitting() => Err(AppError::Conflict(
                "Booking is being submitted, wait for the result".to_string(),
            )),
            Some(_) => {
                sessions.remove(&id);
                tracing::debug!(session_id = %id, "Booking session closed");
                Ok(())
            }
        }
    }

    /// Drop sessions nobody touched for `max_idle`. Sessions with a
    /// submission in flight are kept until the backend answers.
    pub async fn sweep_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| {
            session.is_submitting() || session.last_touched.elapsed() < max_idle
        });
        let swept = before - sessions.len();
        if swept > 0 {
            tracing::info!(swept, remaining = sessions.len(), "Idle booking sessions discarded");
        }
        swept
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
