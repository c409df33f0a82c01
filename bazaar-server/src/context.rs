//! Request context passed to every core operation

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

/// Recommended deadline for a search call
pub const SEARCH_DEADLINE: Duration = Duration::from_secs(2);
/// Recommended deadline for a recommendation call
pub const RECOMMENDATION_DEADLINE: Duration = Duration::from_secs(3);

/// Request-scoped values threaded in from the gateway
///
/// The core reads these for logging and for the deadline only.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub user_id: Option<Uuid>,
    pub deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            user_id: None,
            deadline: None,
        }
    }

    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline `timeout` from now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Run `work` until it finishes, `cancel` fires or the deadline passes
    ///
    /// Cancellation and deadline expiry both yield [`CoreError::Cancelled`].
    /// When either happens `cancel` is triggered so workers spawned by
    /// `work` stop as well.
    pub async fn guard<T, F>(&self, cancel: &CancellationToken, work: F) -> CoreResult<T>
    where
        F: Future<Output = CoreResult<T>>,
    {
        let raced = async {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(CoreError::Cancelled),
                result = work => result,
            }
        };

        let result = match self.deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, raced).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(request_id = %self.request_id, "Request deadline exceeded");
                    Err(CoreError::Cancelled)
                }
            },
            None => raced.await,
        };

        if matches!(result, Err(CoreError::Cancelled)) {
            cancel.cancel();
        }
        result
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
