//! Bounded concurrent fan-out
//!
//! Spawns one worker per input into a `JoinSet`. A worker holds a permit from
//! the request's semaphore for the length of its store call, so fan-outs
//! sharing one semaphore share one concurrency bound. Each worker writes its
//! result into its own slot; the supervisor only reads the slots once every
//! worker joined.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::error::{CoreError, CoreResult};

/// Default bound on concurrent store calls per request
pub const MAX_FANOUT: usize = 64;

/// What a failing worker does to its siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// First error cancels `scope` and is returned
    FailFast,
    /// Errors are logged and the slot stays empty
    BestEffort,
}

/// Permit pool bounding all store calls of one request
pub fn request_permits(max_fanout: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(max_fanout.max(1)))
}

/// Run `op` over every input, one permit from `permits` per call in flight
///
/// Returns one slot per input, in input order. A slot is `None` when its
/// worker failed under [`FailurePolicy::BestEffort`]. Nothing partial is
/// returned when `scope` is cancelled: the result is then the first real
/// error, or [`CoreError::Cancelled`].
pub async fn fan_out<I, T, F, Fut>(
    inputs: Vec<I>,
    permits: &Arc<Semaphore>,
    policy: FailurePolicy,
    scope: &CancellationToken,
    op: F,
) -> CoreResult<Vec<Option<T>>>
where
    I: Send + 'static,
    T: Send + 'static,
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CoreResult<T>> + Send + 'static,
{
    if inputs.is_empty() {
        return if scope.is_cancelled() {
            Err(CoreError::Cancelled)
        } else {
            Ok(Vec::new())
        };
    }

    let slots: Arc<Mutex<Vec<Option<T>>>> =
        Arc::new(Mutex::new(inputs.iter().map(|_| None).collect()));
    let op = Arc::new(op);
    let mut workers = JoinSet::new();

    for (index, input) in inputs.into_iter().enumerate() {
        let slots = Arc::clone(&slots);
        let semaphore = Arc::clone(permits);
        let op = Arc::clone(&op);
        let scope = scope.clone();

        workers.spawn(
            async move {
                let _permit = tokio::select! {
                    biased;
                    _ = scope.cancelled() => return Ok(()),
                    permit = semaphore.acquire_owned() => match permit {
                        Ok(permit) => permit,
                        Err(_) => {
                            return Err(CoreError::Internal("fan-out semaphore closed".into()));
                        }
                    },
                };
                if scope.is_cancelled() {
                    return Ok(());
                }

                let result = tokio::select! {
                    biased;
                    _ = scope.cancelled() => return Ok(()),
                    result = op(input) => result,
                };

                match result {
                    Ok(value) => {
                        slots.lock()[index] = Some(value);
                        Ok(())
                    }
                    Err(e) if policy == FailurePolicy::FailFast => {
                        scope.cancel();
                        Err(e)
                    }
                    Err(e) => {
                        tracing::warn!(index, error = %e, "Fan-out worker failed, skipping");
                        Ok(())
                    }
                }
            }
            .in_current_span(),
        );
    }

    let mut first_error: Option<CoreError> = None;
    while let Some(joined) = workers.join_next().await {
        let outcome = joined.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Fan-out worker panicked");
            match policy {
                FailurePolicy::FailFast => {
                    scope.cancel();
                    Err(CoreError::Internal(format!("fan-out worker panicked: {e}")))
                }
                // The slot was never written and stays empty
                FailurePolicy::BestEffort => Ok(()),
            }
        });
        if let Err(e) = outcome {
            // A worker that lost the race reports Cancelled; keep the cause
            match &first_error {
                None => first_error = Some(e),
                Some(CoreError::Cancelled) if !e.is_cancelled() => first_error = Some(e),
                Some(_) => {}
            }
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }
    if scope.is_cancelled() {
        return Err(CoreError::Cancelled);
    }

    let slots = std::mem::take(&mut *slots.lock());
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let scope = CancellationToken::new();
        let out = fan_out(
            vec![30u64, 10, 20],
            &request_permits(MAX_FANOUT),
            FailurePolicy::FailFast,
            &scope,
            |ms| async move {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                Ok(ms)
            },
        )
        .await
        .unwrap();
        assert_eq!(out, vec![Some(30), Some(10), Some(20)]);
    }

    #[tokio::test]
    async fn test_limit_bounds_in_flight_workers() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let scope = CancellationToken::new();

        let (in_flight_op, peak_op) = (Arc::clone(&in_flight), Arc::clone(&peak));
        let out = fan_out(
            (0..20).collect(),
            &request_permits(3),
            FailurePolicy::FailFast,
            &scope,
            move |i: usize| {
                let in_flight = Arc::clone(&in_flight_op);
                let peak = Arc::clone(&peak_op);
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok(i)
                }
            },
        )
        .await
        .unwrap();

        assert_eq!(out.len(), 20);
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_fail_fast_cancels_siblings() {
        let scope = CancellationToken::new();
        let started = tokio::time::Instant::now();
        let result = fan_out(
            vec![0u32, 1, 2],
            &request_permits(MAX_FANOUT),
            FailurePolicy::FailFast,
            &scope,
            |i| async move {
                if i == 1 {
                    return Err(CoreError::BackendUnavailable("store down".into()));
                }
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(i)
            },
        )
        .await;

        assert!(matches!(result, Err(CoreError::BackendUnavailable(_))));
        assert!(scope.is_cancelled());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_best_effort_leaves_failed_slot_empty() {
        let scope = CancellationToken::new();
        let out = fan_out(
            vec![0u32, 1, 2],
            &request_permits(MAX_FANOUT),
            FailurePolicy::BestEffort,
            &scope,
            |i| async move {
                if i == 1 {
                    Err(CoreError::BackendUnavailable("store down".into()))
                } else {
                    Ok(i)
                }
            },
        )
        .await
        .unwrap();

        assert_eq!(out, vec![Some(0), None, Some(2)]);
        assert!(!scope.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_scope_returns_cancelled() {
        let scope = CancellationToken::new();
        let canceller = scope.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let result = fan_out(
            vec![0u32, 1],
            &request_permits(MAX_FANOUT),
            FailurePolicy::BestEffort,
            &scope,
            |i| async move {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(i)
            },
        )
        .await;
        assert!(matches!(result, Err(CoreError::Cancelled)));
    }

    #[tokio::test]
    async fn test_concurrent_fan_outs_share_one_bound() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let permits = request_permits(4);
        let scope = CancellationToken::new();

        let tracked = |in_flight: Arc<AtomicUsize>, peak: Arc<AtomicUsize>| {
            move |i: usize| {
                let in_flight = Arc::clone(&in_flight);
                let peak = Arc::clone(&peak);
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok(i)
                }
            }
        };

        let (left, right) = tokio::join!(
            fan_out(
                (0..10).collect(),
                &permits,
                FailurePolicy::FailFast,
                &scope,
                tracked(Arc::clone(&in_flight), Arc::clone(&peak)),
            ),
            fan_out(
                (0..10).collect(),
                &permits,
                FailurePolicy::FailFast,
                &scope,
                tracked(Arc::clone(&in_flight), Arc::clone(&peak)),
            ),
        );

        assert_eq!(left.unwrap().len(), 10);
        assert_eq!(right.unwrap().len(), 10);
        assert!(peak.load(Ordering::SeqCst) <= 4);
    }

    #[tokio::test]
    async fn test_best_effort_survives_a_panicking_worker() {
        let scope = CancellationToken::new();
        let out = fan_out(
            vec![0u32, 1, 2],
            &request_permits(MAX_FANOUT),
            FailurePolicy::BestEffort,
            &scope,
            |i| async move {
                if i == 1 {
                    panic!("worker {i} blew up");
                }
                Ok(i)
            },
        )
        .await
        .unwrap();

        assert_eq!(out, vec![Some(0), None, Some(2)]);
        assert!(!scope.is_cancelled());
    }

    #[tokio::test]
    async fn test_fail_fast_panicking_worker_is_internal() {
        let scope = CancellationToken::new();
        let result = fan_out(
            vec![0u32, 1],
            &request_permits(MAX_FANOUT),
            FailurePolicy::FailFast,
            &scope,
            |i| async move {
                if i == 1 {
                    panic!("worker {i} blew up");
                }
                Ok(i)
            },
        )
        .await;

        assert!(matches!(result, Err(CoreError::Internal(_))));
    }
}
