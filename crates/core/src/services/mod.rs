pub mod forecast_service;
pub mod market_service;
pub mod navigation_service;
pub mod presentation_service;
pub mod product_service;
pub mod session_service;
pub mod timer;

use futures::future::{self, Either};
use std::future::Future;
use std::time::Duration;

use crate::errors::CoreError;
use timer::Timer;

/// Default upper bound for a single service call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Run `fut`, failing with [`CoreError::Timeout`] once `limit` elapses on
/// `timer`. Without a timer the call is bounded only by the HTTP client.
pub(crate) async fn with_timeout<T, F>(
    timer: Option<&dyn Timer>,
    endpoint: &str,
    limit: Duration,
    fut: F,
) -> Result<T, CoreError>
where
    F: Future<Output = Result<T, CoreError>>,
{
    let Some(timer) = timer else {
        return fut.await;
    };

    futures::pin_mut!(fut);
    match future::select(fut, timer.sleep(limit)).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => {
            tracing::warn!(endpoint, timeout_ms = limit.as_millis() as u64, "request timed out");
            Err(CoreError::Timeout(endpoint.to_string()))
        }
    }
}
