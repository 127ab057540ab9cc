use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Source of delays for request timeouts and simulated latency.
///
/// Panels never reach for a runtime timer directly, so the core can be
/// driven by any executor.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Timer: Send + Sync + std::fmt::Debug {
    /// Completes once `duration` has elapsed.
    async fn sleep(&self, duration: Duration);
}

/// Native timer.
///
/// Inside a Tokio runtime this is `tokio::time::sleep` (and so honours a
/// paused test clock). Under any other executor the delay is measured on a
/// helper thread that wakes the awaiting task when it is done.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimer;

#[cfg(not(target_arch = "wasm32"))]
#[async_trait]
impl Timer for SystemTimer {
    async fn sleep(&self, duration: Duration) {
        if tokio::runtime::Handle::try_current().is_ok() {
            tokio::time::sleep(duration).await;
            return;
        }

        let (tx, rx) = futures::channel::oneshot::channel::<()>();
        let spawned = std::thread::Builder::new()
            .name("supply-forecast-timer".into())
            .spawn(move || {
                std::thread::sleep(duration);
                let _ = tx.send(());
            });
        match spawned {
            Ok(_) => {
                let _ = rx.await;
            }
            Err(e) => {
                // Without a timer thread the delay can never elapse.
                tracing::warn!(error = %e, "failed to start timer thread");
                futures::future::pending::<()>().await;
            }
        }
    }
}

/// The timer used when none is injected. `None` on targets without one:
/// requests are then bounded only by the HTTP client and simulated latency
/// is skipped.
pub fn default_timer() -> Option<Arc<dyn Timer>> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        Some(Arc::new(SystemTimer))
    }
    #[cfg(target_arch = "wasm32")]
    {
        None
    }
}
