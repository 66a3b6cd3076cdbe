use async_trait::async_trait;
use std::time::Duration;

/// Injectable delay used to simulate network latency.
///
/// The stub services have no transport behind them; the only observable
/// "network" behavior is the wait. Tests swap in [`NoDelay`] so suites run
/// synchronously.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that returns immediately
pub struct NoDelay;

#[async_trait]
impl Sleeper for NoDelay {
    async fn sleep(&self, _duration: Duration) {}
}
