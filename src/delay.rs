//! Injectable asynchronous delay.
//!
//! The PIN check waits a fixed time before answering, standing in for a
//! server round-trip. Production code sleeps on the tokio timer; tests swap in
//! [`NoDelay`] or their own gate.

use std::time::Duration;

use async_trait::async_trait;

#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Default, Clone, Copy)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Returns immediately.
#[derive(Default, Clone, Copy)]
pub struct NoDelay;

#[async_trait]
impl Delay for NoDelay {
    async fn wait(&self, _duration: Duration) {}
}
