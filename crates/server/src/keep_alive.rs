//! Periodic self-ping that keeps idle hosting instances awake.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};

/// Something that can be pinged.
#[async_trait::async_trait]
pub trait Pinger: Send + Sync {
    /// Ping once. Returns the response status on success.
    async fn ping(&self) -> Result<u16, Box<dyn std::error::Error + Send + Sync>>;
}

/// Pings a URL with a plain GET.
pub struct HttpPinger {
    url: String,
    http_client: reqwest::Client,
}

impl HttpPinger {
    /// Create a pinger for `url`.
    #[must_use]
    pub fn new(url: String) -> Self {
        Self {
            url,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl Pinger for HttpPinger {
    async fn ping(&self) -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
        let response = self.http_client.get(&self.url).send().await?;
        Ok(response.status().as_u16())
    }
}

/// Ping every `period` until `shutdown` flips to `true` or its sender is dropped.
///
/// The first ping fires one full period after start.
pub async fn run_keep_alive(
    period: Duration,
    pinger: Arc<dyn Pinger>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // interval() completes its first tick immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match pinger.ping().await {
                    Ok(status) => tracing::debug!(status, "Keep-alive ping succeeded"),
                    Err(e) => tracing::warn!(error = %e, "Keep-alive ping failed"),
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    tracing::debug!("Keep-alive stopped");
}
