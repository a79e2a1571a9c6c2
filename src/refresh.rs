//! Refresh signaling
//!
//! Other parts of the host (e.g. the transaction form in a sibling frontend)
//! announce "data changed" through a [`RefreshHub`]. Listeners either hold a
//! broadcast receiver or register a callback with [`RefreshHub::on_refresh`].
//! Uses tokio broadcast channels for pub/sub.

use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tokio::task::JoinHandle;

/// Name under which the host publishes data-changed notifications
pub const REFRESH_EVENT_NAME: &str = "bytebank-event";

/// "Data changed, recompute" signal. Carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshEvent;

impl RefreshEvent {
    pub fn name(&self) -> &'static str {
        REFRESH_EVENT_NAME
    }
}

/// Configuration for the refresh hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Capacity of the broadcast channel
    pub capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self { capacity: 64 }
    }
}

/// Publishes refresh events to every subscriber
#[derive(Clone)]
pub struct RefreshHub {
    tx: broadcast::Sender<RefreshEvent>,
}

impl RefreshHub {
    pub fn new(config: HubConfig) -> Self {
        let (tx, _) = broadcast::channel(config.capacity.max(1));
        Self { tx }
    }

    /// Publish a refresh event.
    ///
    /// Returns the number of subscribers reached; zero when nobody listens.
    pub fn notify(&self) -> usize {
        match self.tx.send(RefreshEvent) {
            Ok(receivers) => {
                tracing::debug!(event = REFRESH_EVENT_NAME, receivers, "Refresh published");
                receivers
            }
            Err(_) => {
                tracing::trace!(event = REFRESH_EVENT_NAME, "Refresh published with no listeners");
                0
            }
        }
    }

    /// Receiver for subsequent refresh events
    pub fn subscribe(&self) -> broadcast::Receiver<RefreshEvent> {
        self.tx.subscribe()
    }

    /// Get the current subscriber count
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Run `callback` once per refresh event until the hub is dropped.
    ///
    /// Abort the returned handle to unregister.
    pub fn on_refresh<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: Fn() + Send + 'static,
    {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            while next_refresh(&mut rx).await {
                callback();
            }
        })
    }
}

impl Default for RefreshHub {
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}

/// Wait for the next refresh.
///
/// A lagging receiver is drained, so a whole missed burst (including the
/// events still retained in the channel) collapses into one refresh.
/// Returns `false` once every sender is gone.
pub async fn next_refresh(rx: &mut broadcast::Receiver<RefreshEvent>) -> bool {
    match rx.recv().await {
        Ok(_) => true,
        Err(RecvError::Lagged(missed)) => {
            let retained = drain(rx);
            tracing::debug!(missed, retained, "Refresh receiver lagged, coalescing");
            true
        }
        Err(RecvError::Closed) => false,
    }
}

/// Discard everything currently queued for `rx`
fn drain(rx: &mut broadcast::Receiver<RefreshEvent>) -> usize {
    let mut discarded = 0;
    loop {
        match rx.try_recv() {
            Ok(_) => discarded += 1,
            Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return discarded,
        }
    }
}
