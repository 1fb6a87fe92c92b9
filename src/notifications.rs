//! Deposit notification queue.
//!
//! Deposits are shown one at a time in arrival order. Each stays active for
//! its own timeout and is then dismissed before the next one is shown.
//! Observers follow along through a broadcast channel.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use ts_rs::TS;

use crate::scoreboard::types::DepositEvent;

pub const DEFAULT_TIMEOUT_MS: u32 = 5000;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DepositPayload {
    #[ts(optional)]
    pub amount: Option<f64>,
    #[ts(optional)]
    pub agent: Option<String>,
    #[ts(optional)]
    pub message: Option<String>,
    #[ts(optional)]
    pub timeout_ms: Option<u32>,
}

impl DepositPayload {
    fn display_for(&self) -> Duration {
        Duration::from_millis(u64::from(self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)))
    }
}

impl From<DepositEvent> for DepositPayload {
    fn from(event: DepositEvent) -> Self {
        let message = match event.currency.as_deref() {
            Some(cur) => format!("{} deposited {:.2} {cur}", event.agent_name, event.amount),
            None => format!("{} deposited {:.2}", event.agent_name, event.amount),
        };
        Self {
            amount: Some(event.amount),
            agent: Some(event.agent_name),
            message: Some(message),
            timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDeposit {
    pub id: u64,
    pub payload: DepositPayload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotifierEvent {
    Shown { id: u64, payload: DepositPayload },
    Dismissed { id: u64 },
}

/// Handle to the queue worker. Dropping every handle stops the worker once
/// the remaining queue has drained.
#[derive(Clone)]
pub struct DepositNotifier {
    queue: mpsc::UnboundedSender<ActiveDeposit>,
    events: broadcast::Sender<NotifierEvent>,
    next_id: Arc<AtomicU64>,
    pending: Arc<AtomicUsize>,
    active: Arc<Mutex<Option<ActiveDeposit>>>,
}

impl DepositNotifier {
    /// Start the worker on the current tokio runtime.
    pub fn spawn() -> Self {
        let (queue, rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let notifier = Self {
            queue,
            events,
            next_id: Arc::new(AtomicU64::new(0)),
            pending: Arc::new(AtomicUsize::new(0)),
            active: Arc::new(Mutex::new(None)),
        };

        tokio::spawn(run_queue(
            rx,
            notifier.events.clone(),
            notifier.pending.clone(),
            notifier.active.clone(),
        ));
        notifier
    }

    /// Enqueue a notification and return its id. Ids start at 1.
    pub fn notify(&self, payload: DepositPayload) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.queue.send(ActiveDeposit { id, payload }).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            tracing::warn!(id, "Deposit queue closed, notification dropped");
        }
        id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotifierEvent> {
        self.events.subscribe()
    }

    pub fn active(&self) -> Option<ActiveDeposit> {
        self.active.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Notifications waiting behind the active one.
    pub fn queued(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

async fn run_queue(
    mut rx: mpsc::UnboundedReceiver<ActiveDeposit>,
    events: broadcast::Sender<NotifierEvent>,
    pending: Arc<AtomicUsize>,
    active: Arc<Mutex<Option<ActiveDeposit>>>,
) {
    while let Some(next) = rx.recv().await {
        pending.fetch_sub(1, Ordering::SeqCst);
        let id = next.id;
        let hold = next.payload.display_for();

        *active.lock().unwrap_or_else(|e| e.into_inner()) = Some(next.clone());
        tracing::debug!(id, hold_ms = hold.as_millis() as u64, "Deposit shown");
        // No subscribers is fine.
        let _ = events.send(NotifierEvent::Shown {
            id,
            payload: next.payload,
        });

        tokio::time::sleep(hold).await;

        *active.lock().unwrap_or_else(|e| e.into_inner()) = None;
        let _ = events.send(NotifierEvent::Dismissed { id });
    }
    tracing::debug!("Deposit queue closed");
}
