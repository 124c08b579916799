use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use uuid::Uuid;

use super::progress_percent;

/// Live progress of in-flight uploads, one channel per session.
///
/// Only the newest upload of a session owns the channel; reporters of an older
/// upload keep sending into a channel nobody reads any more.
#[derive(Clone, Default)]
pub struct UploadRegistry {
    channels: Arc<Mutex<HashMap<Uuid, (Uuid, watch::Sender<u8>)>>>,
}

impl UploadRegistry {
    pub fn start(&self, session: Uuid, ticket: Uuid, total_bytes: u64) -> ProgressReporter {
        let (tx, _rx) = watch::channel(0u8);
        self.lock().insert(session, (ticket, tx.clone()));
        ProgressReporter {
            tx,
            sent: 0,
            total: total_bytes,
        }
    }

    pub fn current(&self, session: Uuid) -> Option<u8> {
        self.lock().get(&session).map(|(_, tx)| *tx.borrow())
    }

    /// Drops the session's channel if it still belongs to `ticket`.
    pub fn finish(&self, session: Uuid, ticket: Uuid) {
        let mut channels = self.lock();
        if channels.get(&session).is_some_and(|(owner, _)| *owner == ticket) {
            channels.remove(&session);
        }
    }

    pub fn forget(&self, session: Uuid) {
        self.lock().remove(&session);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, (Uuid, watch::Sender<u8>)>> {
        // A poisoned map only holds progress numbers; keep serving it.
        self.channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub struct ProgressReporter {
    tx: watch::Sender<u8>,
    sent: u64,
    total: u64,
}

impl ProgressReporter {
    /// Records `bytes` more as sent. Stays below 100 until [`Self::done`].
    pub fn advance(&mut self, bytes: u64) {
        self.sent = self.sent.saturating_add(bytes);
        let percent = progress_percent(self.sent, self.total).min(99);
        self.tx.send_replace(percent);
    }

    pub fn done(&self) {
        self.tx.send_replace(100);
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }
}
