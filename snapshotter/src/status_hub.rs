use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use structures::SnapshotGenerationStatus;

pub type StatusCallback = Arc<dyn Fn(&SnapshotGenerationStatus) + Send + Sync>;

struct HubState {
    status: SnapshotGenerationStatus,
    subscribers: Vec<(u64, StatusCallback)>,
    next_id: u64,
}

/// Current status plus the callbacks that hear about every change to it.
pub(crate) struct StatusHub {
    state: Mutex<HubState>,
}

impl StatusHub {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(HubState {
                status: SnapshotGenerationStatus::idle(),
                subscribers: Vec::new(),
                next_id: 0,
            }),
        })
    }

    pub(crate) fn current(&self) -> SnapshotGenerationStatus {
        self.state.lock().status.clone()
    }

    /// Registers `callback` and immediately hands it the current status.
    pub(crate) fn subscribe(self: &Arc<Self>, callback: StatusCallback) -> Subscription {
        let (id, status) = {
            let mut state = self.state.lock();
            let id = state.next_id;
            state.next_id += 1;
            state.subscribers.push((id, callback.clone()));
            (id, state.status.clone())
        };

        callback(&status);

        Subscription {
            id,
            hub: Arc::downgrade(self),
        }
    }

    fn unsubscribe(&self, id: u64) -> bool {
        let mut state = self.state.lock();
        let before = state.subscribers.len();
        state.subscribers.retain(|(subscriber, _)| *subscriber != id);
        state.subscribers.len() != before
    }

    /// Applies `update` and notifies subscribers in registration order.
    ///
    /// The lock is released before any callback runs, so callbacks may subscribe,
    /// unsubscribe or read the status without deadlocking.
    pub(crate) fn update(&self, update: impl FnOnce(&mut SnapshotGenerationStatus)) {
        let (status, subscribers) = {
            let mut state = self.state.lock();
            update(&mut state.status);
            let subscribers: Vec<StatusCallback> = state
                .subscribers
                .iter()
                .map(|(_, callback)| callback.clone())
                .collect();
            (state.status.clone(), subscribers)
        };

        for callback in subscribers {
            callback(&status);
        }
    }
}

/// Handle returned by `SnapshotService::subscribe`.
#[must_use = "dropping the handle keeps the callback registered; call unsubscribe to remove it"]
pub struct Subscription {
    id: u64,
    hub: Weak<StatusHub>,
}

impl Subscription {
    /// Removes the callback. Returns false when it was already gone or the service was dropped.
    pub fn unsubscribe(self) -> bool {
        match self.hub.upgrade() {
            Some(hub) => hub.unsubscribe(self.id),
            None => false,
        }
    }
}
