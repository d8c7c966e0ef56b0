//! Optimistic assignment deletion with a bounded undo window.
//!
//! ```text
//! Idle --request--> Confirming --confirm--> Pending --undo/expire--> Idle
//! ```
//!
//! Only one delete can be pending at a time. Confirming a new delete closes
//! the undo window of the previous one.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::DEFAULT_UNDO_WINDOW_MS;
use crate::data::{Assignment, AssignmentId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub item: Assignment,
    /// Position of `item` before it was removed.
    pub index: usize,
    pub snapshot_after_delete: Vec<Assignment>,
}

impl PendingDelete {
    fn restore(self) -> Vec<Assignment> {
        let mut restored = self.snapshot_after_delete;
        let at = self.index.min(restored.len());
        restored.insert(at, self.item);
        restored
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteStatus {
    Idle,
    Confirming(AssignmentId),
    Pending(AssignmentId),
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    pending: Option<PendingDelete>,
}

#[derive(Debug)]
pub struct DeleteCoordinator {
    window: Duration,
    confirming: Option<Assignment>,
    slot: Arc<Mutex<Slot>>,
    timer: Option<JoinHandle<()>>,
}

impl Default for DeleteCoordinator {
    fn default() -> Self {
        DeleteCoordinator::new(Duration::from_millis(DEFAULT_UNDO_WINDOW_MS))
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl DeleteCoordinator {
    pub fn new(window: Duration) -> DeleteCoordinator {
        DeleteCoordinator {
            window,
            confirming: None,
            slot: Arc::new(Mutex::new(Slot::default())),
            timer: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn status(&self) -> DeleteStatus {
        if let Some(target) = &self.confirming {
            return DeleteStatus::Confirming(target.id.clone());
        }
        match &lock(&self.slot).pending {
            Some(pending) => DeleteStatus::Pending(pending.item.id.clone()),
            None => DeleteStatus::Idle,
        }
    }

    /// The assignment that can still be restored, if any.
    pub fn pending_item(&self) -> Option<Assignment> {
        lock(&self.slot).pending.as_ref().map(|p| p.item.clone())
    }

    pub fn confirming(&self) -> Option<&Assignment> {
        self.confirming.as_ref()
    }

    /// Asks for confirmation. Nothing is removed yet and an open undo window
    /// stays open.
    pub fn request_delete(&mut self, target: Assignment) {
        tracing::debug!("Delete of assignment '{}' awaiting confirmation", target.id);
        self.confirming = Some(target);
    }

    pub fn cancel_request(&mut self) {
        self.confirming = None;
    }

    /// Removes the assignment awaiting confirmation from `assignments` and
    /// returns the new list. The removal can be undone until the window
    /// closes.
    ///
    /// Returns `None` when no delete was requested or the target is no longer
    /// in `assignments`.
    pub fn confirm_delete(&mut self, assignments: &[Assignment]) -> Option<Vec<Assignment>> {
        let target = self.confirming.take()?;

        let index = match assignments.iter().position(|a| a.id == target.id) {
            Some(index) => index,
            None => {
                tracing::debug!("Assignment '{}' already gone, nothing to delete", target.id);
                return None;
            }
        };

        let updated: Vec<Assignment> = assignments
            .iter()
            .filter(|a| a.id != target.id)
            .cloned()
            .collect();

        self.cancel_timer();

        let generation = {
            let mut slot = lock(&self.slot);
            slot.generation += 1;
            slot.pending = Some(PendingDelete {
                item: target,
                index,
                snapshot_after_delete: updated.clone(),
            });
            slot.generation
        };

        self.schedule_expiry(generation);

        Some(updated)
    }

    /// Puts the pending assignment back where it was. `None` when nothing is
    /// pending, e.g. because the window already closed.
    pub fn undo(&mut self) -> Option<Vec<Assignment>> {
        self.cancel_timer();
        let pending = lock(&self.slot).pending.take()?;
        tracing::info!("Restoring assignment '{}'", pending.item.id);
        Some(pending.restore())
    }

    /// Closes the undo window; the delete becomes permanent.
    pub fn expire(&mut self) {
        self.cancel_timer();
        let mut slot = lock(&self.slot);
        slot.generation += 1;
        if let Some(pending) = slot.pending.take() {
            tracing::debug!("Delete of assignment '{}' is now permanent", pending.item.id);
        }
    }

    /// Same as [`expire`](Self::expire); used when the undo notice is closed.
    pub fn dismiss(&mut self) {
        self.expire();
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn schedule_expiry(&mut self, generation: u64) {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!("No async runtime available, undo window stays open until closed");
                return;
            }
        };

        let slot = Arc::clone(&self.slot);
        let window = self.window;

        self.timer = Some(handle.spawn(async move {
            tokio::time::sleep(window).await;
            let mut slot = lock(&slot);
            // a newer delete owns the slot now
            if slot.generation == generation {
                if let Some(pending) = slot.pending.take() {
                    tracing::debug!("Undo window for '{}' closed", pending.item.id);
                }
            }
        }));
    }
}

impl Drop for DeleteCoordinator {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
