//! Sequenced budget refreshes.
//!
//! Each refresh of a work pack's budget gets a request id. A completed load is only
//! published when its id is still the latest issued for that work pack, so a slow
//! response can never overwrite the result of a newer request.
//!
//! Slots only outlive a request for work packs that exist: a load that fails with
//! not-found drops its slot, and deleting a work pack should call
//! [`BudgetRefresher::forget`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, error};

use crate::context::OrgContext;

use super::budget_model::BudgetViewState;
use super::budget_service::load_work_pack_budget;
use super::budget_traits::BudgetSourceTrait;

/// Message shown when either budget input could not be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Could not load budget";

type SlotKey = (String, String);

struct Slot {
    latest_request_id: u64,
    state: BudgetViewState,
}

pub struct BudgetRefresher {
    source: Arc<dyn BudgetSourceTrait>,
    next_request_id: AtomicU64,
    slots: RwLock<HashMap<SlotKey, Slot>>,
}

impl BudgetRefresher {
    pub fn new(source: Arc<dyn BudgetSourceTrait>) -> Self {
        Self {
            source,
            next_request_id: AtomicU64::new(0),
            slots: RwLock::new(HashMap::new()),
        }
    }

    fn slot_key(ctx: &OrgContext, work_pack_id: &str) -> SlotKey {
        (ctx.organization_id().to_string(), work_pack_id.to_string())
    }

    fn read_slots(&self) -> RwLockReadGuard<'_, HashMap<SlotKey, Slot>> {
        self.slots.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_slots(&self) -> RwLockWriteGuard<'_, HashMap<SlotKey, Slot>> {
        self.slots.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Current state of the work pack's budget screen.
    pub fn state(&self, ctx: &OrgContext, work_pack_id: &str) -> BudgetViewState {
        self.read_slots()
            .get(&Self::slot_key(ctx, work_pack_id))
            .map(|slot| slot.state.clone())
            .unwrap_or(BudgetViewState::Idle)
    }

    fn begin(&self, key: &SlotKey) -> u64 {
        let request_id = self.next_request_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mut slots = self.write_slots();
        slots.insert(
            key.clone(),
            Slot {
                latest_request_id: request_id,
                state: BudgetViewState::Loading { request_id },
            },
        );
        request_id
    }

    /// Drops the state kept for a work pack, e.g. once it has been deleted.
    pub fn forget(&self, ctx: &OrgContext, work_pack_id: &str) {
        if self
            .write_slots()
            .remove(&Self::slot_key(ctx, work_pack_id))
            .is_some()
        {
            debug!("Dropped budget state for work pack {}", work_pack_id);
        }
    }

    /// Number of work packs with state kept.
    pub fn tracked_count(&self) -> usize {
        self.read_slots().len()
    }

    /// Stores `state` if it belongs to the latest request and returns whatever is
    /// current afterwards. With `retain` unset the slot is removed instead, and
    /// `state` is only handed back to the caller.
    fn publish(
        &self,
        key: &SlotKey,
        request_id: u64,
        state: BudgetViewState,
        retain: bool,
    ) -> BudgetViewState {
        let mut slots = self.write_slots();
        match slots.get(key).map(|slot| slot.latest_request_id) {
            Some(latest) if latest == request_id => {
                if retain {
                    slots.insert(
                        key.clone(),
                        Slot {
                            latest_request_id: request_id,
                            state: state.clone(),
                        },
                    );
                } else {
                    slots.remove(key);
                }
                state
            }
            Some(latest) => {
                debug!(
                    "Discarding budget result for request {} superseded by request {}",
                    request_id, latest
                );
                slots
                    .get(key)
                    .map(|slot| slot.state.clone())
                    .unwrap_or(BudgetViewState::Idle)
            }
            None => BudgetViewState::Idle,
        }
    }

    /// Reloads both budget inputs and recomputes the budget.
    ///
    /// Returns the state current once this request finishes, which is a newer
    /// request's state when this one was superseded in the meantime.
    pub async fn refresh(&self, ctx: &OrgContext, work_pack_id: &str) -> BudgetViewState {
        let key = Self::slot_key(ctx, work_pack_id);
        let request_id = self.begin(&key);
        debug!(
            "Refreshing budget for work pack {} (request {})",
            work_pack_id, request_id
        );

        let (state, retain) =
            match load_work_pack_budget(self.source.as_ref(), ctx, work_pack_id).await {
                Ok(budget) => (BudgetViewState::Loaded { request_id, budget }, true),
                Err(e) => {
                    error!(
                        "Failed to load budget for work pack {}: {}",
                        work_pack_id, e
                    );
                    let failed = BudgetViewState::LoadFailed {
                        request_id,
                        message: format!("{}: {}", LOAD_FAILED_MESSAGE, e),
                    };
                    (failed, !e.is_not_found())
                }
            };

        self.publish(&key, request_id, state, retain)
    }
}
