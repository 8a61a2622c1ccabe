//! Fixed-capacity roster of remote participants.
//!
//! Exactly [`MAX_PEERS`] slots exist for the life of the process. Roster
//! changes re-key the slots by transport identifier; level entry re-binds
//! each slot to its live companion object and level exit invalidates the
//! bindings again. Identifier-to-index lookup goes through a map rebuilt on
//! every roster change.

use std::collections::HashMap;

use ghostlink_proto::{DataLabel, MAX_PEERS, PeerId};
use tracing::{debug, error, warn};

use crate::avatar::RemoteAvatar;
use crate::game::ProcessRef;

/// Epoch value no live binding ever carries; real epochs start at 1.
const STALE_EPOCH: u64 = 0;

/// What to do with an update whose sender has no roster slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnroutedPolicy {
    /// Historical behavior: report the condition, then apply the update to
    /// slot 0 anyway.
    #[default]
    ApplyToSlotZero,
    /// Report the condition and drop the update.
    ReportOnly,
}

/// One fixed roster entry for a potential remote participant.
pub struct Slot {
    /// Transport identifier currently bound to this slot, if any.
    pub id: Option<PeerId>,
    /// Persistent companion key assigned to this slot index, if bootstrap
    /// produced one.
    pub key: Option<u64>,
    avatar: Box<dyn RemoteAvatar>,
    /// Level epoch the companion binding was created under.
    bound_epoch: u64,
}

pub struct PlayerRegistry {
    slots: Vec<Slot>,
    index: HashMap<PeerId, usize>,
    policy: UnroutedPolicy,
    unrouted: u64,
}

impl PlayerRegistry {
    /// Build the registry with exactly [`MAX_PEERS`] slots, one avatar each.
    pub fn new(
        policy: UnroutedPolicy,
        mut make_avatar: impl FnMut() -> Box<dyn RemoteAvatar>,
    ) -> Self {
        let slots = (0..MAX_PEERS)
            .map(|_| Slot {
                id: None,
                key: None,
                avatar: make_avatar(),
                bound_epoch: STALE_EPOCH,
            })
            .collect();
        Self {
            slots,
            index: HashMap::new(),
            policy,
            unrouted: 0,
        }
    }

    /// Full roster overwrite: slot `i` takes the `i`-th incoming identifier
    /// and remaining slots are cleared. A participant's previous slot index
    /// is not preserved.
    pub fn rebind_roster(&mut self, ids: &[PeerId]) {
        self.index.clear();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.id = ids.get(i).copied();
            if let Some(id) = slot.id {
                self.index.insert(id, i);
            }
        }
        if ids.len() > MAX_PEERS {
            warn!(
                incoming = ids.len(),
                capacity = MAX_PEERS,
                "roster exceeds capacity, extra participants ignored"
            );
        }
        debug!(roster = ?ids, "roster rebound");
    }

    /// Index of the slot bound to `sender`, if any.
    pub fn resolve(&self, sender: PeerId) -> Option<usize> {
        self.index.get(&sender).copied()
    }

    /// Route one decoded record to its sender's slot.
    ///
    /// An unregistered sender is always reported; the configured policy then
    /// decides between the historical slot-0 degradation and dropping the
    /// update. Slots whose binding predates `current_epoch` are left alone.
    pub fn apply_update(
        &mut self,
        sender: PeerId,
        label: DataLabel,
        payload: &[u8],
        current_epoch: u64,
    ) {
        let slot_index = match self.resolve(sender) {
            Some(index) => index,
            None => {
                self.unrouted += 1;
                error!(
                    sender,
                    ?label,
                    total = self.unrouted,
                    "update from unregistered participant"
                );
                match self.policy {
                    UnroutedPolicy::ApplyToSlotZero => 0,
                    UnroutedPolicy::ReportOnly => return,
                }
            }
        };

        let slot = &mut self.slots[slot_index];
        if slot.bound_epoch != current_epoch {
            debug!(slot = slot_index, "skipping update for stale binding");
            return;
        }
        slot.avatar.apply(label, payload);
    }

    /// Hand every avatar a fresh process token (game (re)opened).
    pub fn rebind_process(&mut self, process: &ProcessRef) {
        for slot in &mut self.slots {
            slot.avatar.rebind(process);
        }
    }

    /// Re-resolve companion bindings after a level (re)load. Slots beyond the
    /// available keys stay unbound.
    pub fn bind_companions(&mut self, keys: &[u64], process: &ProcessRef, epoch: u64) {
        if !keys.is_empty() && keys.len() < MAX_PEERS {
            warn!(
                keys = keys.len(),
                capacity = MAX_PEERS,
                "fewer companion keys than roster slots"
            );
        }
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.avatar.rebind(process);
            slot.key = keys.get(i).copied();
            if let Some(key) = slot.key {
                slot.avatar.bind_companion(key);
                slot.bound_epoch = epoch;
            } else {
                slot.bound_epoch = STALE_EPOCH;
            }
        }
    }

    /// Drop binding validity for every slot (level exited / game closed).
    pub fn invalidate_bindings(&mut self) {
        for slot in &mut self.slots {
            slot.bound_epoch = STALE_EPOCH;
        }
    }

    /// Per-tick housekeeping on every slot with a live binding.
    pub fn step_all(&mut self, local_id: PeerId, current_epoch: u64) {
        for slot in &mut self.slots {
            if slot.bound_epoch == current_epoch {
                slot.avatar.step(local_id);
            }
        }
    }

    /// Identifier layout in slot order.
    pub fn ids(&self) -> [Option<PeerId>; MAX_PEERS] {
        let mut out = [None; MAX_PEERS];
        for (i, slot) in self.slots.iter().enumerate() {
            out[i] = slot.id;
        }
        out
    }

    /// Updates that arrived with no matching roster slot so far.
    pub fn unrouted_count(&self) -> u64 {
        self.unrouted
    }
}
