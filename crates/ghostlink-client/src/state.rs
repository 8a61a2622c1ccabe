//! State shared between the lifecycle controller and the polling thread.

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::avatar::LocalEncoder;
use crate::gate::SyncGate;
use crate::registry::PlayerRegistry;

pub(crate) struct SharedState {
    pub gate: SyncGate,
    pub registry: Mutex<PlayerRegistry>,
    pub local: Mutex<Box<dyn LocalEncoder>>,
    /// Persistent companion keys, resolved at most once per client lifetime.
    pub keys: OnceCell<Vec<u64>>,
}
