//! Avatar codec interfaces.
//!
//! The routines that turn live in-process game objects into and from wire
//! bytes live outside this crate. These traits are their boundary: the sync
//! layer tells a codec *when* to rebind, encode, or apply, never *how*.

use ghostlink_proto::{DataLabel, PeerId};

use crate::game::ProcessRef;

/// Encoder for the locally controlled character.
///
/// The encoder owns whatever pointers it needs into the live game process.
/// `rebind` hands it a fresh capability token after the process reopens, and
/// `refresh` re-reads object pointers on level entry.
pub trait LocalEncoder: Send {
    fn rebind(&mut self, process: &ProcessRef);

    fn refresh(&mut self);

    /// Encode the current state once per sync cycle.
    ///
    /// An empty result means nothing changed and suppresses the outbound
    /// snapshot for that cycle.
    fn encode(&mut self) -> Vec<u8>;
}

/// A remote participant's puppet: the mirrored player character plus its
/// companion object, mutated in place from decoded wire records.
pub trait RemoteAvatar: Send {
    fn rebind(&mut self, process: &ProcessRef);

    /// Re-resolve the companion object from its persistent key after a level
    /// (re)load.
    fn bind_companion(&mut self, key: u64);

    /// Apply one decoded record to the bound objects. Both label variants
    /// route to the same underlying per-object apply routine.
    fn apply(&mut self, label: DataLabel, payload: &[u8]);

    /// Per-tick housekeeping independent of inbound data (interpolation
    /// and prediction).
    fn step(&mut self, local_id: PeerId);
}
