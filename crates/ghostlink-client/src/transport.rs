//! Transport collaborator interface.
//!
//! The transport owns connection establishment, reliability, and message
//! queueing. This layer only polls its three logical queues, sends tagged
//! payloads, and listens for roster changes.

use std::collections::BTreeMap;

use ghostlink_proto::{ChannelKind, PeerId};

use crate::error::ClientError;

/// One message taken from a transport queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub sender: PeerId,
    pub bytes: Vec<u8>,
}

/// Callback delivering the current list of connected participant identifiers
/// whenever the roster changes.
pub type RosterListener = Box<dyn Fn(Vec<PeerId>) + Send + Sync>;

pub trait Transport: Send + Sync {
    /// Connect to the server. Failure is fatal to client startup; no retry
    /// happens at this layer.
    fn start(&self, addr: &str) -> Result<(), ClientError>;

    fn stop(&self);

    /// Identifier the server assigned to this client.
    fn local_id(&self) -> PeerId;

    /// Oldest unconsumed text message, without consuming it.
    fn front_text(&self) -> Option<Envelope>;
    fn pop_text(&self);

    /// Oldest unconsumed event message, without consuming it.
    fn front_event(&self) -> Option<Envelope>;
    fn pop_event(&self);

    /// Drain the snapshot map: the latest unconsumed message per sender.
    /// The underlying collection is cleared by this call.
    fn take_snapshots(&self) -> BTreeMap<PeerId, Vec<u8>>;

    /// Send tagged bytes on a channel; the transport stamps the sender.
    fn send(&self, channel: ChannelKind, bytes: Vec<u8>);

    /// Register the roster-change listener. At most one listener is active;
    /// registering again replaces it.
    fn set_roster_listener(&self, listener: RosterListener);
}
