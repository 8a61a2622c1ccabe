//! The rate-limited sync loop.
//!
//! A dedicated polling thread runs this loop for the life of the client. The
//! gate phase is checked at the top of every iteration; while `Idle` the loop
//! only re-checks at a coarse interval, and while `Active` each tick drains
//! the inbound queues and steps the roster, then emits at most one outbound
//! snapshot. The loop is fixed-rate, not fixed-deadline: a slow tick is
//! followed by the next tick's sleep-then-check with no catch-up.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use ghostlink_proto::{
    DataLabel, PeerId, ProtoError, channel_for_label, decode_records, encode_record,
};
use tracing::{debug, info, warn};

use crate::gate::SyncPhase;
use crate::state::SharedState;
use crate::transport::Transport;

/// Tick period while the gate is `Active`.
pub const ACTIVE_TICK: Duration = Duration::from_millis(200);

/// Gate polling period while `Idle`.
pub const IDLE_POLL: Duration = Duration::from_millis(500);

pub(crate) struct Runner {
    shared: Arc<SharedState>,
    transport: Arc<dyn Transport>,
    running: Arc<AtomicBool>,
}

impl Runner {
    pub(crate) fn new(
        shared: Arc<SharedState>,
        transport: Arc<dyn Transport>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            shared,
            transport,
            running,
        }
    }

    pub(crate) fn run(&self) {
        debug!("sync loop started");
        while self.running.load(Ordering::Acquire) {
            match self.shared.gate.phase() {
                SyncPhase::Idle => std::thread::sleep(IDLE_POLL),
                SyncPhase::Active => {
                    self.tick();
                    std::thread::sleep(ACTIVE_TICK);
                }
            }
        }
        debug!("sync loop stopped");
    }

    fn tick(&self) {
        let epoch = self.shared.gate.epoch();

        if let Some(envelope) = self.transport.front_text() {
            info!(
                sender = envelope.sender,
                message = %String::from_utf8_lossy(&envelope.bytes),
                "text message"
            );
            self.transport.pop_text();
        }

        if let Some(envelope) = self.transport.front_event() {
            self.dispatch(envelope.sender, &envelope.bytes, epoch);
            self.transport.pop_event();
        }

        for (sender, bytes) in self.transport.take_snapshots() {
            self.dispatch(sender, &bytes, epoch);
        }

        let local_id = self.transport.local_id();
        self.shared.registry.lock().step_all(local_id, epoch);

        self.write_snapshot();
    }

    /// Decode one inbound message buffer and route each record.
    fn dispatch(&self, sender: PeerId, bytes: &[u8], epoch: u64) {
        debug!(sender, len = bytes.len(), "game message");
        let (records, consumed) = decode_records(bytes);

        {
            let mut registry = self.shared.registry.lock();
            for record in &records {
                match record.data_label() {
                    Ok(label) => registry.apply_update(sender, label, record.payload, epoch),
                    Err(err) => warn!(sender, error = %err, "skipping record"),
                }
            }
        }

        if consumed < bytes.len() {
            let err = ProtoError::TruncatedRecord { offset: consumed };
            warn!(sender, error = %err, "discarding truncated trailing record");
        }
    }

    /// Encode the local player once; an empty encode suppresses the send.
    fn write_snapshot(&self) {
        let payload = self.shared.local.lock().encode();
        if payload.is_empty() {
            return;
        }
        match encode_record(DataLabel::PlayerSnapshot, &payload) {
            Ok(bytes) => self
                .transport
                .send(channel_for_label(DataLabel::PlayerSnapshot), bytes),
            Err(err) => warn!(error = %err, "dropping oversized local snapshot"),
        }
    }
}
