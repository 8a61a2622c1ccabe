//! Wire protocol for the ghostlink presence-sync client.
//!
//! Messages exchanged between peers are flat byte buffers containing a
//! concatenation of tagged records. This crate owns the record framing and
//! the shared protocol vocabulary:
//!
//! - [`record`]: record encoding/decoding
//! - [`label`]: the closed set of record tags
//! - [`channel`]: logical channel kinds and their delivery semantics
//! - [`constants`]: framing sizes and roster capacity
//! - [`error`]: protocol error type

pub mod channel;
pub mod constants;
pub mod error;
pub mod label;
pub mod record;

pub use channel::{ChannelKind, channel_for_label};
pub use constants::{MAX_PEERS, MAX_RECORD_PAYLOAD, RECORD_HEADER_LEN};
pub use error::ProtoError;
pub use label::DataLabel;
pub use record::{RecordView, decode_records, encode_record};

/// Transport-assigned participant identifier.
///
/// Unique among connected peers at any point in time, but not stable across
/// reconnects.
pub type PeerId = u8;
