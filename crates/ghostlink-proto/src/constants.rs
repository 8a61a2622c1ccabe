/// Per-record framing overhead: one label byte plus one payload-length byte.
pub const RECORD_HEADER_LEN: usize = 2;

/// Maximum payload bytes a single record can carry (u8 length field).
pub const MAX_RECORD_PAYLOAD: usize = u8::MAX as usize;

/// Fixed roster capacity: the number of remote participants a client tracks.
/// The roster never grows past this; extra participants are ignored.
pub const MAX_PEERS: usize = 7;
