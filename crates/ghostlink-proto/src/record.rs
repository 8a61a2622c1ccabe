//! Tagged-record framing.
//!
//! A message buffer is a concatenation of records, each laid out as
//! `[label: u8][payload_len: u8][payload: payload_len bytes]`. Buffers are
//! handed over fully received; decoding never sees a partial stream, only a
//! possibly-truncated trailing record.

use crate::{
    constants::{MAX_RECORD_PAYLOAD, RECORD_HEADER_LEN},
    error::ProtoError,
    label::DataLabel,
};

/// One record borrowed from a message buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordView<'a> {
    /// Raw label byte as it appeared on the wire.
    pub label: u8,
    /// Payload slice of exactly the declared length.
    pub payload: &'a [u8],
}

impl RecordView<'_> {
    /// Interpret the raw label, if it is part of the closed label set.
    pub fn data_label(&self) -> Result<DataLabel, ProtoError> {
        DataLabel::from_byte(self.label)
    }
}

/// Encode one record as `[label][payload_len][payload]`.
pub fn encode_record(label: DataLabel, payload: &[u8]) -> Result<Vec<u8>, ProtoError> {
    if payload.len() > MAX_RECORD_PAYLOAD {
        return Err(ProtoError::PayloadTooLarge(payload.len()));
    }
    let mut out = Vec::with_capacity(RECORD_HEADER_LEN + payload.len());
    out.push(label as u8);
    out.push(payload.len() as u8);
    out.extend_from_slice(payload);
    Ok(out)
}

/// Decode well-formed records from the front of `buf`.
///
/// Returns the records in input order plus the number of bytes consumed.
/// `consumed < buf.len()` means the buffer ends in a truncated record; the
/// trailing bytes are left unconsumed and contribute no records. Records with
/// an unrecognized label still decode (their payload length is declared), so
/// a bad tag never poisons the records that follow it.
pub fn decode_records(buf: &[u8]) -> (Vec<RecordView<'_>>, usize) {
    let mut records = Vec::new();
    let mut offset = 0usize;

    loop {
        let remaining = buf.len() - offset;
        if remaining < RECORD_HEADER_LEN {
            break;
        }
        let label = buf[offset];
        let payload_len = buf[offset + 1] as usize;
        if remaining < RECORD_HEADER_LEN + payload_len {
            break;
        }
        let start = offset + RECORD_HEADER_LEN;
        records.push(RecordView {
            label,
            payload: &buf[start..start + payload_len],
        });
        offset = start + payload_len;
    }

    (records, offset)
}
