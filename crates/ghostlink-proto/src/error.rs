use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("payload too large: {0}")]
    PayloadTooLarge(usize),
    #[error("unknown data label: {0}")]
    UnknownLabel(u8),
    #[error("truncated record at offset {offset}")]
    TruncatedRecord { offset: usize },
}
