//! Client error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("configuration needs input: {0}")]
    NeedsInput(&'static str),

    #[error("transport start failed: {0}")]
    TransportStart(String),

    #[error("client already running")]
    AlreadyRunning,

    #[error("persistent key file not found: {0}")]
    KeyFileMissing(PathBuf),

    #[error("protocol error: {0}")]
    Proto(#[from] ghostlink_proto::ProtoError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
