//! Ghostlink client: presence synchronization for co-located players of an
//! external single-player game.
//!
//! Each participant runs their own game process; this crate keeps a roster of
//! up to seven remote participants and mirrors their player and companion
//! state into the local process while the game is inside a level.
//!
//! # Architecture
//!
//! - [`registry`]: fixed-capacity roster of remote participants
//! - [`bootstrap`]: persistent companion-key resolution
//! - [`runner`]: rate-limited polling loop
//! - [`client`]: lifecycle controller and public entry point
//! - [`transport`] / [`game`] / [`avatar`]: collaborator interfaces
//! - [`gate`] / [`config`] / [`error`]: gating, configuration, errors

pub mod avatar;
pub mod bootstrap;
pub mod client;
pub mod config;
pub mod error;
pub mod game;
pub mod gate;
pub mod registry;
pub mod runner;
mod state;
pub mod transport;

pub use avatar::{LocalEncoder, RemoteAvatar};
pub use client::{KeyFileFallback, SyncClient};
pub use config::{Config, ResolvedConfig};
pub use error::ClientError;
pub use game::{GameCallback, GameHost, ProcessRef};
pub use gate::{SyncGate, SyncPhase};
pub use registry::{PlayerRegistry, Slot, UnroutedPolicy};
pub use runner::{ACTIVE_TICK, IDLE_POLL};
pub use transport::{Envelope, RosterListener, Transport};
