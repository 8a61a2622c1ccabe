//! Lifecycle controller and public entry point.
//!
//! [`SyncClient`] wires the transport and host-game collaborators together
//! and owns the polling thread that runs the sync loop. Notification
//! handlers only move the gate and rebind registry state; all per-tick work
//! happens on the polling thread.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use ghostlink_proto::PeerId;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::avatar::{LocalEncoder, RemoteAvatar};
use crate::bootstrap;
use crate::config::ResolvedConfig;
use crate::error::ClientError;
use crate::game::GameHost;
use crate::gate::{SyncGate, SyncPhase};
use crate::registry::PlayerRegistry;
use crate::runner::Runner;
use crate::state::SharedState;
use crate::transport::Transport;

/// Interval between "waiting for the game" checks during startup.
const GAME_WAIT: Duration = Duration::from_secs(1);

/// Hook consulted when the companion key file is missing: supply an alternate
/// path to retry with, or `None` to skip companion binding for the session.
pub type KeyFileFallback = Box<dyn FnMut() -> Option<PathBuf> + Send>;

/// Client-side presence sync for an external single-player game.
pub struct SyncClient {
    lifecycle: Arc<Lifecycle>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

/// Shared with the transport and game-watcher notification contexts.
struct Lifecycle {
    transport: Arc<dyn Transport>,
    game: Arc<dyn GameHost>,
    shared: Arc<SharedState>,
    config: ResolvedConfig,
    key_fallback: Mutex<Option<KeyFileFallback>>,
}

impl Lifecycle {
    /// Game process (re)opened. Bindings stay stale until the next level
    /// entry, which this handler runs itself when the game is already
    /// mid-level.
    fn on_game_opened(&self) {
        self.shared.gate.set_idle();
        info!("game process opened");

        let process = self.game.process_ref();
        self.shared.local.lock().rebind(&process);
        self.shared.registry.lock().rebind_process(&process);

        if self.game.is_on_level() {
            self.on_level_entered();
        }
    }

    /// Level (re)entered: resolve keys once per session and rebind
    /// everything under a fresh epoch before opening the gate.
    fn on_level_entered(&self) {
        let keys = self.shared.keys.get_or_init(|| {
            let mut fallback = self.key_fallback.lock();
            bootstrap::resolve_persistent_keys(&self.config.key_file, || {
                fallback.as_mut().and_then(|hook| hook())
            })
        });
        if keys.is_empty() {
            info!("no companion keys, remote companions stay unbound this session");
        }

        let epoch = self.shared.gate.bump_epoch();
        let process = self.game.process_ref();
        {
            let mut local = self.shared.local.lock();
            local.rebind(&process);
            local.refresh();
        }
        self.shared
            .registry
            .lock()
            .bind_companions(keys, &process, epoch);

        self.shared.gate.set_active();
        info!(epoch, "level entered, sync active");
    }

    /// Level exited or game closed: close the gate first, so no later tick
    /// touches the now-invalid bindings, then drop binding validity.
    fn on_level_exited(&self) {
        self.shared.gate.set_idle();
        self.shared.registry.lock().invalidate_bindings();
        info!("sync idle");
    }

    fn on_roster_changed(&self, ids: Vec<PeerId>) {
        self.shared.registry.lock().rebind_roster(&ids);
    }
}

impl SyncClient {
    pub fn new(
        config: ResolvedConfig,
        transport: Arc<dyn Transport>,
        game: Arc<dyn GameHost>,
        local: Box<dyn LocalEncoder>,
        make_avatar: impl FnMut() -> Box<dyn RemoteAvatar>,
    ) -> Self {
        let shared = Arc::new(SharedState {
            gate: SyncGate::new(),
            registry: Mutex::new(PlayerRegistry::new(config.unrouted_policy, make_avatar)),
            local: Mutex::new(local),
            keys: OnceCell::new(),
        });
        Self {
            lifecycle: Arc::new(Lifecycle {
                transport,
                game,
                shared,
                config,
                key_fallback: Mutex::new(None),
            }),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Install the hook consulted when the companion key file is missing.
    pub fn set_key_file_fallback(&self, fallback: KeyFileFallback) {
        *self.lifecycle.key_fallback.lock() = Some(fallback);
    }

    /// Connect, wait for the game process, wire up lifecycle notifications,
    /// and spawn the polling thread.
    ///
    /// Blocks until the game process is detected. Transport failure is fatal
    /// and is not retried here.
    pub fn start(&mut self) -> Result<(), ClientError> {
        if self.worker.is_some() {
            return Err(ClientError::AlreadyRunning);
        }

        let lifecycle = Arc::clone(&self.lifecycle);
        self.lifecycle
            .transport
            .set_roster_listener(Box::new(move |ids| lifecycle.on_roster_changed(ids)));

        self.lifecycle
            .transport
            .start(&self.lifecycle.config.server_addr)?;

        while !self.lifecycle.game.is_running() {
            warn!("game process not detected, start the game");
            thread::sleep(GAME_WAIT);
        }

        let lifecycle = Arc::clone(&self.lifecycle);
        self.lifecycle
            .game
            .add_enter_level_listener(Box::new(move || lifecycle.on_level_entered()));
        let lifecycle = Arc::clone(&self.lifecycle);
        self.lifecycle
            .game
            .add_exit_level_listener(Box::new(move || lifecycle.on_level_exited()));
        let lifecycle = Arc::clone(&self.lifecycle);
        self.lifecycle
            .game
            .add_open_listener(Box::new(move || lifecycle.on_game_opened()));
        let lifecycle = Arc::clone(&self.lifecycle);
        self.lifecycle
            .game
            .add_close_listener(Box::new(move || lifecycle.on_level_exited()));
        self.lifecycle.game.start();

        self.lifecycle.on_game_opened();

        self.running.store(true, Ordering::Release);
        let runner = Runner::new(
            Arc::clone(&self.lifecycle.shared),
            Arc::clone(&self.lifecycle.transport),
            Arc::clone(&self.running),
        );
        self.worker = Some(
            thread::Builder::new()
                .name("ghostlink-sync".into())
                .spawn(move || runner.run())?,
        );

        Ok(())
    }

    /// Stop the polling thread and the transport. Any in-flight tick
    /// completes before this returns. Idempotent.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        self.lifecycle.transport.stop();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("sync thread panicked");
            }
        }
    }

    /// Current gate phase, as the polling thread sees it.
    pub fn phase(&self) -> SyncPhase {
        self.lifecycle.shared.gate.phase()
    }

    /// Updates that arrived with no matching roster slot so far.
    pub fn unrouted_updates(&self) -> u64 {
        self.lifecycle.shared.registry.lock().unrouted_count()
    }
}

impl Drop for SyncClient {
    fn drop(&mut self) {
        self.stop();
    }
}
