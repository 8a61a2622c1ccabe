//! In-memory collaborator fakes for driving a full `SyncClient`.

use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use ghostlink_client::{
    ClientError, Envelope, GameCallback, GameHost, LocalEncoder, ProcessRef, RemoteAvatar,
    ResolvedConfig, RosterListener, Transport, UnroutedPolicy,
};
use ghostlink_proto::{ChannelKind, DataLabel, PeerId};
use parking_lot::Mutex;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Transport double backed by plain queues.
pub struct MemoryTransport {
    fail_start: bool,
    started: AtomicBool,
    local_id: PeerId,
    text: Mutex<VecDeque<Envelope>>,
    events: Mutex<VecDeque<Envelope>>,
    snapshots: Mutex<BTreeMap<PeerId, Vec<u8>>>,
    pub sent: Mutex<Vec<(ChannelKind, Vec<u8>)>>,
    roster_listener: Mutex<Option<RosterListener>>,
}

impl MemoryTransport {
    fn with_options(local_id: PeerId, fail_start: bool) -> Arc<Self> {
        Arc::new(Self {
            fail_start,
            started: AtomicBool::new(false),
            local_id,
            text: Mutex::new(VecDeque::new()),
            events: Mutex::new(VecDeque::new()),
            snapshots: Mutex::new(BTreeMap::new()),
            sent: Mutex::new(Vec::new()),
            roster_listener: Mutex::new(None),
        })
    }

    pub fn new(local_id: PeerId) -> Arc<Self> {
        Self::with_options(local_id, false)
    }

    pub fn failing() -> Arc<Self> {
        Self::with_options(0, true)
    }

    pub fn push_text(&self, sender: PeerId, text: &str) {
        self.text.lock().push_back(Envelope {
            sender,
            bytes: text.as_bytes().to_vec(),
        });
    }

    pub fn push_event(&self, sender: PeerId, bytes: Vec<u8>) {
        self.events.lock().push_back(Envelope { sender, bytes });
    }

    /// Latest-value semantics: a newer snapshot replaces the unconsumed one.
    pub fn push_snapshot(&self, sender: PeerId, bytes: Vec<u8>) {
        self.snapshots.lock().insert(sender, bytes);
    }

    pub fn pending_snapshots(&self) -> usize {
        self.snapshots.lock().len()
    }

    pub fn announce_roster(&self, ids: Vec<PeerId>) {
        if let Some(listener) = self.roster_listener.lock().as_ref() {
            listener(ids);
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }
}

impl Transport for MemoryTransport {
    fn start(&self, _addr: &str) -> Result<(), ClientError> {
        if self.fail_start {
            return Err(ClientError::TransportStart("connection refused".into()));
        }
        self.started.store(true, Ordering::Release);
        Ok(())
    }

    fn stop(&self) {
        self.started.store(false, Ordering::Release);
    }

    fn local_id(&self) -> PeerId {
        self.local_id
    }

    fn front_text(&self) -> Option<Envelope> {
        self.text.lock().front().cloned()
    }

    fn pop_text(&self) {
        self.text.lock().pop_front();
    }

    fn front_event(&self) -> Option<Envelope> {
        self.events.lock().front().cloned()
    }

    fn pop_event(&self) {
        self.events.lock().pop_front();
    }

    fn take_snapshots(&self) -> BTreeMap<PeerId, Vec<u8>> {
        std::mem::take(&mut *self.snapshots.lock())
    }

    fn send(&self, channel: ChannelKind, bytes: Vec<u8>) {
        self.sent.lock().push((channel, bytes));
    }

    fn set_roster_listener(&self, listener: RosterListener) {
        *self.roster_listener.lock() = Some(listener);
    }
}

#[derive(Default)]
struct GameListeners {
    open: Vec<GameCallback>,
    close: Vec<GameCallback>,
    enter: Vec<GameCallback>,
    exit: Vec<GameCallback>,
}

/// Game-watcher double with manually fired transitions.
pub struct FakeGameHost {
    running: AtomicBool,
    on_level: AtomicBool,
    listeners: Mutex<GameListeners>,
}

impl FakeGameHost {
    pub fn new(running: bool, on_level: bool) -> Arc<Self> {
        Arc::new(Self {
            running: AtomicBool::new(running),
            on_level: AtomicBool::new(on_level),
            listeners: Mutex::new(GameListeners::default()),
        })
    }

    pub fn enter_level(&self) {
        self.on_level.store(true, Ordering::Release);
        let listeners = self.listeners.lock();
        for callback in &listeners.enter {
            callback();
        }
    }

    pub fn exit_level(&self) {
        self.on_level.store(false, Ordering::Release);
        let listeners = self.listeners.lock();
        for callback in &listeners.exit {
            callback();
        }
    }

    pub fn close_game(&self) {
        self.running.store(false, Ordering::Release);
        self.on_level.store(false, Ordering::Release);
        let listeners = self.listeners.lock();
        for callback in &listeners.close {
            callback();
        }
    }
}

impl GameHost for FakeGameHost {
    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    fn is_on_level(&self) -> bool {
        self.on_level.load(Ordering::Acquire)
    }

    fn add_open_listener(&self, callback: GameCallback) {
        self.listeners.lock().open.push(callback);
    }

    fn add_close_listener(&self, callback: GameCallback) {
        self.listeners.lock().close.push(callback);
    }

    fn add_enter_level_listener(&self, callback: GameCallback) {
        self.listeners.lock().enter.push(callback);
    }

    fn add_exit_level_listener(&self, callback: GameCallback) {
        self.listeners.lock().exit.push(callback);
    }

    fn start(&self) {}

    fn process_ref(&self) -> ProcessRef {
        ProcessRef::new(0xCAFE)
    }
}

/// Shared record of everything the remote avatars were asked to do.
#[derive(Default)]
pub struct AvatarLog {
    pub applied: Vec<(usize, DataLabel, Vec<u8>)>,
    pub bound_keys: Vec<(usize, u64)>,
    pub steps: usize,
}

pub struct RecordingAvatar {
    index: usize,
    log: Arc<Mutex<AvatarLog>>,
}

impl RemoteAvatar for RecordingAvatar {
    fn rebind(&mut self, _process: &ProcessRef) {}

    fn bind_companion(&mut self, key: u64) {
        self.log.lock().bound_keys.push((self.index, key));
    }

    fn apply(&mut self, label: DataLabel, payload: &[u8]) {
        self.log
            .lock()
            .applied
            .push((self.index, label, payload.to_vec()));
    }

    fn step(&mut self, _local_id: PeerId) {
        self.log.lock().steps += 1;
    }
}

/// Avatar factory producing index-tagged recorders over one shared log.
pub fn avatar_factory(log: Arc<Mutex<AvatarLog>>) -> impl FnMut() -> Box<dyn RemoteAvatar> {
    let mut next = 0usize;
    move || {
        let avatar = RecordingAvatar {
            index: next,
            log: Arc::clone(&log),
        };
        next += 1;
        Box::new(avatar)
    }
}

/// Local encoder emitting a scripted sequence of payloads, then silence.
pub struct ScriptedEncoder {
    outputs: Mutex<VecDeque<Vec<u8>>>,
}

impl ScriptedEncoder {
    pub fn new(outputs: Vec<Vec<u8>>) -> Box<Self> {
        Box::new(Self {
            outputs: Mutex::new(outputs.into()),
        })
    }

    pub fn silent() -> Box<Self> {
        Self::new(Vec::new())
    }
}

impl LocalEncoder for ScriptedEncoder {
    fn rebind(&mut self, _process: &ProcessRef) {}

    fn refresh(&mut self) {}

    fn encode(&mut self) -> Vec<u8> {
        self.outputs.lock().pop_front().unwrap_or_default()
    }
}

static KEY_FILE_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Write a key file with `count` well-formed lines and return its path.
/// Keys come out as `0x1000 + i` for slot `i`.
pub fn write_key_file(count: usize) -> PathBuf {
    let seq = KEY_FILE_SEQ.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!(
        "ghostlink-keys-{}-{seq}.txt",
        std::process::id()
    ));
    let mut lines = String::new();
    for i in 0..count {
        // `TAIL_HEAD` on disk recombines to HEAD ++ TAIL; emit `0i_10` so the
        // parsed key is 0x100i.
        lines.push_str(&format!("0{i}_10\n"));
    }
    std::fs::write(&path, lines).expect("write key file");
    path
}

pub fn config_with(key_file: PathBuf, policy: UnroutedPolicy) -> ResolvedConfig {
    ResolvedConfig {
        server_addr: "127.0.0.1:5555".into(),
        key_file,
        unrouted_policy: policy,
    }
}
