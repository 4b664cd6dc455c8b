//! Persistence collaborator and save debouncing.
//!
//! The scene is stored as a JSON array of top-level node records. The
//! storage itself sits behind the `Persistence` trait; `MemoryStore` is the
//! in-process key-value reference. Time comes from a `Clock` so debouncing
//! is deterministic under test.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};
use vecta_core::error::SceneError;
use vecta_core::record::NodeRecord;

/// Default storage key for the scene document.
pub const DEFAULT_KEY: &str = "vecta.scene";

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("stored scene is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stored scene is invalid: {0}")]
    Scene(#[from] SceneError),
}

/// Key-value storage for the scene document.
pub trait Persistence {
    fn save(&mut self, nodes: &[NodeRecord]) -> Result<(), PersistError>;

    /// Stored top-level records; empty when nothing was saved yet.
    fn load(&mut self) -> Result<Vec<NodeRecord>, PersistError>;
}

/// In-memory key-value store holding serialized JSON strings.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    key: String,
    entries: HashMap<String, String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_key(DEFAULT_KEY)
    }

    pub fn with_key(key: &str) -> Self {
        Self {
            key: key.to_string(),
            entries: HashMap::new(),
            saves: 0,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw JSON currently stored under this store's key.
    pub fn raw(&self) -> Option<&str> {
        self.entries.get(&self.key).map(String::as_str)
    }

    pub fn set_raw(&mut self, json: &str) {
        self.entries.insert(self.key.clone(), json.to_string());
    }

    /// Number of successful writes.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl Persistence for MemoryStore {
    fn save(&mut self, nodes: &[NodeRecord]) -> Result<(), PersistError> {
        let json = serde_json::to_string(nodes)?;
        self.entries.insert(self.key.clone(), json);
        self.saves += 1;
        Ok(())
    }

    fn load(&mut self) -> Result<Vec<NodeRecord>, PersistError> {
        match self.raw() {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(Vec::new()),
        }
    }
}

// ─── Time ────────────────────────────────────────────────────────────────

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

// ─── Debounce ────────────────────────────────────────────────────────────

/// Holds the deadline of the next pending save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveScheduler {
    delay: Duration,
    deadline: Option<Instant>,
}

impl SaveScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// (Re)start the quiet period from `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Clear and report the pending save if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
