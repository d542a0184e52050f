//! # Events Module
//!
//! Progress events emitted by the engine while it works through a run.
//!
//! The engine pushes events into a channel; any consumer (the CLI progress
//! bar, a test harness) drains them on its own thread. Senders never block
//! and silently drop events once the receiver is gone, so progress
//! reporting stays optional.

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted during a sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Discovery phase events
    Scan(ScanEvent),
    /// Fingerprint index construction events
    Index(IndexEvent),
    /// Visual clustering events
    Cluster(ClusterEvent),
    /// Backup relocation events
    Move(MoveEvent),
    /// Run-level events
    Engine(EngineEvent),
}

/// Events during directory scanning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    Started { root: PathBuf },
    /// An image file was discovered
    FileFound { path: PathBuf },
    /// A directory entry could not be read; scanning continues
    Error { path: PathBuf, message: String },
    Completed { total_files: usize },
}

/// Events during fingerprint index construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IndexEvent {
    Started { total_files: usize },
    /// A file was digested and fingerprinted (either signal may be absent)
    FileIndexed { path: PathBuf, completed: usize },
    /// A signal could not be computed for a file; indexing continues
    Error { path: PathBuf, message: String },
    Completed {
        total_indexed: usize,
        fingerprint_failures: usize,
    },
}

/// Events during visual similarity clustering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClusterEvent {
    Started { total_fingerprints: usize },
    Completed { clusters_found: usize },
}

/// Events during the backup move
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MoveEvent {
    Started { total_files: usize },
    /// A duplicate was relocated into the backup directory
    FileMoved { path: PathBuf, dest: PathBuf },
    /// A planned file was gone at move time; this is a warning, not an error
    FileMissing { path: PathBuf },
    Completed { moved: usize, missing: usize },
}

/// Run-level lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EngineEvent {
    Started,
    PhaseChanged { phase: Phase },
    Completed { duration_ms: u64 },
}

/// Phases of a sweep, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Scanning,
    Indexing,
    Grouping,
    Clustering,
    Reconciling,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Scanning => write!(f, "Scanning"),
            Phase::Indexing => write!(f, "Indexing"),
            Phase::Grouping => write!(f, "Grouping"),
            Phase::Clustering => write!(f, "Clustering"),
            Phase::Reconciling => write!(f, "Reconciling"),
        }
    }
}

/// Sends events from the engine.
///
/// A thin wrapper around a crossbeam sender that can be cloned and sent
/// across threads. Sending never blocks; if the receiver is dropped the
/// event is discarded.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Receives events from the engine
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Block until the next event, or `None` once all senders are gone
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Iterate events until all senders are dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Create a connected sender/receiver pair
pub fn channel() -> (EventSender, EventReceiver) {
    let (sender, receiver) = unbounded();
    (EventSender { inner: sender }, EventReceiver { inner: receiver })
}

/// A sender with no receiver, for headless runs and tests
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = channel();
    sender
}
