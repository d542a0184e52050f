//! # Engine Module
//!
//! Orchestrates a full sweep: scan, index, group, cluster, reconcile.
//!
//! ## Stages
//! 1. **Scan** - discover image files under the root
//! 2. **Index** - digest and fingerprint every file (parallel)
//! 3. **Group** - exact matches by basename and by content digest
//! 4. **Cluster** - visual similarity against a Hamming threshold
//! 5. **Reconcile** - fold the maps into one removal plan
//!
//! The engine performs no destructive I/O itself; acting on the plan is
//! the caller's decision (see [`crate::core::mover`]).

use crate::core::cluster::{self, DEFAULT_THRESHOLD};
use crate::core::grouper::{group_by_digest, group_by_name, DuplicateMap};
use crate::core::index::FingerprintIndex;
use crate::core::reconcile::{reconcile, RemovalPlan};
use crate::core::scanner::{ScanConfig, Scanner};
use crate::error::Result;
use crate::events::{null_sender, EngineEvent, Event, EventSender, Phase};
use std::path::PathBuf;
use std::time::Instant;

/// Configuration for a sweep
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Root directory to scan
    pub root: PathBuf,
    /// Hamming distance threshold for visual similarity
    pub threshold: u32,
    /// Whether name-only matches feed the removal plan.
    ///
    /// Same-named files in different folders are routinely distinct
    /// photos, so by default the name map is reported but never moved.
    pub include_name_matches: bool,
    /// Scanner configuration
    pub scan_config: ScanConfig,
}

/// Result of a sweep analysis
#[derive(Debug)]
pub struct EngineReport {
    /// Groups of files sharing a basename
    pub by_name: DuplicateMap,
    /// Groups of byte-identical files
    pub by_content: DuplicateMap,
    /// Clusters of visually similar files
    pub by_visual: DuplicateMap,
    /// The reconciled removal plan
    pub plan: RemovalPlan,
    /// Total image files scanned
    pub total_files: usize,
    /// Non-fatal problems encountered along the way
    pub warnings: Vec<String>,
    /// Wall-clock duration of the analysis
    pub duration_ms: u64,
}

impl EngineReport {
    /// The three maps in log order, the shape the CSV sink consumes
    pub fn maps(&self) -> [&DuplicateMap; 3] {
        [&self.by_name, &self.by_content, &self.by_visual]
    }
}

/// Builder for [`Engine`]
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            config: EngineConfig {
                root: root.into(),
                threshold: DEFAULT_THRESHOLD,
                include_name_matches: false,
                scan_config: ScanConfig::default(),
            },
        }
    }

    /// Set the visual similarity threshold
    pub fn threshold(mut self, threshold: u32) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Let name-only matches feed the removal plan
    pub fn include_name_matches(mut self, include: bool) -> Self {
        self.config.include_name_matches = include;
        self
    }

    /// Follow symbolic links while scanning
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.config.scan_config.follow_symlinks = follow;
        self
    }

    /// Include hidden files while scanning
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.scan_config.include_hidden = include;
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            config: self.config,
        }
    }
}

/// The duplicate classification engine
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Start building an engine for `root`
    pub fn builder(root: impl Into<PathBuf>) -> EngineBuilder {
        EngineBuilder::new(root)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the sweep without progress reporting
    pub fn run(&self) -> Result<EngineReport> {
        self.run_with_events(&null_sender())
    }

    /// Run the sweep, reporting progress through `events`
    pub fn run_with_events(&self, events: &EventSender) -> Result<EngineReport> {
        let start = Instant::now();
        let mut warnings = Vec::new();

        events.send(Event::Engine(EngineEvent::Started));

        // Phase 1: discovery
        events.send(Event::Engine(EngineEvent::PhaseChanged {
            phase: Phase::Scanning,
        }));
        let scanner = Scanner::new(self.config.scan_config.clone());
        let scan_result = scanner.scan(&self.config.root, events)?;
        warnings.extend(scan_result.errors.iter().map(|e| e.to_string()));

        let total_files = scan_result.files.len();
        tracing::debug!(total_files, "scan complete");

        // Phase 2: fingerprint index
        events.send(Event::Engine(EngineEvent::PhaseChanged {
            phase: Phase::Indexing,
        }));
        let index = FingerprintIndex::build(&scan_result.files, events);
        warnings.extend(index.errors().iter().map(|e| e.to_string()));

        // Phase 3: exact-match grouping
        events.send(Event::Engine(EngineEvent::PhaseChanged {
            phase: Phase::Grouping,
        }));
        let by_name = group_by_name(index.entries());
        let by_content = group_by_digest(index.entries());

        // Phase 4: visual clustering
        events.send(Event::Engine(EngineEvent::PhaseChanged {
            phase: Phase::Clustering,
        }));
        let by_visual = cluster::cluster(&index.fingerprinted(), self.config.threshold, events);

        // Phase 5: reconciliation
        events.send(Event::Engine(EngineEvent::PhaseChanged {
            phase: Phase::Reconciling,
        }));
        let plan = if self.config.include_name_matches {
            reconcile(&[&by_name, &by_content, &by_visual])
        } else {
            reconcile(&[&by_content, &by_visual])
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        events.send(Event::Engine(EngineEvent::Completed { duration_ms }));

        Ok(EngineReport {
            by_name,
            by_content,
            by_visual,
            plan,
            total_files,
            warnings,
            duration_ms,
        })
    }
}
