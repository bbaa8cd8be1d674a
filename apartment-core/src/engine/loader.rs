//! Asset queue with byte-rate throughput and percentage progress.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What an asset is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Audio,
}

/// An asset the preload scene queues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSpec {
    pub key: String,
    pub kind: AssetKind,
    pub path: String,
    /// Size in bytes, drives load time.
    pub size: u64,
}

impl AssetSpec {
    pub fn new(key: impl Into<String>, kind: AssetKind, path: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            kind,
            path: path.into(),
            size,
        }
    }
}

/// Assets that finished loading, by key.
#[derive(Debug, Default)]
pub struct AssetCache {
    loaded: HashMap<String, AssetSpec>,
}

impl AssetCache {
    pub fn contains(&self, key: &str, kind: AssetKind) -> bool {
        self.loaded.get(key).is_some_and(|a| a.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

/// Progress report from one [`AssetLoader::advance`] step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadStep {
    /// New percentage, if it changed this step.
    pub progress: Option<u8>,
    /// The queue finished during this step.
    pub completed: bool,
}

/// Loads queued assets at a fixed byte rate.
///
/// Progress is only reported when the whole-number percentage changes,
/// so reports never decrease and the last one is always 100.
#[derive(Debug)]
pub struct AssetLoader {
    rate: u64,
    queue: Vec<AssetSpec>,
    total: u64,
    loaded_bytes: u64,
    /// Bytes carried into the head asset.
    head_bytes: u64,
    /// Sub-byte remainder from previous steps, in byte-nanoseconds.
    carry: u128,
    reported: Option<u8>,
    started: bool,
    finished: bool,
}

impl AssetLoader {
    pub fn new(bytes_per_sec: u64) -> Self {
        Self {
            rate: bytes_per_sec,
            queue: Vec::new(),
            total: 0,
            loaded_bytes: 0,
            head_bytes: 0,
            carry: 0,
            reported: None,
            started: false,
            finished: false,
        }
    }

    /// Queue an asset. Ignored once loading has started.
    pub fn enqueue(&mut self, spec: AssetSpec) {
        if self.started {
            tracing::warn!(key = %spec.key, "asset queued after loading started, ignoring");
            return;
        }
        self.total += spec.size;
        self.queue.push(spec);
    }

    /// Begin loading.
    pub fn start(&mut self) {
        self.started = true;
    }

    pub fn is_loading(&self) -> bool {
        self.started && !self.finished
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance loading by `dt` of engine time, moving finished assets into
    /// `cache`.
    pub fn advance(&mut self, dt: Duration, cache: &mut AssetCache) -> LoadStep {
        if !self.is_loading() {
            return LoadStep::default();
        }

        let mut budget = self.take_budget(dt);
        while let Some(head) = self.queue.first() {
            let needed = head.size - self.head_bytes;
            if budget < needed {
                self.head_bytes += budget;
                self.loaded_bytes += budget;
                break;
            }
            budget -= needed;
            self.loaded_bytes += needed;
            self.head_bytes = 0;
            let done = self.queue.remove(0);
            tracing::debug!(key = %done.key, path = %done.path, "asset loaded");
            cache.loaded.insert(done.key.clone(), done);
        }

        let mut step = LoadStep::default();
        let pct = self.percentage();
        if self.reported.map_or(true, |last| pct > last) {
            self.reported = Some(pct);
            step.progress = Some(pct);
        }
        if self.queue.is_empty() {
            self.finished = true;
            step.completed = true;
        }
        step
    }

    fn take_budget(&mut self, dt: Duration) -> u64 {
        let scaled = self.rate as u128 * dt.as_nanos() + self.carry;
        self.carry = scaled % 1_000_000_000;
        u64::try_from(scaled / 1_000_000_000).unwrap_or(u64::MAX)
    }

    fn percentage(&self) -> u8 {
        if self.queue.is_empty() || self.total == 0 {
            return 100;
        }
        // Below 100 until the last asset is actually in the cache.
        let pct = (self.loaded_bytes as u128 * 100 / self.total as u128).min(99);
        pct as u8
    }
}
