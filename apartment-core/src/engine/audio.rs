//! Sound playback bookkeeping.

use crate::engine::loader::{AssetCache, AssetKind};

/// Tracks the sounds currently playing.
#[derive(Debug, Default)]
pub struct AudioBus {
    playing: Vec<String>,
}

impl AudioBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a loaded sound. Sounds missing from the cache are skipped.
    pub fn play(&mut self, key: &str, cache: &AssetCache) -> bool {
        if !cache.contains(key, AssetKind::Audio) {
            tracing::warn!(key, "sound not loaded, skipping playback");
            return false;
        }
        tracing::debug!(key, "playing sound");
        self.playing.push(key.to_string());
        true
    }

    pub fn is_playing(&self, key: &str) -> bool {
        self.playing.iter().any(|k| k == key)
    }

    /// Stop every sound. Returns how many were stopped.
    pub fn stop_all(&mut self) -> usize {
        let count = self.playing.len();
        self.playing.clear();
        count
    }
}
