//! Testing utilities for the apartment console.
//!
//! This module provides tools for integration testing:
//! - `fast_config()` for an engine that loads and transitions in milliseconds
//! - `sample_roster()` with a small, fixed cast
//! - `TestHarness` for scripted console scenarios against a real engine
//! - `manual_engine()` and `drain()` for driving an [`Engine`] tick by tick

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ConsoleConfig, EngineConfig};
use crate::engine::scene::Emitter;
use crate::engine::Engine;
use crate::error::{ConsoleError, RosterError};
use crate::event::{event_channel, EventEnvelope, EventKind, EventStream};
use crate::headless::{HeadlessConfig, HeadlessConsole};
use crate::roster::{Character, Roster};

/// Engine timings scaled down for tests.
pub fn fast_config() -> EngineConfig {
    EngineConfig::default()
        .with_tick(Duration::from_millis(1))
        .with_load_rate(50_000_000)
        .with_transition_delay(Duration::from_millis(20))
        .with_map_delay(Duration::from_millis(30))
        .with_chatter_interval(Duration::from_millis(100))
}

/// Two residents, the first matching the console's documented example.
pub fn sample_roster() -> Result<Roster, RosterError> {
    Roster::new(vec![
        Character::new(1, "李明", 28, "男", "客厅")
            .with_personality("外向、友善")
            .with_skills(["烹饪"])
            .with_color("red"),
        Character::new(3, "王芳", 26, "女", "厨房").with_relationship("李明", "朋友"),
    ])
}

/// A synchronous engine paired with the stream of what it emits.
///
/// Nothing runs on its own: call [`Engine::advance`] to move time forward.
pub fn manual_engine(config: EngineConfig) -> (Engine, EventStream, Arc<AtomicBool>) {
    let (sink, stream) = event_channel();
    let live = Arc::new(AtomicBool::new(true));
    let ready = Arc::new(AtomicBool::new(false));
    let emitter = Emitter::new(sink, live.clone(), config.chatter_interval);
    (Engine::new(config, emitter, ready), stream, live)
}

/// Drain every envelope already delivered to `stream`.
pub fn drain(stream: &mut EventStream) -> Vec<EventEnvelope> {
    std::iter::from_fn(|| stream.try_next()).collect()
}

/// Test harness for running console scenarios.
pub struct TestHarness {
    /// The headless console under test.
    pub game: HeadlessConsole,
}

impl TestHarness {
    /// Mount a console over [`sample_roster`] with [`fast_config`].
    pub async fn new() -> Result<Self, ConsoleError> {
        Self::with_roster(sample_roster()?).await
    }

    /// Mount a console over `roster` with [`fast_config`] and wait until
    /// assets have loaded, so the load-complete line never lands mid-scenario.
    pub async fn with_roster(roster: Roster) -> Result<Self, ConsoleError> {
        let config = HeadlessConfig::new()
            .with_console(ConsoleConfig::default().with_engine(fast_config()))
            .with_roster(roster)
            .with_quiet(Duration::from_millis(120))
            .with_startup_timeout(Duration::from_secs(5));
        let mut game = HeadlessConsole::new(config).await?;
        let loaded = game
            .wait_for(EventKind::LoadingComplete, Duration::from_secs(5))
            .await;
        assert!(loaded.is_some(), "assets never finished loading");
        // Greeting and load-complete lines are not interesting to scenarios.
        game.take_new_lines();
        game.take_events();
        Ok(Self { game })
    }

    /// Mount and wait for the apartment scene to accept commands.
    pub async fn active() -> Result<Self, ConsoleError> {
        let mut harness = Self::new().await?;
        assert!(
            harness.game.wait_until_active().await,
            "scene never became active"
        );
        harness.game.take_new_lines();
        harness.game.take_events();
        Ok(harness)
    }

    /// Submit a command and return the lines it produced.
    pub async fn send(&mut self, raw: &str) -> Vec<String> {
        self.game.send(raw).await
    }

    /// Wait up to a second for an envelope of `kind`.
    pub async fn wait_for(&mut self, kind: EventKind) -> Option<EventEnvelope> {
        self.game.wait_for(kind, Duration::from_secs(1)).await
    }

    /// Assert the transcript contains a line equal to `line`.
    pub fn assert_has_line(&self, line: &str) {
        assert!(
            self.game.transcript().iter().any(|l| l == line),
            "transcript missing {line:?}: {:?}",
            self.game.transcript()
        );
    }

    /// The last transcript line.
    pub fn last_line(&self) -> Option<&str> {
        self.game.transcript().last().map(String::as_str)
    }
}
