//! Headless console for programmatic use.
//!
//! Drives a mounted [`Console`] without a terminal UI. Each call returns the
//! transcript lines it produced, after letting the engine's asynchronous
//! replies settle. It is used by the binary's `--headless` mode, by scripts,
//! and by the integration tests.
//!
//! # Example
//!
//! ```ignore
//! use apartment_core::headless::{HeadlessConfig, HeadlessConsole};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut game = HeadlessConsole::new(HeadlessConfig::new()).await?;
//!     game.wait_until_active().await;
//!
//!     for line in game.send("map").await {
//!         println!("{line}");
//!     }
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use tokio::time::{timeout, timeout_at, Instant};

use crate::config::ConsoleConfig;
use crate::console::Console;
use crate::error::ConsoleError;
use crate::event::{EventEnvelope, EventKind};
use crate::roster::{CharacterId, Roster};

/// Configuration for a headless session.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Console and engine settings.
    pub console: ConsoleConfig,
    /// Roster to use instead of the configured one.
    pub roster: Option<Roster>,
    /// How long the engine must stay silent before a call returns.
    pub quiet: Duration,
    /// Upper bound for [`HeadlessConsole::wait_until_active`].
    pub startup_timeout: Duration,
}

impl HeadlessConfig {
    pub fn new() -> Self {
        Self {
            console: ConsoleConfig::default(),
            roster: None,
            quiet: Duration::from_millis(800),
            startup_timeout: Duration::from_secs(10),
        }
    }

    /// Use the given console configuration.
    pub fn with_console(mut self, console: ConsoleConfig) -> Self {
        self.console = console;
        self
    }

    /// Use an explicit roster.
    pub fn with_roster(mut self, roster: Roster) -> Self {
        self.roster = Some(roster);
        self
    }

    /// Set the settle window.
    pub fn with_quiet(mut self, quiet: Duration) -> Self {
        self.quiet = quiet;
        self
    }

    /// Set the startup timeout.
    pub fn with_startup_timeout(mut self, limit: Duration) -> Self {
        self.startup_timeout = limit;
        self
    }
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A mounted console that reports its output line by line.
pub struct HeadlessConsole {
    console: Console,
    /// `appended` value up to which lines have been handed out.
    mark: u64,
    /// Envelopes applied since the last [`take_events`](Self::take_events).
    events: Vec<EventEnvelope>,
    quiet: Duration,
    startup_timeout: Duration,
}

impl HeadlessConsole {
    /// Build the console and mount the scene engine.
    pub async fn new(config: HeadlessConfig) -> Result<Self, ConsoleError> {
        let mut console = match config.roster {
            Some(roster) => Console::with_roster(config.console, roster),
            None => Console::new(config.console)?,
        };
        console.mount()?;
        Ok(Self {
            console,
            mark: 0,
            events: Vec::new(),
            quiet: config.quiet,
            startup_timeout: config.startup_timeout,
        })
    }

    /// Submit a line and return the transcript lines it produced, including
    /// engine replies that arrive before the session goes quiet.
    pub async fn send(&mut self, raw: &str) -> Vec<String> {
        self.console.submit(raw);
        self.settle(self.quiet).await;
        self.take_new_lines()
    }

    /// Submit a line without waiting for engine replies.
    pub fn enter(&mut self, raw: &str) -> Vec<String> {
        self.console.submit(raw);
        self.take_new_lines()
    }

    /// Press the pointer at engine coordinates.
    pub async fn click(&mut self, x: f32, y: f32) -> Vec<String> {
        self.console.dispatch_pointer(x, y);
        self.settle(self.quiet).await;
        self.take_new_lines()
    }

    /// Select a resident by id, as a roster click would.
    pub async fn select(&mut self, id: CharacterId) -> Vec<String> {
        self.console.select(id);
        self.take_new_lines()
    }

    /// Apply whatever the engine emits during `duration`.
    pub async fn wait(&mut self, duration: Duration) -> Vec<String> {
        let deadline = Instant::now() + duration;
        while let Ok(Some(envelope)) = timeout_at(deadline, self.console.next_event()).await {
            self.events.push(envelope);
        }
        self.take_new_lines()
    }

    /// Wait for the next envelope, then apply and record it.
    ///
    /// Returns `None` once the engine is unmounted.
    pub async fn next_event(&mut self) -> Option<EventEnvelope> {
        let envelope = self.console.next_event().await?;
        self.events.push(envelope.clone());
        Some(envelope)
    }

    /// Apply envelopes until one of `kind` arrives or `limit` passes.
    pub async fn wait_for(&mut self, kind: EventKind, limit: Duration) -> Option<EventEnvelope> {
        let deadline = Instant::now() + limit;
        loop {
            let envelope = timeout_at(deadline, self.console.next_event())
                .await
                .ok()
                .flatten()?;
            self.events.push(envelope.clone());
            if envelope.kind() == kind {
                return Some(envelope);
            }
        }
    }

    /// Apply envelopes until the scene installs its command receiver.
    ///
    /// Returns `false` if that does not happen within the startup timeout.
    pub async fn wait_until_active(&mut self) -> bool {
        let deadline = Instant::now() + self.startup_timeout;
        while !self.console.host().is_active() {
            if Instant::now() >= deadline {
                tracing::warn!("scene did not become active in time");
                return false;
            }
            match timeout(Duration::from_millis(5), self.console.next_event()).await {
                Ok(Some(envelope)) => self.events.push(envelope),
                Ok(None) => return false,
                Err(_) => {}
            }
        }
        true
    }

    /// Apply envelopes until none arrives for `quiet`.
    pub async fn settle(&mut self, quiet: Duration) -> usize {
        let mut applied = 0;
        while let Ok(Some(envelope)) = timeout(quiet, self.console.next_event()).await {
            self.events.push(envelope);
            applied += 1;
        }
        applied
    }

    /// Transcript lines added since the last call that are still present.
    pub fn take_new_lines(&mut self) -> Vec<String> {
        let store = self.console.store();
        let lines = store.lines_since(self.mark).to_vec();
        self.mark = store.appended();
        lines
    }

    /// Envelopes applied since the last call, in delivery order.
    pub fn take_events(&mut self) -> Vec<EventEnvelope> {
        std::mem::take(&mut self.events)
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn transcript(&self) -> &[String] {
        self.console.transcript()
    }

    pub fn is_active(&self) -> bool {
        self.console.host().is_active()
    }

    /// Unmount the engine. Safe to call more than once.
    pub fn shutdown(&mut self) -> bool {
        self.console.unmount()
    }
}
