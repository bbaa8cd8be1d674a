//! The command console: router, session store and scene host wired together.
//!
//! [`Console`] is what a presentation layer drives. It classifies input with
//! [`Command::parse`], resolves built-ins against the [`SessionStore`],
//! forwards everything else through the [`SceneHost`], and applies engine
//! events to the store when the caller pumps them.

use crate::command::Command;
use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::event::{event_channel, EventEnvelope, EventStream};
use crate::host::{MountOutcome, SceneHost};
use crate::roster::{CharacterId, Roster, DEFAULT_ROSTER};
use crate::session::{unknown_command_line, SessionStore, LIST_HEADER};

pub struct Console {
    store: SessionStore,
    host: SceneHost,
    container: String,
    /// Receiving end of the current mount's event channel.
    events: Option<EventStream>,
}

impl Console {
    /// Build a console, loading the roster file if one is configured.
    pub fn new(config: ConsoleConfig) -> Result<Self, ConsoleError> {
        let roster = match &config.roster_path {
            Some(path) => Roster::load(path)?,
            None => DEFAULT_ROSTER.clone(),
        };
        Ok(Self::with_roster(config, roster))
    }

    /// Build a console over an explicit roster.
    pub fn with_roster(config: ConsoleConfig, roster: Roster) -> Self {
        tracing::info!(residents = roster.len(), "console starting");
        let mut store = SessionStore::new(roster);
        store.greet();
        Self {
            store,
            host: SceneHost::new(config.engine),
            container: config.container,
            events: None,
        }
    }

    /// Start the scene engine in this console's container.
    pub fn mount(&mut self) -> Result<MountOutcome, ConsoleError> {
        if self.host.is_mounted() {
            tracing::debug!(container = %self.container, "mount ignored, engine live");
            return Ok(MountOutcome::AlreadyMounted);
        }
        let (sink, stream) = event_channel();
        let outcome = self.host.mount(&self.container, sink)?;
        self.events = Some(stream);
        self.store.scene_mounted();
        Ok(outcome)
    }

    /// Stop the scene engine. Envelopes not yet pumped are discarded.
    pub fn unmount(&mut self) -> bool {
        let stopped = self.host.unmount();
        if stopped {
            self.events = None;
            self.store.scene_unmounted();
        }
        stopped
    }

    /// Run one line of user input and return how it was classified.
    pub fn submit(&mut self, raw: &str) -> Command {
        let command = Command::parse(raw);
        if command == Command::Empty {
            return command;
        }

        self.store.append(raw);
        match &command {
            Command::Empty => {}
            Command::Help => self.store.help(),
            Command::List => {
                self.store.append(LIST_HEADER);
                self.store.list_all();
            }
            Command::Clear => self.store.clear_transcript(),
            Command::View(name) => {
                self.store.resolve_view(name);
            }
            Command::Passthrough(text) => {
                if !self.host.dispatch_command(text) {
                    self.store.append(unknown_command_line(text));
                }
            }
        }
        command
    }

    /// Roster-click selection.
    pub fn select(&mut self, id: CharacterId) -> bool {
        self.store.resolve_select_by_id(id)
    }

    /// Forward a pointer press, in engine coordinates, to the scene.
    pub fn dispatch_pointer(&self, x: f32, y: f32) -> bool {
        self.host.dispatch_pointer(x, y)
    }

    /// Apply every envelope already delivered, in order, without waiting.
    pub fn pump(&mut self) -> usize {
        self.drain().len()
    }

    /// Like [`pump`](Self::pump), but hand the applied envelopes back.
    pub fn drain(&mut self) -> Vec<EventEnvelope> {
        let Some(events) = self.events.as_mut() else {
            return Vec::new();
        };
        let mut applied = Vec::new();
        while let Some(envelope) = events.try_next() {
            tracing::debug!(kind = %envelope.kind(), "applying event");
            self.store.apply_event(&envelope);
            applied.push(envelope);
        }
        applied
    }

    /// Wait for the next envelope, apply it and return it.
    ///
    /// Returns `None` when nothing is mounted or the engine has stopped.
    pub async fn next_event(&mut self) -> Option<EventEnvelope> {
        let envelope = self.events.as_mut()?.next().await?;
        tracing::debug!(kind = %envelope.kind(), "applying event");
        self.store.apply_event(&envelope);
        Some(envelope)
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn transcript(&self) -> &[String] {
        self.store.transcript()
    }

    pub fn host(&self) -> &SceneHost {
        &self.host
    }

    pub fn container(&self) -> &str {
        &self.container
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::HELP_LINES;

    fn console() -> Console {
        let mut console = Console::with_roster(ConsoleConfig::default(), DEFAULT_ROSTER.clone());
        console.store.clear_transcript();
        console
    }

    #[test]
    fn test_greeting() {
        let console = Console::with_roster(ConsoleConfig::default(), DEFAULT_ROSTER.clone());
        assert_eq!(console.transcript().len(), 5);
        assert_eq!(console.transcript()[0], "系统初始化中...");
        assert_eq!(console.transcript()[4], "输入\"help\"获取命令列表");
    }

    #[test]
    fn test_whitespace_appends_nothing() {
        let mut console = console();
        for raw in ["", " ", "\t\n", "   "] {
            assert_eq!(console.submit(raw), Command::Empty);
        }
        assert!(console.transcript().is_empty());
    }

    #[test]
    fn test_help_any_case() {
        for raw in ["help", "HELP", "Help"] {
            let mut console = console();
            assert_eq!(console.submit(raw), Command::Help);
            assert_eq!(console.transcript()[0], raw);
            assert_eq!(&console.transcript()[1..], HELP_LINES);
        }
    }

    #[test]
    fn test_list_prints_header_and_residents() {
        let mut console = console();
        console.submit("list");
        assert_eq!(console.transcript()[1], LIST_HEADER);
        assert_eq!(console.transcript()[2], "李明 (28岁, 男, 在客厅)");
        assert_eq!(console.transcript().len(), 2 + DEFAULT_ROSTER.len());
    }

    #[test]
    fn test_clear_leaves_nothing() {
        let mut console = console();
        console.submit("help");
        console.submit("list");
        console.submit("clear");
        assert!(console.transcript().is_empty());
    }

    #[test]
    fn test_view_selects() {
        let mut console = console();
        console.submit("view 李明");
        assert_eq!(console.store().selection().map(|c| c.id), Some(CharacterId(1)));
        assert_eq!(console.transcript(), ["view 李明", "查看人物: 李明的详细信息"]);

        console.submit("view 王五");
        assert_eq!(console.store().selection().map(|c| c.id), Some(CharacterId(1)));
        assert_eq!(console.transcript()[3], "错误: 找不到名为\"王五\"的居民");
    }

    #[test]
    fn test_passthrough_without_engine_falls_back() {
        let mut console = console();
        assert_eq!(
            console.submit("vie cat"),
            Command::Passthrough("vie cat".to_string())
        );
        assert_eq!(
            console.transcript(),
            ["vie cat", "错误: 未知命令\"vie cat\"，输入\"help\"获取帮助"]
        );
    }

    #[test]
    fn test_select_by_id() {
        let mut console = console();
        assert!(console.select(CharacterId(3)));
        assert_eq!(console.store().selection().map(|c| c.name.as_str()), Some("王芳"));
        assert!(!console.select(CharacterId(42)));
        assert_eq!(console.transcript().len(), 1);
    }

    #[test]
    fn test_pump_without_mount_is_empty() {
        let mut console = console();
        assert_eq!(console.pump(), 0);
        assert!(!console.unmount());
    }
}
