//! Session state: the transcript, the roster, and the current selection.
//!
//! The store is the single writer of console state. Lookups that miss are
//! reported as transcript lines, never as errors.

use crate::event::EventEnvelope;
use crate::roster::{Character, CharacterId, Roster};

/// Help text printed by the `help` command, one line each.
pub const HELP_LINES: [&str; 5] = [
    "可用命令:",
    "help - 显示帮助信息",
    "list - 列出所有居民",
    "view [名字] - 查看居民详情",
    "clear - 清除命令行输出",
];

pub const LIST_HEADER: &str = "公寓居民列表:";
pub const LOAD_COMPLETE_LINE: &str = "游戏资源加载完成!";

pub fn selected_line(name: &str) -> String {
    format!("查看人物: {name}的详细信息")
}

pub fn missing_resident_line(name: &str) -> String {
    format!("错误: 找不到名为\"{name}\"的居民")
}

pub fn unknown_command_line(raw: &str) -> String {
    format!("错误: 未知命令\"{raw}\"，输入\"help\"获取帮助")
}

/// Loading state of the scene as seen from the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneStatus {
    /// No engine mounted.
    #[default]
    Unmounted,
    /// Assets loading, last reported percentage.
    Loading(u8),
    /// Assets loaded.
    Loaded,
}

/// Console-side session state.
#[derive(Debug)]
pub struct SessionStore {
    roster: Roster,
    transcript: Vec<String>,
    /// Lines ever appended, including cleared ones.
    appended: u64,
    selection: Option<CharacterId>,
    scene: SceneStatus,
}

impl SessionStore {
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            transcript: Vec::new(),
            appended: 0,
            selection: None,
            scene: SceneStatus::Unmounted,
        }
    }

    /// Startup greeting.
    pub fn greet(&mut self) {
        self.append("系统初始化中...");
        self.append("加载公寓数据...");
        self.append(format!("生成{}位居民...", self.roster.len()));
        self.append("欢迎来到像素公寓生活模拟器!");
        self.append("输入\"help\"获取命令列表");
    }

    /// Add one line to the transcript.
    pub fn append(&mut self, line: impl Into<String>) {
        self.transcript.push(line.into());
        self.appended += 1;
    }

    /// Empty the transcript.
    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
    }

    /// Select a resident by exact display name, reporting the outcome.
    pub fn resolve_view(&mut self, name: &str) -> bool {
        match self.roster.find_by_name(name) {
            Some(character) => {
                let (id, line) = (character.id, selected_line(&character.name));
                self.selection = Some(id);
                self.append(line);
                true
            }
            None => {
                self.append(missing_resident_line(name));
                false
            }
        }
    }

    /// Select a resident by id. Unknown ids are ignored silently.
    pub fn resolve_select_by_id(&mut self, id: CharacterId) -> bool {
        match self.roster.find_by_id(id) {
            Some(character) => {
                let line = selected_line(&character.name);
                self.selection = Some(id);
                self.append(line);
                true
            }
            None => false,
        }
    }

    /// One summary line per resident, in roster order.
    pub fn list_all(&mut self) {
        let lines: Vec<String> = self.roster.iter().map(Character::summary).collect();
        for line in lines {
            self.append(line);
        }
    }

    /// Print the help text.
    pub fn help(&mut self) {
        for line in HELP_LINES {
            self.append(line);
        }
    }

    /// Apply an engine event.
    pub fn apply_event(&mut self, envelope: &EventEnvelope) {
        match envelope {
            EventEnvelope::LoadingProgress(percent) => {
                tracing::debug!(percent, "scene loading");
                self.scene = SceneStatus::Loading(*percent);
            }
            EventEnvelope::LoadingComplete => {
                self.scene = SceneStatus::Loaded;
                self.append(LOAD_COMPLETE_LINE);
            }
            EventEnvelope::CommandOutput(text) | EventEnvelope::CommandResponse(text) => {
                self.append(text.clone());
            }
        }
    }

    pub fn scene_mounted(&mut self) {
        self.scene = SceneStatus::Loading(0);
    }

    pub fn scene_unmounted(&mut self) {
        self.scene = SceneStatus::Unmounted;
    }

    pub fn scene_status(&self) -> SceneStatus {
        self.scene
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Total lines ever appended. Unlike the transcript length this never
    /// goes down, so readers can tell which lines are new across a `clear`.
    pub fn appended(&self) -> u64 {
        self.appended
    }

    /// Lines appended after `mark` (a previous [`appended`](Self::appended)
    /// value) that are still in the transcript.
    pub fn lines_since(&self, mark: u64) -> &[String] {
        let new = usize::try_from(self.appended.saturating_sub(mark)).unwrap_or(usize::MAX);
        let start = self.transcript.len().saturating_sub(new);
        &self.transcript[start..]
    }

    pub fn selection(&self) -> Option<&Character> {
        self.selection.and_then(|id| self.roster.find_by_id(id))
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::DEFAULT_ROSTER;

    fn single() -> SessionStore {
        let roster = Roster::from_json(
            r#"[{"id": 1, "name": "李明", "age": 28, "gender": "男", "currentRoom": "客厅"}]"#,
        )
        .unwrap();
        SessionStore::new(roster)
    }

    #[test]
    fn test_list_all_formats_each_resident() {
        let mut store = single();
        store.list_all();
        assert_eq!(store.transcript(), ["李明 (28岁, 男, 在客厅)"]);
    }

    #[test]
    fn test_list_all_keeps_roster_order() {
        let mut store = SessionStore::new(DEFAULT_ROSTER.clone());
        store.list_all();
        let names: Vec<&str> = store
            .transcript()
            .iter()
            .map(|l| l.split(' ').next().unwrap())
            .collect();
        assert_eq!(names, vec!["李明", "张伟", "王芳", "赵静", "刘强"]);
    }

    #[test]
    fn test_view_hit_selects_and_confirms() {
        let mut store = single();
        assert!(store.resolve_view("李明"));
        assert_eq!(store.selection().map(|c| c.id), Some(CharacterId(1)));
        assert_eq!(store.transcript().len(), 1);
        assert!(store.transcript()[0].contains("李明"));
    }

    #[test]
    fn test_view_miss_keeps_selection() {
        let mut store = single();
        store.resolve_view("李明");
        assert!(!store.resolve_view("王五"));
        assert_eq!(store.selection().map(|c| c.id), Some(CharacterId(1)));
        assert_eq!(store.transcript().len(), 2);
        assert_eq!(store.transcript()[1], "错误: 找不到名为\"王五\"的居民");
    }

    #[test]
    fn test_select_by_unknown_id_is_silent() {
        let mut store = single();
        assert!(!store.resolve_select_by_id(CharacterId(99)));
        assert!(store.transcript().is_empty());
        assert!(store.selection().is_none());

        assert!(store.resolve_select_by_id(CharacterId(1)));
        assert_eq!(store.transcript(), ["查看人物: 李明的详细信息"]);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut store = single();
        store.greet();
        store.clear_transcript();
        assert!(store.transcript().is_empty());
        store.clear_transcript();
        assert!(store.transcript().is_empty());
    }

    #[test]
    fn test_greeting_counts_residents() {
        let mut store = SessionStore::new(DEFAULT_ROSTER.clone());
        store.greet();
        assert_eq!(store.transcript()[2], "生成5位居民...");
        assert_eq!(store.transcript().len(), 5);
    }

    #[test]
    fn test_apply_event_updates_status_and_transcript() {
        let mut store = single();
        store.scene_mounted();
        store.apply_event(&EventEnvelope::LoadingProgress(45));
        assert_eq!(store.scene_status(), SceneStatus::Loading(45));
        assert!(store.transcript().is_empty());

        store.apply_event(&EventEnvelope::LoadingComplete);
        store.apply_event(&EventEnvelope::CommandOutput("a".into()));
        store.apply_event(&EventEnvelope::CommandResponse("b".into()));
        assert_eq!(store.scene_status(), SceneStatus::Loaded);
        assert_eq!(store.transcript(), [LOAD_COMPLETE_LINE, "a", "b"]);
    }

    #[test]
    fn test_lines_since_survives_clear() {
        let mut store = single();
        store.append("old");
        let mark = store.appended();
        store.append("one");
        assert_eq!(store.lines_since(mark), ["one"]);

        store.clear_transcript();
        assert!(store.lines_since(mark).is_empty());
        store.append("two");
        assert_eq!(store.lines_since(mark), ["two"]);
    }
}
