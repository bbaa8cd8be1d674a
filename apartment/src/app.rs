//! Main application state and logic

use std::collections::VecDeque;

use apartment_core::{Character, Console, EventEnvelope};
use ratatui::layout::Rect;
use ratatui::style::Color;

use crate::ui::layout::{self, AppLayout};
use crate::ui::theme::{parse_hex, GameTheme};

const HISTORY_LIMIT: usize = 100;
const TINT_PREFIX: &str = "Logo颜色已变更为: ";

/// Main application state
pub struct App {
    pub console: Console,

    // UI state
    pub theme: GameTheme,
    /// Last known terminal area, for mapping mouse clicks.
    viewport: Rect,

    // Transcript display
    pub transcript_scroll: usize,
    pub scroll_locked_to_bottom: bool,
    seen_lines: u64,

    // Roster cursor
    pub roster_cursor: usize,

    // Scene mirror
    pub logo_tint: Option<Color>,

    // Input state
    input_buffer: String,
    cursor_position: usize,
    pub input_history: VecDeque<String>,
    pub history_index: Option<usize>,
    pub saved_input: Option<String>,

    // Status
    status_message: Option<String>,
    pub should_quit: bool,

    // Animation
    pub animation_frame: u8,
}

impl App {
    pub fn new(console: Console) -> Self {
        let seen_lines = console.store().appended();
        Self {
            console,
            theme: GameTheme::default(),
            viewport: Rect::default(),
            transcript_scroll: usize::MAX / 2,
            scroll_locked_to_bottom: true,
            seen_lines,
            roster_cursor: 0,
            logo_tint: None,
            input_buffer: String::new(),
            cursor_position: 0,
            input_history: VecDeque::with_capacity(HISTORY_LIMIT),
            history_index: None,
            saved_input: None,
            status_message: None,
            should_quit: false,
            animation_frame: 0,
        }
    }

    /// Apply engine events and advance animations. Returns `true` when
    /// anything visible changed.
    pub fn tick(&mut self) -> bool {
        self.animation_frame = self.animation_frame.wrapping_add(1);
        let events = self.console.drain();
        for event in &events {
            self.observe(event);
        }
        self.follow_transcript();
        !events.is_empty()
    }

    fn observe(&mut self, event: &EventEnvelope) {
        match event {
            EventEnvelope::LoadingComplete => self.set_status("资源加载完成"),
            EventEnvelope::CommandOutput(text) | EventEnvelope::CommandResponse(text) => {
                if let Some(tint) = text.strip_prefix(TINT_PREFIX).and_then(parse_hex) {
                    self.logo_tint = Some(tint);
                }
            }
            EventEnvelope::LoadingProgress(_) => {}
        }
    }

    /// Scroll to the newest line if new lines arrived while locked.
    fn follow_transcript(&mut self) {
        let appended = self.console.store().appended();
        if appended != self.seen_lines {
            self.seen_lines = appended;
            if self.scroll_locked_to_bottom {
                self.scroll_to_bottom();
            }
        }
    }

    /// Submit the input line to the console.
    pub fn submit(&mut self) {
        let Some(input) = self.submit_input() else {
            return;
        };
        let command = self.console.submit(&input);
        tracing::debug!(?command, "submitted");
        self.clear_status();
        self.scroll_to_bottom();
        self.follow_transcript();
    }

    /// Take the current input and record it in history
    pub fn submit_input(&mut self) -> Option<String> {
        if self.input_buffer.trim().is_empty() {
            return None;
        }

        let input = std::mem::take(&mut self.input_buffer);
        self.cursor_position = 0;

        self.input_history.push_front(input.clone());
        if self.input_history.len() > HISTORY_LIMIT {
            self.input_history.pop_back();
        }
        self.history_index = None;
        self.saved_input = None;

        Some(input)
    }

    // =========================================================================
    // Transcript scrolling
    // =========================================================================

    /// Scroll transcript to bottom and lock to bottom
    pub fn scroll_to_bottom(&mut self) {
        // The widget caps this to the real maximum.
        self.transcript_scroll = usize::MAX / 2;
        self.scroll_locked_to_bottom = true;
    }

    fn estimate_max_scroll(&self) -> usize {
        let visible = usize::from(layout::inner(self.layout().transcript_area).height);
        self.console.transcript().len().saturating_sub(visible)
    }

    /// Scroll transcript up (unlocks from bottom)
    pub fn scroll_up(&mut self, lines: usize) {
        let max_scroll = self.estimate_max_scroll();
        if self.transcript_scroll > max_scroll {
            self.transcript_scroll = max_scroll;
        }
        self.transcript_scroll = self.transcript_scroll.saturating_sub(lines);
        self.scroll_locked_to_bottom = false;
    }

    /// Scroll transcript down, re-locking at the bottom
    pub fn scroll_down(&mut self, lines: usize) {
        let max_scroll = self.estimate_max_scroll();
        self.transcript_scroll = self.transcript_scroll.saturating_add(lines).min(max_scroll);
        if self.transcript_scroll >= max_scroll {
            self.scroll_to_bottom();
        }
    }

    // =========================================================================
    // Roster and scene
    // =========================================================================

    pub fn roster_next(&mut self) {
        let len = self.console.store().roster().len();
        if len > 0 {
            self.roster_cursor = (self.roster_cursor + 1) % len;
        }
    }

    pub fn roster_prev(&mut self) {
        let len = self.console.store().roster().len();
        if len > 0 {
            self.roster_cursor = (self.roster_cursor + len - 1) % len;
        }
    }

    /// The resident under the roster cursor.
    pub fn cursor_resident(&self) -> Option<&Character> {
        self.console.store().roster().get(self.roster_cursor)
    }

    /// Select the resident under the roster cursor.
    pub fn select_cursor(&mut self) -> bool {
        let Some(id) = self.cursor_resident().map(|c| c.id) else {
            return false;
        };
        let selected = self.console.select(id);
        self.follow_transcript();
        selected
    }

    /// Select the resident at a roster row, as a mouse click would.
    pub fn select_row(&mut self, row: usize) -> bool {
        if row >= self.console.store().roster().len() {
            return false;
        }
        self.roster_cursor = row;
        self.select_cursor()
    }

    /// Handle a left click at a terminal cell.
    pub fn click(&mut self, column: u16, row: u16) -> bool {
        let layout = self.layout();

        let scene = layout::inner(layout.scene_area);
        let config = self.console.host().config();
        if let Some((x, y)) =
            layout::to_engine_coords(scene, column, row, config.width, config.height)
        {
            if !self.console.dispatch_pointer(x, y) {
                self.set_status("场景尚未就绪");
            }
            return true;
        }

        let roster = layout::inner(layout.roster_area);
        if layout::contains(roster, column, row) {
            return self.select_row(usize::from(row - roster.y));
        }
        false
    }

    pub fn layout(&self) -> AppLayout {
        AppLayout::calculate(self.viewport)
    }

    pub fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
    }

    // =========================================================================
    // Input editing
    // =========================================================================

    /// Handle a typed character (unicode-safe)
    pub fn type_char(&mut self, c: char) {
        let byte_pos = self
            .input_buffer
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len());
        self.input_buffer.insert(byte_pos, c);
        self.cursor_position += 1;
    }

    /// Handle backspace (unicode-safe)
    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position)
            {
                self.input_buffer
                    .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
            }
        }
    }

    /// Handle delete (unicode-safe)
    pub fn delete(&mut self) {
        if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position) {
            self.input_buffer
                .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.input_buffer.chars().count();
        self.cursor_position = (self.cursor_position + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.input_buffer.chars().count();
    }

    /// Navigate to previous input in history
    pub fn history_prev(&mut self) {
        if self.input_history.is_empty() {
            return;
        }

        // Save current input if we're just starting to browse history
        if self.history_index.is_none() && !self.input_buffer.is_empty() {
            self.saved_input = Some(self.input_buffer.clone());
        }

        let new_index = match self.history_index {
            None => 0,
            Some(i) if i + 1 < self.input_history.len() => i + 1,
            Some(i) => i,
        };

        if let Some(entry) = self.input_history.get(new_index) {
            self.input_buffer = entry.clone();
            self.cursor_position = self.input_buffer.chars().count();
            self.history_index = Some(new_index);
        }
    }

    /// Navigate to next input in history
    pub fn history_next(&mut self) {
        match self.history_index {
            None => {}
            Some(0) => {
                self.input_buffer = self.saved_input.take().unwrap_or_default();
                self.cursor_position = self.input_buffer.chars().count();
                self.history_index = None;
            }
            Some(i) => {
                if let Some(entry) = self.input_history.get(i - 1) {
                    self.input_buffer = entry.clone();
                    self.cursor_position = self.input_buffer.chars().count();
                    self.history_index = Some(i - 1);
                }
            }
        }
    }

    // =========================================================================
    // Status and getters
    // =========================================================================

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apartment_core::{ConsoleConfig, DEFAULT_ROSTER};

    fn app() -> App {
        let console = Console::with_roster(ConsoleConfig::default(), DEFAULT_ROSTER.clone());
        let mut app = App::new(console);
        app.set_viewport(Rect::new(0, 0, 120, 40));
        app
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            app.type_char(c);
        }
    }

    #[test]
    fn test_unicode_editing() {
        let mut app = app();
        type_str(&mut app, "view 李明");
        app.cursor_left();
        app.backspace();
        assert_eq!(app.input_buffer(), "view 明");
        app.cursor_home();
        app.delete();
        assert_eq!(app.input_buffer(), "iew 明");
    }

    #[test]
    fn test_submit_runs_command_and_records_history() {
        let mut app = app();
        type_str(&mut app, "view 王芳");
        app.submit();
        assert_eq!(app.input_buffer(), "");
        assert_eq!(
            app.console.store().selection().map(|c| c.name.as_str()),
            Some("王芳")
        );
        assert_eq!(app.input_history.front().map(String::as_str), Some("view 王芳"));
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        let mut app = app();
        let before = app.console.transcript().len();
        type_str(&mut app, "   ");
        app.submit();
        assert_eq!(app.console.transcript().len(), before);
        assert!(app.input_history.is_empty());
    }

    #[test]
    fn test_history_browsing_restores_draft() {
        let mut app = app();
        type_str(&mut app, "help");
        app.submit();
        type_str(&mut app, "list");
        app.submit();
        type_str(&mut app, "dra");

        app.history_prev();
        assert_eq!(app.input_buffer(), "list");
        app.history_prev();
        assert_eq!(app.input_buffer(), "help");
        app.history_prev();
        assert_eq!(app.input_buffer(), "help");
        app.history_next();
        app.history_next();
        assert_eq!(app.input_buffer(), "dra");
    }

    #[test]
    fn test_roster_cursor_wraps_and_selects() {
        let mut app = app();
        app.roster_prev();
        assert_eq!(app.roster_cursor, DEFAULT_ROSTER.len() - 1);
        app.roster_next();
        assert_eq!(app.roster_cursor, 0);
        assert!(app.select_cursor());
        assert_eq!(
            app.console.store().selection().map(|c| c.name.as_str()),
            Some("李明")
        );
    }

    #[test]
    fn test_roster_click_selects_row() {
        let mut app = app();
        let roster = layout::inner(app.layout().roster_area);
        assert!(app.click(roster.x + 1, roster.y + 2));
        assert_eq!(
            app.console.store().selection().map(|c| c.name.as_str()),
            Some("王芳")
        );
    }

    #[test]
    fn test_scene_click_before_mount_sets_status() {
        let mut app = app();
        let scene = layout::inner(app.layout().scene_area);
        assert!(app.click(scene.x + 1, scene.y + 1));
        assert_eq!(app.status_message(), Some("场景尚未就绪"));
    }

    #[test]
    fn test_tint_reply_updates_logo_mirror() {
        let mut app = app();
        app.observe(&EventEnvelope::CommandResponse(
            "Logo颜色已变更为: #ff8800".to_string(),
        ));
        assert_eq!(app.logo_tint, Some(Color::Rgb(0xff, 0x88, 0x00)));
    }
}
