//! Transcript display widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::scrollbar,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Widget,
    },
};

use crate::ui::theme::GameTheme;

/// Widget for the command transcript, newest line last
pub struct TranscriptWidget<'a> {
    lines: &'a [String],
    scroll: usize,
    theme: &'a GameTheme,
    focused: bool,
}

impl<'a> TranscriptWidget<'a> {
    pub fn new(lines: &'a [String], theme: &'a GameTheme) -> Self {
        Self {
            lines,
            scroll: 0,
            theme,
            focused: false,
        }
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for TranscriptWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" 命令行 ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = self
            .lines
            .iter()
            .map(|text| {
                Line::from(vec![
                    Span::styled("> ", self.theme.prompt_style()),
                    Span::styled(text.as_str(), self.theme.line_style(text)),
                ])
            })
            .collect();

        // One row per line; long lines are clipped rather than wrapped so
        // scroll offsets stay exact.
        let visible_height = inner.height as usize;
        let total_lines = lines.len();
        let max_scroll = total_lines.saturating_sub(visible_height);
        let scroll = self.scroll.min(max_scroll);

        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .render(inner, buf);

        if total_lines > visible_height {
            let scrollbar_area = Rect {
                x: inner.x + inner.width.saturating_sub(1),
                y: inner.y,
                width: 1,
                height: inner.height,
            };

            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .thumb_style(Style::default().fg(Color::DarkGray))
                .track_style(Style::default().fg(Color::Black))
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));

            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(scroll);
            scrollbar.render(scrollbar_area, buf, &mut scrollbar_state);

            // Hint at bottom if more content below
            if scroll < max_scroll {
                let hint = format!(" ↓{} ", max_scroll - scroll);
                let hint_y = inner.y + inner.height.saturating_sub(1);
                let hint_style = Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM);
                for (i, ch) in hint.chars().enumerate() {
                    let x = inner.x + (i as u16);
                    if x < inner.x + inner.width.saturating_sub(2) {
                        buf[(x, hint_y)].set_char(ch).set_style(hint_style);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_renders_newest_line_when_scrolled_to_bottom() {
        let theme = GameTheme::default();
        let lines: Vec<String> = (0..10).map(|i| format!("line {i}")).collect();
        let area = Rect::new(0, 0, 30, 5);
        let mut buf = Buffer::empty(area);
        TranscriptWidget::new(&lines, &theme)
            .scroll(usize::MAX / 2)
            .render(area, &mut buf);

        assert!(row(&buf, 3).contains("line 9"));
        assert!(!row(&buf, 1).contains("line 0"));
    }
}
