//! Resident list widget

use apartment_core::{CharacterId, Roster};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::theme::GameTheme;

/// One row per resident: color swatch, name, current room.
pub struct RosterWidget<'a> {
    roster: &'a Roster,
    theme: &'a GameTheme,
    cursor: usize,
    selected: Option<CharacterId>,
}

impl<'a> RosterWidget<'a> {
    pub fn new(roster: &'a Roster, theme: &'a GameTheme) -> Self {
        Self {
            roster,
            theme,
            cursor: 0,
            selected: None,
        }
    }

    pub fn cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn selected(mut self, selected: Option<CharacterId>) -> Self {
        self.selected = selected;
        self
    }
}

impl Widget for RosterWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" 公寓居民 ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(false));

        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = self
            .roster
            .iter()
            .enumerate()
            .map(|(i, character)| {
                let marker = if i == self.cursor { "▶ " } else { "  " };
                let mut name_style = self.theme.text_style();
                if Some(character.id) == self.selected {
                    name_style = name_style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                }
                Line::from(vec![
                    Span::styled(marker, self.theme.prompt_style()),
                    Span::styled(
                        "● ",
                        Style::default().fg(self.theme.resident_color(&character.color)),
                    ),
                    Span::styled(character.name.as_str(), name_style),
                    Span::styled(
                        format!("  {}", character.current_room),
                        self.theme.label_style(),
                    ),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
