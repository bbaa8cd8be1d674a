//! Resident detail panel

use apartment_core::Character;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::ui::theme::GameTheme;

const EMPTY_HINT: &str = "点击左侧人物查看详情";

/// Full record of the selected resident, or a hint when nobody is selected
pub struct DetailsWidget<'a> {
    character: Option<&'a Character>,
    theme: &'a GameTheme,
}

impl<'a> DetailsWidget<'a> {
    pub fn new(character: Option<&'a Character>, theme: &'a GameTheme) -> Self {
        Self { character, theme }
    }

    fn heading(&self, text: &'static str) -> Line<'static> {
        Line::from(Span::styled(text, self.theme.label_style()))
    }

    fn list(&self, lines: &mut Vec<Line<'a>>, heading: &'static str, items: &'a [String]) {
        if items.is_empty() {
            return;
        }
        lines.push(self.heading(heading));
        lines.extend(items.iter().map(|item| Line::from(format!("  • {item}"))));
        lines.push(Line::from(""));
    }
}

impl Widget for DetailsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(character) = self.character else {
            let block = Block::default()
                .title(" 人物详情 ")
                .borders(Borders::ALL)
                .border_style(self.theme.border_style(false));
            Paragraph::new(Line::from(Span::styled(EMPTY_HINT, self.theme.label_style())))
                .alignment(Alignment::Center)
                .block(block)
                .render(area, buf);
            return;
        };

        let color = self.theme.resident_color(&character.color);
        let block = Block::default()
            .title(format!(" {}的详情 ", character.name))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));

        let initial: String = character.name.chars().take(1).collect();
        let mut lines = vec![
            Line::from(Span::styled(
                format!("[{initial}]"),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            Line::from(""),
            self.heading("基本信息"),
            Line::from(format!("  年龄: {}岁", character.age)),
            Line::from(format!("  性别: {}", character.gender)),
            Line::from(format!("  当前位置: {}", character.current_room)),
            Line::from(""),
        ];

        if !character.personality.is_empty() {
            lines.push(self.heading("性格"));
            lines.push(Line::from(format!("  {}", character.personality)));
            lines.push(Line::from(""));
        }

        self.list(&mut lines, "技能", &character.skills);

        if !character.relationships.is_empty() {
            lines.push(self.heading("人际关系"));
            lines.extend(
                character
                    .relationships
                    .iter()
                    .map(|(other, note)| Line::from(format!("  {other}: {note}"))),
            );
            lines.push(Line::from(""));
        }

        self.list(&mut lines, "短期记忆", &character.short_term_memory);
        self.list(&mut lines, "长期记忆", &character.long_term_memory);

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apartment_core::DEFAULT_ROSTER;

    fn text(buf: &Buffer) -> String {
        let area = buf.area;
        (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|pos| buf[pos].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_empty_shows_hint() {
        let theme = GameTheme::default();
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        DetailsWidget::new(None, &theme).render(area, &mut buf);
        // Wide glyphs occupy two cells; the second is blank.
        assert!(text(&buf).replace(' ', "").contains("点击左侧人物查看详情"));
    }

    #[test]
    fn test_selected_shows_location() {
        let theme = GameTheme::default();
        let area = Rect::new(0, 0, 50, 30);
        let mut buf = Buffer::empty(area);
        let character = DEFAULT_ROSTER.find_by_name("李明");
        DetailsWidget::new(character, &theme).render(area, &mut buf);
        let rendered = text(&buf).replace(' ', "");
        assert!(rendered.contains("当前位置:客厅"));
        assert!(rendered.contains("编程"));
    }
}
