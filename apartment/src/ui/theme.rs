//! Color theme and styling for the apartment TUI

use ratatui::style::{Color, Modifier, Style};

/// UI color theme
#[derive(Debug, Clone)]
pub struct GameTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,
    pub title: Color,

    // Transcript colors
    pub prompt: Color,
    pub echo_text: Color,
    pub engine_text: Color,
    pub error_text: Color,
    pub system_text: Color,

    // Scene colors
    pub loading_bar: Color,
    pub scene_background: Color,
    pub logo: Color,
}

impl Default for GameTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            title: Color::LightGreen,

            prompt: Color::Green,
            echo_text: Color::Cyan,
            engine_text: Color::LightYellow,
            error_text: Color::LightRed,
            system_text: Color::Gray,

            loading_bar: Color::White,
            scene_background: Color::Rgb(0x1a, 0x1a, 0x2e),
            logo: Color::Rgb(0x88, 0xcc, 0xff),
        }
    }
}

impl GameTheme {
    /// Get style for normal text
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    /// Get style for the `>` prompt
    pub fn prompt_style(&self) -> Style {
        Style::default()
            .fg(self.prompt)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for a transcript line
    pub fn line_style(&self, line: &str) -> Style {
        if line.starts_with("错误") {
            Style::default().fg(self.error_text)
        } else if line.starts_with("游戏引擎") || line.starts_with("Logo") {
            Style::default().fg(self.engine_text)
        } else {
            Style::default().fg(self.foreground)
        }
    }

    /// Get style for secondary labels
    pub fn label_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    /// Get title style
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.title)
            .add_modifier(Modifier::BOLD)
    }

    /// Terminal color for a resident's display color name.
    pub fn resident_color(&self, name: &str) -> Color {
        match name {
            "red" => Color::Red,
            "blue" => Color::Blue,
            "pink" => Color::LightMagenta,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "purple" => Color::Magenta,
            "orange" => Color::LightRed,
            "cyan" => Color::Cyan,
            _ => Color::Gray,
        }
    }
}

/// Parse a `#rrggbb` color.
pub fn parse_hex(text: &str) -> Option<Color> {
    let hex = text.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    Some(Color::Rgb(
        (value >> 16) as u8,
        (value >> 8) as u8,
        value as u8,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resident_colors() {
        let theme = GameTheme::default();
        assert_eq!(theme.resident_color("red"), Color::Red);
        assert_eq!(theme.resident_color("unknown"), Color::Gray);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#102030"), Some(Color::Rgb(0x10, 0x20, 0x30)));
        assert_eq!(parse_hex("102030"), None);
        assert_eq!(parse_hex("#12345"), None);
    }
}
