//! Scene panel: loading gauge, then a small picture of the apartment scene

use apartment_core::engine::apartment::CAPTION;
use apartment_core::engine::preload::{LOADING_LABEL, TITLE};
use apartment_core::SceneStatus;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

use crate::ui::layout::from_engine_box;
use crate::ui::theme::GameTheme;

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];
/// Drawn logo edge in engine units.
const LOGO_SIZE: f32 = 128.0;

pub struct ScenePanelWidget<'a> {
    status: SceneStatus,
    active: bool,
    theme: &'a GameTheme,
    frame: u8,
    tint: Option<Color>,
    stage: (f32, f32),
}

impl<'a> ScenePanelWidget<'a> {
    pub fn new(status: SceneStatus, theme: &'a GameTheme) -> Self {
        Self {
            status,
            active: false,
            theme,
            frame: 0,
            tint: None,
            stage: (800.0, 600.0),
        }
    }

    /// Whether the apartment scene accepts commands.
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn frame(mut self, frame: u8) -> Self {
        self.frame = frame;
        self
    }

    pub fn tint(mut self, tint: Option<Color>) -> Self {
        self.tint = tint;
        self
    }

    pub fn stage(mut self, width: f32, height: f32) -> Self {
        self.stage = (width, height);
        self
    }

    fn render_loading(&self, percent: u8, inner: Rect, buf: &mut Buffer) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let spinner = SPINNER[usize::from(self.frame) % SPINNER.len()];
        Paragraph::new(format!("{LOADING_LABEL} {spinner}"))
            .alignment(Alignment::Center)
            .render(rows[1], buf);
        Gauge::default()
            .gauge_style(Style::default().fg(self.theme.loading_bar))
            .percent(u16::from(percent.min(100)))
            .render(rows[2], buf);
    }

    fn render_stage(&self, inner: Rect, buf: &mut Buffer) {
        let (w, h) = self.stage;
        buf.set_style(inner, Style::default().bg(self.theme.scene_background));

        let logo = from_engine_box(
            inner,
            ((w - LOGO_SIZE) / 2.0, (h - LOGO_SIZE) / 2.0, LOGO_SIZE, LOGO_SIZE),
            w,
            h,
        );
        let logo_color = self.tint.unwrap_or(self.theme.logo);
        buf.set_style(logo, Style::default().bg(logo_color));

        let footer = Rect {
            y: inner.y + inner.height.saturating_sub(1),
            height: 1u16.min(inner.height),
            ..inner
        };
        let caption = if self.active { CAPTION } else { TITLE };
        Paragraph::new(Line::from(Span::styled(
            caption,
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(footer, buf);
    }
}

impl Widget for ScenePanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.active {
            " 公寓地图 [点击Logo] "
        } else {
            " 公寓地图 "
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.active));

        let inner = block.inner(area);
        block.render(area, buf);

        match self.status {
            SceneStatus::Unmounted => {
                Paragraph::new(Span::styled("场景未启动", self.theme.label_style()))
                    .alignment(Alignment::Center)
                    .render(inner, buf);
            }
            SceneStatus::Loading(percent) => self.render_loading(percent, inner, buf),
            SceneStatus::Loaded => self.render_stage(inner, buf),
        }
    }
}
