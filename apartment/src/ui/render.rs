//! Render orchestration for the apartment TUI

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use apartment_core::SceneStatus;

use crate::app::App;
use crate::ui::layout::AppLayout;
use crate::ui::widgets::{
    DetailsWidget, InputWidget, RosterWidget, ScenePanelWidget, TranscriptWidget,
};

const TITLE: &str = "像素公寓生活模拟器";

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let layout = AppLayout::calculate(frame.area());
    let store = app.console.store();

    render_title_bar(frame, app, layout.title_area);

    let config = app.console.host().config();
    let scene = ScenePanelWidget::new(store.scene_status(), &app.theme)
        .active(app.console.host().is_active())
        .frame(app.animation_frame)
        .tint(app.logo_tint)
        .stage(config.width, config.height);
    frame.render_widget(scene, layout.scene_area);

    let roster = RosterWidget::new(store.roster(), &app.theme)
        .cursor(app.roster_cursor)
        .selected(store.selection().map(|c| c.id));
    frame.render_widget(roster, layout.roster_area);

    let transcript = TranscriptWidget::new(store.transcript(), &app.theme)
        .scroll(app.transcript_scroll)
        .focused(true);
    frame.render_widget(transcript, layout.transcript_area);

    let input = InputWidget::new(app.input_buffer(), &app.theme)
        .cursor_position(app.cursor_position())
        .blink(app.animation_frame % 10 < 5);
    frame.render_widget(input, layout.input_area);

    frame.render_widget(
        DetailsWidget::new(store.selection(), &app.theme),
        layout.details_area,
    );

    render_hotkey_bar(frame, app, layout.hotkey_bar);
}

/// Render the title bar
fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = match app.console.store().scene_status() {
        SceneStatus::Unmounted => "离线".to_string(),
        SceneStatus::Loading(percent) => format!("加载中 {percent}%"),
        SceneStatus::Loaded if app.console.host().is_active() => "运行中".to_string(),
        SceneStatus::Loaded => "场景切换中".to_string(),
    };

    let line = Line::from(vec![
        Span::styled(format!(" {TITLE} "), app.theme.title_style()),
        Span::styled(format!("| {status} "), app.theme.label_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the hotkey bar, or the status message when there is one
fn render_hotkey_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = match app.status_message() {
        Some(message) => Line::from(Span::styled(
            format!(" {message}"),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        None => {
            let hotkeys = [
                ("Enter", "执行"),
                ("↑/↓", "历史"),
                ("Tab", "选择居民"),
                ("Ctrl+S", "查看"),
                ("PgUp/PgDn", "滚动"),
                ("Esc", "退出"),
            ];
            let spans: Vec<Span> = hotkeys
                .iter()
                .flat_map(|(key, action)| {
                    [
                        Span::styled(format!(" {key} "), app.theme.prompt_style()),
                        Span::styled(format!("{action} "), app.theme.label_style()),
                    ]
                })
                .collect();
            Line::from(spans)
        }
    };
    frame.render_widget(Paragraph::new(line), area);
}
