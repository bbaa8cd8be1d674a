//! Screen layout for the apartment TUI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Areas of the three-column layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub title_area: Rect,
    pub scene_area: Rect,
    pub roster_area: Rect,
    pub transcript_area: Rect,
    pub input_area: Rect,
    pub details_area: Rect,
    pub hotkey_bar: Rect,
}

impl AppLayout {
    pub fn calculate(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Min(10),   // Columns
                Constraint::Length(1), // Hotkeys
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(rows[1]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(columns[0]);

        let middle = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(columns[1]);

        Self {
            title_area: rows[0],
            scene_area: left[0],
            roster_area: left[1],
            transcript_area: middle[0],
            input_area: middle[1],
            details_area: columns[2],
            hotkey_bar: rows[2],
        }
    }
}

/// The area inside a one-cell border.
pub fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

/// Whether a terminal cell lies inside `area`.
pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// Map a terminal cell inside `view` to engine coordinates, using the
/// centre of the cell.
pub fn to_engine_coords(
    view: Rect,
    column: u16,
    row: u16,
    engine_width: f32,
    engine_height: f32,
) -> Option<(f32, f32)> {
    if view.width == 0 || view.height == 0 || !contains(view, column, row) {
        return None;
    }
    let fx = (f32::from(column - view.x) + 0.5) / f32::from(view.width);
    let fy = (f32::from(row - view.y) + 0.5) / f32::from(view.height);
    Some((fx * engine_width, fy * engine_height))
}

/// Map an engine-space box to the terminal cells of `view`.
pub fn from_engine_box(
    view: Rect,
    (x, y, w, h): (f32, f32, f32, f32),
    engine_width: f32,
    engine_height: f32,
) -> Rect {
    let sx = f32::from(view.width) / engine_width;
    let sy = f32::from(view.height) / engine_height;
    let col = (x * sx).floor().max(0.0) as u16;
    let row = (y * sy).floor().max(0.0) as u16;
    let width = ((w * sx).round() as u16).max(1);
    let height = ((h * sy).round() as u16).max(1);
    Rect {
        x: view.x + col.min(view.width),
        y: view.y + row.min(view.height),
        width: width.min(view.width.saturating_sub(col)),
        height: height.min(view.height.saturating_sub(row)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_splits_columns() {
        let layout = AppLayout::calculate(Rect::new(0, 0, 120, 40));
        assert_eq!(layout.title_area.height, 1);
        assert_eq!(layout.hotkey_bar.y, 39);
        assert!(layout.scene_area.x < layout.transcript_area.x);
        assert!(layout.transcript_area.x < layout.details_area.x);
        assert_eq!(layout.input_area.height, 3);
    }

    #[test]
    fn test_centre_cell_maps_to_engine_centre() {
        let view = Rect::new(10, 5, 80, 20);
        let (x, y) = to_engine_coords(view, 50, 15, 800.0, 600.0).unwrap();
        assert!((x - 405.0).abs() < 0.01);
        assert!((y - 315.0).abs() < 0.01);
        assert_eq!(to_engine_coords(view, 9, 15, 800.0, 600.0), None);
        assert_eq!(to_engine_coords(view, 50, 25, 800.0, 600.0), None);
    }

    #[test]
    fn test_engine_box_stays_inside_view() {
        let view = Rect::new(2, 2, 40, 12);
        let logo = from_engine_box(view, (336.0, 236.0, 128.0, 128.0), 800.0, 600.0);
        assert!(contains(view, logo.x, logo.y));
        assert!(logo.x + logo.width <= view.x + view.width);
        assert!(logo.width >= 1 && logo.height >= 1);
    }
}
