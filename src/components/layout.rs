//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main screen layout areas
pub struct MainLayout {
    pub header: Rect,
    pub explainer: Rect,
    pub samples: Rect,
    pub predict_bar: Rect,
    pub interpretation: Option<Rect>,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Area inset by a fixed margin on every side
pub fn inset(area: Rect, margin: u16) -> Rect {
    Rect::new(
        area.x + margin.min(area.width / 2),
        area.y + margin.min(area.height / 2),
        area.width.saturating_sub(margin * 2),
        area.height.saturating_sub(margin * 2),
    )
}

/// Calculate main screen layout
///
/// The interpretation panel only takes space when there is an outcome.
pub fn calculate_main_layout(area: Rect, show_interpretation: bool) -> MainLayout {
    let mut constraints = vec![
        Constraint::Length(3),
        Constraint::Length(6),
        Constraint::Min(5),
        Constraint::Length(3),
    ];
    if show_interpretation {
        constraints.push(Constraint::Length(7));
    }
    constraints.push(Constraint::Length(3));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let (interpretation, help) = if show_interpretation {
        (Some(chunks[4]), chunks[5])
    } else {
        (None, chunks[4])
    };

    MainLayout {
        header: chunks[0],
        explainer: chunks[1],
        samples: chunks[2],
        predict_bar: chunks[3],
        interpretation,
        help,
    }
}
