use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main vertical split: nav bar, content, footer.
///
/// Returns: (nav_area, content_area, footer_area)
pub fn main(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Nav bar
            Constraint::Min(0),    // Section content
            Constraint::Length(1), // Footer hints
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Centered rect for the dialog overlay, as a percentage of the frame.
pub fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
