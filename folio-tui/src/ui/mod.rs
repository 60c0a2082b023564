pub mod chrome;
pub mod layout;
pub mod modal_view;
pub mod sections;

use ratatui::widgets::Block;
use ratatui::Frame;

use crate::app::{App, Section};

/// Render the entire UI
pub fn render(f: &mut Frame, app: &mut App) {
    // Themed background for the whole frame
    let background = Block::default().style(
        ratatui::style::Style::default()
            .bg(app.theme.bg())
            .fg(app.theme.fg()),
    );
    f.render_widget(background, f.area());

    let (nav_area, content_area, footer_area) = layout::main(f.area());

    chrome::render_nav(f, nav_area, app);

    match app.section {
        Section::Home => sections::render_home(f, content_area, app),
        Section::About => sections::render_about(f, content_area, app),
        Section::Projects => sections::render_projects(f, content_area, app),
        Section::Contact => sections::render_contact(f, content_area, app),
    }

    chrome::render_footer(f, footer_area, app);

    if app.modal.any_open() {
        modal_view::render(f, app);
    } else {
        app.modal_area = None;
    }
}
