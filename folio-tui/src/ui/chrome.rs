//! Nav bar and footer.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Section};

/// Render the nav bar with the active-section indicator.
pub fn render_nav(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        " folio ",
        Style::default()
            .fg(app.theme.accent())
            .add_modifier(Modifier::BOLD),
    )];

    for section in Section::ALL {
        let style = if section == app.section {
            Style::default()
                .fg(app.theme.accent())
                .add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default().fg(app.theme.dim())
        };
        spans.push(Span::raw("  "));
        spans.push(Span::styled(section.label(), style));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(app.theme.dim())),
    );
    f.render_widget(paragraph, area);
}

/// Render the footer: contextual key hints plus the connectivity state.
pub fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let hints = if app.modal.any_open() {
        "Tab cycle · Enter activate · Esc close"
    } else {
        match app.section {
            Section::Projects => "j/k select · Enter open · f filter · m more · Tab section · q quit",
            Section::Contact => "Tab field · Enter send/draft · Esc back · Ctrl+Q quit",
            _ => "Tab section · 1-4 jump · t theme · q quit",
        }
    };

    let mut spans = vec![Span::styled(hints, Style::default().fg(app.theme.dim()))];
    if !app.services.connectivity.is_online() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            "OFFLINE",
            Style::default()
                .fg(ratatui::style::Color::Red)
                .add_modifier(Modifier::BOLD),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
