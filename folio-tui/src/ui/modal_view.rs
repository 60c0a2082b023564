//! Dialog overlay rendering.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::layout::centered;

/// Render the active dialog over the page and record its content rect for
/// backdrop hit-testing.
pub fn render(f: &mut Frame, app: &mut App) {
    let Some(active) = app.modal.active().map(str::to_string) else {
        return;
    };
    let focus = app.modal.focus().cloned();
    let Some(dialog) = app.modal.dialog(&active) else {
        return;
    };

    let area = centered(f.area(), 64, 60);
    app.modal_area = Some(area);

    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.accent()))
        .title(format!(" {} ", dialog.title))
        .style(Style::default().bg(app.theme.bg()).fg(app.theme.fg()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let has_generated = dialog.generated.is_some();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3), // Description
            Constraint::Length(if has_generated { 6 } else { 0 }),
            Constraint::Length(1), // Buttons
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new(dialog.body.clone()).wrap(Wrap { trim: true }),
        chunks[0],
    );

    if let Some(generated) = &dialog.generated {
        f.render_widget(
            Paragraph::new(generated.clone())
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::TOP)
                        .border_style(Style::default().fg(app.theme.dim()))
                        .title("✨ AI explanation"),
                ),
            chunks[1],
        );
    }

    let mut spans = Vec::new();
    for control in &dialog.controls {
        let label = match control.id.as_str() {
            "ask-ai" => "✨ Ask AI",
            "close" => "Close",
            other => other,
        };
        let mut style = if focus.as_ref() == Some(&control.id) {
            Style::default()
                .fg(app.theme.bg())
                .bg(app.theme.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.accent())
        };
        if control.disabled {
            style = Style::default().fg(app.theme.dim());
        }
        spans.push(Span::styled(format!("[ {label} ]"), style));
        spans.push(Span::raw("  "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), chunks[2]);
}
