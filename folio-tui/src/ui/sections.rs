//! Section content renderers.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::form::{FormControl, FormField, StatusKind};
use crate::projects::catalog;

pub fn render_home(f: &mut Frame, area: Rect, app: &App) {
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "Hi, I build things.",
            Style::default()
                .fg(app.theme.fg())
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Computer Science student · Security analyst · AI/ML tinkerer",
            Style::default().fg(app.theme.accent()),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Browse the projects, or say hello through the contact form.",
            Style::default().fg(app.theme.dim()),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }),
        pad(area),
    );
}

pub fn render_about(f: &mut Frame, area: Rect, app: &App) {
    let text = "I am a computer science student who enjoys the seams between \
                systems: where a UI meets a flaky network, where a form has to \
                survive going offline, where focus has to stay put when a dialog \
                opens. Most of what is on this page exists because one of those \
                seams annoyed me enough to build something.";
    f.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(app.theme.fg()))
            .wrap(Wrap { trim: true }),
        pad(area),
    );
}

pub fn render_projects(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(pad(area));

    let filter_line = Line::from(vec![
        Span::styled("Filter: ", Style::default().fg(app.theme.dim())),
        Span::styled(
            app.board.filter.label(),
            Style::default()
                .fg(app.theme.accent())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            if app.board.show_all {
                "   showing all"
            } else {
                "   m: show more"
            },
            Style::default().fg(app.theme.dim()),
        ),
    ]);
    f.render_widget(Paragraph::new(filter_line), chunks[0]);

    let items: Vec<ListItem> = app
        .board
        .visible(catalog())
        .iter()
        .enumerate()
        .map(|(index, project)| {
            let selected = index == app.board.selected;
            let marker = if selected { "▸ " } else { "  " };
            let style = if selected {
                Style::default()
                    .fg(app.theme.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.fg())
            };
            let categories = project
                .categories
                .iter()
                .map(|category| category.label())
                .collect::<Vec<_>>()
                .join(", ");
            ListItem::new(Line::from(vec![
                Span::styled(format!("{marker}{}", project.title), style),
                Span::styled(
                    format!("  — {}  [{categories}]", project.blurb),
                    Style::default().fg(app.theme.dim()),
                ),
            ]))
        })
        .collect();

    f.render_widget(List::new(items), chunks[1]);
}

pub fn render_contact(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Name
            Constraint::Length(3), // Email
            Constraint::Min(5),    // Message
            Constraint::Length(3), // Keywords
            Constraint::Length(1), // Buttons
            Constraint::Length(1), // Status
        ])
        .split(pad(area));

    render_field(f, chunks[0], app, "Name", FormField::Name);
    render_field(f, chunks[1], app, "Email", FormField::Email);
    render_field(f, chunks[2], app, "Message", FormField::Message);
    render_field(f, chunks[3], app, "AI keywords", FormField::Keywords);

    let draft_focused = app.form.focused == FormControl::Draft;
    let submit_focused = app.form.focused == FormControl::Submit;
    let button = |label: String, focused: bool, busy: bool| {
        let mut style = if focused {
            Style::default()
                .fg(app.theme.bg())
                .bg(app.theme.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.accent())
        };
        if busy {
            style = Style::default().fg(app.theme.dim());
        }
        Span::styled(format!("[ {label} ]"), style)
    };
    let buttons = Line::from(vec![
        button(
            app.form.draft_busy.label("✨ Draft with AI").into_owned(),
            draft_focused,
            app.form.draft_busy.is_busy(),
        ),
        Span::raw("  "),
        button(
            app.form.submit_busy.label("Send Message").into_owned(),
            submit_focused,
            app.form.submit_busy.is_busy(),
        ),
    ]);
    f.render_widget(Paragraph::new(buttons), chunks[4]);

    if let Some(status) = app.form.status() {
        let color = match status.kind {
            StatusKind::Success => ratatui::style::Color::Green,
            StatusKind::Error => ratatui::style::Color::Red,
            StatusKind::Info => app.theme.accent(),
        };
        let text = status.text.clone();
        f.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(color))),
            chunks[5],
        );
    }
}

fn render_field(f: &mut Frame, area: Rect, app: &App, label: &str, field: FormField) {
    let focused = app.form.focused == FormControl::Field(field);
    let value = match field {
        FormField::Name => &app.form.name,
        FormField::Email => &app.form.email,
        FormField::Message => &app.form.message,
        FormField::Keywords => &app.form.keywords,
    };
    let border = if focused {
        Style::default().fg(app.theme.accent())
    } else {
        Style::default().fg(app.theme.dim())
    };

    f.render_widget(
        Paragraph::new(value.as_str())
            .style(Style::default().fg(app.theme.fg()))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(label),
            ),
        area,
    );
}

fn pad(area: Rect) -> Rect {
    Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(2),
    }
}
