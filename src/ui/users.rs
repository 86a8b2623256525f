use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::{AppState, InputMode};
use crate::ui::components::spinner_frame;

pub fn render_search_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let editing = app.input_mode == InputMode::Search;
    let cursor = if editing { "▏" } else { "" };
    let committed = &app.filter.filter().search;
    let mut spans = vec![
        Span::styled("Search: ", Style::default().fg(app.theme.title)),
        Span::raw(format!("{}{}", app.filter.pending_search(), cursor)),
    ];
    if app.filter.pending_search() != committed.as_str() {
        spans.push(Span::styled("  (Enter to apply)", Style::default().fg(app.theme.muted)));
    }
    let border = if editing { app.theme.highlight_fg } else { app.theme.border };
    let p = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg))
        .block(
            Block::default()
                .title("Users report")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
    f.render_widget(p, area);
}

pub fn render_download_button(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans = Vec::new();
    if app.filter.is_downloading() {
        spans.push(Span::styled(format!("{} ", spinner_frame(app.tick)), Style::default().fg(app.theme.accent)));
    }
    spans.push(Span::raw("Download ▾"));
    let p = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(app.theme.border)));
    f.render_widget(p, area);
}

pub fn render_users_table(f: &mut Frame, area: Rect, app: &AppState) {
    let rows = app.rows().iter().enumerate().map(|(i, u)| {
        let style = if i == app.selected_row {
            Style::default().fg(app.theme.highlight_fg).bg(app.theme.highlight_bg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(u.id.to_string()),
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
            Cell::from(u.address.address.clone()),
            Cell::from(u.address.city.clone()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(8),
        Constraint::Percentage(22),
        Constraint::Percentage(28),
        Constraint::Percentage(30),
        Constraint::Percentage(20),
    ];

    let header = Row::new(vec!["ID", "Name", "Email", "Address", "City"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let title = if app.filter.is_loading() {
        Line::from(vec![
            Span::raw("Users "),
            Span::styled(format!("{} Loading...", spinner_frame(app.tick)), Style::default().fg(app.theme.accent)),
        ])
    } else {
        Line::from("Users")
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL).border_style(Style::default().fg(app.theme.border)))
        .column_spacing(1);

    f.render_widget(table, area);
}

/// One-line paginator: current page, page count, page size and total.
pub fn render_pagination(f: &mut Frame, area: Rect, app: &AppState) {
    let q = app.filter.filter();
    let sizes: Vec<String> = app
        .filter
        .size_options()
        .iter()
        .map(|s| if *s == q.per_page { format!("[{s}]") } else { s.to_string() })
        .collect();
    let text = format!(
        " Page {}/{}   perPage {}   total {}",
        q.page,
        app.filter.total_pages(),
        sizes.join(" "),
        app.filter.page().total
    );
    let p = Paragraph::new(text).style(Style::default().fg(app.theme.text));
    f.render_widget(p, area);
}
