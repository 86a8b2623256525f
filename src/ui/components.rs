//! Shared UI components (status bar, spinner, modals).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::api::DocumentType;
use crate::app::AppState;
use crate::app::keymap::KeyAction;
use crate::report::report_file_name;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER[tick % SPINNER.len()]
}

/// Render the bottom status bar with mode, latest notice and key hints.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        crate::app::InputMode::Normal => "NORMAL",
        crate::app::InputMode::Search => "SEARCH",
        crate::app::InputMode::Modal => "MODAL",
    };
    let hints = match app.input_mode {
        crate::app::InputMode::Search => "Enter: apply  Esc: leave",
        _ => "/: search  ←/→: page  s: page size  d: download  ?: help  q: quit",
    };
    let notice = app.notice.as_deref().map(|n| format!("  {n}")).unwrap_or_default();
    let msg = format!("mode: {mode}{notice}  | {hints}");
    let p = Paragraph::new(msg).style(Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg));
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Format picker listing each export with the file it will produce.
pub fn render_download_menu(f: &mut Frame, area: Rect, app: &AppState, selected: usize) {
    let rect = centered_rect(40, 6, area);
    let mut lines: Vec<Line> = DocumentType::ALL
        .iter()
        .enumerate()
        .map(|(idx, format)| {
            let marker = if idx == selected { "▶" } else { " " };
            let style = if idx == selected {
                Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text)
            };
            Line::from(vec![
                Span::styled(format!("{marker} {:<6}", format.label()), style),
                Span::styled(format!(" {}", report_file_name(*format)), Style::default().fg(app.theme.muted)),
            ])
        })
        .collect();
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("e/p: quick pick  Esc: close", Style::default().fg(app.theme.muted))));
    let p = Paragraph::new(lines).block(
        Block::default()
            .title("Download")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render the help modal from the active keymap.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 20u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let entries = [
        ("Search", KeyAction::StartSearch),
        ("Next page", KeyAction::NextPage),
        ("Previous page", KeyAction::PrevPage),
        ("First page", KeyAction::FirstPage),
        ("Last page", KeyAction::LastPage),
        ("Page size", KeyAction::CyclePageSize),
        ("Move up", KeyAction::MoveUp),
        ("Move down", KeyAction::MoveDown),
        ("Download", KeyAction::OpenDownloadMenu),
        ("Reload", KeyAction::Refresh),
        ("Help", KeyAction::OpenHelp),
        ("Quit", KeyAction::Quit),
    ];
    let label_w = entries.iter().map(|(l, _)| l.len()).max().unwrap_or(0);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled("Keys", Style::default().add_modifier(Modifier::BOLD))),
        Line::raw(""),
    ];
    for (label, action) in entries {
        let keys = app.keymap.keys_for(action);
        if keys.is_empty() {
            continue;
        }
        lines.push(Line::from(vec![
            Span::raw(format!("  {:>width$} │ ", label, width = label_w)),
            Span::styled(keys.join(", "), Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("While searching: "),
        Span::styled("Enter", Style::default().add_modifier(Modifier::ITALIC)),
        Span::raw(" applies from page 1, "),
        Span::styled("Esc", Style::default().add_modifier(Modifier::ITALIC)),
        Span::raw(" leaves the text unapplied"),
    ]));
    lines.push(Line::from(format!(
        "Exports are saved to {}",
        app.output_dir.display()
    )));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
