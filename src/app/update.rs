//! Event loop and intent handling.
//!
//! Keys become intents on [`AppState`]; intents that need I/O come back as an
//! [`Effect`] which [`dispatch`] hands to the [`Worker`]. Between frames
//! [`pump`] applies finished requests and starts the scheduled fetch.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use tracing::{debug, info};

use crate::api::{DocumentType, HttpUsersApi, UsersApi};
use crate::app::filter::FetchOutcome;
use crate::app::keymap::KeyAction;
use crate::app::worker::{Worker, WorkerEvent};
use crate::app::{AppState, InputMode, ModalState};
use crate::config::Config;
use crate::ui;

/// Follow-up work requested by a key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    Download(DocumentType),
}

/// Build the HTTP client and state from `config` and run until the user quits.
pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, config: &Config) -> Result<()> {
    let api = HttpUsersApi::new(config.base_url.clone(), config.timeout)
        .context("configure users API client")?;
    info!(base_url = api.base_url(), "users report started");
    let api: Arc<dyn UsersApi> = Arc::new(api);
    let worker = Worker::new(api, config.output_dir.clone());
    let mut app = AppState::from_config(config);
    event_loop(terminal, &mut app, &worker)
}

pub fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut AppState, worker: &Worker) -> Result<()> {
    loop {
        pump(app, worker);

        terminal.draw(|f| ui::render(f, app))?;
        app.tick = app.tick.wrapping_add(1);

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match handle_key(app, key) {
                        Effect::Quit => break,
                        effect => dispatch(app, worker, effect),
                    }
                }
            }
        }
    }
    info!("users report closed");
    Ok(())
}

/// Apply every finished request, then start the scheduled fetch if the filter changed.
pub fn pump(app: &mut AppState, worker: &Worker) {
    while let Some(event) = worker.try_next() {
        apply_event(app, event);
    }
    if let Some(ticket) = app.filter.take_scheduled_fetch() {
        worker.spawn_fetch(ticket);
    }
}

pub fn apply_event(app: &mut AppState, event: WorkerEvent) {
    match event {
        WorkerEvent::Fetched { seq, result } => {
            if app.filter.finish_fetch(seq, result) == FetchOutcome::Applied {
                app.clamp_selection();
            }
        }
        WorkerEvent::Downloaded { format, result } => {
            // Failures only reach the log
            match app.filter.finish_download(format, result) {
                Some(path) => app.notice = Some(format!("saved {}", path.display())),
                None if !app.filter.is_downloading() => app.notice = None,
                None => {}
            }
        }
    }
}

/// Start the I/O an effect asks for. `Quit` is handled by the caller.
pub fn dispatch(app: &mut AppState, worker: &Worker, effect: Effect) {
    match effect {
        Effect::Download(format) => {
            let ticket = app.filter.begin_download(format);
            app.notice = Some(format!("downloading {}...", format.label()));
            worker.spawn_download(ticket);
        }
        Effect::None | Effect::Quit => {}
    }
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Effect {
    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::Search => handle_search_key(app, key),
        InputMode::Modal => handle_modal_key(app, key.code),
    }
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) -> Effect {
    let Some(action) = app.keymap.resolve(&key) else {
        return Effect::None;
    };
    debug!(?action, "key action");
    let paged = match action {
        KeyAction::Quit => return Effect::Quit,
        KeyAction::StartSearch => {
            app.input_mode = InputMode::Search;
            false
        }
        KeyAction::OpenDownloadMenu => {
            app.open_modal(ModalState::DownloadMenu { selected: 0 });
            false
        }
        KeyAction::OpenHelp => {
            app.open_modal(ModalState::Help { scroll: 0 });
            false
        }
        KeyAction::Refresh => {
            app.filter.refresh();
            false
        }
        KeyAction::NextPage => app.filter.next_page(),
        KeyAction::PrevPage => app.filter.prev_page(),
        KeyAction::FirstPage => app.filter.first_page(),
        KeyAction::LastPage => app.filter.last_page(),
        KeyAction::CyclePageSize => {
            app.filter.cycle_page_size();
            true
        }
        KeyAction::MoveUp => {
            app.selected_row = app.selected_row.saturating_sub(1);
            false
        }
        KeyAction::MoveDown => {
            if app.selected_row + 1 < app.rows().len() {
                app.selected_row += 1;
            }
            false
        }
        KeyAction::Ignore => false,
    };
    if paged {
        app.selected_row = 0;
    }
    Effect::None
}

fn handle_search_key(app: &mut AppState, key: KeyEvent) -> Effect {
    // Plain characters are text here; only a modified quit binding gets through
    if key.modifiers.contains(KeyModifiers::CONTROL) && app.keymap.resolve(&key) == Some(KeyAction::Quit) {
        return Effect::Quit;
    }
    match key.code {
        KeyCode::Enter => {
            app.filter.submit_search();
            app.selected_row = 0;
            app.input_mode = InputMode::Normal;
        }
        // Leaves the typed text in the box, uncommitted
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Backspace => app.filter.pop_search_char(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.filter.push_search_char(c),
        _ => {}
    }
    Effect::None
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) -> Effect {
    match &mut app.modal {
        Some(ModalState::DownloadMenu { selected }) => match code {
            KeyCode::Esc | KeyCode::Char('q') => app.close_modal(),
            KeyCode::Up | KeyCode::Char('k') => *selected = selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if *selected + 1 < DocumentType::ALL.len() {
                    *selected += 1;
                }
            }
            KeyCode::Enter => {
                let choice = app.download_menu_choice();
                app.close_modal();
                if let Some(format) = choice {
                    return Effect::Download(format);
                }
            }
            KeyCode::Char('e') => {
                app.close_modal();
                return Effect::Download(DocumentType::Excel);
            }
            KeyCode::Char('p') => {
                app.close_modal();
                return Effect::Download(DocumentType::Pdf);
            }
            _ => {}
        },
        Some(ModalState::Help { scroll }) => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q') => app.close_modal(),
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
            _ => {}
        },
        None => app.input_mode = InputMode::Normal,
    }
    Effect::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Address, ResultPage, UserId, UserRecord};

    fn press(app: &mut AppState, code: KeyCode) -> Effect {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn loaded_app(total: u64, rows: usize) -> AppState {
        let mut app = AppState::default();
        let ticket = app.filter.take_scheduled_fetch().expect("initial fetch");
        let data = (0..rows)
            .map(|i| UserRecord {
                id: UserId::Number(i as i64),
                name: format!("n{i}"),
                email: format!("e{i}"),
                address: Address::default(),
            })
            .collect();
        app.filter.finish_fetch(ticket.seq, Ok(ResultPage { data, total }));
        app
    }

    #[test]
    fn search_mode_edits_then_submits_on_enter() {
        let mut app = loaded_app(57, 10);
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);
        type_text(&mut app, "alicx");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('e'));
        assert!(!app.filter.is_fetch_scheduled());
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.filter.filter().search, "alice");
        assert!(app.filter.is_fetch_scheduled());
    }

    #[test]
    fn quit_key_is_literal_text_while_searching() {
        let mut app = loaded_app(57, 10);
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(press(&mut app, KeyCode::Char('q')), Effect::None);
        assert_eq!(app.filter.pending_search(), "q");
        press(&mut app, KeyCode::Esc);
        assert_eq!(press(&mut app, KeyCode::Char('q')), Effect::Quit);
    }

    #[test]
    fn paging_keys_move_pages_and_reset_cursor() {
        let mut app = loaded_app(57, 10);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_row, 2);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.filter.filter().page, 2);
        assert_eq!(app.selected_row, 0);
        press(&mut app, KeyCode::End);
        assert_eq!(app.filter.filter().page, 6);
    }

    #[test]
    fn cursor_stays_within_rows() {
        let mut app = loaded_app(3, 3);
        for _ in 0..5 {
            press(&mut app, KeyCode::Char('j'));
        }
        assert_eq!(app.selected_row, 2);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_user().map(|u| u.name.as_str()), Some("n1"));
    }

    #[test]
    fn download_menu_returns_selected_format() {
        let mut app = loaded_app(57, 10);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.input_mode, InputMode::Modal);
        assert_eq!(app.download_menu_choice(), Some(DocumentType::Excel));
        press(&mut app, KeyCode::Down);
        assert_eq!(press(&mut app, KeyCode::Enter), Effect::Download(DocumentType::Pdf));
        assert!(app.modal.is_none());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn download_menu_shortcuts_and_escape() {
        let mut app = loaded_app(57, 10);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(press(&mut app, KeyCode::Char('e')), Effect::Download(DocumentType::Excel));
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(press(&mut app, KeyCode::Esc), Effect::None);
        assert!(app.modal.is_none());
    }

    #[test]
    fn failed_download_clears_notice() {
        let mut app = loaded_app(57, 10);
        app.filter.begin_download(DocumentType::Pdf);
        app.notice = Some("downloading PDF...".into());
        apply_event(
            &mut app,
            WorkerEvent::Downloaded {
                format: DocumentType::Pdf,
                result: Err(crate::error::simple_error("boom")),
            },
        );
        assert!(app.notice.is_none());
        assert!(!app.filter.is_downloading());
    }

    #[test]
    fn failed_download_keeps_notice_while_another_runs() {
        let mut app = loaded_app(57, 10);
        app.filter.begin_download(DocumentType::Pdf);
        app.filter.begin_download(DocumentType::Excel);
        app.notice = Some("downloading Excel...".into());
        apply_event(
            &mut app,
            WorkerEvent::Downloaded {
                format: DocumentType::Pdf,
                result: Err(crate::error::simple_error("boom")),
            },
        );
        assert!(app.filter.is_downloading());
        assert_eq!(app.notice.as_deref(), Some("downloading Excel..."));

        apply_event(
            &mut app,
            WorkerEvent::Downloaded {
                format: DocumentType::Excel,
                result: Err(crate::error::simple_error("boom")),
            },
        );
        assert!(!app.filter.is_downloading());
        assert!(app.notice.is_none());
    }

    #[test]
    fn ctrl_c_quits_while_searching() {
        let mut app = loaded_app(57, 10);
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "bo");
        let effect = handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(effect, Effect::Quit);
        assert_eq!(app.filter.pending_search(), "bo");
    }
}
