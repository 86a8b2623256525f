//! Rendering of the report screen.
//!
//! The view only reads [`AppState`]; every change goes through `app::update`.
pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::{AppState, ModalState};

pub fn render(f: &mut Frame, app: &AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1), Constraint::Length(1)].as_ref())
        .split(f.area());
    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(18)].as_ref())
        .split(root[0]);

    users::render_search_bar(f, header[0], app);
    users::render_download_button(f, header[1], app);
    users::render_users_table(f, root[1], app);
    users::render_pagination(f, root[2], app);
    components::render_status_bar(f, root[3], app);

    match &app.modal {
        Some(ModalState::DownloadMenu { selected }) => components::render_download_menu(f, f.area(), app, *selected),
        Some(ModalState::Help { scroll }) => components::render_help_modal(f, f.area(), app, *scroll),
        None => {}
    }
}
