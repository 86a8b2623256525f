//! Application state types and entry glue.
//!
//! [`AppState`] holds everything the view reads: the filter state, the row
//! cursor, the input mode, the open modal and the palette. It is mutated only
//! from the event loop in [`update`].
//!
mod conf;
pub mod filter;
pub mod keymap;
pub mod theme;
pub mod update;
pub mod worker;

use std::path::PathBuf;

use crate::api::{DocumentType, UserRecord};
use crate::config::Config;

pub use filter::FilterState;
pub use keymap::Keymap;
pub use theme::Theme;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Keys edit the pending search text.
    Search,
    Modal,
}

/// Modal dialogs drawn over the report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    /// Format picker; `selected` indexes [`DocumentType::ALL`].
    DownloadMenu { selected: usize },
    Help { scroll: u16 },
}

pub struct AppState {
    pub filter: FilterState,
    /// Row cursor within the current page.
    pub selected_row: usize,
    pub input_mode: InputMode,
    pub modal: Option<ModalState>,
    pub theme: Theme,
    pub keymap: Keymap,
    /// Last informational message for the status bar.
    pub notice: Option<String>,
    /// Advances once per frame; drives the spinner glyphs.
    pub tick: usize,
    pub output_dir: PathBuf,
}

impl AppState {
    pub fn new(filter: FilterState, theme: Theme, keymap: Keymap, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            filter,
            selected_row: 0,
            input_mode: InputMode::Normal,
            modal: None,
            theme,
            keymap,
            notice: None,
            tick: 0,
            output_dir: output_dir.into(),
        }
    }

    /// Build the state described by `config`, loading (or creating) theme and keybind files.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            FilterState::new(config.per_page),
            Theme::load_or_init(&config.theme_path),
            Keymap::load_or_init(&config.keybinds_path),
            config.output_dir.clone(),
        )
    }

    pub fn rows(&self) -> &[UserRecord] {
        &self.filter.page().data
    }

    pub fn selected_user(&self) -> Option<&UserRecord> {
        self.rows().get(self.selected_row)
    }

    /// Keep the cursor inside the current page after the rows were replaced.
    pub fn clamp_selection(&mut self) {
        self.selected_row = self.selected_row.min(self.rows().len().saturating_sub(1));
    }

    /// Format highlighted in the download menu, if it is open.
    pub fn download_menu_choice(&self) -> Option<DocumentType> {
        match self.modal {
            Some(ModalState::DownloadMenu { selected }) => DocumentType::ALL.get(selected).copied(),
            _ => None,
        }
    }

    pub fn open_modal(&mut self, modal: ModalState) {
        self.modal = Some(modal);
        self.input_mode = InputMode::Modal;
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(FilterState::default(), Theme::default(), Keymap::default(), ".")
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
