//! Command-line and environment configuration.
//!
//! Every setting can come from a flag or a `USERS_REPORT_*` environment
//! variable. [`Cli::into_config`] validates the raw values and produces the
//! [`Config`] that is handed to the application at startup.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::{Result, simple_error};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8019/api/users";

/// Raw command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "users-report", version, about = "Browse, search and export the users report")]
pub struct Cli {
    /// Users endpoint serving `{ data, total }` pages and document exports.
    #[arg(long, env = "USERS_REPORT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Initial page size.
    #[arg(long, env = "USERS_REPORT_PER_PAGE", default_value_t = 10,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub per_page: u32,

    /// Directory exported documents are written to.
    #[arg(long, env = "USERS_REPORT_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Request timeout in seconds; unset keeps the HTTP client default.
    #[arg(long, env = "USERS_REPORT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Diagnostic log file (the terminal is owned by the UI).
    #[arg(long, env = "USERS_REPORT_LOG_FILE", default_value = "users-report.log")]
    pub log_file: PathBuf,

    /// Theme file in key=value format; created with defaults if missing.
    #[arg(long, env = "USERS_REPORT_THEME", default_value = "theme.conf")]
    pub theme: PathBuf,

    /// Keybindings file; created with defaults if missing.
    #[arg(long, env = "USERS_REPORT_KEYBINDS", default_value = "keybinds.conf")]
    pub keybinds: PathBuf,
}

/// Validated runtime configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub per_page: u32,
    pub output_dir: PathBuf,
    pub timeout: Option<Duration>,
    pub log_file: PathBuf,
    pub theme_path: PathBuf,
    pub keybinds_path: PathBuf,
}

impl Cli {
    pub fn into_config(self) -> Result<Config> {
        let base_url = self.base_url.trim().to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(simple_error(format!(
                "base url must start with http:// or https://, got '{base_url}'"
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(simple_error("timeout must be at least one second"));
        }
        Ok(Config {
            base_url,
            per_page: self.per_page,
            output_dir: self.output_dir,
            timeout: self.timeout_secs.map(Duration::from_secs),
            log_file: self.log_file,
            theme_path: self.theme,
            keybinds_path: self.keybinds,
        })
    }
}
