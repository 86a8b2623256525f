//! Library crate for users-report.
//!
//! This crate exposes the building blocks of the TUI:
//! - Remote users API client and wire types (`api`)
//! - Application state, filter state and update loop (`app`)
//! - Command-line configuration (`config`)
//! - Error and result types (`error`)
//! - Saving exported documents (`report`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `users-report` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod report;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
