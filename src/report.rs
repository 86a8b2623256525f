use std::path::{Path, PathBuf};

use crate::api::DocumentType;
use crate::error::{Context, Result};

/// File name an export is saved under, e.g. `users-report.xlsx`.
pub fn report_file_name(format: DocumentType) -> String {
    format!("users-report.{}", format.extension())
}

/// Write a downloaded document into `dir`, replacing any previous export of the same format.
pub fn save_report(dir: &Path, format: DocumentType, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(report_file_name(format));
    std::fs::write(&path, bytes).with_ctx(|| format!("write {}", path.display()))?;
    Ok(path)
}
