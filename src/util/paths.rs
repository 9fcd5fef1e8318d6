use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, XenvaultError};

pub fn export_path(backup_dir: &Path, label: &str, timestamp: &str, ext: &str) -> PathBuf {
    backup_dir.join(format!("{}-{}{}", label, timestamp, ext))
}

pub fn ensure_backup_dir(path: &Path) -> Result<()> {
    let meta = fs::metadata(path).map_err(|e| {
        XenvaultError::message(format!("backup dir {}: {}", path.display(), e))
    })?;
    if !meta.is_dir() {
        return Err(XenvaultError::message(format!(
            "backup dir {} is not a directory",
            path.display()
        )));
    }
    Ok(())
}
