use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{info, warn};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const SEPARATOR: &str = "------------------------------------------";

#[derive(Debug, Clone)]
pub struct RunLog {
    path: Option<PathBuf>,
}

impl RunLog {
    pub fn new(path: &Path, enable: bool) -> Self {
        Self {
            path: enable.then(|| path.to_path_buf()),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn append(&self, message: &str) {
        if !message.is_empty() {
            info!("{}", message);
        }
        self.write_line(message);
    }

    pub fn append_failure(&self, message: &str) {
        warn!("{}", message);
        self.write_line(message);
    }

    pub fn start(&self) {
        self.append("");
        self.append("Starting VM Backup.");
        self.append(SEPARATOR);
    }

    pub fn finish(&self) {
        self.append(SEPARATOR);
        self.append("VM Backup Ended.");
    }

    fn write_line(&self, message: &str) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(err) = append_line(path, message) {
            warn!("write log {}: {}", path.display(), err);
        }
    }
}

fn append_line(path: &Path, message: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}\t{}", Local::now().format(TIMESTAMP_FORMAT), message)
}
