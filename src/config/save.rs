use std::fs::OpenOptions;
use std::io::Write;

use crate::config::model::Config;
use crate::error::{Result, XenvaultError};

pub fn save_config(path: &str, cfg: &Config) -> Result<()> {
    let data = serde_yaml::to_string(cfg)
        .map_err(|e| XenvaultError::message(format!("encode config: {}", e)))?;
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| XenvaultError::message(format!("write config {}: {}", path, e)))?;
    file.write_all(data.as_bytes())
        .map_err(|e| XenvaultError::message(format!("write config {}: {}", path, e)))?;
    Ok(())
}
