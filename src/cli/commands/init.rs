use std::path::Path;

use crate::config::model::Config;
use crate::config::save::save_config;
use crate::error::Result;

pub fn run_init(path: &Path) -> Result<()> {
    save_config(path.to_string_lossy().as_ref(), &Config::example())?;
    println!("wrote example config to {}", path.display());
    Ok(())
}
