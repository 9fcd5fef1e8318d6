use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use tracing::warn;

use crate::config::model::{
    BackupSettings, Config, Connection, RuntimeConfig, DEFAULT_XE_PATH,
};
use crate::error::{ConfigError, Result, XenvaultError};
use crate::types::{BackupPolicy, ObjectId};

pub fn load_config(path: &str) -> Result<RuntimeConfig> {
    let mut contents = String::new();
    File::open(path)
        .map_err(XenvaultError::Io)?
        .read_to_string(&mut contents)
        .map_err(XenvaultError::Io)?;
    let cfg: Config =
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
    parse_runtime(cfg)
}

fn parse_runtime(cfg: Config) -> Result<RuntimeConfig> {
    if cfg.host.trim().is_empty() {
        return Err(ConfigError::Invalid("host is required".to_string()).into());
    }
    if cfg.user.trim().is_empty() {
        return Err(ConfigError::Invalid("user is required".to_string()).into());
    }
    if cfg.backup_dir.trim().is_empty() {
        return Err(ConfigError::Invalid("backupDir is required".to_string()).into());
    }
    if !is_valid_date_format(&cfg.date_format) {
        return Err(ConfigError::Invalid(format!(
            "dateFormat {} is not a valid strftime pattern",
            cfg.date_format
        ))
        .into());
    }
    if cfg.backup_ext.contains('/') {
        return Err(ConfigError::Invalid(format!(
            "backupExt {} must not contain '/'",
            cfg.backup_ext
        ))
        .into());
    }

    let (policy, recognized) = BackupPolicy::parse(&cfg.backup_vms);
    if !recognized {
        warn!(
            "backupVms {} not recognized; expected all, running, list, or none",
            cfg.backup_vms
        );
    }

    let mut vm_list = Vec::new();
    for entry in &cfg.vm_list {
        let uuid = entry
            .parse::<ObjectId>()
            .map_err(|e| ConfigError::Invalid(format!("vmList: {}", e)))?;
        vm_list.push(uuid);
    }

    let xe_path = cfg
        .xe_path
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_XE_PATH.to_string());

    Ok(RuntimeConfig {
        connection: Connection {
            xe_path,
            host: cfg.host,
            user: cfg.user,
            password: cfg.password,
        },
        backup: BackupSettings {
            backup_dir: PathBuf::from(cfg.backup_dir),
            backup_ext: cfg.backup_ext,
            date_format: cfg.date_format,
        },
        policy,
        vm_list,
        log_enable: cfg.log.enable,
        log_path: PathBuf::from(cfg.log.path),
    })
}

fn is_valid_date_format(format: &str) -> bool {
    !format.trim().is_empty()
        && StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}
