use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::{BackupPolicy, ObjectId};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub host: String,
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "xePath", skip_serializing_if = "Option::is_none")]
    pub xe_path: Option<String>,
    #[serde(rename = "backupDir")]
    pub backup_dir: String,
    #[serde(default = "default_backup_ext", rename = "backupExt")]
    pub backup_ext: String,
    #[serde(default = "default_date_format", rename = "dateFormat")]
    pub date_format: String,
    #[serde(default = "default_backup_vms", rename = "backupVms")]
    pub backup_vms: String,
    #[serde(default, rename = "vmList")]
    pub vm_list: Vec<String>,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogConfig {
    #[serde(default = "default_true")]
    pub enable: bool,
    #[serde(default = "default_log_path")]
    pub path: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: default_log_path(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Connection {
    pub xe_path: String,
    pub host: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct BackupSettings {
    pub backup_dir: PathBuf,
    pub backup_ext: String,
    pub date_format: String,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub connection: Connection,
    pub backup: BackupSettings,
    pub policy: BackupPolicy,
    pub vm_list: Vec<ObjectId>,
    pub log_enable: bool,
    pub log_path: PathBuf,
}

impl Config {
    pub fn example() -> Self {
        Self {
            host: "xenserver.example".to_string(),
            user: "root".to_string(),
            password: String::new(),
            xe_path: None,
            backup_dir: "/backup".to_string(),
            backup_ext: default_backup_ext(),
            date_format: default_date_format(),
            backup_vms: default_backup_vms(),
            vm_list: Vec::new(),
            log: LogConfig::default(),
        }
    }
}

pub const DEFAULT_XE_PATH: &str = "xe";
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

fn default_backup_ext() -> String {
    ".xva".to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_backup_vms() -> String {
    "none".to_string()
}

fn default_log_path() -> String {
    "/var/log/xenvault.log".to_string()
}

fn default_true() -> bool {
    true
}
