use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ObjectId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("uuid is empty".to_string());
        }
        if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(format!("uuid {} must use only letters, digits, '-'", s));
        }
        Ok(ObjectId(s.to_string()))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupPolicy {
    All,
    Running,
    List,
    None,
}

impl BackupPolicy {
    pub fn parse(value: &str) -> (Self, bool) {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => (BackupPolicy::All, true),
            "running" => (BackupPolicy::Running, true),
            "list" => (BackupPolicy::List, true),
            "none" => (BackupPolicy::None, true),
            _ => (BackupPolicy::None, false),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackupPolicy::All => "all",
            BackupPolicy::Running => "running",
            BackupPolicy::List => "list",
            BackupPolicy::None => "none",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VbdType {
    Disk,
    Cd,
    Other(String),
}

impl VbdType {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "Disk" => VbdType::Disk,
            "CD" => VbdType::Cd,
            other => VbdType::Other(other.to_string()),
        }
    }

    pub fn is_removable(&self) -> bool {
        matches!(self, VbdType::Cd)
    }
}

impl fmt::Display for VbdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VbdType::Disk => f.write_str("Disk"),
            VbdType::Cd => f.write_str("CD"),
            VbdType::Other(other) => f.write_str(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFlag {
    IsATemplate,
    HaAlwaysRun,
}

impl TemplateFlag {
    pub fn param_name(&self) -> &'static str {
        match self {
            TemplateFlag::IsATemplate => "is-a-template",
            TemplateFlag::HaAlwaysRun => "ha-always-run",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmFilter {
    All,
    Running,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmRecord {
    pub uuid: ObjectId,
    pub name_label: Option<String>,
    pub power_state: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunMode {
    pub verbose: bool,
}
