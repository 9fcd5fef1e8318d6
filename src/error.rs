use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XenvaultError {
    #[error("{0}")]
    Message(String),
    #[error("{0}")]
    Config(ConfigError),
    #[error("{0}")]
    Select(SelectError),
    #[error("{0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parse config: {0}")]
    Parse(String),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum XeError {
    #[error("{program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{0}")]
    Failed(String),
    #[error("malformed xe output: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("inventory query failed: {0}")]
    InventoryQuery(String),
    #[error("no VMs to back up")]
    NothingToBackUp,
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error("label resolution failed: {0}")]
    LabelResolution(String),
    #[error("snapshot failed: {0}")]
    Snapshot(String),
    #[error("snapshot demotion failed: {0}")]
    Demote(String),
    #[error("export failed: {0}")]
    Export(String),
    #[error("disk resolution failed: {0}")]
    DiskResolution(String),
    #[error("disk cleanup failed: {0}")]
    Cleanup(String),
    #[error("snapshot removal failed: {0}")]
    SnapshotRemoval(String),
}

pub type Result<T> = std::result::Result<T, XenvaultError>;
pub type XeResult<T> = std::result::Result<T, XeError>;

impl XenvaultError {
    pub fn message(msg: impl Into<String>) -> Self {
        XenvaultError::Message(msg.into())
    }
}

impl From<ConfigError> for XenvaultError {
    fn from(err: ConfigError) -> Self {
        XenvaultError::Config(err)
    }
}

impl From<SelectError> for XenvaultError {
    fn from(err: SelectError) -> Self {
        XenvaultError::Select(err)
    }
}
