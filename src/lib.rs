pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod select;
pub mod types;
pub mod util;
pub mod xe;

pub use error::{Result, XenvaultError};
pub use types::{BackupPolicy, ObjectId, RunMode};
