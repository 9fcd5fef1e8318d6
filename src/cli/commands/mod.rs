pub mod backup;
pub mod init;

use crate::error::{SelectError, XenvaultError};

pub fn exit_code(err: &XenvaultError) -> i32 {
    match err {
        XenvaultError::Select(SelectError::InventoryQuery(_)) => 10,
        XenvaultError::Select(SelectError::NothingToBackUp) => 11,
        _ => 2,
    }
}

pub fn exit_for_error(err: &XenvaultError) -> ! {
    eprintln!("{}", err);
    std::process::exit(exit_code(err));
}
