use std::process::Command;

use tracing::debug;

use crate::error::{XeError, XeResult};
use crate::types::RunMode;

const PASSWORD_FLAG: &str = "-pw";
const PASSWORD_MASK: &str = "******";

pub fn describe_command(cmd: &Command) -> String {
    let program = cmd.get_program().to_string_lossy().to_string();
    let mut args = Vec::new();
    let mut mask_next = false;
    for arg in cmd.get_args() {
        if mask_next {
            args.push(PASSWORD_MASK.to_string());
            mask_next = false;
            continue;
        }
        let arg = arg.to_string_lossy().to_string();
        mask_next = arg == PASSWORD_FLAG;
        args.push(arg);
    }
    if args.is_empty() {
        program
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

pub fn maybe_print_command(cmd: &Command, run_mode: RunMode) {
    if !run_mode.verbose {
        return;
    }
    debug!("{}", describe_command(cmd));
}

pub fn run_captured(cmd: &mut Command, run_mode: RunMode) -> XeResult<String> {
    maybe_print_command(cmd, run_mode);
    let output = cmd.output().map_err(|e| XeError::Spawn {
        program: cmd.get_program().to_string_lossy().to_string(),
        source: e,
    })?;
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    if output.status.success() {
        return Ok(stdout);
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let mut combined = stdout;
    combined.push_str(&stderr);
    let mut diagnostic = flatten(&combined);
    if diagnostic.is_empty() {
        diagnostic = match output.status.code() {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        };
    }
    Err(XeError::Failed(diagnostic))
}

fn flatten(text: &str) -> String {
    text.replace(['\r', '\n'], " ").trim().to_string()
}
