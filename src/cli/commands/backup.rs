use std::path::Path;

use chrono::Local;

use crate::backup::run_batch;
use crate::config::load::load_config;
use crate::config::model::RuntimeConfig;
use crate::error::{ConfigError, Result};
use crate::logging::RunLog;
use crate::select::select_vms;
use crate::types::{BackupPolicy, ObjectId, RunMode};
use crate::util::paths::ensure_backup_dir;
use crate::xe::XeClient;

pub fn run_backup_command(
    config_path: &Path,
    vm_override: &[String],
    print_selection: bool,
    run_mode: RunMode,
) -> Result<()> {
    let mut cfg = load_config(config_path.to_string_lossy().as_ref())?;
    apply_vm_override(&mut cfg, vm_override)?;
    let mut client = XeClient::new(cfg.connection.clone(), run_mode);

    if print_selection {
        let vms = select_vms(&mut client, cfg.policy, &cfg.vm_list, &RunLog::disabled())?;
        for vm in &vms {
            println!("{}", vm);
        }
        return Ok(());
    }

    if run_mode.verbose {
        println!(
            "loaded config {} (policy {}, backup dir {})",
            config_path.display(),
            cfg.policy.as_str(),
            cfg.backup.backup_dir.display()
        );
    }

    let log = RunLog::new(&cfg.log_path, cfg.log_enable);
    println!("{}", Local::now().format("%d-%m-%Y %H:%M"));
    log.start();

    let vms = match select_vms(&mut client, cfg.policy, &cfg.vm_list, &log) {
        Ok(vms) => vms,
        Err(err) => {
            log.append_failure(&format!("VM selection failed: {}", err));
            log.finish();
            return Err(err.into());
        }
    };

    if let Err(err) = ensure_backup_dir(&cfg.backup.backup_dir) {
        log.append_failure(&format!("Backup VMs failed: {}", err));
        log.finish();
        return Err(err);
    }

    let report = run_batch(&mut client, &vms, &cfg.backup, &log);
    log.finish();

    println!(
        "backed up {} of {} VM(s)",
        report.succeeded(),
        report.outcomes.len()
    );
    for (vm, outcome) in &report.outcomes {
        if let Err(failure) = outcome {
            println!("  {}: {}", vm, failure);
        }
    }
    println!("{}", Local::now().format("%d-%m-%Y %H:%M"));
    Ok(())
}

fn apply_vm_override(cfg: &mut RuntimeConfig, vms: &[String]) -> Result<()> {
    if vms.is_empty() {
        return Ok(());
    }
    let mut list = Vec::new();
    for vm in vms {
        let uuid = vm
            .parse::<ObjectId>()
            .map_err(|e| ConfigError::Invalid(format!("--vm: {}", e)))?;
        list.push(uuid);
    }
    cfg.policy = BackupPolicy::List;
    cfg.vm_list = list;
    Ok(())
}
