use crate::config::model::BackupSettings;
use crate::logging::RunLog;
use crate::types::ObjectId;
use crate::xe::Hypervisor;

pub mod cleanup;
pub mod engine;

pub use engine::{backup_vm, BackupStage, VmBackup, VmFailure};

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<(ObjectId, Result<VmBackup, VmFailure>)>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|(_, r)| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

pub fn run_batch<H: Hypervisor>(
    hypervisor: &mut H,
    vms: &[ObjectId],
    settings: &BackupSettings,
    log: &RunLog,
) -> BatchReport {
    log.append("Initialise backup of VM list.");
    let mut report = BatchReport::default();
    for vm in vms {
        let outcome = backup_vm(hypervisor, vm, settings, log);
        match &outcome {
            Ok(backup) => {
                log.append(&format!("Exported {} to {}.", vm, backup.export_path.display()));
                log.append(&format!("VM {} backup succeeded!", vm));
            }
            Err(failure) => {
                log.append_failure(&format!("VM {} backup failed! {}", vm, failure))
            }
        }
        report.outcomes.push((vm.clone(), outcome));
    }
    log.append(&format!(
        "Backup VMs finished: {} succeeded, {} failed.",
        report.succeeded(),
        report.failed()
    ));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::select_vms;
    use crate::types::{BackupPolicy, VbdType};
    use crate::xe::fake::{id, FakeHypervisor};
    use std::fs;
    use std::path::PathBuf;

    fn settings(dir: PathBuf) -> BackupSettings {
        BackupSettings {
            backup_dir: dir,
            backup_ext: ".xva".to_string(),
            date_format: "%Y-%m-%d_%H-%M-%S".to_string(),
        }
    }

    #[test]
    fn failure_in_middle_vm_does_not_stop_the_batch() {
        let mut hv = FakeHypervisor::new()
            .with_vm("vm-1", "One", "running")
            .with_vm("vm-2", "Two", "running")
            .with_vm("vm-3", "Three", "running")
            .fail("snapshot_with_quiesce", "vm-2")
            .fail("snapshot", "vm-2");
        let vms = vec![id("vm-1"), id("vm-2"), id("vm-3")];
        let report = run_batch(&mut hv, &vms, &settings(PathBuf::from("/backup")), &RunLog::disabled());

        assert_eq!(report.outcomes.len(), 3);
        assert!(report.outcomes[0].1.is_ok());
        assert!(report.outcomes[1].1.is_err());
        assert!(report.outcomes[2].1.is_ok());
        assert_eq!(report.outcomes[2].0, id("vm-3"));
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(hv.uninstalled, vec![id("vm-1-snap"), id("vm-3-snap")]);
    }

    #[test]
    fn vms_are_processed_in_given_order() {
        let mut hv = FakeHypervisor::new()
            .with_vm("vm-b", "B", "running")
            .with_vm("vm-a", "A", "running");
        let vms = vec![id("vm-b"), id("vm-a")];
        run_batch(&mut hv, &vms, &settings(PathBuf::from("/backup")), &RunLog::disabled());
        let labels: Vec<&String> = hv.calls.iter().filter(|c| c.starts_with("vm_label")).collect();
        assert_eq!(labels, vec!["vm_label vm-b", "vm_label vm-a"]);
    }

    #[test]
    fn running_policy_end_to_end() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log_path = dir.path().join("backup.log");
        let log = RunLog::new(&log_path, true);
        let mut hv = FakeHypervisor::new()
            .with_vm("vm-A", "Web01", "running")
            .with_vm("vm-B", "Idle", "halted")
            .with_disk("vm-A", "vbd-live", VbdType::Disk, "vdi-live", false)
            .with_disk("vm-A", "vbd-cd", VbdType::Cd, "vdi-iso", false)
            .with_disk("vm-A-snap", "vbd-cd", VbdType::Cd, "vdi-iso", false)
            .with_disk("vm-A-snap", "vbd-snap", VbdType::Disk, "vdi-snap", true);

        let vms = select_vms(&mut hv, BackupPolicy::Running, &[], &log).expect("select");
        assert_eq!(vms, vec![id("vm-A")]);

        let report = run_batch(&mut hv, &vms, &settings(dir.path().to_path_buf()), &log);
        assert_eq!(report.succeeded(), 1);
        let backup = report.outcomes[0].1.as_ref().expect("backup");
        let file = backup.export_path.file_name().expect("name").to_string_lossy().to_string();
        assert_eq!(backup.export_path.parent(), Some(dir.path()));
        assert!(file.starts_with("Web01-") && file.ends_with(".xva"));
        assert_eq!(backup.deleted_vdis, vec![id("vdi-snap")]);

        assert!(hv.calls.contains(&"snapshot_with_quiesce vm-A Web01_snapshot".to_string()));
        assert_eq!(hv.called("snapshot"), 0);
        assert_eq!(hv.destroyed, vec![id("vdi-snap")]);
        assert_eq!(hv.uninstalled, vec![id("vm-A-snap")]);

        let text = fs::read_to_string(&log_path).expect("log");
        assert!(text.lines().any(|l| l.ends_with("\tVM vm-A backup succeeded!")));
        assert!(!text.contains("vdi-live"));
    }
}
