use std::fmt::{self, Write as _};
use std::path::PathBuf;

use chrono::Local;
use tracing::warn;

use crate::backup::cleanup::{destroy_disks, remove_snapshot, snapshot_disks};
use crate::config::model::{BackupSettings, DEFAULT_DATE_FORMAT};
use crate::error::StepError;
use crate::logging::RunLog;
use crate::types::{ObjectId, TemplateFlag};
use crate::util::paths::export_path;
use crate::xe::Hypervisor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupStage {
    Start,
    LabelResolved,
    Snapshotted,
    Demoted,
    Exported,
    DisksDeleted,
    SnapshotRemoved,
}

impl BackupStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupStage::Start => "start",
            BackupStage::LabelResolved => "label resolved",
            BackupStage::Snapshotted => "snapshotted",
            BackupStage::Demoted => "demoted",
            BackupStage::Exported => "exported",
            BackupStage::DisksDeleted => "disks deleted",
            BackupStage::SnapshotRemoved => "snapshot removed",
        }
    }
}

impl fmt::Display for BackupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmBackup {
    pub label: String,
    pub snapshot: ObjectId,
    pub export_path: PathBuf,
    pub deleted_vdis: Vec<ObjectId>,
}

#[derive(Debug)]
pub struct VmFailure {
    pub stage: BackupStage,
    pub error: StepError,
}

impl fmt::Display for VmFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (after stage: {})", self.error, self.stage)
    }
}

struct StageTracker<'a> {
    vm: &'a ObjectId,
    log: &'a RunLog,
    stage: BackupStage,
}

impl<'a> StageTracker<'a> {
    fn advance<T>(&mut self, next: BackupStage, result: Result<T, StepError>) -> Result<T, VmFailure> {
        let value = self.check(result)?;
        self.stage = next;
        Ok(value)
    }

    fn check<T>(&self, result: Result<T, StepError>) -> Result<T, VmFailure> {
        result.map_err(|error| {
            self.log.append_failure(&format!(
                "VM {} stopped after stage {}: {}",
                self.vm, self.stage, error
            ));
            VmFailure {
                stage: self.stage,
                error,
            }
        })
    }
}

pub fn backup_vm<H: Hypervisor>(
    hypervisor: &mut H,
    vm: &ObjectId,
    settings: &BackupSettings,
    log: &RunLog,
) -> Result<VmBackup, VmFailure> {
    log.append(&format!("Backup VM {}.", vm));
    let mut tracker = StageTracker {
        vm,
        log,
        stage: BackupStage::Start,
    };

    let timestamp = export_timestamp(&settings.date_format);
    let label = tracker.advance(BackupStage::LabelResolved, resolve_label(hypervisor, vm, log))?;

    let snapshot_name = format!("{}_snapshot", label);
    let snapshot = tracker.advance(
        BackupStage::Snapshotted,
        take_snapshot(hypervisor, vm, &snapshot_name, log),
    )?;

    tracker.advance(BackupStage::Demoted, demote(hypervisor, &snapshot, log))?;

    let path = export_path(
        &settings.backup_dir,
        &label,
        &timestamp,
        &settings.backup_ext,
    );
    tracker.advance(BackupStage::Exported, export(hypervisor, &snapshot, &path, log))?;

    let vdis = tracker.check(snapshot_disks(hypervisor, &snapshot, log))?;
    tracker.advance(BackupStage::DisksDeleted, destroy_disks(hypervisor, &vdis, log))?;
    tracker.advance(
        BackupStage::SnapshotRemoved,
        remove_snapshot(hypervisor, &snapshot, log),
    )?;
    log.append("Snapshot removed.");

    Ok(VmBackup {
        label,
        snapshot,
        export_path: path,
        deleted_vdis: vdis,
    })
}

pub fn normalize_label(raw: &str) -> String {
    raw.replace(' ', "_")
        .replace('/', "_")
        .trim_start_matches('(')
        .trim_end_matches([')', '\n', '\r'])
        .to_string()
}

// load_config rejects bad patterns; settings built elsewhere fall back to the default.
fn export_timestamp(format: &str) -> String {
    let now = Local::now();
    let mut out = String::new();
    if write!(out, "{}", now.format(format)).is_ok() {
        return out;
    }
    warn!("invalid date format {}; using {}", format, DEFAULT_DATE_FORMAT);
    now.format(DEFAULT_DATE_FORMAT).to_string()
}

fn resolve_label<H: Hypervisor>(
    hypervisor: &mut H,
    vm: &ObjectId,
    log: &RunLog,
) -> Result<String, StepError> {
    log.append(&format!("Get VM label for {}.", vm));
    let raw = hypervisor
        .vm_label(vm)
        .map_err(|e| StepError::LabelResolution(e.to_string()))?;
    let label = normalize_label(&raw);
    if label.is_empty() {
        return Err(StepError::LabelResolution(format!("VM {} has an empty name-label", vm)));
    }
    log.append(&format!("Label of {}: {}", vm, label));
    Ok(label)
}

fn take_snapshot<H: Hypervisor>(
    hypervisor: &mut H,
    vm: &ObjectId,
    name: &str,
    log: &RunLog,
) -> Result<ObjectId, StepError> {
    log.append(&format!("Snapshot with quiesce {} as {}.", vm, name));
    match hypervisor.snapshot_with_quiesce(vm, name) {
        Ok(snapshot) => {
            log.append(&format!("Quiesced snapshot {} created.", snapshot));
            return Ok(snapshot);
        }
        Err(err) => {
            log.append_failure(&format!("Quiesce snapshot failed: {}", err));
            log.append("Attempting normal snapshot.");
        }
    }
    let snapshot = hypervisor.snapshot(vm, name).map_err(|e| {
        log.append_failure(&format!("Normal snapshot failed: {}", e));
        StepError::Snapshot(e.to_string())
    })?;
    log.append(&format!("Snapshot {} created.", snapshot));
    Ok(snapshot)
}

fn demote<H: Hypervisor>(
    hypervisor: &mut H,
    snapshot: &ObjectId,
    log: &RunLog,
) -> Result<(), StepError> {
    for flag in [TemplateFlag::IsATemplate, TemplateFlag::HaAlwaysRun] {
        log.append(&format!("Clear {} on {}.", flag.param_name(), snapshot));
        hypervisor
            .clear_template_flag(snapshot, flag)
            .map_err(|e| StepError::Demote(format!("{}: {}", flag.param_name(), e)))?;
    }
    Ok(())
}

fn export<H: Hypervisor>(
    hypervisor: &mut H,
    snapshot: &ObjectId,
    path: &std::path::Path,
    log: &RunLog,
) -> Result<(), StepError> {
    log.append(&format!("Export {} as {}.", snapshot, path.display()));
    hypervisor
        .export(snapshot, path)
        .map_err(|e| StepError::Export(e.to_string()))?;
    log.append("Export succeeded.");
    Ok(())
}
