use std::path::Path;
use std::process::Command;

use crate::config::model::Connection;
use crate::error::{XeError, XeResult};
use crate::types::{ObjectId, RunMode, TemplateFlag, VbdType, VmFilter, VmRecord};
use crate::util::command::run_captured;
use crate::xe::command::{Authenticated, XeCall};
use crate::xe::records::{parse_ids, parse_records, parse_value};

pub mod command;
pub mod records;

#[cfg(test)]
pub mod fake;

pub trait Hypervisor {
    fn list_vms(&mut self, filter: VmFilter) -> XeResult<Vec<VmRecord>>;

    fn vm_label(&mut self, vm: &ObjectId) -> XeResult<String>;

    fn snapshot_with_quiesce(&mut self, vm: &ObjectId, name: &str) -> XeResult<ObjectId>;

    fn snapshot(&mut self, vm: &ObjectId, name: &str) -> XeResult<ObjectId>;

    fn clear_template_flag(&mut self, uuid: &ObjectId, flag: TemplateFlag) -> XeResult<()>;

    fn export(&mut self, vm: &ObjectId, filename: &Path) -> XeResult<()>;

    fn list_vbds(&mut self, vm: &ObjectId) -> XeResult<Vec<ObjectId>>;

    fn vbd_type(&mut self, vbd: &ObjectId) -> XeResult<VbdType>;

    fn list_vdis(&mut self, vbd: &ObjectId) -> XeResult<Vec<ObjectId>>;

    fn vdi_is_snapshot(&mut self, vdi: &ObjectId) -> XeResult<bool>;

    fn destroy_vdi(&mut self, vdi: &ObjectId) -> XeResult<()>;

    fn uninstall(&mut self, vm: &ObjectId) -> XeResult<()>;
}

pub struct XeClient {
    connection: Connection,
    run_mode: RunMode,
}

impl XeClient {
    pub fn new(connection: Connection, run_mode: RunMode) -> Self {
        Self {
            connection,
            run_mode,
        }
    }

    fn run(&self, call: XeCall<'_>) -> XeResult<String> {
        let mut cmd: Command = Authenticated(&self.connection, call).into();
        run_captured(&mut cmd, self.run_mode)
    }

    fn run_for_id(&self, call: XeCall<'_>) -> XeResult<ObjectId> {
        let output = self.run(call)?;
        let value = parse_value(&output);
        value
            .parse::<ObjectId>()
            .map_err(|e| XeError::Malformed(format!("new object: {}", e)))
    }
}

impl Hypervisor for XeClient {
    fn list_vms(&mut self, filter: VmFilter) -> XeResult<Vec<VmRecord>> {
        let output = self.run(XeCall::VmList(filter))?;
        parse_records(&output)?
            .iter()
            .map(|record| {
                Ok(VmRecord {
                    uuid: record.id()?,
                    name_label: record.get("name-label").map(str::to_string),
                    power_state: record.get("power-state").map(str::to_string),
                })
            })
            .collect()
    }

    fn vm_label(&mut self, vm: &ObjectId) -> XeResult<String> {
        let output = self.run(XeCall::VmParamGet {
            uuid: vm,
            param: "name-label",
        })?;
        Ok(output)
    }

    fn snapshot_with_quiesce(&mut self, vm: &ObjectId, name: &str) -> XeResult<ObjectId> {
        self.run_for_id(XeCall::VmSnapshotWithQuiesce { vm, name })
    }

    fn snapshot(&mut self, vm: &ObjectId, name: &str) -> XeResult<ObjectId> {
        self.run_for_id(XeCall::VmSnapshot { vm, name })
    }

    fn clear_template_flag(&mut self, uuid: &ObjectId, flag: TemplateFlag) -> XeResult<()> {
        self.run(XeCall::TemplateParamSet { uuid, flag })?;
        Ok(())
    }

    fn export(&mut self, vm: &ObjectId, filename: &Path) -> XeResult<()> {
        self.run(XeCall::VmExport { vm, filename })?;
        Ok(())
    }

    fn list_vbds(&mut self, vm: &ObjectId) -> XeResult<Vec<ObjectId>> {
        let output = self.run(XeCall::VbdList { vm })?;
        parse_ids(&output)
    }

    fn vbd_type(&mut self, vbd: &ObjectId) -> XeResult<VbdType> {
        let output = self.run(XeCall::VbdParamGet {
            uuid: vbd,
            param: "type",
        })?;
        Ok(VbdType::parse(&parse_value(&output)))
    }

    fn list_vdis(&mut self, vbd: &ObjectId) -> XeResult<Vec<ObjectId>> {
        let output = self.run(XeCall::VdiList { vbd })?;
        parse_ids(&output)
    }

    fn vdi_is_snapshot(&mut self, vdi: &ObjectId) -> XeResult<bool> {
        let output = self.run(XeCall::VdiParamGet {
            uuid: vdi,
            param: "is-a-snapshot",
        })?;
        Ok(parse_value(&output).trim() == "true")
    }

    fn destroy_vdi(&mut self, vdi: &ObjectId) -> XeResult<()> {
        self.run(XeCall::VdiDestroy { uuid: vdi })?;
        Ok(())
    }

    fn uninstall(&mut self, vm: &ObjectId) -> XeResult<()> {
        self.run(XeCall::VmUninstall { uuid: vm })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn scripted_xe(dir: &Path, stdout: &str, code: i32) -> Connection {
        let script = dir.join("xe");
        let body = format!("#!/bin/sh\nprintf '%s' '{}'\nexit {}\n", stdout, code);
        fs::write(&script, body).expect("write script");
        let mut perms = fs::metadata(&script).expect("stat").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&script, perms).expect("chmod");
        Connection {
            xe_path: script.to_string_lossy().to_string(),
            host: "pool".to_string(),
            user: "root".to_string(),
            password: "pw".to_string(),
        }
    }

    #[test]
    fn list_vms_parses_records() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = "uuid ( RO)           : vm-a\n     name-label ( RW): Web01\n    power-state ( RO): running\n\n\n";
        let mut client = XeClient::new(scripted_xe(dir.path(), out, 0), RunMode::default());
        let vms = client.list_vms(VmFilter::Running).expect("list");
        assert_eq!(vms.len(), 1);
        assert_eq!(vms[0].uuid.as_str(), "vm-a");
        assert_eq!(vms[0].name_label.as_deref(), Some("Web01"));
        assert_eq!(vms[0].power_state.as_deref(), Some("running"));
    }

    #[test]
    fn snapshot_returns_new_uuid() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut client = XeClient::new(scripted_xe(dir.path(), "snap-1\n", 0), RunMode::default());
        let vm: ObjectId = "vm-a".parse().expect("id");
        let snap = client.snapshot(&vm, "Web01_snapshot").expect("snapshot");
        assert_eq!(snap.as_str(), "snap-1");
    }

    #[test]
    fn non_zero_exit_is_failure_with_diagnostic() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut client = XeClient::new(
            scripted_xe(dir.path(), "The VM has no guest agent\n", 1),
            RunMode::default(),
        );
        let vm: ObjectId = "vm-a".parse().expect("id");
        let err = client.snapshot_with_quiesce(&vm, "Web01_snapshot").unwrap_err();
        assert_eq!(err.to_string(), "The VM has no guest agent");
    }

    #[test]
    fn vdi_snapshot_flag_is_boolean_string() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut client = XeClient::new(scripted_xe(dir.path(), "false\n", 0), RunMode::default());
        let vdi: ObjectId = "vdi-1".parse().expect("id");
        assert!(!client.vdi_is_snapshot(&vdi).expect("flag"));
    }
}
