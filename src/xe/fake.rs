use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::{XeError, XeResult};
use crate::types::{ObjectId, TemplateFlag, VbdType, VmFilter, VmRecord};
use crate::xe::Hypervisor;

#[derive(Debug, Default)]
pub struct FakeHypervisor {
    vms: Vec<VmRecord>,
    labels: HashMap<String, String>,
    vbds: HashMap<String, Vec<ObjectId>>,
    vbd_types: HashMap<String, VbdType>,
    vdis: HashMap<String, Vec<ObjectId>>,
    snapshot_vdis: HashSet<String>,
    failures: HashSet<String>,
    pub calls: Vec<String>,
    pub exports: Vec<PathBuf>,
    pub destroyed: Vec<ObjectId>,
    pub uninstalled: Vec<ObjectId>,
}

pub fn id(s: &str) -> ObjectId {
    s.parse().expect("test uuid")
}

pub fn snapshot_of(vm: &str) -> String {
    format!("{}-snap", vm)
}

impl FakeHypervisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vm(mut self, uuid: &str, label: &str, power_state: &str) -> Self {
        self.vms.push(VmRecord {
            uuid: id(uuid),
            name_label: Some(label.to_string()),
            power_state: Some(power_state.to_string()),
        });
        self.labels.insert(uuid.to_string(), format!("{}\n", label));
        self
    }

    pub fn with_disk(
        mut self,
        owner: &str,
        vbd: &str,
        vbd_type: VbdType,
        vdi: &str,
        is_snapshot: bool,
    ) -> Self {
        let owned = self.vbds.entry(owner.to_string()).or_default();
        if !owned.iter().any(|v| v.as_str() == vbd) {
            owned.push(id(vbd));
        }
        self.vbd_types.insert(vbd.to_string(), vbd_type);
        let linked = self.vdis.entry(vbd.to_string()).or_default();
        if !linked.iter().any(|v| v.as_str() == vdi) {
            linked.push(id(vdi));
        }
        if is_snapshot {
            self.snapshot_vdis.insert(vdi.to_string());
        }
        self
    }

    pub fn fail(mut self, op: &str, target: &str) -> Self {
        self.failures.insert(format!("{} {}", op, target));
        self
    }

    pub fn called(&self, op: &str) -> usize {
        self.calls
            .iter()
            .filter(|c| c.split_whitespace().next() == Some(op))
            .count()
    }

    fn record(&mut self, op: &str, target: &str, extra: &str) -> XeResult<()> {
        let line = if extra.is_empty() {
            format!("{} {}", op, target)
        } else {
            format!("{} {} {}", op, target, extra)
        };
        self.calls.push(line);
        if self.failures.contains(&format!("{} {}", op, target)) {
            return Err(XeError::Failed(format!("{} failed on {}", op, target)));
        }
        Ok(())
    }
}

impl Hypervisor for FakeHypervisor {
    fn list_vms(&mut self, filter: VmFilter) -> XeResult<Vec<VmRecord>> {
        let target = match filter {
            VmFilter::All => "all",
            VmFilter::Running => "running",
        };
        self.record("list_vms", target, "")?;
        Ok(self
            .vms
            .iter()
            .filter(|vm| filter == VmFilter::All || vm.power_state.as_deref() == Some("running"))
            .cloned()
            .collect())
    }

    fn vm_label(&mut self, vm: &ObjectId) -> XeResult<String> {
        self.record("vm_label", vm.as_str(), "")?;
        self.labels
            .get(vm.as_str())
            .cloned()
            .ok_or_else(|| XeError::Failed(format!("The uuid you supplied was invalid. {}", vm)))
    }

    fn snapshot_with_quiesce(&mut self, vm: &ObjectId, name: &str) -> XeResult<ObjectId> {
        self.record("snapshot_with_quiesce", vm.as_str(), name)?;
        Ok(id(&snapshot_of(vm.as_str())))
    }

    fn snapshot(&mut self, vm: &ObjectId, name: &str) -> XeResult<ObjectId> {
        self.record("snapshot", vm.as_str(), name)?;
        Ok(id(&snapshot_of(vm.as_str())))
    }

    fn clear_template_flag(&mut self, uuid: &ObjectId, flag: TemplateFlag) -> XeResult<()> {
        self.record("clear_template_flag", uuid.as_str(), flag.param_name())
    }

    fn export(&mut self, vm: &ObjectId, filename: &Path) -> XeResult<()> {
        self.record("export", vm.as_str(), &filename.display().to_string())?;
        self.exports.push(filename.to_path_buf());
        Ok(())
    }

    fn list_vbds(&mut self, vm: &ObjectId) -> XeResult<Vec<ObjectId>> {
        self.record("list_vbds", vm.as_str(), "")?;
        Ok(self.vbds.get(vm.as_str()).cloned().unwrap_or_default())
    }

    fn vbd_type(&mut self, vbd: &ObjectId) -> XeResult<VbdType> {
        self.record("vbd_type", vbd.as_str(), "")?;
        Ok(self
            .vbd_types
            .get(vbd.as_str())
            .cloned()
            .unwrap_or(VbdType::Disk))
    }

    fn list_vdis(&mut self, vbd: &ObjectId) -> XeResult<Vec<ObjectId>> {
        self.record("list_vdis", vbd.as_str(), "")?;
        Ok(self.vdis.get(vbd.as_str()).cloned().unwrap_or_default())
    }

    fn vdi_is_snapshot(&mut self, vdi: &ObjectId) -> XeResult<bool> {
        self.record("vdi_is_snapshot", vdi.as_str(), "")?;
        Ok(self.snapshot_vdis.contains(vdi.as_str()))
    }

    fn destroy_vdi(&mut self, vdi: &ObjectId) -> XeResult<()> {
        self.record("destroy_vdi", vdi.as_str(), "")?;
        self.destroyed.push(vdi.clone());
        Ok(())
    }

    fn uninstall(&mut self, vm: &ObjectId) -> XeResult<()> {
        self.record("uninstall", vm.as_str(), "")?;
        self.uninstalled.push(vm.clone());
        Ok(())
    }
}
