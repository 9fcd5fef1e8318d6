use crate::error::SelectError;
use crate::logging::RunLog;
use crate::types::{BackupPolicy, ObjectId, VmFilter};
use crate::xe::Hypervisor;

pub fn select_vms<H: Hypervisor>(
    hypervisor: &mut H,
    policy: BackupPolicy,
    vm_list: &[ObjectId],
    log: &RunLog,
) -> Result<Vec<ObjectId>, SelectError> {
    let selected = match policy {
        BackupPolicy::All => {
            log.append("Backup All VMs.");
            query(hypervisor, VmFilter::All, log)?
        }
        BackupPolicy::Running => {
            log.append("Backup running VMs.");
            query(hypervisor, VmFilter::Running, log)?
        }
        BackupPolicy::List => {
            log.append("Backup list VMs.");
            vm_list.to_vec()
        }
        BackupPolicy::None => {
            log.append("Backup no VMs.");
            return Err(SelectError::NothingToBackUp);
        }
    };
    if selected.is_empty() {
        log.append_failure(&format!("Policy {} selected no VMs.", policy.as_str()));
        return Err(SelectError::NothingToBackUp);
    }
    Ok(selected)
}

fn query<H: Hypervisor>(
    hypervisor: &mut H,
    filter: VmFilter,
    log: &RunLog,
) -> Result<Vec<ObjectId>, SelectError> {
    let what = match filter {
        VmFilter::All => "all",
        VmFilter::Running => "running",
    };
    log.append(&format!("Get {} VMs.", what));
    let records = hypervisor.list_vms(filter).map_err(|e| {
        log.append_failure(&format!("Get {} VMs failed: {}", what, e));
        SelectError::InventoryQuery(e.to_string())
    })?;
    for record in &records {
        log.append(&format!(
            "Selected VM {} ({}).",
            record.uuid,
            record.name_label.as_deref().unwrap_or("?")
        ));
    }
    Ok(records.into_iter().map(|r| r.uuid).collect())
}
