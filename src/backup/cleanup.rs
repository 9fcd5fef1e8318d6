use crate::error::StepError;
use crate::logging::RunLog;
use crate::types::ObjectId;
use crate::xe::Hypervisor;

// Only VDIs behind the snapshot's own non-CD VBDs and flagged is-a-snapshot.
// The live VM's disks are never attached to the snapshot object.
pub fn snapshot_disks<H: Hypervisor>(
    hypervisor: &mut H,
    snapshot: &ObjectId,
    log: &RunLog,
) -> Result<Vec<ObjectId>, StepError> {
    log.append(&format!("Get VBD(s) of {}.", snapshot));
    let vbds = hypervisor
        .list_vbds(snapshot)
        .map_err(|e| StepError::DiskResolution(format!("list VBDs of {}: {}", snapshot, e)))?;

    let mut vdis = Vec::new();
    for vbd in &vbds {
        let vbd_type = hypervisor
            .vbd_type(vbd)
            .map_err(|e| StepError::DiskResolution(format!("type of VBD {}: {}", vbd, e)))?;
        if vbd_type.is_removable() {
            log.append(&format!("VBD {} is a CD, skipping.", vbd));
            continue;
        }
        let linked = hypervisor
            .list_vdis(vbd)
            .map_err(|e| StepError::DiskResolution(format!("VDIs of VBD {}: {}", vbd, e)))?;
        for vdi in linked {
            let is_snapshot = hypervisor.vdi_is_snapshot(&vdi).map_err(|e| {
                StepError::DiskResolution(format!("is-a-snapshot of VDI {}: {}", vdi, e))
            })?;
            if is_snapshot && !vdis.contains(&vdi) {
                log.append(&format!("Add VDI to deletion list: {}.", vdi));
                vdis.push(vdi);
            } else if !is_snapshot {
                log.append(&format!("VDI {} is not a snapshot, keeping.", vdi));
            }
        }
    }
    Ok(vdis)
}

pub fn destroy_disks<H: Hypervisor>(
    hypervisor: &mut H,
    vdis: &[ObjectId],
    log: &RunLog,
) -> Result<(), StepError> {
    for (idx, vdi) in vdis.iter().enumerate() {
        log.append(&format!("Destroy VDI {}.", vdi));
        if let Err(err) = hypervisor.destroy_vdi(vdi) {
            let remaining = vdis.len() - idx;
            return Err(StepError::Cleanup(format!(
                "destroy VDI {}: {} ({} VDI(s) left in place)",
                vdi, err, remaining
            )));
        }
        log.append(&format!("VDI destroyed: {}.", vdi));
    }
    Ok(())
}

pub fn remove_snapshot<H: Hypervisor>(
    hypervisor: &mut H,
    snapshot: &ObjectId,
    log: &RunLog,
) -> Result<(), StepError> {
    log.append(&format!("Uninstall snapshot {}.", snapshot));
    hypervisor
        .uninstall(snapshot)
        .map_err(|e| StepError::SnapshotRemoval(e.to_string()))
}
