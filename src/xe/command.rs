use std::path::Path;
use std::process::Command;

use crate::config::model::Connection;
use crate::types::{ObjectId, TemplateFlag, VmFilter};

#[derive(Debug, Clone)]
pub enum XeCall<'a> {
    VmList(VmFilter),
    VmParamGet { uuid: &'a ObjectId, param: &'a str },
    VmSnapshotWithQuiesce { vm: &'a ObjectId, name: &'a str },
    VmSnapshot { vm: &'a ObjectId, name: &'a str },
    TemplateParamSet { uuid: &'a ObjectId, flag: TemplateFlag },
    VmExport { vm: &'a ObjectId, filename: &'a Path },
    VbdList { vm: &'a ObjectId },
    VbdParamGet { uuid: &'a ObjectId, param: &'a str },
    VdiList { vbd: &'a ObjectId },
    VdiParamGet { uuid: &'a ObjectId, param: &'a str },
    VdiDestroy { uuid: &'a ObjectId },
    VmUninstall { uuid: &'a ObjectId },
}

impl<'a> XeCall<'a> {
    pub fn subcommand(&self) -> &'static str {
        match self {
            XeCall::VmList(_) => "vm-list",
            XeCall::VmParamGet { .. } => "vm-param-get",
            XeCall::VmSnapshotWithQuiesce { .. } => "vm-snapshot-with-quiesce",
            XeCall::VmSnapshot { .. } => "vm-snapshot",
            XeCall::TemplateParamSet { .. } => "template-param-set",
            XeCall::VmExport { .. } => "vm-export",
            XeCall::VbdList { .. } => "vbd-list",
            XeCall::VbdParamGet { .. } => "vbd-param-get",
            XeCall::VdiList { .. } => "vdi-list",
            XeCall::VdiParamGet { .. } => "vdi-param-get",
            XeCall::VdiDestroy { .. } => "vdi-destroy",
            XeCall::VmUninstall { .. } => "vm-uninstall",
        }
    }

    pub fn params(&self) -> Vec<String> {
        match self {
            XeCall::VmList(VmFilter::All) => vec!["is-control-domain=false".to_string()],
            XeCall::VmList(VmFilter::Running) => vec![
                "power-state=running".to_string(),
                "is-control-domain=false".to_string(),
            ],
            XeCall::VmParamGet { uuid, param }
            | XeCall::VbdParamGet { uuid, param }
            | XeCall::VdiParamGet { uuid, param } => {
                vec![format!("param-name={}", param), format!("uuid={}", uuid)]
            }
            XeCall::VmSnapshotWithQuiesce { vm, name } | XeCall::VmSnapshot { vm, name } => {
                vec![format!("vm={}", vm), format!("new-name-label={}", name)]
            }
            XeCall::TemplateParamSet { uuid, flag } => {
                vec![format!("{}=false", flag.param_name()), format!("uuid={}", uuid)]
            }
            XeCall::VmExport { vm, filename } => {
                vec![format!("vm={}", vm), format!("filename={}", filename.display())]
            }
            XeCall::VbdList { vm } => {
                vec![format!("vm-uuid={}", vm), "params=uuid".to_string()]
            }
            XeCall::VdiList { vbd } => vec![format!("vbd-uuids={}", vbd)],
            XeCall::VdiDestroy { uuid } => vec![format!("uuid={}", uuid)],
            XeCall::VmUninstall { uuid } => {
                vec!["force=true".to_string(), format!("uuid={}", uuid)]
            }
        }
    }
}

pub struct Authenticated<'a>(pub &'a Connection, pub XeCall<'a>);

impl<'a> From<Authenticated<'a>> for Command {
    fn from(call: Authenticated<'a>) -> Self {
        let Authenticated(conn, call) = call;
        let mut cmd = Command::new(&conn.xe_path);
        cmd.arg(call.subcommand())
            .arg("-s")
            .arg(&conn.host)
            .arg("-u")
            .arg(&conn.user)
            .arg("-pw")
            .arg(&conn.password);
        for param in call.params() {
            cmd.arg(param);
        }
        cmd
    }
}
