use crate::domain::model::{HardwareAddr, WifiInterface};
use crate::domain::ports::WifiHandle;
use crate::utils::error::{Result, TaskError};
use std::fs;
use std::path::{Path, PathBuf};

/// 從 sysfs 列出無線網卡：有 `wireless` 子目錄的介面才算
#[derive(Debug, Clone)]
pub struct SysfsWifi {
    root: PathBuf,
}

impl SysfsWifi {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn read_interface(&self, dir: &Path, name: &str) -> Result<WifiInterface> {
        let index = fs::read_to_string(dir.join("ifindex"))?
            .trim()
            .parse::<u32>()
            .map_err(|e| TaskError::InterfacesError(format!("{}: bad ifindex: {}", name, e)))?;

        let hardware_addr = fs::read_to_string(dir.join("address"))?
            .parse::<HardwareAddr>()
            .map_err(|e| TaskError::InterfacesError(format!("{}: {}", name, e)))?;

        Ok(WifiInterface {
            index,
            name: name.to_string(),
            hardware_addr,
        })
    }
}

impl Default for SysfsWifi {
    fn default() -> Self {
        Self::new("/sys/class/net")
    }
}

impl WifiHandle for SysfsWifi {
    fn interfaces(&self) -> Result<Vec<WifiInterface>> {
        let mut interfaces = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let dir = entry.path();
            if !dir.join("wireless").is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            interfaces.push(self.read_interface(&dir, &name)?);
        }

        interfaces.sort_by_key(|iface| iface.index);
        tracing::debug!("Found {} wireless interfaces", interfaces.len());
        Ok(interfaces)
    }
}
