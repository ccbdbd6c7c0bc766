use crate::domain::model::{HardwareAddr, WifiInterface};
use crate::domain::ports::WifiHandle;
use crate::utils::error::{Result, TaskError};

pub struct WifiService<W: WifiHandle> {
    wifi: W,
}

impl<W: WifiHandle> WifiService<W> {
    pub fn new(wifi: W) -> Self {
        Self { wifi }
    }

    /// 單次掃描取得名稱與位址，兩者保證對應同一張網卡
    pub fn get_interfaces(&self) -> Result<Vec<WifiInterface>> {
        self.wifi.interfaces().map_err(wrap_interfaces_error)
    }

    pub fn get_addresses(&self) -> Result<Vec<HardwareAddr>> {
        let interfaces = self.wifi.interfaces().map_err(wrap_interfaces_error)?;
        Ok(interfaces
            .into_iter()
            .map(|iface| iface.hardware_addr)
            .collect())
    }

    pub fn get_names(&self) -> Result<Vec<String>> {
        let interfaces = self.wifi.interfaces().map_err(wrap_interfaces_error)?;
        Ok(interfaces.into_iter().map(|iface| iface.name).collect())
    }
}

fn wrap_interfaces_error(e: TaskError) -> TaskError {
    if matches!(e, TaskError::InterfacesError(_)) {
        e
    } else {
        TaskError::InterfacesError(e.to_string())
    }
}
