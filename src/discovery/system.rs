//! Subprocess adapter for the discovery traits.

use std::process::Command;

use tracing::debug;

use super::{BluetoothInspector, PortBinder};
use crate::error::PhomemoError;
use crate::settings::ToolSettings;

/// Runs `bluetoothctl` and `rfcomm` and hands back their stdout.
///
/// Invocations block until the tool exits; there is no timeout. A non-zero
/// exit status is logged but not treated as failure, since both tools exit
/// non-zero for "no such device" while still printing nothing useful.
#[derive(Debug, Clone)]
pub struct SystemTools {
    bluetoothctl: String,
    rfcomm: String,
}

impl SystemTools {
    pub fn new(settings: &ToolSettings) -> Self {
        Self {
            bluetoothctl: settings.bluetoothctl.clone(),
            rfcomm: settings.rfcomm.clone(),
        }
    }

    fn run(&self, tool: &str, args: &[&str]) -> Result<String, PhomemoError> {
        debug!(tool, ?args, "running");
        let output = Command::new(tool)
            .args(args)
            .output()
            .map_err(|source| PhomemoError::ToolFailed {
                tool: tool.to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(
                tool,
                status = %output.status,
                stderr = %stderr.trim(),
                "tool exited unsuccessfully"
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for SystemTools {
    fn default() -> Self {
        Self::new(&ToolSettings::default())
    }
}

impl BluetoothInspector for SystemTools {
    fn list_devices(&self) -> Result<String, PhomemoError> {
        self.run(&self.bluetoothctl, &["devices"])
    }

    fn device_info(&self, address: &str) -> Result<String, PhomemoError> {
        self.run(&self.bluetoothctl, &["info", address])
    }
}

impl PortBinder for SystemTools {
    fn rfcomm_bindings(&self, address: &str) -> Result<String, PhomemoError> {
        self.run(&self.rfcomm, &["--device", address])
    }
}
