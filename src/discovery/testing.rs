//! Fixture-driven discovery tools for unit tests.

use std::cell::RefCell;

use super::{BluetoothInspector, PortBinder};
use crate::error::PhomemoError;

/// Returns canned tool output and records every call.
#[derive(Debug, Default)]
pub struct FakeTools {
    pub devices: String,
    pub info: String,
    pub bindings: String,
    pub calls: RefCell<Vec<String>>,
}

impl FakeTools {
    pub fn new(devices: &str, info: &str, bindings: &str) -> Self {
        Self {
            devices: devices.to_string(),
            info: info.to_string(),
            bindings: bindings.to_string(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn called(&self, name: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.starts_with(name))
    }
}

impl BluetoothInspector for FakeTools {
    fn list_devices(&self) -> Result<String, PhomemoError> {
        self.calls.borrow_mut().push("devices".to_string());
        Ok(self.devices.clone())
    }

    fn device_info(&self, address: &str) -> Result<String, PhomemoError> {
        self.calls.borrow_mut().push(format!("info {}", address));
        Ok(self.info.clone())
    }
}

impl PortBinder for FakeTools {
    fn rfcomm_bindings(&self, address: &str) -> Result<String, PhomemoError> {
        self.calls.borrow_mut().push(format!("rfcomm {}", address));
        Ok(self.bindings.clone())
    }
}
