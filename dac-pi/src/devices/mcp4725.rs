use rppal::i2c::I2c;
use serde::Deserialize;

use dac_core::mcp4725::{Mcp4725, DEFAULT_ADDRESS};

use crate::bus::I2cAdapter;
use crate::Result;

fn default_bus() -> u8 {
    1
}

fn default_address() -> u16 {
    DEFAULT_ADDRESS
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    /// N in /dev/i2c-N
    #[serde(default = "default_bus")]
    pub bus: u8,
    #[serde(default = "default_address")]
    pub address: u16,
}

impl Settings {
    pub fn make(&self) -> Result<Mcp4725<I2cAdapter>> {
        trace!("opening /dev/i2c-{} for mcp4725@{:#x}", self.bus, self.address);
        let i2c = I2c::with_bus(self.bus)?;
        let mcp = Mcp4725::new(I2cAdapter::new(i2c), self.address)?;
        Ok(mcp)
    }
}
