#[macro_use]
extern crate log;

use serde::Deserialize;

use dac_core::mcp4725::Mcp4725;
use dac_core::tlc5615::Tlc5615;

pub mod bus;
pub mod devices;
mod error;

pub use bus::{I2cAdapter, SpiAdapter};
pub use error::{Error, Result};

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub mcp4725: Option<devices::mcp4725::Settings>,
    pub tlc5615: Option<devices::tlc5615::Settings>,
}

const DEVICE_TABLES: &[&str] = &["dac.mcp4725", "dac.tlc5615"];

/// `DAC__TLC5615=` in the environment turns a configured device off.
fn disable_emptied_devices(conf: &mut config::Config) -> Result<()> {
    for key in DEVICE_TABLES {
        let emptied = conf.get_str(key).map(|s| s.is_empty()).unwrap_or(false);
        if emptied {
            debug!("{} disabled from the environment", key);
            conf.set(key, Option::<i64>::None)?;
        }
    }
    Ok(())
}

impl Settings {
    pub fn from_config(conf: &mut config::Config) -> Result<Self> {
        disable_emptied_devices(conf)?;

        let dac_conf: config::Value = conf.get("dac")?;
        debug!("{:#?}", dac_conf);
        let settings: Settings = dac_conf.try_into()?;
        info!("{:#?}", settings);
        Ok(settings)
    }
}

/// The converters wired to this board. Either may be absent.
pub struct DacBoard {
    pub mcp4725: Option<Mcp4725<I2cAdapter>>,
    pub tlc5615: Option<Tlc5615<SpiAdapter>>,
}

impl DacBoard {
    pub fn new(settings: Settings) -> Result<DacBoard> {
        trace!("Initializing board...");
        let board = DacBoard {
            mcp4725: settings.mcp4725.map(|s| s.make()).transpose()?,
            tlc5615: settings.tlc5615.map(|s| s.make()).transpose()?,
        };
        trace!("Initialized board!");

        Ok(board)
    }
}
