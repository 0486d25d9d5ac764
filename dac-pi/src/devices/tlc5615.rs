// http://www.ti.com/lit/ds/symlink/tlc5615.pdf

use rppal::gpio::Gpio;
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};
use serde::Deserialize;

use dac_core::tlc5615::Tlc5615;

use crate::bus::SpiAdapter;
use crate::{Error, Result};

// DIN is latched on the rising edge of SCLK, which idles low
pub const MODE: Mode = Mode::Mode0;

fn default_clock_speed() -> u32 {
    1_000_000
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub bus: u8,
    pub select: u8,
    #[serde(default = "default_clock_speed")]
    pub clock_speed: u32,
    /// BCM number of a GPIO used as chip select instead of the bus's own
    pub chip_select_pin: Option<u8>,
    #[serde(default)]
    pub check_write: bool,
}

pub fn spi_bus(bus: u8) -> Result<Bus> {
    match bus {
        0 => Ok(Bus::Spi0),
        1 => Ok(Bus::Spi1),
        2 => Ok(Bus::Spi2),
        _ => Err(Error::InvalidSpiBus(bus)),
    }
}

pub fn slave_select(select: u8) -> Result<SlaveSelect> {
    match select {
        0 => Ok(SlaveSelect::Ss0),
        1 => Ok(SlaveSelect::Ss1),
        2 => Ok(SlaveSelect::Ss2),
        _ => Err(Error::InvalidSlaveSelect(select)),
    }
}

impl Settings {
    pub fn make(&self) -> Result<Tlc5615<SpiAdapter>> {
        let bus = spi_bus(self.bus)?;
        let select = slave_select(self.select)?;

        let chip_select = match self.chip_select_pin {
            Some(pin) => {
                trace!("initializing chip select pin {}...", pin);
                Some(Gpio::new()?.get(pin)?.into_output())
            }
            None => None,
        };

        let spi = Spi::new(bus, select, self.clock_speed, MODE)?;
        let mut tlc = Tlc5615::new(SpiAdapter::new(spi, chip_select));
        tlc.set_check_write(self.check_write);
        Ok(tlc)
    }
}
