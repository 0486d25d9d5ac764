use rppal::gpio::OutputPin;
use rppal::i2c::I2c;
use rppal::spi::Spi;

use dac_core::bus::{I2cBus, SpiBus};

use crate::{Error, Result};

fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::ShortTransfer { expected, actual })
    }
}

/// An I2C bus shared by any number of devices. The slave address is only
/// re-targeted when it changes.
pub struct I2cAdapter {
    i2c: I2c,
    address: Option<u16>,
}

impl I2cAdapter {
    pub fn new(i2c: I2c) -> I2cAdapter {
        I2cAdapter { i2c, address: None }
    }

    fn select(&mut self, address: u16) -> Result<()> {
        if self.address != Some(address) {
            trace!("i2c: selecting slave {:#x}", address);
            self.i2c.set_slave_address(address)?;
            self.address = Some(address);
        }
        Ok(())
    }
}

impl I2cBus for I2cAdapter {
    type Error = Error;

    fn write(&mut self, address: u16, bytes: &[u8]) -> Result<()> {
        self.select(address)?;
        let written = self.i2c.write(bytes)?;
        check_len(bytes.len(), written)
    }

    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<()> {
        self.select(address)?;
        let read = self.i2c.read(buf)?;
        check_len(buf.len(), read)
    }
}

/// One device on an SPI bus. With `chip_select` set, that pin is held low
/// for the duration of each transaction in addition to whatever hardware
/// slave select the bus was opened with.
pub struct SpiAdapter {
    spi: Spi,
    chip_select: Option<OutputPin>,
}

impl SpiAdapter {
    pub fn new(spi: Spi, chip_select: Option<OutputPin>) -> SpiAdapter {
        let mut adapter = SpiAdapter { spi, chip_select };
        adapter.deselect();
        adapter
    }

    fn select(&mut self) {
        if let Some(pin) = &mut self.chip_select {
            pin.set_low();
        }
    }

    fn deselect(&mut self) {
        if let Some(pin) = &mut self.chip_select {
            pin.set_high();
        }
    }
}

impl SpiBus for SpiAdapter {
    type Error = Error;

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.select();
        let res = self.spi.write(bytes);
        self.deselect();
        check_len(bytes.len(), res?)
    }

    fn transfer(&mut self, recv: &mut [u8], send: &[u8]) -> Result<()> {
        check_len(send.len(), recv.len())?;
        self.select();
        let res = self.spi.transfer(recv, send);
        self.deselect();
        check_len(send.len(), res?)
    }
}
