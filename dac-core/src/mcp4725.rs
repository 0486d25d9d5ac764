// https://cdn-shop.adafruit.com/datasheets/mcp4725.pdf

use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use crate::bus::I2cBus;
use crate::dac::{Dac, DacInfo, RawOrPercent};
use crate::{Error, InvalidArgument, OutOfRange, Result};

pub const RESOLUTION: u8 = 12;

pub const DEFAULT_ADDRESS: u16 = 0x60;
/// A0 and the two factory programmed bits give eight addresses.
pub const MIN_ADDRESS: u16 = 0x60;
pub const MAX_ADDRESS: u16 = 0x67;

/// Number of power modes. 0 is normal operation; 1, 2 and 3 disconnect the
/// output and pull it to ground through 1k, 100k and 500k respectively.
pub const N_POWER_MODES: u8 = 4;

const INFO: DacInfo = DacInfo::new_unchecked(RESOLUTION, true);

// From Table 6.2, C2 C1 C0
enum Command {
    WriteDac = 0b010,
    WriteDacAndEeprom = 0b011,
}

/// One register's worth of state: the output code and its power mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mcp4725Data {
    pub out_reg: u16,
    pub power_mode: u8,
}

/// Everything a 5 byte read returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mcp4725Status {
    /// The live DAC register.
    pub data: Mcp4725Data,
    /// What the chip will load on power up.
    pub eeprom_data: Mcp4725Data,
    /// The RDY/BSY bit. Tracks whether an EEPROM write is in progress.
    pub write_status: bool,
}

impl Mcp4725Status {
    /// Decode a status read (Figure 6-3).
    pub fn from_bytes(buf: &[u8; 5]) -> Mcp4725Status {
        let write_status = buf[0] & 0x80 != 0;
        let power_mode = (buf[0] & 0x06) >> 1;
        let out_reg = (u16::from(buf[1]) << 4) | (u16::from(buf[2]) >> 4);

        // bytes 3 and 4 come from the EEPROM
        let eeprom_data = Mcp4725Data {
            out_reg: u16::from(buf[4]) | (u16::from(buf[3] & 0x0F) << 8),
            power_mode: (buf[3] & 0b0110_0000) >> 5,
        };

        Mcp4725Status {
            data: Mcp4725Data {
                out_reg,
                power_mode,
            },
            eeprom_data,
            write_status,
        }
    }
}

fn check_power_mode(power_mode: u8) -> std::result::Result<u8, OutOfRange> {
    if power_mode < N_POWER_MODES {
        Ok(power_mode)
    } else {
        Err(OutOfRange::PowerMode(power_mode))
    }
}

#[derive(Debug)]
pub struct Mcp4725<I> {
    i2c: I,
    address: u16,
}

impl<I: I2cBus> Mcp4725<I> {
    pub fn new(i2c: I, address: u16) -> Result<Mcp4725<I>, I::Error> {
        if address < MIN_ADDRESS || address > MAX_ADDRESS {
            return Err(InvalidArgument::Address(address).into());
        }
        Ok(Mcp4725 { i2c, address })
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn release(self) -> I {
        self.i2c
    }

    fn check_out(&self, value: i64) -> std::result::Result<u16, OutOfRange> {
        INFO.out_range().check(value).map(|v| v as u16)
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), I::Error> {
        trace!("mcp4725@{:#x} <- {:02x?}", self.address, bytes);
        self.i2c.write(self.address, bytes).map_err(Error::Bus)
    }

    /// Fast mode write (Figure 6-1). Only touches the DAC register.
    pub fn fast_write(&mut self, value: u16, power_mode: u8) -> Result<(), I::Error> {
        let value = self.check_out(value.into())?;
        let power_mode = check_power_mode(power_mode)?;

        let buf = [
            (power_mode << 4) | (value >> 8) as u8,
            (value & 0b0000_1111_1111) as u8,
        ];
        self.send(&buf)
    }

    /// Write the DAC register, and with `save` the EEPROM too (Figure 6-2).
    ///
    /// The low bit of the command byte is set iff `power_mode` is 0, and the
    /// power mode itself is not placed in the PD1/PD0 bits. The chip will
    /// therefore come out of this write in normal mode whatever `power_mode`
    /// was. Use [`Mcp4725::fast_write`] to change power modes.
    pub fn write(&mut self, value: u16, power_mode: u8, save: bool) -> Result<(), I::Error> {
        let value = self.check_out(value.into())?;
        let power_mode = check_power_mode(power_mode)?;

        let cmd = if save {
            Command::WriteDacAndEeprom
        } else {
            Command::WriteDac
        };
        // FIXME this looks like it wanted to be `power_mode << 1`
        let low_bit = (power_mode < 1) as u8;

        let buf = [
            ((cmd as u8) << 5) | low_bit,
            ((value & 0b1111_1111_0000) >> 4) as u8,
            ((value & 0b0000_0000_1111) << 4) as u8,
        ];
        self.send(&buf)
    }

    /// Set the output and power mode, persisting both to EEPROM if `save`.
    ///
    /// A percentage is scaled against `2^12`, so `100.0` is out of range.
    pub fn set_status(
        &mut self,
        out: RawOrPercent,
        power_mode: u8,
        save: bool,
    ) -> Result<(), I::Error> {
        check_power_mode(power_mode)?;
        let raw = match out {
            RawOrPercent::Raw(raw) => raw,
            RawOrPercent::Percent(percent) => INFO.raw(percent)?,
        };
        let raw = self.check_out(raw)?;

        if !save {
            return self.fast_write(raw, power_mode);
        }
        self.write(raw, power_mode, save)
    }

    pub fn get_status(&mut self) -> Result<Mcp4725Status, I::Error> {
        let mut buf = [0; 5];
        self.i2c
            .read(self.address, &mut buf)
            .map_err(Error::Bus)?;
        trace!("mcp4725@{:#x} -> {:02x?}", self.address, buf);

        let status = Mcp4725Status::from_bytes(&buf);
        debug!("mcp4725@{:#x}: {:?}", self.address, status);
        Ok(status)
    }
}

impl<I: I2cBus> Dac for Mcp4725<I> {
    type BusError = I::Error;
    type Echo = Infallible;

    fn info(&self) -> &DacInfo {
        &INFO
    }

    /// Same as `set_status(value, 0, false)`.
    fn set_output(&mut self, value: RawOrPercent) -> Result<Option<Infallible>, I::Error> {
        self.set_status(value, 0, false)?;
        Ok(None)
    }
}
