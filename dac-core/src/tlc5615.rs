// http://www.ti.com/lit/ds/symlink/tlc5615.pdf
//
// 10-bit, unipolar. Full scale output (Rload = 100k) is 2 * Vref * 1023/1024.

use crate::bus::SpiBus;
use crate::dac::{check_percent, percent_of, Dac, DacInfo, DacRange, RawOrPercent};
use crate::dac::{MAX_PERCENT, MIN_PERCENT};
use crate::{Error, Result};

pub const RESOLUTION: u8 = 10;

const INFO: DacInfo = DacInfo::new_unchecked(RESOLUTION, true);

/// The input latch is 12 bits wide: the 10 data bits followed by two sub-LSB
/// bits that must be zero.
fn frame(value: u16) -> [u8; 2] {
    (value << 2).to_be_bytes()
}

#[derive(Debug)]
pub struct Tlc5615<S> {
    spi: S,
    valid_range: DacRange,
    check_write: bool,
}

impl<S: SpiBus> Tlc5615<S> {
    /// `spi` must already be bound to the chip select of this device.
    pub fn new(spi: S) -> Tlc5615<S> {
        Tlc5615 {
            spi,
            valid_range: INFO.out_range(),
            check_write: false,
        }
    }

    /// When set, every write is a full-duplex transfer and
    /// [`Dac::set_output`] returns what the chip shifted out.
    pub fn check_write(&self) -> bool {
        self.check_write
    }

    pub fn set_check_write(&mut self, check_write: bool) {
        self.check_write = check_write;
    }

    /// Write `value` to the output register.
    ///
    /// With `check_write` the returned bytes are the *previous* contents of
    /// the chip's shift register, clocked out while the new frame was
    /// clocked in. They are not an echo of `value`.
    pub fn write_out(
        &mut self,
        value: i64,
        check_write: bool,
    ) -> Result<Option<[u8; 2]>, S::Error> {
        let value = self.valid_range.check(value)?;
        let send = frame(value as u16);
        trace!("tlc5615 <- {:02x?} ({})", send, value);

        if !check_write {
            self.spi.write(&send).map_err(Error::Bus)?;
            return Ok(None);
        }

        let mut recv = [0; 2];
        self.spi.transfer(&mut recv, &send).map_err(Error::Bus)?;
        trace!("tlc5615 -> {:02x?}", recv);
        Ok(Some(recv))
    }

    pub fn release(self) -> S {
        self.spi
    }
}

impl<S: SpiBus> Dac for Tlc5615<S> {
    type BusError = S::Error;
    type Echo = [u8; 2];

    fn info(&self) -> &DacInfo {
        &INFO
    }

    /// Percentages are scaled against 1023 (the largest code), not 1024.
    fn set_output(&mut self, value: RawOrPercent) -> Result<Option<[u8; 2]>, S::Error> {
        let raw = match value {
            RawOrPercent::Raw(raw) => raw,
            RawOrPercent::Percent(percent) => {
                check_percent(percent, MIN_PERCENT, MAX_PERCENT)?;
                let base = (self.valid_range.stop() - 1) as f64;
                percent_of(percent, base) as i64
            }
        };
        self.write_out(raw, self.check_write)
    }
}
