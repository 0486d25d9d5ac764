use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{InvalidArgument, OutOfRange};

pub const MIN_RESOLUTION: u8 = 8;
pub const MAX_RESOLUTION: u8 = 24;

pub const MIN_PERCENT: f64 = 0.0;
pub const MAX_PERCENT: f64 = 100.0;

/// Half-open interval `[start, stop)` of raw output register values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DacRange {
    start: i64,
    stop: i64,
}

impl DacRange {
    /// Only built from a validated [`DacInfo`], so never empty.
    pub(crate) fn new(start: i64, stop: i64) -> DacRange {
        assert!(start < stop, "empty range [{}, {})", start, stop);
        DacRange { start, stop }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn stop(&self) -> i64 {
        self.stop
    }

    pub fn len(&self) -> u64 {
        (self.stop - self.start) as u64
    }

    // see new()
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, value: i64) -> bool {
        self.start <= value && value < self.stop
    }

    pub fn check(&self, value: i64) -> Result<i64, OutOfRange> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(OutOfRange::Value {
                value,
                range: *self,
            })
        }
    }
}

impl fmt::Display for DacRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.stop)
    }
}

/// A requested output: either a raw register value or a percentage of full
/// scale. Resolved to a raw value before anything is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RawOrPercent {
    Raw(i64),
    Percent(f64),
}

impl From<i64> for RawOrPercent {
    fn from(raw: i64) -> Self {
        RawOrPercent::Raw(raw)
    }
}

impl From<i32> for RawOrPercent {
    fn from(raw: i32) -> Self {
        RawOrPercent::Raw(raw.into())
    }
}

impl From<u16> for RawOrPercent {
    fn from(raw: u16) -> Self {
        RawOrPercent::Raw(raw.into())
    }
}

impl From<f64> for RawOrPercent {
    fn from(percent: f64) -> Self {
        RawOrPercent::Percent(percent)
    }
}

/// Fails unless `min <= percent <= max`. NaN always fails.
pub fn check_percent(percent: f64, min: f64, max: f64) -> Result<f64, InvalidArgument> {
    if percent >= min && percent <= max {
        Ok(percent)
    } else {
        Err(InvalidArgument::Percent(percent))
    }
}

/// `percent` percent of `base`.
pub fn percent_of(percent: f64, base: f64) -> f64 {
    0.01 * percent * base
}

/// Resolution and polarity of a converter. Everything range related is
/// derived from these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DacInfo {
    resolution: u8,
    unipolar: bool,
}

impl DacInfo {
    /// `resolution` is in bits and must be in `8..=24`.
    ///
    /// A unipolar output swings over `0..Vref`, a bipolar one over
    /// `-Vref/2..Vref/2`.
    pub fn new(resolution: u8, unipolar: bool) -> Result<DacInfo, InvalidArgument> {
        if resolution < MIN_RESOLUTION || resolution > MAX_RESOLUTION {
            return Err(InvalidArgument::Resolution(resolution));
        }
        Ok(DacInfo {
            resolution,
            unipolar,
        })
    }

    /// For drivers whose resolution is fixed by the chip.
    pub(crate) const fn new_unchecked(resolution: u8, unipolar: bool) -> DacInfo {
        DacInfo {
            resolution,
            unipolar,
        }
    }

    pub fn resolution(&self) -> u8 {
        self.resolution
    }

    pub fn unipolar(&self) -> bool {
        self.unipolar
    }

    /// Raw values the output register accepts.
    ///
    /// The bipolar stop is `2^(resolution-1) - 1`, exclusive, so the topmost
    /// two's complement code is not part of the range.
    pub fn out_range(&self) -> DacRange {
        if self.unipolar {
            return DacRange::new(0, 1 << self.resolution);
        }
        let half = 1i64 << (self.resolution - 1);
        DacRange::new(-half, -1 + half)
    }

    /// Percentage of `2^resolution`, rounded down.
    pub fn raw(&self, percent: f64) -> Result<i64, InvalidArgument> {
        check_percent(percent, MIN_PERCENT, MAX_PERCENT)?;
        let base = (1i64 << self.resolution) as f64;
        Ok(percent_of(percent, base) as i64)
    }
}

/// Common interface of the DAC drivers.
pub trait Dac {
    type BusError;

    /// Whatever the device can hand back while its output is being set.
    type Echo;

    fn info(&self) -> &DacInfo;

    fn resolution(&self) -> u8 {
        self.info().resolution()
    }

    fn unipolar(&self) -> bool {
        self.info().unipolar()
    }

    fn out_range(&self) -> DacRange {
        self.info().out_range()
    }

    fn raw(&self, percent: f64) -> Result<i64, InvalidArgument> {
        self.info().raw(percent)
    }

    /// Write a new output value.
    ///
    /// A raw value must already be in [`Dac::out_range`]. A percentage is
    /// scaled with the driver's own full-scale base, which is not necessarily
    /// the one [`Dac::raw`] uses.
    fn set_output(
        &mut self,
        value: RawOrPercent,
    ) -> crate::Result<Option<Self::Echo>, Self::BusError>;
}
