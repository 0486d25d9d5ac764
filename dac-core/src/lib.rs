#![warn(clippy::correctness)]
#![warn(clippy::style)]
#![warn(clippy::complexity)]
#![warn(clippy::perf)]
#![allow(clippy::redundant_field_names)]

//! Register encoding and value scaling for the TLC5615 (10-bit SPI) and
//! MCP4725 (12-bit I2C, EEPROM) DACs.
//!
//! The drivers only know how to build and decode frames. Moving bytes is left
//! to whatever implements [`bus::I2cBus`] or [`bus::SpiBus`].

#[macro_use]
extern crate log;

pub mod bus;
pub mod dac;
pub mod mcp4725;
pub mod tlc5615;

mod error;

pub use error::{Error, InvalidArgument, OutOfRange, Result};

pub mod prelude {
    pub use crate::{
        bus::{I2cBus, SpiBus},
        dac::{Dac, DacInfo, DacRange, RawOrPercent},
        mcp4725::{Mcp4725, Mcp4725Data, Mcp4725Status},
        tlc5615::Tlc5615,
        Error,
    };
}
