use std::fmt;

use crate::dac::DacRange;

/// A parameter that is not in the set the device accepts at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvalidArgument {
    Address(u16),
    Resolution(u8),
    Percent(f64),
}

/// A runtime value outside of the device's domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutOfRange {
    Value { value: i64, range: DacRange },
    PowerMode(u8),
}

/// Driver error, generic over the error type of the bus it talks through.
///
/// Validation always happens before any bus traffic, so only `Bus` can follow
/// a partially completed transaction.
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    InvalidArgument(InvalidArgument),
    OutOfRange(OutOfRange),
    Bus(E),
}

pub type Result<T, E> = std::result::Result<T, Error<E>>;

impl<E> From<InvalidArgument> for Error<E> {
    fn from(inner: InvalidArgument) -> Self {
        Error::InvalidArgument(inner)
    }
}

impl<E> From<OutOfRange> for Error<E> {
    fn from(inner: OutOfRange) -> Self {
        Error::OutOfRange(inner)
    }
}

impl<E> Error<E> {
    /// Swap the bus error type, keeping the validation variants as they are.
    pub fn map_bus<F>(self, f: impl FnOnce(E) -> F) -> Error<F> {
        match self {
            Error::InvalidArgument(inner) => Error::InvalidArgument(inner),
            Error::OutOfRange(inner) => Error::OutOfRange(inner),
            Error::Bus(inner) => Error::Bus(f(inner)),
        }
    }
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvalidArgument::Address(addr) => write!(f, "Invalid I2C device address: {:#x}", addr),
            InvalidArgument::Resolution(bits) => write!(f, "Invalid DAC resolution: {} bits", bits),
            InvalidArgument::Percent(pct) => write!(f, "Invalid percentage: {}", pct),
        }
    }
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OutOfRange::Value { value, range } => {
                write!(f, "Raw value {} outside of valid range {}", value, range)
            }
            OutOfRange::PowerMode(mode) => write!(f, "Invalid power mode: {:#x}", mode),
        }
    }
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidArgument(inner) => write!(f, "{}", inner),
            Error::OutOfRange(inner) => write!(f, "{}", inner),
            Error::Bus(inner) => write!(f, "Bus error: {}", inner),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for Error<E> {}
