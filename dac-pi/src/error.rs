#[derive(Debug)]
pub enum Error {
    Gpio(rppal::gpio::Error),
    I2c(rppal::i2c::Error),
    Spi(rppal::spi::Error),
    ShortTransfer { expected: usize, actual: usize },
    InvalidSpiBus(u8),
    InvalidSlaveSelect(u8),
    InvalidArgument(dac_core::InvalidArgument),
    OutOfRange(dac_core::OutOfRange),
    Configuration(config::ConfigError),
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

macro_rules! impl_error {
    ($inner:ty, $variant:ident) => {
        impl From<$inner> for Error {
            fn from(inner: $inner) -> Self {
                Error::$variant(inner)
            }
        }
    };
}

impl_error!(rppal::gpio::Error, Gpio);
impl_error!(rppal::i2c::Error, I2c);
impl_error!(rppal::spi::Error, Spi);
impl_error!(dac_core::InvalidArgument, InvalidArgument);
impl_error!(dac_core::OutOfRange, OutOfRange);
impl_error!(config::ConfigError, Configuration);

// the adapters in this crate report their own errors, so a driver error
// flattens back into one of ours
impl From<dac_core::Error<Error>> for Error {
    fn from(err: dac_core::Error<Error>) -> Self {
        match err {
            dac_core::Error::InvalidArgument(inner) => Error::InvalidArgument(inner),
            dac_core::Error::OutOfRange(inner) => Error::OutOfRange(inner),
            dac_core::Error::Bus(inner) => inner,
        }
    }
}

use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Gpio(inner) => write!(f, "{}", inner),
            Error::I2c(inner) => write!(f, "{}", inner),
            Error::Spi(inner) => write!(f, "{}", inner),
            Error::ShortTransfer { expected, actual } => write!(
                f,
                "Short transfer: expected {} bytes, got {}",
                expected, actual
            ),
            Error::InvalidSpiBus(bus) => write!(f, "Invalid SPI bus: {}", bus),
            Error::InvalidSlaveSelect(ss) => write!(f, "Invalid SPI slave select: {}", ss),
            Error::InvalidArgument(inner) => write!(f, "{}", inner),
            Error::OutOfRange(inner) => write!(f, "{}", inner),
            Error::Configuration(inner) => write!(f, "{}", inner),
        }
    }
}
