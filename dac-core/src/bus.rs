//! What the drivers need from a bus. Implementations live elsewhere
//! (`dac-pi` for real hardware, fakes in the tests).

/// Blocking I2C master.
pub trait I2cBus {
    type Error;

    /// Write all of `bytes` to the device at `address` in one transaction.
    fn write(&mut self, address: u16, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Fill all of `buf` from the device at `address` in one transaction.
    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), Self::Error>;
}

/// Blocking SPI handle already bound to one device's chip select.
pub trait SpiBus {
    type Error;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Full-duplex transfer. `recv` and `send` have the same length; `recv`
    /// gets whatever the device clocked out while `send` was clocked in.
    fn transfer(&mut self, recv: &mut [u8], send: &[u8]) -> Result<(), Self::Error>;
}

impl<B: I2cBus + ?Sized> I2cBus for &mut B {
    type Error = B::Error;

    fn write(&mut self, address: u16, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write(address, bytes)
    }

    fn read(&mut self, address: u16, buf: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read(address, buf)
    }
}

impl<B: SpiBus + ?Sized> SpiBus for &mut B {
    type Error = B::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write(bytes)
    }

    fn transfer(&mut self, recv: &mut [u8], send: &[u8]) -> Result<(), Self::Error> {
        (**self).transfer(recv, send)
    }
}
