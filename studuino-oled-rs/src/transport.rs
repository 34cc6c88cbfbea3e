//! Bus transports for the controller.
//!
//! The driver only needs two primitives: write one command byte, and write
//! a block of display data. [`BusTransport`] names them; [`I2cTransport`]
//! implements them over any blocking `embedded-hal` I2C bus, and
//! [`DisplayInterfaceTransport`] adapts any `display-interface`
//! implementation (I2C or SPI) for boards that already use one.

use display_interface::{DataFormat, DisplayError, WriteOnlyDataCommand};
use embedded_hal::i2c::{I2c, Operation};

/// Control byte that marks the following byte as a command.
pub const COMMAND_PREFIX: u8 = 0x00;

/// Control byte that marks the following bytes as display data.
pub const DATA_PREFIX: u8 = 0x40;

/// Write-only link to the display controller.
pub trait BusTransport {
    /// Error reported by the underlying bus.
    type Error;

    /// Send a single command byte.
    fn write_command(&mut self, command: u8) -> Result<(), Self::Error>;

    /// Send a block of display data for the current address pointer.
    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

impl<T: BusTransport + ?Sized> BusTransport for &mut T {
    type Error = T::Error;

    fn write_command(&mut self, command: u8) -> Result<(), Self::Error> {
        T::write_command(self, command)
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::write_data(self, data)
    }
}

/// Direct I2C transport.
///
/// Each command is its own write of `[0x00, command]`. Each data block is a
/// single transaction: the `0x40` control byte followed by the data, with no
/// repeated start in between.
pub struct I2cTransport<I2C> {
    i2c: I2C,
    address: u8,
    /// Command framing scratch: `[COMMAND_PREFIX, command]`.
    scratch: [u8; 2],
}

impl<I2C> I2cTransport<I2C>
where
    I2C: I2c,
{
    /// Create a new transport.
    ///
    /// # Arguments
    /// * `i2c` — I2C peripheral (takes ownership for exclusive access)
    /// * `address` — 7-bit I2C device address (typically 0x3C)
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            scratch: [COMMAND_PREFIX, 0],
        }
    }

    /// 7-bit device address this transport writes to.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give back the I2C peripheral.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> BusTransport for I2cTransport<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn write_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.scratch[1] = command;
        self.i2c.write(self.address, &self.scratch)
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        // Adjacent write operations in one transaction go out as one
        // contiguous write: START, address, 0x40, data..., STOP.
        self.i2c.transaction(
            self.address,
            &mut [Operation::Write(&[DATA_PREFIX]), Operation::Write(data)],
        )
    }
}

/// Adapter for an existing `display-interface` implementation.
///
/// The interface is responsible for command/data framing (for example
/// `display-interface-i2c` with data byte `0x40`, or a SPI interface with
/// a D/C pin).
pub struct DisplayInterfaceTransport<DI> {
    interface: DI,
}

impl<DI> DisplayInterfaceTransport<DI>
where
    DI: WriteOnlyDataCommand,
{
    /// Wrap a display interface.
    pub fn new(interface: DI) -> Self {
        Self { interface }
    }

    /// Give back the wrapped interface.
    pub fn release(self) -> DI {
        self.interface
    }
}

impl<DI> BusTransport for DisplayInterfaceTransport<DI>
where
    DI: WriteOnlyDataCommand,
{
    type Error = DisplayError;

    fn write_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.interface.send_commands(DataFormat::U8(&[command]))
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.interface.send_data(DataFormat::U8(data))
    }
}
