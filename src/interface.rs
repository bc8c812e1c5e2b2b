//! Bus interface implementations for the DA9063
//!
//! The driver talks to the bus through the `device-driver` register traits,
//! addressed by 8-bit in-page offsets. This module adapts an `embedded-hal`
//! I2C bus to those traits.

use crate::DEFAULT_I2C_ADDRESS;

use device_driver::RegisterInterface;

/// I2C interface for the DA9063
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface with the factory default address (0x58)
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::default(i2c);
    /// let pmic = Da9063::new(interface, DeviceId::new(DEFAULT_I2C_ADDRESS), &PMIC_NODE)?;
    /// ```
    pub const fn default(i2c: I2C) -> Self {
        Self {
            i2c,
            address: DEFAULT_I2C_ADDRESS,
        }
    }

    /// Create a new I2C interface with an OTP-programmed device address
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// I2C address the interface talks to
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> RegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &[address], read_data)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        // Adjacent writes go out back to back, without a repeated start
        self.i2c.transaction(
            self.address,
            &mut [
                embedded_hal::i2c::Operation::Write(&[address]),
                embedded_hal::i2c::Operation::Write(write_data),
            ],
        )
    }
}

#[cfg(feature = "async")]
impl<I2C, E> device_driver::AsyncRegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal_async::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    async fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c
            .write_read(self.address, &[address], read_data)
            .await
    }

    async fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        self.i2c
            .transaction(
                self.address,
                &mut [
                    embedded_hal_async::i2c::Operation::Write(&[address]),
                    embedded_hal_async::i2c::Operation::Write(write_data),
                ],
            )
            .await
    }
}
