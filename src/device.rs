//! High-level driver API for the DA9063
//!
//! This module provides the register access layer of the PMIC: paged reads
//! and writes of logical registers, register dumps, and the two-phase setup
//! that binds regulator children and fixes the paging masks.
//!
//! ## Setup
//!
//! Setup happens in two phases that must run in this order:
//!
//! 1. [`Da9063::bind`] enumerates the regulator outputs declared in the
//!    configuration node. It does not touch the bus.
//! 2. [`Bound::probe`] fixes the paging masks and returns the active driver.
//!
//! [`Da9063::new`] runs both phases for environments without a separate
//! discovery step.
//!
//! ## Concurrency
//!
//! Every access takes `&mut self`. The page select and the data transfer of a
//! single access must not be interleaved with another access to the same
//! device, so callers sharing a driver between contexts must serialize access
//! to it (e.g. one mutex per driver).

use crate::paging::{PageSelector, PagingConfig};
use crate::registers::{self, DEVICE_ID, RegisterMap};
use crate::regulators::{self, CHILDREN, MAX_REGULATORS, Node, Regulator};
use crate::{DeviceId, Error};

#[cfg(feature = "async")]
use device_driver::AsyncRegisterInterface;
#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

type Regulators<'a> = heapless::Vec<Regulator<'a>, MAX_REGULATORS>;

/// Chip identification registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChipId {
    /// `DEVICE_ID` register (0x61 for the DA9063)
    pub device: u8,
    /// `VARIANT_ID` register
    pub variant: u8,
}

impl ChipId {
    /// Whether the device identifies as a DA9063
    pub const fn is_da9063(&self) -> bool {
        self.device == registers::DEVICE_ID_VALUE
    }

    /// Mask revision code (upper nibble of `VARIANT_ID`)
    pub const fn mask_revision(&self) -> u8 {
        self.variant >> 4
    }
}

/// DA9063 after binding, before the paging masks are set
///
/// No register access is possible in this state.
pub struct Bound<'a, I> {
    bus: I,
    id: DeviceId,
    regulators: Regulators<'a>,
}

impl<'a, I> Bound<'a, I> {
    /// Regulators bound from the configuration node
    pub fn regulators(&self) -> &[Regulator<'a>] {
        &self.regulators
    }

    /// Probe with the I2C paging masks
    pub fn probe(self) -> Da9063<'a, I> {
        self.probe_with(PagingConfig::I2C)
    }

    /// Probe with explicit paging masks
    ///
    /// The masks stay fixed for the lifetime of the returned driver.
    pub fn probe_with(self, config: PagingConfig) -> Da9063<'a, I> {
        Da9063 {
            bus: self.bus,
            id: self.id,
            map: RegisterMap::DA9063,
            pages: PageSelector::new(config),
            regulators: self.regulators,
        }
    }
}

/// Main driver for the DA9063
pub struct Da9063<'a, I> {
    bus: I,
    id: DeviceId,
    map: RegisterMap,
    pages: PageSelector,
    regulators: Regulators<'a>,
}

impl<'a, I> Da9063<'a, I> {
    /// Identity of this device
    pub const fn device_id(&self) -> DeviceId {
        self.id
    }

    /// Register map used to gate reads
    pub const fn register_map(&self) -> &RegisterMap {
        &self.map
    }

    /// Number of logical registers
    pub const fn register_count(&self) -> u16 {
        self.map.register_count()
    }

    /// Whether `address` may be read
    pub fn is_valid(&self, address: u16) -> bool {
        self.map.is_valid(address)
    }

    /// Paging masks fixed at probe
    pub const fn paging_config(&self) -> PagingConfig {
        self.pages.config()
    }

    /// Page the device currently has selected
    pub const fn current_page(&self) -> u8 {
        self.pages.current_page()
    }

    /// Regulators bound at setup
    pub fn regulators(&self) -> &[Regulator<'a>] {
        &self.regulators
    }

    /// Consume the driver and return the bus interface
    pub fn release(self) -> I {
        self.bus
    }
}

/// Wrap a bus error with the device identity and logical register address
fn io_error<E>(device: DeviceId, register: u16) -> impl FnOnce(E) -> Error<E> {
    move |source| Error::Io {
        device,
        register,
        source,
    }
}

/// Bind phase shared by the blocking and async drivers
#[cfg_attr(not(feature = "defmt"), allow(unused_variables))]
fn bind_regulators<'a, E>(id: DeviceId, node: &Node<'a>) -> Result<Regulators<'a>, Error<E>> {
    match regulators::bind_children(node, CHILDREN) {
        Ok(bound) => {
            #[cfg(feature = "defmt")]
            {
                defmt::debug!("{}: found regulators subnode", id);
                if bound.is_empty() {
                    defmt::debug!("{}: no child found", id);
                }
            }
            Ok(bound)
        }
        Err(Error::NotFound) => {
            #[cfg(feature = "defmt")]
            defmt::debug!("{}: regulators subnode not found", id);
            Ok(Regulators::new())
        }
        Err(error) => Err(error),
    }
}

fn size_bits(len: usize) -> u32 {
    u32::try_from(len).map_or(u32::MAX, |len| len.saturating_mul(8))
}

#[cfg(not(feature = "async"))]
impl<'a, I> Da9063<'a, I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Bind the device: enumerate the regulators declared under `node`
    ///
    /// A missing `regulators` subnode is not an error; the device is bound
    /// with no regulators.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooManyRegulators`] if more than [`MAX_REGULATORS`]
    /// outputs are declared.
    pub fn bind(bus: I, id: DeviceId, node: &Node<'a>) -> Result<Bound<'a, I>, Error<I::Error>> {
        let regulators = bind_regulators(id, node)?;
        Ok(Bound {
            bus,
            id,
            regulators,
        })
    }

    /// Bind and probe in one step, using the I2C paging masks
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooManyRegulators`] if more than [`MAX_REGULATORS`]
    /// outputs are declared.
    pub fn new(bus: I, id: DeviceId, node: &Node<'a>) -> Result<Self, Error<I::Error>> {
        Ok(Self::bind(bus, id, node)?.probe())
    }

    /// Select the page of `address` and return its in-page offset
    fn select_page(&mut self, address: u16) -> Result<u8, Error<I::Error>> {
        let result = self.pages.select(&mut self.bus, address);

        #[cfg(feature = "defmt")]
        if result.is_err() {
            defmt::error!(
                "error on device {} selecting page {=u8} for reg {=u16:#x}",
                self.id,
                self.pages.config().page_of(address),
                address
            );
        }

        result.map_err(io_error(self.id, address))
    }

    /// Write `data` starting at logical register `address`
    ///
    /// Writes are not checked against the register holes. Do not write
    /// `PAGE_CON` directly: page selection is managed by the driver, and a
    /// page changed behind its back sends later accesses to the wrong page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the page select or the write fails.
    pub fn write(&mut self, address: u16, data: &[u8]) -> Result<(), Error<I::Error>> {
        let offset = self.select_page(address)?;

        let result = self
            .bus
            .write_register(offset, size_bits(data.len()), data);

        #[cfg(feature = "defmt")]
        if result.is_err() {
            defmt::error!("write error to device: {} register: {=u16:#x}", self.id, address);
        }

        result.map_err(io_error(self.id, address))
    }

    /// Read `buffer.len()` bytes starting at logical register `address`
    ///
    /// # Errors
    ///
    /// - [`Error::NoData`] if `address` lies in a register hole (no bus traffic)
    /// - [`Error::Io`] if the page select or the read fails
    pub fn read(&mut self, address: u16, buffer: &mut [u8]) -> Result<(), Error<I::Error>> {
        if !self.map.is_valid(address) {
            return Err(Error::NoData(address));
        }

        let offset = self.select_page(address)?;

        let result = self
            .bus
            .read_register(offset, size_bits(buffer.len()), buffer);

        #[cfg(feature = "defmt")]
        if result.is_err() {
            defmt::error!("read error from device: {} register: {=u16:#x}", self.id, address);
        }

        result.map_err(io_error(self.id, address))
    }

    /// Read a single register
    ///
    /// # Errors
    ///
    /// See [`read`](Self::read).
    pub fn read_reg(&mut self, address: u16) -> Result<u8, Error<I::Error>> {
        let mut value = [0u8];
        self.read(address, &mut value)?;
        Ok(value[0])
    }

    /// Write a single register
    ///
    /// # Errors
    ///
    /// See [`write`](Self::write).
    pub fn write_reg(&mut self, address: u16, value: u8) -> Result<(), Error<I::Error>> {
        self.write(address, &[value])
    }

    /// Read `DEVICE_ID` and `VARIANT_ID`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if communication with the device fails.
    pub fn chip_id(&mut self) -> Result<ChipId, Error<I::Error>> {
        let mut id = [0u8; 2];
        self.read(DEVICE_ID, &mut id)?;
        Ok(ChipId {
            device: id[0],
            variant: id[1],
        })
    }

    /// Read every readable register in ascending address order
    ///
    /// Holes are skipped without touching the bus.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first [`Error::Io`].
    pub fn dump<F>(&mut self, mut f: F) -> Result<(), Error<I::Error>>
    where
        F: FnMut(u16, u8),
    {
        let map = self.map;
        for address in map.readable() {
            let value = self.read_reg(address)?;
            f(address, value);
        }
        Ok(())
    }
}

#[cfg(feature = "async")]
impl<'a, I> Da9063<'a, I>
where
    I: AsyncRegisterInterface<AddressType = u8>,
{
    /// Bind the device: enumerate the regulators declared under `node`
    ///
    /// A missing `regulators` subnode is not an error; the device is bound
    /// with no regulators.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooManyRegulators`] if more than [`MAX_REGULATORS`]
    /// outputs are declared.
    pub fn bind(bus: I, id: DeviceId, node: &Node<'a>) -> Result<Bound<'a, I>, Error<I::Error>> {
        let regulators = bind_regulators(id, node)?;
        Ok(Bound {
            bus,
            id,
            regulators,
        })
    }

    /// Bind and probe in one step, using the I2C paging masks
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooManyRegulators`] if more than [`MAX_REGULATORS`]
    /// outputs are declared.
    pub fn new(bus: I, id: DeviceId, node: &Node<'a>) -> Result<Self, Error<I::Error>> {
        Ok(Self::bind(bus, id, node)?.probe())
    }

    async fn select_page(&mut self, address: u16) -> Result<u8, Error<I::Error>> {
        let result = self.pages.select_async(&mut self.bus, address).await;

        #[cfg(feature = "defmt")]
        if result.is_err() {
            defmt::error!(
                "error on device {} selecting page {=u8} for reg {=u16:#x}",
                self.id,
                self.pages.config().page_of(address),
                address
            );
        }

        result.map_err(io_error(self.id, address))
    }

    /// Write `data` starting at logical register `address`
    ///
    /// Writes are not checked against the register holes. Do not write
    /// `PAGE_CON` directly: page selection is managed by the driver, and a
    /// page changed behind its back sends later accesses to the wrong page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the page select or the write fails.
    pub async fn write(&mut self, address: u16, data: &[u8]) -> Result<(), Error<I::Error>> {
        let offset = self.select_page(address).await?;

        let result = self
            .bus
            .write_register(offset, size_bits(data.len()), data)
            .await;

        #[cfg(feature = "defmt")]
        if result.is_err() {
            defmt::error!("write error to device: {} register: {=u16:#x}", self.id, address);
        }

        result.map_err(io_error(self.id, address))
    }

    /// Read `buffer.len()` bytes starting at logical register `address`
    ///
    /// # Errors
    ///
    /// - [`Error::NoData`] if `address` lies in a register hole (no bus traffic)
    /// - [`Error::Io`] if the page select or the read fails
    pub async fn read(&mut self, address: u16, buffer: &mut [u8]) -> Result<(), Error<I::Error>> {
        if !self.map.is_valid(address) {
            return Err(Error::NoData(address));
        }

        let offset = self.select_page(address).await?;

        let result = self
            .bus
            .read_register(offset, size_bits(buffer.len()), buffer)
            .await;

        #[cfg(feature = "defmt")]
        if result.is_err() {
            defmt::error!("read error from device: {} register: {=u16:#x}", self.id, address);
        }

        result.map_err(io_error(self.id, address))
    }

    /// Read a single register
    ///
    /// # Errors
    ///
    /// See [`read`](Self::read).
    pub async fn read_reg(&mut self, address: u16) -> Result<u8, Error<I::Error>> {
        let mut value = [0u8];
        self.read(address, &mut value).await?;
        Ok(value[0])
    }

    /// Write a single register
    ///
    /// # Errors
    ///
    /// See [`write`](Self::write).
    pub async fn write_reg(&mut self, address: u16, value: u8) -> Result<(), Error<I::Error>> {
        self.write(address, &[value]).await
    }

    /// Read `DEVICE_ID` and `VARIANT_ID`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if communication with the device fails.
    pub async fn chip_id(&mut self) -> Result<ChipId, Error<I::Error>> {
        let mut id = [0u8; 2];
        self.read(DEVICE_ID, &mut id).await?;
        Ok(ChipId {
            device: id[0],
            variant: id[1],
        })
    }

    /// Read every readable register in ascending address order
    ///
    /// Holes are skipped without touching the bus.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first [`Error::Io`].
    pub async fn dump<F>(&mut self, mut f: F) -> Result<(), Error<I::Error>>
    where
        F: FnMut(u16, u8),
    {
        let map = self.map;
        for address in map.readable() {
            let value = self.read_reg(address).await?;
            f(address, value);
        }
        Ok(())
    }
}
