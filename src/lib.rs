#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod device;
pub mod interface;
pub mod paging;
pub mod registers;
pub mod regulators;

// Re-export main types
pub use device::{Bound, ChipId, Da9063};
pub use interface::I2cInterface;
pub use paging::{PAGE_SIZE, PageSelector, PagingConfig, Selection};
pub use registers::{RegisterHole, RegisterMap};
pub use regulators::{MAX_REGULATORS, Node, Regulator, RegulatorKind};

/// Factory default I2C address of the DA9063
pub const DEFAULT_I2C_ADDRESS: u8 = 0x58;

/// Compatible string identifying a DA9063 configuration node
pub const COMPATIBLE: &str = "dlg,da9063";

/// Identity of one PMIC instance on its bus
///
/// Carried in every I/O error so that failures on boards with several PMICs
/// can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceId(pub u8);

impl DeviceId {
    /// Identity of a device at the given bus address
    pub const fn new(address: u8) -> Self {
        Self(address)
    }

    /// Bus address of the device
    pub const fn address(self) -> u8 {
        self.0
    }
}

impl core::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "da9063@{:#04x}", self.0)
    }
}

/// Driver errors
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Bus transaction failed, either the page select or the data transfer
    Io {
        /// Device the transaction was addressed to
        device: DeviceId,
        /// Logical register address of the access (not the in-page offset)
        register: u16,
        /// Underlying bus error
        source: E,
    },
    /// Register address lies in a hole of the register map and cannot be read
    NoData(u16),
    /// Configuration node has no `regulators` subnode
    NotFound,
    /// More regulators declared than [`MAX_REGULATORS`]
    TooManyRegulators,
}

impl<E> Error<E> {
    /// Whether this error came from the bus
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Logical register address the error refers to, if any
    pub const fn register(&self) -> Option<u16> {
        match *self {
            Self::Io { register, .. } | Self::NoData(register) => Some(register),
            Self::NotFound | Self::TooManyRegulators => None,
        }
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io {
                device,
                register,
                source,
            } => write!(f, "{device}: bus error at register {register:#x}: {source:?}"),
            Self::NoData(register) => write!(f, "register {register:#x} is not readable"),
            Self::NotFound => f.write_str("regulators subnode not found"),
            Self::TooManyRegulators => write!(f, "more than {MAX_REGULATORS} regulators"),
        }
    }
}
