//! Page selection for the DA9063 register space
//!
//! A logical register address is split into a page and an in-page offset:
//!
//! ```text
//! page   = (address / PAGE_SIZE) & page_mask
//! offset =  address & offset_mask
//! ```
//!
//! Before a register outside the currently selected page can be accessed, the
//! new page number has to be written to `PAGE_CON`. [`PageSelector`] caches the
//! last page it selected so that consecutive accesses to the same page cost no
//! extra bus transaction. `PAGE_CON` itself sits at offset 0 of every page and
//! never needs a switch.
//!
//! The cached page is only updated after the page-select write succeeded, so it
//! always reflects the page the device actually has selected.

#[cfg(feature = "async")]
use device_driver::AsyncRegisterInterface;
use device_driver::RegisterInterface;

use crate::registers::PAGE_CON;

/// Number of registers per page
///
/// Fixed by the addressing scheme, independent of the offset mask.
pub const PAGE_SIZE: u16 = 128;

/// In-page offset of the page control register
const PAGE_CON_OFFSET: u8 = PAGE_CON as u8;

/// Masks applied to logical addresses, fixed once at probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PagingConfig {
    page_mask: u8,
    offset_mask: u8,
}

impl PagingConfig {
    /// Paging over I2C
    ///
    /// An 8-bit I2C offset reaches two 128-register pages at once, so pages
    /// (0, 1) and (2, 3) are each accessible without switching. Only bit 1 of
    /// the page number is significant.
    pub const I2C: Self = Self::new(0x2, 0xff);

    /// Create a paging configuration from raw masks
    pub const fn new(page_mask: u8, offset_mask: u8) -> Self {
        Self {
            page_mask,
            offset_mask,
        }
    }

    /// Significant bits of a computed page number
    pub const fn page_mask(&self) -> u8 {
        self.page_mask
    }

    /// Bits of a logical address that form the in-page offset
    pub const fn offset_mask(&self) -> u8 {
        self.offset_mask
    }

    /// Page that `address` lives on
    pub const fn page_of(&self, address: u16) -> u8 {
        ((address / PAGE_SIZE) as u8) & self.page_mask
    }

    /// Offset of `address` within its page
    pub const fn offset_of(&self, address: u16) -> u8 {
        (address as u8) & self.offset_mask
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self::I2C
    }
}

/// Outcome of resolving a logical address against the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Selection {
    /// Register is reachable on the current page at `offset`
    Current {
        /// In-page offset
        offset: u8,
    },
    /// `page` must be selected before accessing `offset`
    Switch {
        /// Page to write into `PAGE_CON`
        page: u8,
        /// In-page offset
        offset: u8,
    },
}

impl Selection {
    /// In-page offset of the resolved register
    pub const fn offset(&self) -> u8 {
        match *self {
            Self::Current { offset } | Self::Switch { offset, .. } => offset,
        }
    }
}

/// Tracks the selected page of one device
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PageSelector {
    config: PagingConfig,
    current_page: u8,
}

impl PageSelector {
    /// Create a selector for a device that has just come out of reset (page 0)
    pub const fn new(config: PagingConfig) -> Self {
        Self {
            config,
            current_page: 0,
        }
    }

    /// Masks in use
    pub const fn config(&self) -> PagingConfig {
        self.config
    }

    /// Last page successfully selected
    pub const fn current_page(&self) -> u8 {
        self.current_page
    }

    /// Decide whether accessing `address` needs a page switch
    ///
    /// This does not touch the bus or the cached page.
    pub const fn resolve(&self, address: u16) -> Selection {
        let page = self.config.page_of(address);
        let offset = self.config.offset_of(address);

        if offset == PAGE_CON_OFFSET || page == self.current_page {
            Selection::Current { offset }
        } else {
            Selection::Switch { page, offset }
        }
    }

    /// Select the page of `address` and return its in-page offset
    ///
    /// A page-select write is issued only when the address lives on another
    /// page than the cached one.
    ///
    /// # Errors
    ///
    /// Returns the bus error if the page-select write fails. The cached page is
    /// left untouched in that case.
    pub fn select<I>(&mut self, bus: &mut I, address: u16) -> Result<u8, I::Error>
    where
        I: RegisterInterface<AddressType = u8>,
    {
        match self.resolve(address) {
            Selection::Current { offset } => Ok(offset),
            Selection::Switch { page, offset } => {
                bus.write_register(PAGE_CON_OFFSET, 8, &[page])?;
                self.switched(page);
                Ok(offset)
            }
        }
    }

    /// Async variant of [`select`](Self::select)
    ///
    /// # Errors
    ///
    /// Returns the bus error if the page-select write fails. The cached page is
    /// left untouched in that case.
    #[cfg(feature = "async")]
    pub async fn select_async<I>(&mut self, bus: &mut I, address: u16) -> Result<u8, I::Error>
    where
        I: AsyncRegisterInterface<AddressType = u8>,
    {
        match self.resolve(address) {
            Selection::Current { offset } => Ok(offset),
            Selection::Switch { page, offset } => {
                bus.write_register(PAGE_CON_OFFSET, 8, &[page]).await?;
                self.switched(page);
                Ok(offset)
            }
        }
    }

    fn switched(&mut self, page: u8) {
        #[cfg(feature = "defmt")]
        defmt::trace!("page {=u8} -> {=u8}", self.current_page, page);

        self.current_page = page;
    }
}
