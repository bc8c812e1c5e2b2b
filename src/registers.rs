//! Register map of the DA9063
//!
//! The DA9063 exposes `0x185` logical registers, more than a single 8-bit
//! offset can address. Logical addresses are therefore split into 128-register
//! pages selected through [`PAGE_CON`] (see [`crate::paging`]).
//!
//! The map is not contiguous: several address ranges are unimplemented and any
//! attempt to read them fails on the bus. Those ranges are listed in [`HOLES`]
//! so that reads can be refused locally.
//!
//! ## Page layout over I2C
//! - **Page 0**: `0x000 - 0x0FF` (status, events, buck/LDO control, RTC, sequencer)
//! - **Page 2**: `0x100 - 0x1FF` (OTP access, trim, configuration, chip identification)

/// PAGE_CON - Page control, mirrored at offset 0x00 of every page
pub const PAGE_CON: u16 = 0x000;

// ==================== PAGE 0 ====================

/// STATUS_A - System status A
pub const STATUS_A: u16 = 0x001;
/// STATUS_B - System status B
pub const STATUS_B: u16 = 0x002;
/// STATUS_C - System status C
pub const STATUS_C: u16 = 0x003;
/// STATUS_D - System status D
pub const STATUS_D: u16 = 0x004;
/// FAULT_LOG - Reason of the last power down
pub const FAULT_LOG: u16 = 0x005;
/// EVENT_A - Event register A
pub const EVENT_A: u16 = 0x006;
/// IRQ_MASK_A - Interrupt mask A
pub const IRQ_MASK_A: u16 = 0x00A;
/// CONTROL_A - System control A
pub const CONTROL_A: u16 = 0x00E;

/// BCORE2_CONT - Buck core 2 control
pub const BCORE2_CONT: u16 = 0x020;
/// BCORE1_CONT - Buck core 1 control
pub const BCORE1_CONT: u16 = 0x021;
/// BPRO_CONT - Buck pro control
pub const BPRO_CONT: u16 = 0x022;
/// BMEM_CONT - Buck memory control
pub const BMEM_CONT: u16 = 0x023;
/// BIO_CONT - Buck IO control
pub const BIO_CONT: u16 = 0x024;
/// BPERI_CONT - Buck peripheral control
pub const BPERI_CONT: u16 = 0x025;
/// LDO1_CONT - LDO1 control (LDO2..LDO11 follow consecutively)
pub const LDO1_CONT: u16 = 0x026;
/// LDO11_CONT - LDO11 control
pub const LDO11_CONT: u16 = 0x030;

/// COUNT_S - RTC seconds counter (first RTC register)
pub const COUNT_S: u16 = 0x040;
/// SECOND_D - RTC read-only second counter, last byte (last RTC register)
pub const SECOND_D: u16 = 0x04F;

/// SEQ - Sequencer control
pub const SEQ: u16 = 0x081;
/// SEQ_A - Sequencer slot configuration A
pub const SEQ_A: u16 = 0x095;
/// AUTO3_LOW - ADC auto channel 3 low threshold (last register of page 0)
pub const AUTO3_LOW: u16 = 0x0CF;

// ==================== PAGE 2 ====================

/// OTP_CONT - OTP control
pub const OTP_CONT: u16 = 0x101;
/// OTP_ADDR - OTP address
pub const OTP_ADDR: u16 = 0x102;
/// OTP_DATA - OTP data
pub const OTP_DATA: u16 = 0x103;
/// T_OFFSET - Temperature sensor offset trim
pub const T_OFFSET: u16 = 0x104;
/// CONFIG_A - OTP configuration A
pub const CONFIG_A: u16 = 0x10E;
/// GP_ID_19 - General purpose ID 19 (last general purpose register)
pub const GP_ID_19: u16 = 0x134;
/// DEVICE_ID - Device identification
pub const DEVICE_ID: u16 = 0x181;
/// VARIANT_ID - Silicon variant and revision
pub const VARIANT_ID: u16 = 0x182;
/// CUSTOMER_ID - Customer OTP programming ID
pub const CUSTOMER_ID: u16 = 0x183;
/// CONFIG_ID - OTP configuration ID (highest logical register)
pub const CONFIG_ID: u16 = 0x184;

/// Number of logical registers
pub const NUM_OF_REGS: u16 = CONFIG_ID + 1;

/// Expected value of the `DEVICE_ID` register
pub const DEVICE_ID_VALUE: u8 = 0x61;

/// Inclusive range of register addresses that cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterHole {
    /// First unreadable address
    pub first: u16,
    /// Last unreadable address (inclusive)
    pub last: u16,
}

impl RegisterHole {
    /// Create a hole covering `first..=last`
    pub const fn new(first: u16, last: u16) -> Self {
        Self { first, last }
    }

    /// Whether `address` lies inside this hole
    pub const fn contains(&self, address: u16) -> bool {
        address >= self.first && address <= self.last
    }
}

/// Unreadable ranges of the DA9063 register map, in ascending order
pub const HOLES: &[RegisterHole] = &[
    RegisterHole::new(SECOND_D + 1, 0x07F),
    RegisterHole::new(AUTO3_LOW + 1, 0x0FF),
    // The OTP access registers are documented but reads fail regardless.
    RegisterHole::new(OTP_CONT, OTP_DATA),
    RegisterHole::new(GP_ID_19 + 1, DEVICE_ID - 1),
];

/// Static description of a paged register space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterMap {
    count: u16,
    holes: &'static [RegisterHole],
}

impl RegisterMap {
    /// The DA9063 register map
    pub const DA9063: Self = Self::new(NUM_OF_REGS, HOLES);

    /// Create a register map with `count` registers and the given holes
    pub const fn new(count: u16, holes: &'static [RegisterHole]) -> Self {
        Self { count, holes }
    }

    /// Total number of logical registers
    pub const fn register_count(&self) -> u16 {
        self.count
    }

    /// Unreadable ranges of this map
    pub const fn holes(&self) -> &'static [RegisterHole] {
        self.holes
    }

    /// Whether `address` may be read
    ///
    /// Returns `false` for any address inside a hole. Writes are not gated by
    /// this check.
    pub fn is_valid(&self, address: u16) -> bool {
        !self.holes.iter().any(|hole| hole.contains(address))
    }

    /// Iterate over every readable address in ascending order
    pub fn readable(&self) -> impl Iterator<Item = u16> + '_ {
        (0..self.count).filter(|&address| self.is_valid(address))
    }
}

impl Default for RegisterMap {
    fn default() -> Self {
        Self::DA9063
    }
}
