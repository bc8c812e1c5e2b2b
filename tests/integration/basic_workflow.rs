//! Integration tests for the typical board bring-up flow

use crate::common::{Operation, PMIC_NODE, create_mock_driver};
use da9063::{COMPATIBLE, PagingConfig, RegulatorKind, registers};

#[test]
fn test_probe_identify_and_configure() {
    assert!(PMIC_NODE.is_compatible(COMPATIBLE));

    let (mut driver, interface) = create_mock_driver();
    assert_eq!(driver.paging_config(), PagingConfig::I2C);
    assert_eq!(driver.current_page(), 0);

    let chip = driver.chip_id().unwrap();
    assert!(chip.is_da9063());
    assert_eq!(chip.mask_revision(), 0x6);
    assert_eq!(driver.current_page(), 2);

    // Enable every bound LDO; the control registers sit on page 0
    let ldos: Vec<u16> = driver
        .regulators()
        .iter()
        .filter(|r| r.kind == RegulatorKind::Ldo)
        .filter_map(|r| r.name.strip_prefix("ldo")?.parse::<u16>().ok())
        .collect();
    assert_eq!(ldos, vec![1, 4, 11]);

    interface.clear_operations();
    for index in &ldos {
        let address = registers::LDO1_CONT + index - 1;
        let value = driver.read_reg(address).unwrap();
        driver.write_reg(address, value | 0x01).unwrap();
    }

    assert_eq!(interface.page_switch_count(), 1);
    assert_eq!(interface.operations()[0], Operation::PageSwitch { from: 2, to: 0 });
    assert_eq!(interface.get_register(registers::LDO1_CONT + 3), 0x01);
    assert_eq!(interface.get_register(registers::LDO11_CONT), 0x01);
}

#[test]
fn test_multi_byte_transfers_stay_on_one_page() {
    let (mut driver, interface) = create_mock_driver();

    driver
        .write(registers::COUNT_S, &[0x30, 0x15, 0x08, 0x18, 0x0A, 0x1A])
        .unwrap();

    let mut rtc = [0u8; 6];
    driver.read(registers::COUNT_S, &mut rtc).unwrap();

    assert_eq!(rtc, [0x30, 0x15, 0x08, 0x18, 0x0A, 0x1A]);
    assert_eq!(interface.page_switch_count(), 0);
    assert_eq!(interface.data_transaction_count(), 2);
}

#[test]
fn test_release_returns_interface() {
    let (mut driver, _) = create_mock_driver();
    driver.write_reg(registers::CONFIG_A, 0x77).unwrap();

    let interface = driver.release();
    assert_eq!(interface.get_register(registers::CONFIG_A), 0x77);
    assert_eq!(interface.current_page(), 2);
}
