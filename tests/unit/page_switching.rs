//! Unit tests for page switching

use crate::common::{MockInterface, Operation, PMIC_NODE, create_mock_driver};
use da9063::{Da9063, DeviceId, Error, PagingConfig, registers};

#[test]
fn test_same_page_access_is_cached() {
    let (mut driver, interface) = create_mock_driver();

    driver.read_reg(registers::STATUS_A).unwrap();
    driver.read_reg(130).unwrap();
    driver.write_reg(registers::LDO1_CONT, 0x01).unwrap();

    assert_eq!(interface.page_switch_count(), 0);
    assert_eq!(interface.data_transaction_count(), 3);
}

#[test]
fn test_page_switch_once_per_page_change() {
    let (mut driver, interface) = create_mock_driver();

    // 0x104 is on page 2, 0x005 back on page 0
    driver.read_reg(registers::STATUS_A).unwrap();
    driver.read_reg(registers::T_OFFSET).unwrap();
    driver.read_reg(registers::CONFIG_A).unwrap();
    driver.read_reg(registers::FAULT_LOG).unwrap();

    let ops = interface.operations();
    assert_eq!(
        ops,
        vec![
            Operation::ReadRegister {
                page: 0,
                offset: 0x01,
                len: 1
            },
            Operation::PageSwitch { from: 0, to: 2 },
            Operation::ReadRegister {
                page: 2,
                offset: 0x04,
                len: 1
            },
            Operation::ReadRegister {
                page: 2,
                offset: 0x0E,
                len: 1
            },
            Operation::PageSwitch { from: 2, to: 0 },
            Operation::ReadRegister {
                page: 0,
                offset: 0x05,
                len: 1
            },
        ]
    );
}

#[test]
fn test_three_distinct_pages() {
    // 128-register pages with every page distinguishable
    let interface = MockInterface::new();
    let mut driver = Da9063::bind(interface.clone(), DeviceId::new(0x58), &PMIC_NODE)
        .unwrap()
        .probe_with(PagingConfig::new(0x3, 0x7f));

    driver.read_reg(0x010).unwrap();
    assert_eq!(interface.page_switch_count(), 0);

    driver.read_reg(0x090).unwrap();
    assert_eq!(interface.page_switch_count(), 1);
    assert_eq!(driver.current_page(), 1);

    driver.read_reg(0x110).unwrap();
    assert_eq!(interface.page_switch_count(), 2);
    assert_eq!(driver.current_page(), 2);

    let switches: Vec<_> = interface
        .operations()
        .into_iter()
        .filter(|op| matches!(op, Operation::PageSwitch { .. }))
        .collect();
    assert_eq!(
        switches,
        vec![
            Operation::PageSwitch { from: 0, to: 1 },
            Operation::PageSwitch { from: 1, to: 2 },
        ]
    );
}

#[test]
fn test_page_control_never_switches() {
    let (mut driver, interface) = create_mock_driver();

    driver.read_reg(registers::T_OFFSET).unwrap();
    interface.clear_operations();

    // PAGE_CON is mirrored at offset 0 of every page
    driver.read_reg(registers::PAGE_CON).unwrap();
    driver.read_reg(0x100).unwrap();

    assert_eq!(interface.page_switch_count(), 0);
    assert_eq!(driver.current_page(), 2);
}

#[test]
fn test_i2c_scenario() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_register(260, 0x5A);

    let mut buf = [0u8; 1];
    driver.read(130, &mut buf).unwrap();
    assert_eq!(
        interface.operations(),
        vec![Operation::ReadRegister {
            page: 0,
            offset: 130,
            len: 1
        }]
    );

    interface.clear_operations();
    driver.read(260, &mut buf).unwrap();
    assert_eq!(
        interface.operations(),
        vec![
            Operation::PageSwitch { from: 0, to: 2 },
            Operation::ReadRegister {
                page: 2,
                offset: 4,
                len: 1
            },
        ]
    );
    assert_eq!(buf[0], 0x5A);
    assert_eq!(driver.current_page(), 2);
}

#[test]
fn test_page_switch_failure_keeps_cached_page() {
    let (mut driver, interface) = create_mock_driver();

    interface.fail_page_switch(true);
    let result = driver.read_reg(registers::T_OFFSET);

    assert!(matches!(
        result,
        Err(Error::Io {
            register: registers::T_OFFSET,
            ..
        })
    ));
    assert_eq!(driver.current_page(), 0);
    assert_eq!(interface.current_page(), 0);
    assert_eq!(interface.data_transaction_count(), 0);
}

#[test]
fn test_retry_after_page_switch_failure() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_register(registers::T_OFFSET, 0x12);

    interface.fail_page_switch(true);
    assert!(driver.read_reg(registers::T_OFFSET).is_err());

    interface.fail_page_switch(false);
    assert_eq!(driver.read_reg(registers::T_OFFSET).unwrap(), 0x12);
    assert_eq!(interface.page_switch_count(), 1);
    assert_eq!(driver.current_page(), 2);
}

#[test]
fn test_failed_data_transfer_keeps_new_page() {
    let (mut driver, interface) = create_mock_driver();

    // The page switch itself succeeded, so the cache follows the device
    interface.fail_next_read();
    assert!(driver.read_reg(registers::T_OFFSET).is_err());
    assert_eq!(driver.current_page(), 2);
    assert_eq!(interface.current_page(), 2);

    driver.read_reg(registers::T_OFFSET).unwrap();
    assert_eq!(interface.page_switch_count(), 1);
}

#[test]
fn test_writes_switch_pages_too() {
    let (mut driver, interface) = create_mock_driver();

    driver.write(registers::CONFIG_A, &[0xAB, 0xCD]).unwrap();

    assert_eq!(
        interface.operations(),
        vec![
            Operation::PageSwitch { from: 0, to: 2 },
            Operation::WriteRegister {
                page: 2,
                offset: 0x0E,
                data: vec![0xAB, 0xCD]
            },
        ]
    );
    assert_eq!(interface.get_register(registers::CONFIG_A), 0xAB);
    assert_eq!(interface.get_register(registers::CONFIG_A + 1), 0xCD);
}

#[test]
fn test_direct_page_con_write_bypasses_cache() {
    let (mut driver, interface) = create_mock_driver();

    // Page selection belongs to the driver; a raw PAGE_CON write is not tracked
    driver.write_reg(registers::PAGE_CON, 2).unwrap();

    assert_eq!(interface.current_page(), 2);
    assert_eq!(driver.current_page(), 0);
}
