//! Test utilities and helper functions

use crate::common::mock_interface::MockInterface;
use da9063::{COMPATIBLE, DEFAULT_I2C_ADDRESS, Da9063, DeviceId, Node};

/// Regulator outputs of a typical i.MX8M board
const OUTPUTS: &[Node<'static>] = &[
    Node::new("bcore1"),
    Node::new("bcore2"),
    Node::new("bpro"),
    Node::new("bmem"),
    Node::new("bio"),
    Node::new("bperi"),
    Node::new("ldo1"),
    Node::new("ldo4"),
    Node::new("ldo11"),
];

const PMIC_CHILDREN: &[Node<'static>] = &[Node::new("regulators").with_children(OUTPUTS)];

/// Configuration node of the PMIC used by most tests
pub const PMIC_NODE: Node<'static> = Node::new("pmic@58")
    .with_compatible(COMPATIBLE)
    .with_children(PMIC_CHILDREN);

/// Identity of the mocked device
pub const DEVICE: DeviceId = DeviceId::new(DEFAULT_I2C_ADDRESS);

/// Create a mock driver for testing
/// Returns (driver, interface) where interface is a clone that shares state with the driver
pub fn create_mock_driver() -> (Da9063<'static, MockInterface>, MockInterface) {
    let interface = MockInterface::new();
    let interface_clone = interface.clone();
    let driver = Da9063::new(interface, DEVICE, &PMIC_NODE).expect("Failed to create mock driver");
    (driver, interface_clone)
}
