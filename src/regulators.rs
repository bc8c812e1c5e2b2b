//! Regulator child enumeration
//!
//! The PMIC configuration node carries a `regulators` subnode listing the
//! outputs a board uses. Each entry is matched by name prefix against
//! [`CHILDREN`] and bound to the matching regulator driver kind. This runs
//! once while binding the device and never touches the bus.
//!
//! ```ignore
//! static PMIC_NODE: Node<'static> = Node::new("pmic@58")
//!     .with_compatible(COMPATIBLE)
//!     .with_children(&[Node::new("regulators").with_children(&[
//!         Node::new("bcore1"),
//!         Node::new("ldo4"),
//!     ])]);
//! ```

use crate::Error;

/// Maximum number of regulators bound to one device (6 bucks and 11 LDOs)
pub const MAX_REGULATORS: usize = 17;

/// Name of the configuration subnode holding the regulator entries
pub const REGULATORS_NODE: &str = "regulators";

/// Node of a static configuration tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Node<'a> {
    name: &'a str,
    compatible: Option<&'a str>,
    children: &'a [Node<'a>],
}

impl<'a> Node<'a> {
    /// Create a leaf node
    pub const fn new(name: &'a str) -> Self {
        Self {
            name,
            compatible: None,
            children: &[],
        }
    }

    /// Set the compatible string of this node
    #[must_use]
    pub const fn with_compatible(mut self, compatible: &'a str) -> Self {
        self.compatible = Some(compatible);
        self
    }

    /// Set the children of this node
    #[must_use]
    pub const fn with_children(mut self, children: &'a [Node<'a>]) -> Self {
        self.children = children;
        self
    }

    /// Node name
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Compatible string, if any
    pub const fn compatible(&self) -> Option<&'a str> {
        self.compatible
    }

    /// Direct children
    pub const fn children(&self) -> &'a [Node<'a>] {
        self.children
    }

    /// Find a direct child by exact name
    pub fn subnode(&self, name: &str) -> Option<&'a Node<'a>> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Whether this node declares the given compatible string
    pub fn is_compatible(&self, compatible: &str) -> bool {
        self.compatible == Some(compatible)
    }
}

/// Driver kind a regulator output is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegulatorKind {
    /// Low-dropout linear regulator
    Ldo,
    /// Buck converter
    Buck,
}

impl RegulatorKind {
    /// Name of the driver handling this kind of output
    pub const fn driver_name(self) -> &'static str {
        match self {
            Self::Ldo => "da9063_ldo",
            Self::Buck => "da9063_buck",
        }
    }
}

/// Entry of the prefix table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChildInfo {
    /// Name prefix selecting this entry
    pub prefix: &'static str,
    /// Driver bound to matching children
    pub kind: RegulatorKind,
}

/// Prefix table, checked in order; the first matching prefix wins
pub const CHILDREN: &[ChildInfo] = &[
    ChildInfo {
        prefix: "ldo",
        kind: RegulatorKind::Ldo,
    },
    ChildInfo {
        prefix: "b",
        kind: RegulatorKind::Buck,
    },
];

/// Regulator output bound to a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Regulator<'a> {
    /// Name of the configuration entry (e.g. `ldo4`, `bcore1`)
    pub name: &'a str,
    /// Driver kind selected by prefix
    pub kind: RegulatorKind,
}

/// Find the driver kind for a child named `name`
pub fn match_child(table: &[ChildInfo], name: &str) -> Option<RegulatorKind> {
    table
        .iter()
        .find(|info| name.starts_with(info.prefix))
        .map(|info| info.kind)
}

/// Bind every regulator declared under the `regulators` subnode of `node`
///
/// Entries whose name matches no prefix in `table` are skipped.
///
/// # Errors
///
/// - [`Error::NotFound`] if `node` has no `regulators` subnode
/// - [`Error::TooManyRegulators`] if more than `N` entries match
pub fn bind_children<'a, E, const N: usize>(
    node: &Node<'a>,
    table: &[ChildInfo],
) -> Result<heapless::Vec<Regulator<'a>, N>, Error<E>> {
    let regulators = node.subnode(REGULATORS_NODE).ok_or(Error::NotFound)?;

    let mut bound = heapless::Vec::new();
    for child in regulators.children() {
        let Some(kind) = match_child(table, child.name()) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("{=str}: no driver for '{=str}'", node.name(), child.name());
            continue;
        };

        bound
            .push(Regulator {
                name: child.name(),
                kind,
            })
            .map_err(|_| Error::TooManyRegulators)?;
    }

    Ok(bound)
}
