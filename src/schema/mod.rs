//! Schema layer: branch descriptors + the introspected class spec.
//!
//! This module is intentionally separate from type mapping and emission.
//! It owns:
//! - LeafType / BranchShape / BranchDescriptor
//! - ClassSpec (the immutable, ordered view of one tree's branches)
//! - the schema-dump reader (introspect)

pub mod introspect;

use serde::Serialize;

/// Primitive element type of a branch, one-letter ROOT leaf-list codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LeafType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    Bool,
    /// Fixed-length character buffer (`/C`).
    CharBuf,
}

impl LeafType {
    /// Integer scalars of these types may drive a dynamic array's length.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            LeafType::Int8
                | LeafType::UInt8
                | LeafType::Int16
                | LeafType::UInt16
                | LeafType::Int32
                | LeafType::UInt32
                | LeafType::Int64
                | LeafType::UInt64
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BranchShape {
    Scalar,
    /// Static literal bound, e.g. `Jet_id[4]/I`.
    FixedArray(usize),
    /// Bound by a previously declared integer scalar branch.
    DynArray { count_driver: String },
}

/// One named column of the source tree.
#[derive(Debug, Clone, Serialize)]
pub struct BranchDescriptor {
    pub name: String,
    pub leaf: LeafType,
    pub shape: BranchShape,
}

/// The introspected, typed view of one tree, in declaration order.
///
/// Built once per generation; regeneration replaces the whole value.
#[derive(Debug, Clone, Serialize)]
pub struct ClassSpec {
    pub class_name: String,
    pub tree_name: String,
    pub branches: Vec<BranchDescriptor>,
}

impl ClassSpec {
    pub fn new(class_name: String, tree_name: String, branches: Vec<BranchDescriptor>) -> Self {
        Self {
            class_name,
            tree_name,
            branches,
        }
    }

    /// Names of branches that drive at least one dynamic array, in first-use
    /// order. The generated loop warns when any of these exceeds the shared
    /// buffer capacity.
    pub fn count_drivers(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for b in &self.branches {
            if let BranchShape::DynArray { count_driver } = &b.shape {
                if !seen.contains(&count_driver.as_str()) {
                    seen.push(count_driver.as_str());
                }
            }
        }
        seen
    }
}
