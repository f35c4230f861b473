//! Branch-to-storage mapping.
//!
//! Every dynamic-array branch gets the same capacity, `DYN_CAPACITY`,
//! instead of a per-branch bound computed from observed maxima. This is a
//! deliberate simplicity/memory tradeoff: a fixed, generous upper bound.
//! The generated loop warns whenever a count driver exceeds it, because the
//! surplus elements are lost.

use crate::error::{Error, Result};
use crate::schema::{BranchDescriptor, BranchShape, LeafType};

/// Shared element capacity for every dynamic-array branch.
pub const DYN_CAPACITY: usize = 512;

/// Capacity of `/C` character-buffer branches.
pub const STRING_CAPACITY: usize = 256;

/// Translate a one-letter ROOT leaf-list code. Unknown codes are a hard
/// stop.
pub fn leaf_from_code(branch: &str, code: char) -> Result<LeafType> {
    let leaf = match code {
        'B' => LeafType::Int8,
        'b' => LeafType::UInt8,
        'S' => LeafType::Int16,
        's' => LeafType::UInt16,
        'I' => LeafType::Int32,
        'i' => LeafType::UInt32,
        'L' => LeafType::Int64,
        'l' => LeafType::UInt64,
        'F' => LeafType::Float32,
        'D' => LeafType::Float64,
        'O' => LeafType::Bool,
        'C' => LeafType::CharBuf,
        _ => {
            return Err(Error::Type {
                branch: branch.to_string(),
                code,
            });
        }
    };
    Ok(leaf)
}

/// ROOT typedef name for a leaf type.
pub fn cpp_type(leaf: LeafType) -> &'static str {
    match leaf {
        LeafType::Int8 => "Char_t",
        LeafType::UInt8 => "UChar_t",
        LeafType::Int16 => "Short_t",
        LeafType::UInt16 => "UShort_t",
        LeafType::Int32 => "Int_t",
        LeafType::UInt32 => "UInt_t",
        LeafType::Int64 => "Long64_t",
        LeafType::UInt64 => "ULong64_t",
        LeafType::Float32 => "Float_t",
        LeafType::Float64 => "Double_t",
        LeafType::Bool => "Bool_t",
        LeafType::CharBuf => "Char_t",
    }
}

/// One storage slot of the generated class.
#[derive(Debug, Clone)]
pub struct MappedSlot {
    pub name: String,
    /// Storage declaration, e.g. `Float_t         Muon_pt[kMaxArray];`
    pub decl: String,
    /// Scalar slots bind as `&slot`; array and buffer slots decay to a
    /// pointer on their own.
    pub bind_by_ref: bool,
    /// Shared capacity, present only for dynamic-array slots.
    pub capacity: Option<usize>,
}

/// Map one branch descriptor to its storage slot.
pub fn map_branch(b: &BranchDescriptor) -> MappedSlot {
    let ty = cpp_type(b.leaf);
    let (suffix, bind_by_ref, capacity) = match (&b.shape, b.leaf) {
        (BranchShape::Scalar, LeafType::CharBuf) => ("[kMaxString]".to_string(), false, None),
        (BranchShape::Scalar, _) => (String::new(), true, None),
        (BranchShape::FixedArray(n), _) => (format!("[{}]", n), false, None),
        (BranchShape::DynArray { .. }, _) => ("[kMaxArray]".to_string(), false, Some(DYN_CAPACITY)),
    };
    MappedSlot {
        name: b.name.clone(),
        decl: format!("{:<15} {}{};", ty, b.name, suffix),
        bind_by_ref,
        capacity,
    }
}
