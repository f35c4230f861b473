//! Schema-dump reader.
//!
//! The native ROOT reader is an external collaborator; what this tool
//! consumes is a plain-text dump of branch leaf-lists, one or more tree
//! sections per file:
//!
//! ```text
//! # comment
//! tree Events
//! run/i
//! nMuon/i
//! Muon_pt[nMuon]/F
//! Jet_id[4]/I
//! ```
//!
//! Branch lines use ROOT leaf-list notation: name, optional `[bound]`, `/`,
//! one-letter leaf code. A literal bound makes a fixed array; an identifier
//! bound makes a dynamic array whose count driver must be an integer scalar
//! branch declared earlier in the same tree.

use crate::error::{Error, Result};
use crate::schema::{BranchDescriptor, BranchShape};
use crate::typemap;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Read the schema dump at `path` and return the branches of `tree_name`,
/// preserving declaration order.
pub fn read_schema(path: &Path, tree_name: &str) -> Result<Vec<BranchDescriptor>> {
    let text = fs::read_to_string(path)
        .map_err(|e| Error::Schema(format!("cannot read schema dump {}: {}", path.display(), e)))?;
    parse_schema_dump(&text, tree_name, &path.display().to_string())
}

/// Parse dump text. `origin` only labels diagnostics.
pub fn parse_schema_dump(text: &str, tree_name: &str, origin: &str) -> Result<Vec<BranchDescriptor>> {
    // name, optional [bound], leaf code. Bound may be a decimal literal or
    // an identifier; told apart below.
    let branch_re = Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)(?:\[([A-Za-z0-9_]+)\])?/(\S)$")
        .expect("branch regex");

    let mut branches: Vec<BranchDescriptor> = Vec::new();
    // Integer scalars seen so far in the selected tree, for count-driver
    // resolution.
    let mut int_scalars: BTreeSet<String> = BTreeSet::new();
    let mut in_tree = false;
    let mut tree_seen = false;
    let mut in_any_section = false;

    for (lineno, raw) in text.lines().enumerate() {
        let lno = lineno + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix("tree ") {
            if in_tree {
                // Selected tree section ended.
                break;
            }
            in_any_section = true;
            in_tree = name.trim() == tree_name;
            tree_seen = tree_seen || in_tree;
            continue;
        }
        if !in_any_section {
            return Err(Error::Schema(format!(
                "{}:{}: branch line outside a tree section: {:?}",
                origin, lno, line
            )));
        }
        if !in_tree {
            continue;
        }

        let caps = branch_re.captures(line).ok_or_else(|| {
            Error::Schema(format!(
                "{}:{}: cannot parse branch line: {:?}",
                origin, lno, line
            ))
        })?;

        let name = caps.get(1).unwrap().as_str().to_string();
        let code = caps.get(3).unwrap().as_str().chars().next().unwrap();
        let leaf = typemap::leaf_from_code(&name, code)?;

        if branches.iter().any(|b| b.name == name) {
            return Err(Error::Schema(format!(
                "{}:{}: duplicate branch name: {}",
                origin, lno, name
            )));
        }

        let shape = match caps.get(2) {
            None => BranchShape::Scalar,
            Some(bound) => classify_bound(bound.as_str(), &name, &int_scalars, origin, lno)?,
        };

        if shape == BranchShape::Scalar && leaf.is_integer() {
            int_scalars.insert(name.clone());
        }

        branches.push(BranchDescriptor { name, leaf, shape });
    }

    if !tree_seen {
        return Err(Error::Schema(format!(
            "tree '{}' not found in {}",
            tree_name, origin
        )));
    }
    if branches.is_empty() {
        return Err(Error::Schema(format!(
            "tree '{}' in {} has zero branches",
            tree_name, origin
        )));
    }
    Ok(branches)
}

fn classify_bound(
    bound: &str,
    branch: &str,
    int_scalars: &BTreeSet<String>,
    origin: &str,
    lno: usize,
) -> Result<BranchShape> {
    if bound.chars().all(|c| c.is_ascii_digit()) {
        let n: usize = bound.parse().map_err(|_| {
            Error::Schema(format!(
                "{}:{}: bad fixed bound [{}] on branch {}",
                origin, lno, bound, branch
            ))
        })?;
        if n == 0 {
            return Err(Error::Schema(format!(
                "{}:{}: zero-length fixed bound on branch {}",
                origin, lno, branch
            )));
        }
        return Ok(BranchShape::FixedArray(n));
    }

    // Identifier bound: must resolve to an earlier integer scalar.
    if !int_scalars.contains(bound) {
        return Err(Error::Schema(format!(
            "{}:{}: branch {} is bound by '{}', which is not an integer scalar branch declared earlier",
            origin, lno, branch, bound
        )));
    }
    Ok(BranchShape::DynArray {
        count_driver: bound.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LeafType;
    use pretty_assertions::assert_eq;

    const DUMP: &str = "\
# NanoAOD-ish sample
tree Events
run/i
nMuon/i
Muon_pt[nMuon]/F
Muon_eta[nMuon]/F
Jet_id[4]/I
tag/C

tree Runs
run/i
";

    #[test]
    fn parses_branches_in_order() {
        let branches = parse_schema_dump(DUMP, "Events", "dump").unwrap();
        let names: Vec<&str> = branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["run", "nMuon", "Muon_pt", "Muon_eta", "Jet_id", "tag"]);
    }

    #[test]
    fn classifies_dynamic_array_with_count_driver() {
        let branches = parse_schema_dump("tree T\nnJet/i\nJet_pt[nJet]/F\n", "T", "dump").unwrap();
        assert_eq!(branches[1].name, "Jet_pt");
        assert_eq!(
            branches[1].shape,
            BranchShape::DynArray {
                count_driver: "nJet".into()
            }
        );
        assert_eq!(branches[1].leaf, LeafType::Float32);
    }

    #[test]
    fn classifies_fixed_array_and_scalar() {
        let branches = parse_schema_dump(DUMP, "Events", "dump").unwrap();
        assert_eq!(branches[4].shape, BranchShape::FixedArray(4));
        assert_eq!(branches[0].shape, BranchShape::Scalar);
        assert_eq!(branches[5].leaf, LeafType::CharBuf);
    }

    #[test]
    fn selects_the_named_tree_only() {
        let branches = parse_schema_dump(DUMP, "Runs", "dump").unwrap();
        assert_eq!(branches.len(), 1);
        assert_eq!(branches[0].name, "run");
    }

    #[test]
    fn missing_tree_is_a_schema_error() {
        let err = parse_schema_dump(DUMP, "NoSuchTree", "dump").unwrap_err();
        assert!(matches!(err, Error::Schema(_)), "{err}");
    }

    #[test]
    fn empty_tree_is_a_schema_error() {
        let err = parse_schema_dump("tree T\ntree U\nx/i\n", "T", "dump").unwrap_err();
        assert!(matches!(err, Error::Schema(_)), "{err}");
    }

    #[test]
    fn unknown_bound_reference_is_a_schema_error() {
        let err = parse_schema_dump("tree T\nJet_pt[nJet]/F\n", "T", "dump").unwrap_err();
        assert!(matches!(err, Error::Schema(_)), "{err}");
    }

    #[test]
    fn float_count_driver_is_rejected() {
        let err =
            parse_schema_dump("tree T\nx/F\nJet_pt[x]/F\n", "T", "dump").unwrap_err();
        assert!(matches!(err, Error::Schema(_)), "{err}");
    }

    #[test]
    fn count_driver_must_come_earlier() {
        let err =
            parse_schema_dump("tree T\nJet_pt[nJet]/F\nnJet/i\n", "T", "dump").unwrap_err();
        assert!(matches!(err, Error::Schema(_)), "{err}");
    }

    #[test]
    fn duplicate_branch_name_is_rejected() {
        let err = parse_schema_dump("tree T\nrun/i\nrun/i\n", "T", "dump").unwrap_err();
        assert!(matches!(err, Error::Schema(_)), "{err}");
    }

    #[test]
    fn unsupported_leaf_code_is_a_type_error() {
        let err = parse_schema_dump("tree T\nrun/Z\n", "T", "dump").unwrap_err();
        match err {
            Error::Type { branch, code } => {
                assert_eq!(branch, "run");
                assert_eq!(code, 'Z');
            }
            other => panic!("expected Type error, got {other}"),
        }
    }

    #[test]
    fn branch_line_outside_sections_is_rejected() {
        let err = parse_schema_dump("run/i\ntree T\nx/i\n", "T", "dump").unwrap_err();
        assert!(matches!(err, Error::Schema(_)), "{err}");
    }
}
