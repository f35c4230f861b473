//! Error taxonomy shared by both pipelines.
//!
//! Every failure is a deterministic local misconfiguration; there is no
//! retry path. Each variant aborts the current unit of work (one framework
//! emission, or one whole submission plan).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Unreadable schema dump, missing tree, empty tree, malformed branch
    /// line, or a bad count-driver reference.
    #[error("schema error: {0}")]
    Schema(String),

    /// Leaf-list code outside the supported enumeration. Hard stop, not a
    /// skip.
    #[error("unsupported leaf type '/{code}' on branch '{branch}'")]
    Type { branch: String, code: char },

    /// Malformed job-configuration row. `line` is 1-based and counts
    /// comment and blank lines.
    #[error("config error at line {line}: {message}")]
    Config { line: usize, message: String },

    /// Duplicate output directory within a plan, or pre-existing generated
    /// output that differs and was not cleared for overwrite.
    #[error("collision: {0}")]
    Collision(String),

    /// root-config could not be run or exited non-zero.
    #[error("toolchain error: {0}")]
    Toolchain(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
