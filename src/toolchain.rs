//! Compiler/linker flag discovery via `root-config`.
//!
//! The query runs at generation time so a broken environment surfaces
//! before any directory is created, not at the user's first `make`.

use crate::error::{Error, Result};
use std::process::Command;

#[derive(Debug, Clone)]
pub struct RootFlags {
    pub cflags: String,
    pub libs: String,
}

/// Query `program --cflags` and `program --libs`. `program` is normally
/// `root-config`; tests point it at a stub.
pub fn query(program: &str) -> Result<RootFlags> {
    Ok(RootFlags {
        cflags: query_one(program, "--cflags")?,
        libs: query_one(program, "--libs")?,
    })
}

fn query_one(program: &str, flag: &str) -> Result<String> {
    let output = Command::new(program)
        .arg(flag)
        .output()
        .map_err(|e| Error::Toolchain(format!("cannot run {} {}: {}", program, flag, e)))?;
    if !output.status.success() {
        return Err(Error::Toolchain(format!(
            "{} {} exited with {}",
            program, flag, output.status
        )));
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if text.is_empty() {
        return Err(Error::Toolchain(format!(
            "{} {} produced no output",
            program, flag
        )));
    }
    Ok(text)
}
