//! Job-configuration table parser.
//!
//! One job per line, five whitespace/tab-separated fields:
//!
//! ```text
//! # list-file            out-dir      weight  is-data  process
//! lists/ttbar_2017.txt   ttbar_2017   0.35    0        TTbar
//! lists/data_2017B.txt   data_2017B   1.0     1        SingleMuon
//! ```
//!
//! `#`-prefixed and blank lines are skipped but still counted, so reported
//! line numbers match the file as the user sees it.

use crate::error::{Error, Result};
use crate::plan::JobDescriptor;

/// Expand the table, aborting on the first malformed row.
pub fn expand_plan(text: &str) -> Result<Vec<JobDescriptor>> {
    let mut jobs = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let lno = lineno + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        jobs.push(parse_row(line, lno)?);
    }
    Ok(jobs)
}

/// Best-effort preview: collect every issue instead of stopping at the
/// first. The result is for inspection only and is never submitted.
#[derive(Debug)]
pub struct PlanPreview {
    pub jobs: Vec<JobDescriptor>,
    pub issues: Vec<Error>,
}

pub fn preview_plan(text: &str) -> PlanPreview {
    let mut jobs = Vec::new();
    let mut issues = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let lno = lineno + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_row(line, lno) {
            Ok(job) => jobs.push(job),
            Err(e) => issues.push(e),
        }
    }
    PlanPreview { jobs, issues }
}

fn parse_row(line: &str, lno: usize) -> Result<JobDescriptor> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 5 {
        return Err(Error::Config {
            line: lno,
            message: format!("expected 5 fields, found {}", fields.len()),
        });
    }

    let weight: f64 = fields[2].parse().map_err(|_| Error::Config {
        line: lno,
        message: format!("weight is not a number: {:?}", fields[2]),
    })?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(Error::Config {
            line: lno,
            message: format!("weight must be a non-negative number, found {}", fields[2]),
        });
    }

    let is_data = match fields[3] {
        "0" => false,
        "1" => true,
        other => {
            return Err(Error::Config {
                line: lno,
                message: format!("is-data flag must be 0 or 1, found {:?}", other),
            });
        }
    };

    Ok(JobDescriptor {
        list_file: fields[0].to_string(),
        out_dir: fields[1].to_string(),
        weight,
        is_data,
        process: fields[4].to_string(),
    })
}
