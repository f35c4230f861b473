//! Submission-plan layer: job descriptors + the validated plan.
//!
//! It owns:
//! - JobDescriptor (one configuration row)
//! - SubmissionPlan (all jobs of one batch invocation)
//! - the configuration-table parser (parse)

pub mod parse;

use serde::Serialize;
use std::path::PathBuf;

/// One validated row of the job-configuration table.
#[derive(Debug, Clone, Serialize)]
pub struct JobDescriptor {
    /// Newline-delimited list of input files for this job.
    pub list_file: String,
    /// Unique directory name within the plan; also the job's identity.
    pub out_dir: String,
    /// Non-negative event weight. Whether is_data jobs should force 1.0 is
    /// a convention left to the analysis; nothing here enforces it.
    pub weight: f64,
    pub is_data: bool,
    pub process: String,
}

/// The full set of jobs for one batch invocation. `out_dir` uniqueness is
/// checked by the submission emitter before any filesystem effect.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionPlan {
    #[serde(skip)]
    pub base: PathBuf,
    pub jobs: Vec<JobDescriptor>,
}

impl SubmissionPlan {
    pub fn new(base: PathBuf, jobs: Vec<JobDescriptor>) -> Self {
        Self { base, jobs }
    }
}
