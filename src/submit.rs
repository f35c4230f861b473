//! Submission emission: one isolated directory per job, each holding a
//! scheduler descriptor (`job.sub`) and an execution wrapper
//! (`wrapper.sh`).
//!
//! Validation and rendering finish for the whole plan before anything is
//! written. Re-running over identical artifacts is a no-op; re-running
//! over divergent artifacts is a collision, never a silent overwrite.

use crate::diagnostics;
use crate::error::{Error, Result};
use crate::plan::{JobDescriptor, SubmissionPlan};
use std::collections::BTreeSet;
use std::fmt::Write;
use std::fs;
use std::path::PathBuf;

/// Immutable submission options, captured once from the command line.
#[derive(Debug, Clone)]
pub struct SubmitOptions {
    /// Path of the built analysis executable, as the wrapper will see it.
    pub exe: String,
    /// Durable location for `xrdcp` stage-out; no stage-out step if unset.
    pub stage_out: Option<String>,
}

#[derive(Debug, Clone)]
struct RenderedFile {
    path: PathBuf,
    content: String,
    executable: bool,
}

/// Emit all per-job directories for the plan. Returns the number of files
/// actually written (0 for a fully idempotent re-run).
pub fn emit_plan(plan: &SubmissionPlan, opts: &SubmitOptions) -> Result<usize> {
    // 1) Plan-wide identity check, before any filesystem effect.
    let mut seen = BTreeSet::new();
    for job in &plan.jobs {
        if !seen.insert(job.out_dir.as_str()) {
            return Err(Error::Collision(format!(
                "duplicate output directory '{}' in plan",
                job.out_dir
            )));
        }
    }

    // 2) Render everything.
    let mut files = Vec::new();
    for job in &plan.jobs {
        let dir = plan.base.join(&job.out_dir);
        files.push(RenderedFile {
            path: dir.join("job.sub"),
            content: render_descriptor(plan, job),
            executable: false,
        });
        files.push(RenderedFile {
            path: dir.join("wrapper.sh"),
            content: render_wrapper(job, opts),
            executable: true,
        });
    }

    // 3) Conflict scan across the whole plan. Anything already at a target
    // path that cannot be read back as our own artifact is a collision,
    // including a directory sitting where a file belongs.
    for f in &files {
        if f.path.exists() {
            let existing = fs::read(&f.path).map_err(|e| {
                Error::Collision(format!(
                    "cannot inspect existing {}: {}",
                    f.path.display(),
                    e
                ))
            })?;
            if existing != f.content.as_bytes() {
                return Err(Error::Collision(format!(
                    "{} exists with different content; refusing to overwrite",
                    f.path.display()
                )));
            }
        }
    }

    // 4) Write what is missing; identical files stay untouched.
    let mut written = 0;
    for f in &files {
        if f.path.exists() {
            continue;
        }
        if let Some(parent) = f.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&f.path, &f.content)?;
        if f.executable {
            make_executable(&f.path)?;
        }
        diagnostics::info(format!("wrote {}", f.path.display()));
        written += 1;
    }

    for job in &plan.jobs {
        diagnostics::info(format!(
            "job '{}' ready: condor_submit {}",
            job.out_dir,
            plan.base.join(&job.out_dir).join("job.sub").display()
        ));
    }
    Ok(written)
}

#[cfg(unix)]
fn make_executable(path: &std::path::Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &std::path::Path) -> Result<()> {
    Ok(())
}

fn job_args(job: &JobDescriptor) -> String {
    format!(
        "{} {} {} {} {}",
        job.list_file,
        job.out_dir,
        job.weight,
        if job.is_data { 1 } else { 0 },
        job.process
    )
}

/// HTCondor descriptor; log/out/err paths live inside the job's own
/// directory so concurrent jobs never collide.
fn render_descriptor(plan: &SubmissionPlan, job: &JobDescriptor) -> String {
    let dir = plan.base.join(&job.out_dir);
    let mut s = String::new();
    writeln!(s, "# Auto-generated submission descriptor for {}", job.out_dir).unwrap();
    writeln!(s, "executable = {}", dir.join("wrapper.sh").display()).unwrap();
    writeln!(s, "arguments  = {}", job_args(job)).unwrap();
    writeln!(s, "output     = {}", dir.join("job.$(ClusterId).$(ProcId).out").display()).unwrap();
    writeln!(s, "error      = {}", dir.join("job.$(ClusterId).$(ProcId).err").display()).unwrap();
    writeln!(s, "log        = {}", dir.join("job.log").display()).unwrap();
    writeln!(s, "request_cpus   = 1").unwrap();
    writeln!(s, "request_memory = 2000").unwrap();
    writeln!(s, "getenv = True").unwrap();
    writeln!(s, "+JobFlavour = \"tomorrow\"").unwrap();
    writeln!(s, "queue").unwrap();
    s
}

/// Wrapper script: CMS runtime environment, executable check, run, and an
/// optional stage-out of the produced output (argument 2) to durable
/// storage.
fn render_wrapper(job: &JobDescriptor, opts: &SubmitOptions) -> String {
    let mut s = String::new();
    writeln!(s, "#!/bin/bash").unwrap();
    writeln!(s, "# Auto-generated wrapper for {}", job.out_dir).unwrap();
    writeln!(s, "source /cvmfs/cms.cern.ch/cmsset_default.sh").unwrap();
    writeln!(s, "eval $(scramv1 runtime -sh)").unwrap();
    writeln!(s).unwrap();
    writeln!(s, "EXE={}", opts.exe).unwrap();
    writeln!(s, "if [ ! -f \"$EXE\" ]; then").unwrap();
    writeln!(s, "    echo \"ERROR: $EXE not found; run make first\" >&2").unwrap();
    writeln!(s, "    exit 1").unwrap();
    writeln!(s, "fi").unwrap();
    writeln!(s).unwrap();
    writeln!(s, "\"$EXE\" {}", job_args(job)).unwrap();
    if let Some(stage) = &opts.stage_out {
        writeln!(s).unwrap();
        writeln!(s, "# Stage out to durable storage").unwrap();
        writeln!(s, "xrdcp -f {} {}/{}/", job.out_dir, stage, job.out_dir).unwrap();
        writeln!(s, "rm -f {}", job.out_dir).unwrap();
    }
    s
}
