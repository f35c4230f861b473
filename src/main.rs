use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod diagnostics;
mod emit;
mod error;
mod plan;
mod schema;
mod submit;
mod toolchain;
mod typemap;

#[derive(Parser)]
#[command(name = "rootforge")]
#[command(about = "ROOT analysis-framework generator and batch-submission planner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the typed analyzer skeleton from a sample's schema dump.
    Generate {
        /// Schema dump of the sample file (leaf-list notation).
        #[arg(short = 'f', long)]
        sample: PathBuf,

        /// Tree to introspect.
        #[arg(short = 't', long, default_value = "Events")]
        tree: String,

        /// Name of the analyzer class; also the output directory name.
        #[arg(short = 'c', long = "class", default_value = "CMSAnalyzer")]
        class_name: String,

        /// Directory under which the class directory is created.
        #[arg(long, default_value = ".")]
        out_root: PathBuf,

        /// Emit the advanced framework (weight / is-data / process-label
        /// plumbing and an output file).
        #[arg(long)]
        advanced: bool,

        /// Overwrite an existing class directory.
        #[arg(long)]
        force: bool,

        /// Program queried for compiler and linker flags.
        #[arg(long, default_value = "root-config")]
        root_config: String,
    },

    /// Print the introspected branch layout of a tree.
    Inspect {
        #[arg(short = 'f', long)]
        sample: PathBuf,

        #[arg(short = 't', long, default_value = "Events")]
        tree: String,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Expand a job-configuration table into per-job submission artifacts.
    Submit {
        /// Job-configuration table: list-file, out-dir, weight, is-data,
        /// process label; whitespace separated, one job per line.
        config: PathBuf,

        /// Base directory for the per-job directories.
        #[arg(long, default_value = "condor")]
        base: PathBuf,

        /// Built analysis executable, as the wrappers will invoke it.
        #[arg(long, default_value = "./runAnalysis")]
        exe: String,

        /// Durable stage-out location; adds an xrdcp step to each wrapper.
        #[arg(long)]
        stage_out: Option<String>,

        /// Best-effort validation: report every malformed row and print
        /// the valid jobs as JSON, writing nothing.
        #[arg(long)]
        preview: bool,
    },
}

fn main() -> anyhow::Result<()> {
    match Cli::parse().cmd {
        Commands::Generate {
            sample,
            tree,
            class_name,
            out_root,
            advanced,
            force,
            root_config,
        } => {
            diagnostics::banner();
            diagnostics::info(format!("sample : {}", sample.display()));
            diagnostics::info(format!("tree   : {}", tree));
            diagnostics::info(format!("class  : {}", class_name));
            diagnostics::banner();

            let branches = schema::introspect::read_schema(&sample, &tree)?;
            diagnostics::info(format!("found {} branches in tree '{}'", branches.len(), tree));

            let spec = schema::ClassSpec::new(class_name, tree, branches);
            let flags = toolchain::query(&root_config)?;

            let opts = emit::EmitOptions {
                out_root,
                variant: if advanced {
                    emit::Variant::Advanced
                } else {
                    emit::Variant::Basic
                },
                overwrite: force,
            };
            let dir = emit::emit_framework(&spec, &flags, &opts)?;
            diagnostics::info(format!("framework generated in {}", dir.display()));
        }

        Commands::Inspect { sample, tree, json } => {
            let branches = schema::introspect::read_schema(&sample, &tree)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&branches)?);
            } else {
                for b in &branches {
                    let shape = match &b.shape {
                        schema::BranchShape::Scalar => "scalar".to_string(),
                        schema::BranchShape::FixedArray(n) => format!("fixed[{}]", n),
                        schema::BranchShape::DynArray { count_driver } => {
                            format!("dynamic[{}]", count_driver)
                        }
                    };
                    println!("{:<24} {:<16} {:?}", b.name, shape, b.leaf);
                }
            }
        }

        Commands::Submit {
            config,
            base,
            exe,
            stage_out,
            preview,
        } => {
            let text = std::fs::read_to_string(&config)
                .with_context(|| format!("read job configuration {}", config.display()))?;

            if preview {
                let preview = plan::parse::preview_plan(&text);
                for issue in &preview.issues {
                    diagnostics::warn(issue.to_string());
                }
                println!("{}", serde_json::to_string_pretty(&preview.jobs)?);
                diagnostics::info(format!(
                    "{} valid jobs, {} malformed rows (nothing written)",
                    preview.jobs.len(),
                    preview.issues.len()
                ));
            } else {
                let jobs = plan::parse::expand_plan(&text)?;
                let plan = plan::SubmissionPlan::new(base, jobs);
                let opts = submit::SubmitOptions { exe, stage_out };
                let written = submit::emit_plan(&plan, &opts)?;
                diagnostics::info(format!(
                    "{} jobs prepared under {} ({} files written)",
                    plan.jobs.len(),
                    plan.base.display(),
                    written
                ));
            }
        }
    }

    Ok(())
}
