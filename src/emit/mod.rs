//! Framework emission: renders the four artifacts (header, loop source,
//! driver, Makefile) and writes them into a directory named after the
//! class.
//!
//! All four artifacts are rendered before anything touches the
//! filesystem, so a collision or render failure leaves the tree exactly
//! as it was.

pub mod driver;
pub mod header;
pub mod makefile;
pub mod source;

use crate::diagnostics;
use crate::error::{Error, Result};
use crate::schema::ClassSpec;
use crate::toolchain::RootFlags;
use std::fs;
use std::path::PathBuf;

/// Which of the two generated frameworks to emit. `Advanced` adds the
/// weight / is-data / process-label plumbing and an output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Basic,
    Advanced,
}

/// Immutable emission options, captured once from the command line.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    pub out_root: PathBuf,
    pub variant: Variant,
    pub overwrite: bool,
}

#[derive(Debug, Clone)]
pub struct Artifact {
    pub file_name: String,
    pub content: String,
}

/// Render all four artifacts. Pure; no filesystem effect.
pub fn render_framework(spec: &ClassSpec, flags: &RootFlags, variant: Variant) -> Vec<Artifact> {
    vec![
        Artifact {
            file_name: format!("{}.h", spec.class_name),
            content: header::render(spec, variant),
        },
        Artifact {
            file_name: format!("{}.C", spec.class_name),
            content: source::render(spec, variant),
        },
        Artifact {
            file_name: "main.cc".to_string(),
            content: driver::render(spec, variant),
        },
        Artifact {
            file_name: "Makefile".to_string(),
            content: makefile::render(&spec.class_name, flags),
        },
    ]
}

/// Render and write the framework. Returns the created directory.
pub fn emit_framework(spec: &ClassSpec, flags: &RootFlags, opts: &EmitOptions) -> Result<PathBuf> {
    let artifacts = render_framework(spec, flags, opts.variant);

    let dir = opts.out_root.join(&spec.class_name);
    if dir.exists() {
        if !opts.overwrite {
            return Err(Error::Collision(format!(
                "output directory {} already exists (pass --force to overwrite)",
                dir.display()
            )));
        }
        if !dir.is_dir() {
            return Err(Error::Collision(format!(
                "{} exists and is not a directory; refusing to replace it",
                dir.display()
            )));
        }
    }

    fs::create_dir_all(&dir)?;
    for a in &artifacts {
        fs::write(dir.join(&a.file_name), &a.content)?;
        diagnostics::info(format!("wrote {}/{}", dir.display(), a.file_name));
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::introspect::parse_schema_dump;
    use pretty_assertions::assert_eq;

    fn flags() -> RootFlags {
        RootFlags {
            cflags: "-Itest/include".into(),
            libs: "-Ltest/lib -lCore".into(),
        }
    }

    fn spec_from(dump: &str, tree: &str, class: &str) -> ClassSpec {
        let branches = parse_schema_dump(dump, tree, "dump").unwrap();
        ClassSpec::new(class.to_string(), tree.to_string(), branches)
    }

    fn tmpdir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rootforge-emit-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn artifact<'a>(artifacts: &'a [Artifact], name: &str) -> &'a str {
        &artifacts
            .iter()
            .find(|a| a.file_name == name)
            .unwrap_or_else(|| panic!("missing artifact {name}"))
            .content
    }

    #[test]
    fn scalar_only_schema_has_no_capacity_constant() {
        let spec = spec_from("tree Events\nrun/i\nlumi/i\nmet/F\n", "Events", "Scalars");
        let arts = render_framework(&spec, &flags(), Variant::Basic);
        let h = artifact(&arts, "Scalars.h");

        assert_eq!(h.matches("SetBranchAddress").count(), 3);
        assert!(h.contains("UInt_t          run;"));
        assert!(h.contains("Float_t         met;"));
        assert!(!h.contains("kMaxArray"));
        assert!(!h.contains("kMaxString"));
    }

    #[test]
    fn end_to_end_muon_schema() {
        let spec = spec_from(
            "tree Events\nrun/i\nnMuon/i\nMuon_pt[nMuon]/F\nMuon_eta[nMuon]/F\n",
            "Events",
            "MuonAna",
        );
        let arts = render_framework(&spec, &flags(), Variant::Advanced);
        let h = artifact(&arts, "MuonAna.h");
        let c = artifact(&arts, "MuonAna.C");

        // One scalar slot each for run and nMuon, two capacity-bound
        // dynamic slots.
        assert!(h.contains("UInt_t          run;"));
        assert!(h.contains("UInt_t          nMuon;"));
        assert!(h.contains("Float_t         Muon_pt[kMaxArray];"));
        assert!(h.contains("Float_t         Muon_eta[kMaxArray];"));
        assert_eq!(h.matches("[kMaxArray]").count(), 2);
        assert!(h.contains("static constexpr Int_t kMaxArray = 512;"));

        // Name-keyed bindings.
        assert!(h.contains("fChain->SetBranchAddress(\"run\", &run, &b_run);"));
        assert!(h.contains("fChain->SetBranchAddress(\"nMuon\", &nMuon, &b_nMuon);"));
        assert!(h.contains("fChain->SetBranchAddress(\"Muon_pt\", Muon_pt, &b_Muon_pt);"));
        assert!(h.contains("fChain->SetBranchAddress(\"Muon_eta\", Muon_eta, &b_Muon_eta);"));

        // The loop warns once per count driver, not per dynamic branch.
        assert_eq!(c.matches("exceeds kMaxArray").count(), 1);
        assert!(c.contains("if (nMuon > kMaxArray)"));
    }

    #[test]
    fn basic_and_advanced_drivers_differ_in_arguments() {
        let spec = spec_from("tree Events\nrun/i\n", "Events", "Ana");
        let basic = render_framework(&spec, &flags(), Variant::Basic);
        let advanced = render_framework(&spec, &flags(), Variant::Advanced);

        let bm = artifact(&basic, "main.cc");
        let am = artifact(&advanced, "main.cc");
        assert!(!bm.contains("fWeight"));
        assert!(am.contains("t.fWeight = weight;"));
        assert!(am.contains("(argc > 2) ? argv[2] : \"output.root\""));

        // Both refuse an empty file list.
        assert!(bm.contains("File list is empty"));
        assert!(am.contains("File list is empty"));
    }

    #[test]
    fn makefile_embeds_queried_flags() {
        let spec = spec_from("tree Events\nrun/i\n", "Events", "Ana");
        let arts = render_framework(&spec, &flags(), Variant::Basic);
        let mk = artifact(&arts, "Makefile");
        assert!(mk.contains("-Itest/include"));
        assert!(mk.contains("-Ltest/lib -lCore"));
        assert!(mk.contains("TARGET = runAnalysis"));
        assert!(mk.contains("SRCS = main.cc Ana.C"));
    }

    #[test]
    fn emission_writes_all_four_artifacts() {
        let root = tmpdir("write");
        let spec = spec_from("tree Events\nrun/i\n", "Events", "Ana");
        let opts = EmitOptions {
            out_root: root.clone(),
            variant: Variant::Basic,
            overwrite: false,
        };
        let dir = emit_framework(&spec, &flags(), &opts).unwrap();
        for name in ["Ana.h", "Ana.C", "main.cc", "Makefile"] {
            assert!(dir.join(name).is_file(), "missing {name}");
        }
    }

    #[test]
    fn existing_directory_without_force_is_a_collision() {
        let root = tmpdir("collide");
        let class_dir = root.join("Ana");
        fs::create_dir_all(&class_dir).unwrap();
        fs::write(class_dir.join("Ana.h"), "user edits").unwrap();

        let spec = spec_from("tree Events\nrun/i\n", "Events", "Ana");
        let opts = EmitOptions {
            out_root: root,
            variant: Variant::Basic,
            overwrite: false,
        };
        let err = emit_framework(&spec, &flags(), &opts).unwrap_err();
        assert!(matches!(err, Error::Collision(_)), "{err}");

        // Nothing was touched.
        assert_eq!(fs::read_to_string(class_dir.join("Ana.h")).unwrap(), "user edits");
        assert!(!class_dir.join("Makefile").exists());
    }

    #[test]
    fn plain_file_at_class_path_is_a_collision_even_with_force() {
        let root = tmpdir("notadir");
        fs::write(root.join("Ana"), "not a directory").unwrap();

        let spec = spec_from("tree Events\nrun/i\n", "Events", "Ana");
        let opts = EmitOptions {
            out_root: root.clone(),
            variant: Variant::Basic,
            overwrite: true,
        };
        let err = emit_framework(&spec, &flags(), &opts).unwrap_err();
        assert!(matches!(err, Error::Collision(_)), "{err}");
        assert_eq!(fs::read_to_string(root.join("Ana")).unwrap(), "not a directory");
    }

    #[test]
    fn overwrite_replaces_the_whole_set() {
        let root = tmpdir("force");
        let spec = spec_from("tree Events\nrun/i\n", "Events", "Ana");
        let opts = EmitOptions {
            out_root: root.clone(),
            variant: Variant::Basic,
            overwrite: false,
        };
        let dir = emit_framework(&spec, &flags(), &opts).unwrap();
        fs::write(dir.join("Ana.h"), "stale").unwrap();

        let opts = EmitOptions {
            overwrite: true,
            ..opts
        };
        emit_framework(&spec, &flags(), &opts).unwrap();
        let h = fs::read_to_string(dir.join("Ana.h")).unwrap();
        assert!(h.contains("SetBranchAddress"));
    }
}
