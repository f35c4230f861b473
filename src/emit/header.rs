//! Declaration artifact: `<Class>.h`.
//!
//! One storage slot and one `TBranch*` per branch; `Init` binds every slot
//! to its branch by name, `Reset` releases the associations. Method bodies
//! live under `#ifdef <Class>_cxx`, MakeClass-style, so the header is the
//! complete declaration artifact on its own.
//!
//! Built with placeholder replacement rather than `format!` because the
//! C++ body is full of braces.

use crate::emit::Variant;
use crate::schema::{BranchShape, ClassSpec, LeafType};
use crate::typemap::{self, DYN_CAPACITY, STRING_CAPACITY};
use std::fmt::Write;

const TEMPLATE: &str = r#"//////////////////////////////////////////////////////////
// Generated by rootforge from tree __TREE__.
// Fill in AnalyzeEntry() in __CLASS__.C; regenerate rather
// than editing this header.
//////////////////////////////////////////////////////////

#ifndef __CLASS___h
#define __CLASS___h

#include <TROOT.h>
#include <TChain.h>
#include <TFile.h>
#include <TBranch.h>
#include <TString.h>

class __CLASS__ {
public :
   TChain         *fChain;   //!pointer to the analyzed chain
__USER_SETTINGS____CAPACITY__
   // Branch storage, one slot per branch of __TREE__
__DECLARATIONS__

   // Bound branches
__BRANCH_PTRS__

   __CLASS__(TChain *chain);
   virtual ~__CLASS__();
   void     Init(TChain *chain);
   void     Reset();
   Int_t    GetEntry(Long64_t entry);
   void     Loop();
   void     Begin();
   void     AnalyzeEntry(Long64_t entry);
   void     Terminate();
};

#endif

#ifdef __CLASS___cxx
__CLASS__::__CLASS__(TChain *chain) : fChain(0)
{
   Init(chain);
}

__CLASS__::~__CLASS__()
{
   Reset();
}

Int_t __CLASS__::GetEntry(Long64_t entry)
{
   if (!fChain) return 0;
   return fChain->GetEntry(entry);
}

void __CLASS__::Init(TChain *chain)
{
   // Associate each storage slot with its branch by name. Name-keyed
   // binding keeps the slots correct even if declaration order changes
   // between schema versions.
   if (!chain) return;
   fChain = chain;
__BINDINGS__
}

void __CLASS__::Reset()
{
   // Release all branch associations.
   if (fChain) fChain->ResetBranchAddresses();
}
#endif // #ifdef __CLASS___cxx
"#;

const USER_SETTINGS: &str = r#"
   // User settings, forwarded from the command line
   Float_t         fWeight = 1.0;
   Bool_t          fIsData = false;
   TString         fProcess = "Unknown";
   TString         fOutputFileName = "output.root";
   TFile          *fOutput = nullptr;
"#;

pub fn render(spec: &ClassSpec, variant: Variant) -> String {
    let mut decls = String::new();
    let mut ptrs = String::new();
    let mut bindings = String::new();
    let mut has_dyn = false;
    let mut has_charbuf = false;

    for b in &spec.branches {
        let slot = typemap::map_branch(b);
        has_dyn = has_dyn || slot.capacity.is_some();
        has_charbuf =
            has_charbuf || (b.leaf == LeafType::CharBuf && b.shape == BranchShape::Scalar);

        writeln!(decls, "   {}", slot.decl).unwrap();
        writeln!(ptrs, "   TBranch        *b_{};   //!", b.name).unwrap();

        let amp = if slot.bind_by_ref { "&" } else { "" };
        writeln!(
            bindings,
            "   fChain->SetBranchAddress(\"{name}\", {amp}{name}, &b_{name});",
            name = b.name
        )
        .unwrap();
    }

    let mut capacity = String::new();
    if has_dyn || has_charbuf {
        capacity.push('\n');
        capacity.push_str(
            "   // Shared capacity for every variable-length array branch. Entries\n   // with more elements are truncated; Loop() warns when that happens.\n",
        );
        if has_dyn {
            writeln!(capacity, "   static constexpr Int_t kMaxArray = {};", DYN_CAPACITY).unwrap();
        }
        if has_charbuf {
            writeln!(capacity, "   static constexpr Int_t kMaxString = {};", STRING_CAPACITY)
                .unwrap();
        }
    }

    let user_settings = match variant {
        Variant::Basic => "",
        Variant::Advanced => USER_SETTINGS,
    };

    TEMPLATE
        .replace("__USER_SETTINGS__", user_settings)
        .replace("__CAPACITY__", &capacity)
        .replace("__DECLARATIONS__", decls.trim_end())
        .replace("__BRANCH_PTRS__", ptrs.trim_end())
        .replace("__BINDINGS__", bindings.trim_end())
        .replace("__CLASS__", &spec.class_name)
        .replace("__TREE__", &spec.tree_name)
}
