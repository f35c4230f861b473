//! Processing-loop artifact: `<Class>.C`.
//!
//! `Loop()` drives the iteration; `AnalyzeEntry` is the single per-entry
//! extension point, empty on purpose. `Begin`/`Terminate` bracket the loop.

use crate::emit::Variant;
use crate::schema::ClassSpec;
use std::fmt::Write;

const TEMPLATE: &str = r#"#define __CLASS___cxx
#include "__CLASS__.h"

#include <iostream>

void __CLASS__::Begin()
{
   // Called once before the first entry.
__BEGIN_BODY__}

void __CLASS__::AnalyzeEntry(Long64_t entry)
{
   // Called once per entry, after every branch slot has been populated.
   // Analysis code goes here.
   (void)entry;
}

void __CLASS__::Terminate()
{
   // Called once after the last entry.
__TERMINATE_BODY__}

void __CLASS__::Loop()
{
   if (fChain == 0) return;

   Long64_t nentries = fChain->GetEntriesFast();
   std::cout << "[Analyzer] Looping over " << nentries << " entries" << std::endl;

   Begin();
   for (Long64_t jentry = 0; jentry < nentries; jentry++) {
      if (fChain->LoadTree(jentry) < 0) break;
      fChain->GetEntry(jentry);

      if (jentry % 10000 == 0)
         std::cout << "Processing entry " << jentry << " / " << nentries << std::endl;
__CAPACITY_CHECKS__
      AnalyzeEntry(jentry);
   }
   Terminate();

   std::cout << "[Analyzer] Finished." << std::endl;
}
"#;

const BEGIN_ADVANCED: &str = r#"   std::cout << "[Analyzer] Process: " << fProcess << " | Weight: " << fWeight
             << " | IsData: " << fIsData << std::endl;
   fOutput = new TFile(fOutputFileName, "RECREATE");
"#;

const TERMINATE_ADVANCED: &str = r#"   if (fOutput) {
      fOutput->Write();
      fOutput->Close();
      fOutput = nullptr;
   }
"#;

pub fn render(spec: &ClassSpec, variant: Variant) -> String {
    // One truncation warning per count driver, not per dynamic branch.
    let mut checks = String::new();
    for driver in spec.count_drivers() {
        write!(
            checks,
            r#"
      if ({d} > kMaxArray)
         std::cerr << "[WARN] entry " << jentry << ": {d} = " << {d}
                   << " exceeds kMaxArray; extra elements dropped" << std::endl;
"#,
            d = driver
        )
        .unwrap();
    }

    let (begin, terminate) = match variant {
        Variant::Basic => ("", ""),
        Variant::Advanced => (BEGIN_ADVANCED, TERMINATE_ADVANCED),
    };

    TEMPLATE
        .replace("__BEGIN_BODY__", begin)
        .replace("__TERMINATE_BODY__", terminate)
        .replace("__CAPACITY_CHECKS__", checks.trim_end_matches('\n'))
        .replace("__CLASS__", &spec.class_name)
}
