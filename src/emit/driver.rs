//! Entry-point artifact: `main.cc`.
//!
//! Reads a newline-delimited file list from argv[1], chains every file,
//! and runs the loop. A missing, unreadable, or empty list is a hard
//! non-zero exit. The advanced variant forwards output path, weight,
//! is-data flag, and process label to the generated class.

use crate::emit::Variant;
use crate::schema::ClassSpec;

const TEMPLATE: &str = r#"/**
 * @file main.cc
 * @brief Driver for __CLASS__.
 */

#include "__CLASS__.h"

#include <cstdlib>
#include <fstream>
#include <iostream>
#include <string>

#include "TChain.h"

int main(int argc, char* argv[]) {
    if (argc < 2) {
        std::cerr << "Usage: " << argv[0] << " <file_list>__USAGE_EXTRA__" << std::endl;
        return 1;
    }

    std::string listFileName = argv[1];
__ARG_PARSING__
    std::ifstream infile(listFileName);
    if (!infile.is_open()) {
        std::cerr << "[Error] Cannot open file list: " << listFileName << std::endl;
        return 1;
    }

    TChain *chain = new TChain("__TREE__");
    std::string line;
    int nFiles = 0;
    while (std::getline(infile, line)) {
        if (line.empty() || line[0] == '#') continue;
        chain->Add(line.c_str());
        nFiles++;
    }
    infile.close();

    if (nFiles == 0) {
        std::cerr << "[Error] File list is empty: " << listFileName << std::endl;
        return 1;
    }
    std::cout << "[Main] " << nFiles << " files added to chain." << std::endl;

    __CLASS__ t(chain);
__FORWARDING__
    t.Loop();
    return 0;
}
"#;

const ARG_PARSING_ADVANCED: &str = r#"    std::string outFileName = (argc > 2) ? argv[2] : "output.root";
    float weight            = (argc > 3) ? atof(argv[3]) : 1.0;
    bool isData             = (argc > 4) ? (bool)atoi(argv[4]) : false;
    std::string process     = (argc > 5) ? argv[5] : "Unknown";
"#;

const FORWARDING_ADVANCED: &str = r#"    t.fOutputFileName = outFileName.c_str();
    t.fWeight = weight;
    t.fIsData = isData;
    t.fProcess = process.c_str();
"#;

pub fn render(spec: &ClassSpec, variant: Variant) -> String {
    let (usage, parsing, forwarding) = match variant {
        Variant::Basic => ("", "", ""),
        Variant::Advanced => (
            " [output] [weight] [isData] [process]",
            ARG_PARSING_ADVANCED,
            FORWARDING_ADVANCED,
        ),
    };

    TEMPLATE
        .replace("__USAGE_EXTRA__", usage)
        .replace("__ARG_PARSING__", parsing)
        .replace("__FORWARDING__", forwarding)
        .replace("__CLASS__", &spec.class_name)
        .replace("__TREE__", &spec.tree_name)
}
