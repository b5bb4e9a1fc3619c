//! `json-diff`: print the patch turning one document into another.
//!
//! Usage:
//!   json-diff '<after-json>'
//!
//! The "before" document is read from stdin. The output is a patch array
//! accepted by `json-patch`.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use json_diff::cli::infer_json_patch;

fn main() -> ExitCode {
    let Some(after) = std::env::args().nth(1) else {
        eprintln!("First argument must be the target JSON document.");
        return ExitCode::FAILURE;
    };

    let mut before = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut before) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let patch = match infer_json_patch(before.trim(), &after) {
        Ok(patch) => patch,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = writeln!(io::stdout().lock(), "{patch}") {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
