//! Content hash utility for veridoc documents.
//!
//! Computes the canonical SHA-256 content hash of a rendered document
//! file, printed as lowercase hex. The producing application embeds this
//! hash in the verification link it hands to recipients.
//!
//! Usage:
//!   cargo run --bin veridoc-hash <file>

use std::env;
use std::fs;
use std::process::ExitCode;
use veridoc::content_hash;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1) else {
        eprintln!("usage: veridoc-hash <file>");
        return ExitCode::FAILURE;
    };

    match fs::read(path) {
        Ok(bytes) => {
            println!("{}", content_hash(&bytes));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("failed to read {path}: {e}");
            ExitCode::FAILURE
        }
    }
}
