#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Binary entrypoint for the platewright replication tool.

use std::process;

/// Parses arguments, executes the requested command, and exits with the
/// command's status code.
fn main() {
    let exit_code = platewright_cli::run();
    if exit_code != 0 {
        process::exit(exit_code);
    }
}
