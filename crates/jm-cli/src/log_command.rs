use std::path::Path;

use jm_core::MergerError;
use jm_merge::MergeEngine;
use jm_parser::load_report;
use jm_report::write_report;
use tracing::info;

use crate::{discover_files, resolve_source_dir, LogArgs};

pub(crate) fn run_log(args: LogArgs) -> Result<i32, MergerError> {
    let directory = resolve_source_dir(&args.directory)?;

    let mut engine = MergeEngine::new();
    for path in discover_files(&directory) {
        info!("Processing file {}...", path.display());
        if let Some(document) = load_report(&path) {
            engine.merge_document(&document);
        }
    }

    let stats = engine.stats();
    let output = Path::new(&args.file);
    write_report(output, &engine.finish())?;
    info!(
        files = stats.files,
        suites = stats.suites,
        cases = stats.cases,
        duplicate_cases = stats.duplicate_cases,
        "merged report written to {}",
        output.display()
    );
    Ok(0)
}
