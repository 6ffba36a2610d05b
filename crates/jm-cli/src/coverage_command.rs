use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use jm_core::MergerError;
use jm_coverage::{CodeCoverage, ReportFormat, WriterOptions};
use tracing::info;

use crate::{discover_files, map_cli_coverage, map_cli_output, resolve_source_dir, CoverageArgs};

pub(crate) fn run_coverage(args: CoverageArgs) -> Result<i32, MergerError> {
    let directory = resolve_source_dir(&args.directory)?;

    let mut coverage = CodeCoverage::new();
    for path in discover_files(&directory) {
        info!("Processing file {}...", path.display());
        // A dump that is not coverage data means the wrong directory was passed; stop here.
        let other = CodeCoverage::from_json(&path).map_err(map_cli_coverage)?;
        coverage.merge(other);
    }

    let options = WriterOptions {
        generated: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default(),
        low_upper_bound: args.low_upper_bound,
        high_lower_bound: args.high_lower_bound,
    };

    let format = if args.cobertura {
        ReportFormat::Cobertura
    } else {
        ReportFormat::Clover
    };
    let destination = args.file.as_deref().map(Path::new);
    let buffer = coverage
        .render(format, &options, destination)
        .map_err(map_cli_coverage)?;
    if destination.is_none() {
        write_stdout(&buffer)?;
    }

    if let Some(html) = args.html.as_deref() {
        coverage
            .render(ReportFormat::Html, &options, Some(Path::new(html)))
            .map_err(map_cli_coverage)?;
        info!("html report written to {}", html);
    }

    if args.text {
        let summary = coverage
            .render(ReportFormat::Text, &options, None)
            .map_err(map_cli_coverage)?;
        write_stdout(&summary)?;
    }

    Ok(0)
}

fn write_stdout(buffer: &str) -> Result<(), MergerError> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(buffer.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(map_cli_output)
}
