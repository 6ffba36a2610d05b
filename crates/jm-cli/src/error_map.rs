use std::fmt::Display;

use jm_core::MergerError;
use jm_coverage::CoverageError;
use tracing::error;

fn map_error(code: &'static str, error: impl Display) -> MergerError {
    MergerError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: MergerError) -> i32 {
    match &error.path {
        Some(path) => error!(code = %error.code, path = %path.display(), "{}", error.message),
        None => error!(code = %error.code, "{}", error.message),
    }
    1
}

pub(crate) fn map_cli_source_path(error: std::io::Error) -> MergerError {
    map_error("CLI_SOURCE_PATH", error)
}

pub(crate) fn map_cli_output(error: std::io::Error) -> MergerError {
    map_error("CLI_OUTPUT", error)
}

pub(crate) fn map_cli_coverage(error: CoverageError) -> MergerError {
    match &error {
        CoverageError::ReadFile { path, .. } | CoverageError::InvalidCoverage { path, .. } => {
            MergerError::with_path("CLI_COVERAGE_INPUT", error.to_string(), path.clone())
        }
        CoverageError::WriteReport { path, .. } => {
            MergerError::with_path("CLI_COVERAGE_WRITE", error.to_string(), path.clone())
        }
        CoverageError::Serialize(_) | CoverageError::InvalidBounds { .. } => {
            map_error("CLI_COVERAGE", error)
        }
    }
}

#[cfg(test)]
mod error_map_tests {
    use super::*;

    #[test]
    fn emit_error_returns_non_zero_exit_code() {
        let code = emit_error(MergerError::new("ERR", "failed"));
        assert_eq!(code, 1);
        let code = emit_error(MergerError::with_path("ERR", "failed", "/tmp/out.xml"));
        assert_eq!(code, 1);
    }

    #[test]
    fn mapping_helpers_keep_error_codes() {
        assert_eq!(
            map_cli_source_path(std::io::Error::other("path")).code,
            "CLI_SOURCE_PATH"
        );
        assert_eq!(
            map_cli_output(std::io::Error::other("pipe")).code,
            "CLI_OUTPUT"
        );

        let read = map_cli_coverage(CoverageError::ReadFile {
            path: "/tmp/a.json".into(),
            source: std::io::Error::other("denied"),
        });
        assert_eq!(read.code, "CLI_COVERAGE_INPUT");
        assert!(read.message.contains("/tmp/a.json"));

        let bounds = map_cli_coverage(CoverageError::InvalidBounds {
            low_upper_bound: 95,
            high_lower_bound: 90,
        });
        assert_eq!(bounds.code, "CLI_COVERAGE");
        assert!(bounds.path.is_none());
    }
}
