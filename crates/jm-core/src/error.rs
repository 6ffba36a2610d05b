use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, Clone)]
#[error("{code}: {message}")]
pub struct MergerError {
    pub code: String,
    pub message: String,
    pub path: Option<PathBuf>,
}

impl MergerError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(
        code: impl Into<String>,
        message: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_and_message() {
        let error = MergerError::new("REPORT_WRITE", "disk full");
        assert_eq!(error.to_string(), "REPORT_WRITE: disk full");
        assert!(error.path.is_none());
    }

    #[test]
    fn with_path_keeps_the_failing_path() {
        let error = MergerError::with_path("REPORT_READ", "denied", "/tmp/a.xml");
        assert_eq!(error.path.as_deref(), Some(std::path::Path::new("/tmp/a.xml")));
    }
}
