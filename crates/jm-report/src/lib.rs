//! Writes a merged suite tree as a JUnit XML document.

mod serialize;

pub use serialize::{render_report, write_report};
