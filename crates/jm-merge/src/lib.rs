mod engine;
mod registry;

pub use engine::{MergeEngine, MergeStats};
pub use registry::SuiteRegistry;
