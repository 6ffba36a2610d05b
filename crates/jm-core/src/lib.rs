pub mod error;
pub mod numeric;
pub mod types;

pub use error::MergerError;
pub use numeric::Numeric;
pub use types::*;
