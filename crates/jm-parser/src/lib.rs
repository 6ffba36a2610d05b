mod xml;

pub use xml::{load_report, parse_report, read_report, RawNode};
