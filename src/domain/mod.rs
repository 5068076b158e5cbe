pub mod types;

pub use types::{ScanOutcome, ScanReport, Verdict};
