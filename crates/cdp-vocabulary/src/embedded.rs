//! Embedded vocabulary data.
//!
//! Tables are compiled into the binary with `include_str!()` so the pipeline
//! never resolves data paths at runtime.

/// Municipality codes (`code,name`) used by the statistics bureau.
pub const REGION_CODES: &str = include_str!("../data/region_codes.csv");
