//! Marker phrases.

/// Event types containing any of these (case-insensitive) are summary rows
/// rather than individual incidents.
pub const SUMMARY_MARKERS: [&str; 2] = ["sammanfattning", "övrigt"];
