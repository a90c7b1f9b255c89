//! Shared helpers for the crime and demographics pipeline crates.
//!
//! Cell rendering on polars frames goes through the `AnyValue` helpers in
//! [`cells`] so every crate renders cells the same way.

pub mod cells;
pub mod numeric;

pub use cells::{
    any_to_date, any_to_string, any_to_string_opt, date_from_epoch_days, epoch_days,
    format_numeric,
};
pub use numeric::{Numeric, parse_numeric};
