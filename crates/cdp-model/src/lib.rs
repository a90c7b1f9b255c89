//! Data model types for the crime and demographics normalization pipeline.
//!
//! # Module Organization
//!
//! - [`column`]: semantic column types decided during inference
//! - [`keyed`]: composite-key rows returned by the statistics API
//! - [`codes`]: code-to-label dictionaries
//! - [`dimension`]: expected vocabularies for composite-key positions
//! - [`source`]: metadata parsed from spreadsheet file names

pub mod codes;
pub mod column;
pub mod dimension;
pub mod keyed;
pub mod source;

pub use codes::CodeMap;
pub use column::{ColumnSpec, SemanticType};
pub use dimension::{DimensionSpec, Vocabulary};
pub use keyed::KeyedRow;
pub use source::{SourceFileMeta, UNKNOWN};
