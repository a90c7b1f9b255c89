//! Composite-key rows.

use serde::{Deserialize, Serialize};

/// One statistics observation: an encoded dimension key plus the measure
/// values that belong to it.
///
/// The key is positional; its meaning comes from the dimension names the
/// caller declares when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedRow {
    pub key: Vec<String>,
    pub values: Vec<Option<String>>,
}

impl KeyedRow {
    pub fn new<K, V>(key: K, values: V) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        Self {
            key: key.into_iter().map(Into::into).collect(),
            values: values.into_iter().map(|v| Some(v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_collects_key_and_values() {
        let row = KeyedRow::new(["0180", "2022"], ["42"]);
        assert_eq!(row.key, vec!["0180", "2022"]);
        assert_eq!(row.values, vec![Some("42".to_string())]);
    }
}
