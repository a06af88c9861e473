//! Field layout - how a slot's payload decomposes into logical records

use serde::{Deserialize, Serialize};

/// Layout of the bound field within each stored slot
///
/// Chosen at store-open time; extraction is oblivious to which variant is
/// active beyond asking it to produce the slot's elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldLayout {
    /// One logical value per slot
    #[default]
    Scalar,
    /// An ordered sequence of logical values per slot
    Collection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_serde_names() {
        let layout: FieldLayout = serde_json::from_str("\"collection\"").unwrap();
        assert_eq!(layout, FieldLayout::Collection);
        assert_eq!(serde_json::to_string(&FieldLayout::Scalar).unwrap(), "\"scalar\"");
    }
}
