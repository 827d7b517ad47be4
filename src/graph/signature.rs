//! Signature - named entry point into a subgraph.

use serde::{Deserialize, Serialize};

/// Key of the signature used when a model has a single, unnamed entry point.
pub const DEFAULT_SIGNATURE_KEY: &str = "<placeholder signature>";

/// Binds external argument and result names to a subgraph's inputs and
/// outputs. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    key: String,
    subgraph_index: usize,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl Signature {
    pub fn new(
        key: impl Into<String>,
        subgraph_index: usize,
        input_names: Vec<String>,
        output_names: Vec<String>,
    ) -> Self {
        Self {
            key: key.into(),
            subgraph_index,
            input_names,
            output_names,
        }
    }

    /// Creates the default signature for a subgraph.
    pub fn default_for(
        subgraph_index: usize,
        input_names: Vec<String>,
        output_names: Vec<String>,
    ) -> Self {
        Self::new(
            DEFAULT_SIGNATURE_KEY,
            subgraph_index,
            input_names,
            output_names,
        )
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn subgraph_index(&self) -> usize {
        self.subgraph_index
    }

    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }

    pub fn is_default(&self) -> bool {
        self.key == DEFAULT_SIGNATURE_KEY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_signature() {
        let sig = Signature::default_for(0, vec!["x".to_string()], vec!["y".to_string()]);
        assert!(sig.is_default());
        assert_eq!(sig.key(), DEFAULT_SIGNATURE_KEY);
        assert_eq!(sig.subgraph_index(), 0);
        assert_eq!(sig.input_names(), &["x".to_string()]);
        assert_eq!(sig.output_names(), &["y".to_string()]);
    }

    #[test]
    fn test_named_signature() {
        let sig = Signature::new("serving_default", 1, vec![], vec![]);
        assert!(!sig.is_default());
        assert_eq!(sig.subgraph_index(), 1);
    }
}
