//! Model - top-level owner of subgraphs, signatures and metadata.

use std::collections::HashSet;

use super::signature::Signature;
use super::subgraph::Subgraph;
use crate::errors::{EntityKind, IrError, Result};

/// A complete model: the unit that is loaded, transformed and saved.
///
/// Subgraph 0 is the main graph. Every signature refers to a subgraph by
/// index, and metadata keys are unique.
#[derive(Debug, Clone, Default)]
pub struct Model {
    subgraphs: Vec<Subgraph>,
    signatures: Vec<Signature>,
    metadata: Vec<(String, Vec<u8>)>,
    custom_op_code: String,
}

impl Model {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an empty subgraph and returns its index.
    pub fn emplace_subgraph(&mut self) -> usize {
        self.subgraphs.push(Subgraph::new());
        self.subgraphs.len() - 1
    }

    pub fn subgraphs(&self) -> &[Subgraph] {
        &self.subgraphs
    }

    pub fn num_subgraphs(&self) -> usize {
        self.subgraphs.len()
    }

    pub fn subgraph(&self, index: usize) -> Result<&Subgraph> {
        self.subgraphs
            .get(index)
            .ok_or_else(|| IrError::not_found(EntityKind::Subgraph, index))
    }

    pub fn subgraph_mut(&mut self, index: usize) -> Result<&mut Subgraph> {
        self.subgraphs
            .get_mut(index)
            .ok_or_else(|| IrError::not_found(EntityKind::Subgraph, index))
    }

    /// Index of the main subgraph. Always 0.
    pub fn main_subgraph_index(&self) -> usize {
        // TODO: resolve through the default signature once loaders always emit one.
        0
    }

    pub fn main_subgraph(&self) -> Result<&Subgraph> {
        self.subgraph(self.main_subgraph_index())
    }

    pub fn main_subgraph_mut(&mut self) -> Result<&mut Subgraph> {
        let index = self.main_subgraph_index();
        self.subgraph_mut(index)
    }

    /// Looks up a metadata buffer by key.
    pub fn find_metadata(&self, key: &str) -> Result<&[u8]> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, data)| data.as_slice())
            .ok_or_else(|| IrError::not_found(EntityKind::Metadata, key))
    }

    /// Adds a metadata buffer. Fails if the key is already present; the
    /// existing value is left untouched.
    pub fn push_metadata(
        &mut self,
        key: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Result<()> {
        let key = key.into();
        if self.metadata.iter().any(|(k, _)| *k == key) {
            return Err(IrError::already_exists(EntityKind::Metadata, key));
        }
        self.metadata.push((key, data.into()));
        Ok(())
    }

    /// Metadata entries in insertion order.
    pub fn metadata(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.metadata
            .iter()
            .map(|(k, data)| (k.as_str(), data.as_slice()))
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// Adds a signature. Its key must be new and its subgraph must exist.
    pub fn push_signature(&mut self, signature: Signature) -> Result<()> {
        if self.signatures.iter().any(|s| s.key() == signature.key()) {
            return Err(IrError::already_exists(
                EntityKind::Signature,
                signature.key(),
            ));
        }
        if signature.subgraph_index() >= self.subgraphs.len() {
            return Err(IrError::integrity(format!(
                "signature '{}' refers to subgraph {} but the model has {}",
                signature.key(),
                signature.subgraph_index(),
                self.subgraphs.len()
            )));
        }
        self.signatures.push(signature);
        Ok(())
    }

    /// Looks up a signature by exact key.
    pub fn find_signature(&self, key: &str) -> Result<&Signature> {
        self.signatures
            .iter()
            .find(|s| s.key() == key)
            .ok_or_else(|| IrError::not_found(EntityKind::Signature, key))
    }

    /// Resolves a signature key to the subgraph it binds.
    pub fn find_subgraph(&self, key: &str) -> Result<&Subgraph> {
        let index = self.signature_target(key)?;
        Ok(&self.subgraphs[index])
    }

    pub fn find_subgraph_mut(&mut self, key: &str) -> Result<&mut Subgraph> {
        let index = self.signature_target(key)?;
        Ok(&mut self.subgraphs[index])
    }

    fn signature_target(&self, key: &str) -> Result<usize> {
        let signature = self.find_signature(key)?;
        let index = signature.subgraph_index();
        if index >= self.subgraphs.len() {
            return Err(IrError::integrity(format!(
                "signature '{key}' refers to missing subgraph {index}"
            )));
        }
        Ok(index)
    }

    /// Name emitted for custom operations on re-serialization.
    pub fn custom_op_code(&self) -> &str {
        &self.custom_op_code
    }

    pub fn set_custom_op_code(&mut self, code: impl Into<String>) {
        self.custom_op_code = code.into();
    }

    /// Checks every cross reference in the model, including each subgraph's
    /// own invariants.
    pub fn validate(&self) -> Result<()> {
        let mut keys = HashSet::new();
        for signature in &self.signatures {
            if !keys.insert(signature.key()) {
                return Err(IrError::integrity(format!(
                    "duplicate signature key '{}'",
                    signature.key()
                )));
            }
            let subgraph = self.subgraphs.get(signature.subgraph_index()).ok_or_else(|| {
                IrError::integrity(format!(
                    "signature '{}' refers to missing subgraph {}",
                    signature.key(),
                    signature.subgraph_index()
                ))
            })?;
            if signature.input_names().len() != subgraph.inputs().len()
                || signature.output_names().len() != subgraph.outputs().len()
            {
                return Err(IrError::integrity(format!(
                    "signature '{}' names {} inputs and {} outputs, subgraph {} has {} and {}",
                    signature.key(),
                    signature.input_names().len(),
                    signature.output_names().len(),
                    signature.subgraph_index(),
                    subgraph.inputs().len(),
                    subgraph.outputs().len()
                )));
            }
        }

        for subgraph in &self.subgraphs {
            subgraph.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::signature::DEFAULT_SIGNATURE_KEY;

    #[test]
    fn test_metadata_push_and_find() {
        let mut model = Model::new();
        model
            .push_metadata("min_runtime_version", b"1.5.0".to_vec())
            .unwrap();

        assert_eq!(model.find_metadata("min_runtime_version").unwrap(), b"1.5.0");
        assert!(model.find_metadata("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_duplicate_metadata_does_not_overwrite() {
        let mut model = Model::new();
        model.push_metadata("key", vec![1u8, 2, 3]).unwrap();

        let err = model.push_metadata("key", vec![9u8]).unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(model.find_metadata("key").unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn test_metadata_keeps_insertion_order() {
        let mut model = Model::new();
        model.push_metadata("b", vec![2u8]).unwrap();
        model.push_metadata("a", vec![1u8]).unwrap();
        let keys: Vec<&str> = model.metadata().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_find_subgraph_through_signature() {
        let mut model = Model::new();
        model.emplace_subgraph();
        let second = model.emplace_subgraph();
        model.subgraph_mut(second).unwrap().add_tensor();
        model
            .push_signature(Signature::new("decode", second, vec![], vec![]))
            .unwrap();

        let found = model.find_subgraph("decode").unwrap();
        assert!(std::ptr::eq(found, &model.subgraphs()[second]));
        assert_eq!(found.tensors().len(), 1);

        assert!(model.find_signature("encode").unwrap_err().is_not_found());
        assert!(model.find_subgraph("encode").unwrap_err().is_not_found());
    }

    #[test]
    fn test_push_signature_checks() {
        let mut model = Model::new();
        model.emplace_subgraph();
        model
            .push_signature(Signature::default_for(0, vec![], vec![]))
            .unwrap();

        let dup = model
            .push_signature(Signature::new(DEFAULT_SIGNATURE_KEY, 0, vec![], vec![]))
            .unwrap_err();
        assert!(dup.is_already_exists());

        let bad = model
            .push_signature(Signature::new("other", 3, vec![], vec![]))
            .unwrap_err();
        assert!(bad.is_integrity_violation());
        assert_eq!(model.signatures().len(), 1);
    }

    #[test]
    fn test_main_subgraph() {
        let mut model = Model::new();
        assert!(model.main_subgraph().unwrap_err().is_not_found());

        model.emplace_subgraph();
        model.emplace_subgraph();
        model.main_subgraph_mut().unwrap().add_tensor();

        assert_eq!(model.main_subgraph_index(), 0);
        assert_eq!(model.main_subgraph().unwrap().tensors().len(), 1);
        assert!(model.subgraph(1).unwrap().tensors().is_empty());
    }

    #[test]
    fn test_validate_signature_arity() {
        let mut model = Model::new();
        let index = model.emplace_subgraph();
        let sg = model.subgraph_mut(index).unwrap();
        let x = sg.add_tensor();
        sg.mark_input(x).unwrap();

        model
            .push_signature(Signature::default_for(index, vec![], vec![]))
            .unwrap();
        assert!(model.validate().unwrap_err().is_integrity_violation());
    }

    #[test]
    fn test_custom_op_code() {
        let mut model = Model::new();
        assert_eq!(model.custom_op_code(), "");
        model.set_custom_op_code("DISPATCH_OP");
        assert_eq!(model.custom_op_code(), "DISPATCH_OP");
    }
}
