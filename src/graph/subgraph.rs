//! Subgraph - owning container of tensors and operations.
//!
//! Storage and views are kept apart. Tensors and operations live in
//! append-only arenas so their ids never go stale; the ordered views list the
//! ids that are currently part of the graph. Emplacing an entity only
//! allocates it; it becomes visible once published to the view. Removing an
//! entity drops it from the view and leaves the object in storage until the
//! subgraph itself is dropped.

use std::collections::HashSet;

use super::arena::{Arena, OpId, TensorId};
use super::operation::Operation;
use super::options::{OpCode, OpOptions};
use super::tensor::Tensor;
use crate::errors::{EntityKind, IrError, Result};

/// One callable graph of a model.
#[derive(Debug, Clone, Default)]
pub struct Subgraph {
    tensors_storage: Arena<TensorId, Tensor>,
    tensors: Vec<TensorId>,
    ops_storage: Arena<OpId, Operation>,
    ops: Vec<OpId>,
    inputs: Vec<TensorId>,
    outputs: Vec<TensorId>,
}

impl Subgraph {
    /// Creates an empty subgraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an edge-less tensor in storage without publishing it.
    pub fn emplace_tensor(&mut self) -> TensorId {
        self.tensors_storage.alloc(Tensor::default())
    }

    /// Allocates an edge-less operation in storage without publishing it.
    pub fn emplace_op(&mut self, op_code: OpCode) -> OpId {
        self.ops_storage.alloc(Operation::new(op_code, OpOptions::None))
    }

    /// Appends a previously emplaced tensor to the view.
    pub fn publish_tensor(&mut self, id: TensorId) -> Result<()> {
        self.check_tensor(id)?;
        if self.tensors.contains(&id) {
            return Err(IrError::already_exists(EntityKind::Tensor, id));
        }
        self.tensors.push(id);
        Ok(())
    }

    /// Appends a previously emplaced operation to the view.
    pub fn publish_op(&mut self, id: OpId) -> Result<()> {
        self.check_op(id)?;
        if self.ops.contains(&id) {
            return Err(IrError::already_exists(EntityKind::Operation, id));
        }
        self.ops.push(id);
        Ok(())
    }

    /// Emplaces a tensor and publishes it in one step.
    pub fn add_tensor(&mut self) -> TensorId {
        let id = self.emplace_tensor();
        self.tensors.push(id);
        id
    }

    /// Emplaces an operation with the given options and publishes it.
    pub fn add_op(&mut self, op_code: OpCode, options: OpOptions) -> OpId {
        let id = self.ops_storage.alloc(Operation::new(op_code, options));
        self.ops.push(id);
        id
    }

    /// Designates a published tensor as a subgraph input.
    pub fn mark_input(&mut self, id: TensorId) -> Result<()> {
        self.check_published(id)?;
        if self.inputs.contains(&id) {
            return Err(IrError::already_exists(EntityKind::Tensor, id));
        }
        self.inputs.push(id);
        Ok(())
    }

    /// Designates a published tensor as a subgraph output.
    pub fn mark_output(&mut self, id: TensorId) -> Result<()> {
        self.check_published(id)?;
        if self.outputs.contains(&id) {
            return Err(IrError::already_exists(EntityKind::Tensor, id));
        }
        self.outputs.push(id);
        Ok(())
    }

    /// Removes a tensor from the view and from the input/output lists.
    ///
    /// The tensor stays in storage. Edges are left as they are; the caller is
    /// responsible for making sure no live operation still refers to it.
    pub fn remove_tensor(&mut self, id: TensorId) -> Result<()> {
        let pos = self
            .tensor_index(id)
            .ok_or_else(|| IrError::not_found(EntityKind::Tensor, id))?;
        self.tensors.remove(pos);
        self.inputs.retain(|&t| t != id);
        self.outputs.retain(|&t| t != id);
        Ok(())
    }

    /// Removes an operation from the view. It stays in storage.
    pub fn remove_op(&mut self, id: OpId) -> Result<()> {
        let pos = self
            .op_index(id)
            .ok_or_else(|| IrError::not_found(EntityKind::Operation, id))?;
        self.ops.remove(pos);
        Ok(())
    }

    /// Adds `tensor` as the next input of `op`, recording the use on the tensor.
    pub fn add_input(&mut self, op: OpId, tensor: TensorId) -> Result<()> {
        self.check_op(op)?;
        self.check_tensor(tensor)?;
        let slot = self.ops_storage[op].push_input(tensor);
        self.tensors_storage[tensor].push_user(op, slot);
        Ok(())
    }

    /// Adds `tensor` as the next output of `op`, making `op` its producer.
    ///
    /// Fails if the tensor already has a producer.
    pub fn add_output(&mut self, op: OpId, tensor: TensorId) -> Result<()> {
        self.check_op(op)?;
        self.check_tensor(tensor)?;
        if let Some(producer) = self.tensors_storage[tensor].defining_op() {
            return Err(IrError::integrity(format!(
                "{tensor} is already produced by {producer}"
            )));
        }
        let slot = self.ops_storage[op].push_output(tensor);
        self.tensors_storage[tensor].set_defining_op(op, slot);
        Ok(())
    }

    pub fn tensor(&self, id: TensorId) -> &Tensor {
        &self.tensors_storage[id]
    }

    /// Mutable access to a tensor's attributes. Edges stay read-only.
    pub fn tensor_mut(&mut self, id: TensorId) -> &mut Tensor {
        &mut self.tensors_storage[id]
    }

    pub fn op(&self, id: OpId) -> &Operation {
        &self.ops_storage[id]
    }

    /// Mutable access to an operation's attributes. Edges stay read-only.
    pub fn op_mut(&mut self, id: OpId) -> &mut Operation {
        &mut self.ops_storage[id]
    }

    /// Published tensors, in view order.
    pub fn tensors(&self) -> &[TensorId] {
        &self.tensors
    }

    /// Published operations, in view order.
    pub fn ops(&self) -> &[OpId] {
        &self.ops
    }

    pub fn inputs(&self) -> &[TensorId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TensorId] {
        &self.outputs
    }

    pub fn iter_tensors(&self) -> impl Iterator<Item = (TensorId, &Tensor)> {
        self.tensors.iter().map(|&id| (id, &self.tensors_storage[id]))
    }

    pub fn iter_ops(&self) -> impl Iterator<Item = (OpId, &Operation)> {
        self.ops.iter().map(|&id| (id, &self.ops_storage[id]))
    }

    /// Returns true if the tensor is in the view.
    pub fn contains_tensor(&self, id: TensorId) -> bool {
        self.tensors.contains(&id)
    }

    /// Returns true if the operation is in the view.
    pub fn contains_op(&self, id: OpId) -> bool {
        self.ops.contains(&id)
    }

    /// Position of a tensor in the view, used for index-based addressing.
    pub fn tensor_index(&self, id: TensorId) -> Option<usize> {
        self.tensors.iter().position(|&t| t == id)
    }

    /// Position of an operation in the view.
    pub fn op_index(&self, id: OpId) -> Option<usize> {
        self.ops.iter().position(|&o| o == id)
    }

    pub fn is_input(&self, id: TensorId) -> bool {
        self.inputs.contains(&id)
    }

    pub fn is_output(&self, id: TensorId) -> bool {
        self.outputs.contains(&id)
    }

    /// Tensors allocated in storage, published or not.
    pub fn num_allocated_tensors(&self) -> usize {
        self.tensors_storage.len()
    }

    /// Operations allocated in storage, published or not.
    pub fn num_allocated_ops(&self) -> usize {
        self.ops_storage.len()
    }

    /// Checks the structural invariants of the published graph.
    ///
    /// Every def-use edge must agree on both ends, inputs and outputs must be
    /// distinct published tensors, and published operations and tensors must only
    /// refer to each other.
    pub fn validate(&self) -> Result<()> {
        let tensor_view: HashSet<TensorId> = self.tensors.iter().copied().collect();
        let op_view: HashSet<OpId> = self.ops.iter().copied().collect();
        if tensor_view.len() != self.tensors.len() || op_view.len() != self.ops.len() {
            return Err(IrError::integrity("view lists an entity twice"));
        }

        for (what, list) in [("inputs", &self.inputs), ("outputs", &self.outputs)] {
            let unique: HashSet<TensorId> = list.iter().copied().collect();
            if unique.len() != list.len() {
                return Err(IrError::integrity(format!(
                    "subgraph {what} list a tensor twice"
                )));
            }
        }

        for &id in self.inputs.iter().chain(&self.outputs) {
            if !tensor_view.contains(&id) {
                return Err(IrError::integrity(format!(
                    "subgraph input/output {id} is not in the tensor view"
                )));
            }
        }

        for (id, tensor) in self.iter_tensors() {
            for (user, slot) in tensor.uses() {
                if !op_view.contains(&user) {
                    return Err(IrError::integrity(format!(
                        "{id} is used by {user}, which is not in the op view"
                    )));
                }
                if self.ops_storage[user].input(slot) != Some(id) {
                    return Err(IrError::integrity(format!(
                        "{id} lists use ({user}, {slot}) but that input slot holds another tensor"
                    )));
                }
            }
            if let Some(producer) = tensor.defining_op() {
                if !op_view.contains(&producer) {
                    return Err(IrError::integrity(format!(
                        "{id} is produced by {producer}, which is not in the op view"
                    )));
                }
                let slot = tensor.defining_op_out_ind();
                if self.ops_storage[producer].output(slot) != Some(id) {
                    return Err(IrError::integrity(format!(
                        "{id} claims output slot {slot} of {producer}, which holds another tensor"
                    )));
                }
            }
        }

        for (id, op) in self.iter_ops() {
            for (slot, &input) in op.inputs().iter().enumerate() {
                if !tensor_view.contains(&input) {
                    return Err(IrError::integrity(format!(
                        "{id} reads {input}, which is not in the tensor view"
                    )));
                }
                if !self.tensors_storage[input]
                    .uses()
                    .any(|use_| use_ == (id, slot))
                {
                    return Err(IrError::integrity(format!(
                        "{input} does not record its use by ({id}, {slot})"
                    )));
                }
            }
            for (slot, &output) in op.outputs().iter().enumerate() {
                if !tensor_view.contains(&output) {
                    return Err(IrError::integrity(format!(
                        "{id} writes {output}, which is not in the tensor view"
                    )));
                }
                let tensor = &self.tensors_storage[output];
                if tensor.defining_op() != Some(id) || tensor.defining_op_out_ind() != slot {
                    return Err(IrError::integrity(format!(
                        "{output} does not record {id} output slot {slot} as its producer"
                    )));
                }
            }
        }

        Ok(())
    }

    pub(super) fn check_tensor(&self, id: TensorId) -> Result<()> {
        if self.tensors_storage.contains(id) {
            Ok(())
        } else {
            Err(IrError::integrity(format!(
                "{id} was not allocated in this subgraph"
            )))
        }
    }

    pub(super) fn check_op(&self, id: OpId) -> Result<()> {
        if self.ops_storage.contains(id) {
            Ok(())
        } else {
            Err(IrError::integrity(format!(
                "{id} was not allocated in this subgraph"
            )))
        }
    }

    fn check_published(&self, id: TensorId) -> Result<()> {
        self.check_tensor(id)?;
        if self.tensors.contains(&id) {
            Ok(())
        } else {
            Err(IrError::integrity(format!("{id} is not in the tensor view")))
        }
    }

    pub(super) fn tensor_storage_mut(&mut self, id: TensorId) -> &mut Tensor {
        &mut self.tensors_storage[id]
    }

    pub(super) fn op_storage_mut(&mut self, id: OpId) -> &mut Operation {
        &mut self.ops_storage[id]
    }

    pub(super) fn outputs_mut(&mut self) -> &mut Vec<TensorId> {
        &mut self.outputs
    }
}

impl std::ops::Index<TensorId> for Subgraph {
    type Output = Tensor;

    fn index(&self, id: TensorId) -> &Tensor {
        self.tensor(id)
    }
}

impl std::ops::Index<OpId> for Subgraph {
    type Output = Operation;

    fn index(&self, id: OpId) -> &Operation {
        self.op(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tensor::{ElementType, TensorType};

    #[test]
    fn test_single_op_graph() {
        let mut sg = Subgraph::new();
        let a = sg.add_tensor();
        let op = sg.add_op(OpCode::Relu, OpOptions::None);
        let b = sg.add_tensor();

        sg.add_input(op, a).unwrap();
        sg.add_output(op, b).unwrap();
        sg.mark_input(a).unwrap();
        sg.mark_output(b).unwrap();

        assert_eq!(sg[a].users(), &[op]);
        assert_eq!(sg[a].user_arg_inds(), &[0]);
        assert_eq!(sg[b].defining_op(), Some(op));
        assert_eq!(sg[b].defining_op_out_ind(), 0);
        assert_eq!(sg[op].inputs(), &[a]);
        assert_eq!(sg[op].outputs(), &[b]);
        assert!(sg.validate().is_ok());
    }

    #[test]
    fn test_repeated_input_records_each_slot() {
        let mut sg = Subgraph::new();
        let x = sg.add_tensor();
        let y = sg.add_tensor();
        let mul = sg.add_op(OpCode::Mul, OpOptions::None);

        sg.add_input(mul, x).unwrap();
        sg.add_input(mul, x).unwrap();
        sg.add_output(mul, y).unwrap();

        assert_eq!(sg[x].users(), &[mul, mul]);
        assert_eq!(sg[x].user_arg_inds(), &[0, 1]);
        assert!(sg.validate().is_ok());
    }

    #[test]
    fn test_second_producer_is_rejected() {
        let mut sg = Subgraph::new();
        let out = sg.add_tensor();
        let first = sg.add_op(OpCode::Add, OpOptions::None);
        let second = sg.add_op(OpCode::Sub, OpOptions::None);

        sg.add_output(first, out).unwrap();
        let err = sg.add_output(second, out).unwrap_err();
        assert!(err.is_integrity_violation());
        assert_eq!(sg[out].defining_op(), Some(first));
        assert!(sg[second].outputs().is_empty());
    }

    #[test]
    fn test_ids_survive_further_emplacement() {
        let mut sg = Subgraph::new();
        let t = sg.add_tensor();
        sg.tensor_mut(t).name = "keep".to_string();
        let op = sg.add_op(OpCode::Softmax, OpOptions::Softmax { beta: 1.0 });

        for _ in 0..512 {
            sg.emplace_tensor();
            sg.emplace_op(OpCode::Add);
        }

        assert_eq!(sg[t].name, "keep");
        assert_eq!(sg[op].op_code, OpCode::Softmax);
        assert_eq!(sg.num_allocated_tensors(), 513);
        assert_eq!(sg.num_allocated_ops(), 513);
    }

    #[test]
    fn test_emplace_is_not_visible_until_published() {
        let mut sg = Subgraph::new();
        let t = sg.emplace_tensor();
        let op = sg.emplace_op(OpCode::Tanh);
        assert!(sg.tensors().is_empty());
        assert!(sg.ops().is_empty());

        assert!(sg.mark_input(t).unwrap_err().is_integrity_violation());

        sg.publish_tensor(t).unwrap();
        sg.publish_op(op).unwrap();
        assert_eq!(sg.tensors(), &[t]);
        assert_eq!(sg.ops(), &[op]);

        assert!(sg.publish_tensor(t).unwrap_err().is_already_exists());
        assert!(sg.publish_op(op).unwrap_err().is_already_exists());
    }

    #[test]
    fn test_remove_tensor_keeps_storage() {
        let mut sg = Subgraph::new();
        let a = sg.add_tensor();
        let b = sg.add_tensor();
        sg.tensor_mut(a).tensor_type = TensorType::ranked(ElementType::Float32, [4]);
        sg.mark_input(a).unwrap();
        sg.mark_output(a).unwrap();

        sg.remove_tensor(a).unwrap();

        assert_eq!(sg.tensors(), &[b]);
        assert!(sg.inputs().is_empty());
        assert!(sg.outputs().is_empty());
        assert_eq!(sg[a].tensor_type.rank(), Some(1));
        assert!(sg.remove_tensor(a).unwrap_err().is_not_found());
    }

    #[test]
    fn test_remove_op() {
        let mut sg = Subgraph::new();
        let op = sg.add_op(OpCode::Pad, OpOptions::None);
        sg.remove_op(op).unwrap();
        assert!(sg.ops().is_empty());
        assert!(!sg.contains_op(op));
        assert!(sg.remove_op(op).unwrap_err().is_not_found());
    }

    #[test]
    fn test_foreign_ids_are_rejected() {
        let mut other = Subgraph::new();
        other.add_tensor();
        let foreign = other.add_tensor();
        other.add_op(OpCode::Add, OpOptions::None);
        let foreign_op = other.add_op(OpCode::Add, OpOptions::None);

        let mut sg = Subgraph::new();
        let op = sg.add_op(OpCode::Add, OpOptions::None);
        let t = sg.add_tensor();
        assert!(sg.add_input(op, foreign).unwrap_err().is_integrity_violation());
        assert!(sg.add_output(foreign_op, t).unwrap_err().is_integrity_violation());
        assert!(sg[op].inputs().is_empty());
        assert!(sg[t].defining_op().is_none());
    }

    #[test]
    fn test_validate_catches_unpublished_reference() {
        let mut sg = Subgraph::new();
        let a = sg.emplace_tensor();
        let op = sg.add_op(OpCode::Relu, OpOptions::None);
        sg.add_input(op, a).unwrap();

        assert!(sg.validate().unwrap_err().is_integrity_violation());

        sg.publish_tensor(a).unwrap();
        assert!(sg.validate().is_ok());
    }

    #[test]
    fn test_validate_catches_removed_producer() {
        let mut sg = Subgraph::new();
        let op = sg.add_op(OpCode::Relu, OpOptions::None);
        let out = sg.add_tensor();
        sg.add_output(op, out).unwrap();
        sg.remove_op(op).unwrap();

        assert!(sg.validate().unwrap_err().is_integrity_violation());
    }

    #[test]
    fn test_validate_catches_repeated_output() {
        let mut sg = Subgraph::new();
        let t = sg.add_tensor();
        sg.mark_output(t).unwrap();
        assert!(sg.mark_output(t).unwrap_err().is_already_exists());
        assert!(sg.validate().is_ok());

        sg.outputs.push(t);
        assert!(sg.validate().unwrap_err().is_integrity_violation());
    }
}
