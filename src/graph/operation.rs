//! Operations of a subgraph.
//!
//! An operation holds ordered references to its input and output tensors.
//! Inputs may repeat; outputs are distinct since every tensor has a single
//! producer. Edges are attached through the owning subgraph, never directly.

use super::arena::TensorId;
use super::options::{OpCode, OpOptions};

/// A computation node in a subgraph.
#[derive(Debug, Clone)]
pub struct Operation {
    /// Kind of the operation.
    pub op_code: OpCode,
    /// Options matching `op_code`.
    pub options: OpOptions,
    /// Opaque options, only meaningful for [`OpCode::Custom`].
    pub custom_options: Vec<u8>,

    inputs: Vec<TensorId>,
    outputs: Vec<TensorId>,
}

impl Operation {
    pub(super) fn new(op_code: OpCode, options: OpOptions) -> Self {
        Self {
            op_code,
            options,
            custom_options: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Input tensors, in slot order.
    pub fn inputs(&self) -> &[TensorId] {
        &self.inputs
    }

    /// Output tensors, in slot order.
    pub fn outputs(&self) -> &[TensorId] {
        &self.outputs
    }

    pub fn input(&self, slot: usize) -> Option<TensorId> {
        self.inputs.get(slot).copied()
    }

    pub fn output(&self, slot: usize) -> Option<TensorId> {
        self.outputs.get(slot).copied()
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Appends an input and returns its slot.
    pub(super) fn push_input(&mut self, tensor: TensorId) -> usize {
        self.inputs.push(tensor);
        self.inputs.len() - 1
    }

    /// Appends an output and returns its slot.
    pub(super) fn push_output(&mut self, tensor: TensorId) -> usize {
        self.outputs.push(tensor);
        self.outputs.len() - 1
    }

    pub(super) fn remove_input(&mut self, slot: usize) -> TensorId {
        self.inputs.remove(slot)
    }

    pub(super) fn set_input(&mut self, slot: usize, tensor: TensorId) {
        self.inputs[slot] = tensor;
    }

    pub(super) fn take_outputs(&mut self) -> Vec<TensorId> {
        std::mem::take(&mut self.outputs)
    }
}
