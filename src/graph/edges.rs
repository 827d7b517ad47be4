//! Edge rewiring on top of [`Subgraph::add_input`] and [`Subgraph::add_output`].
//!
//! Each helper updates both ends of every edge it touches, so the def-use
//! links stay consistent after any sequence of calls.

use std::cmp::Ordering;

use super::arena::{OpId, TensorId};
use super::subgraph::Subgraph;
use crate::errors::{EntityKind, IrError, Result};

impl Subgraph {
    /// Removes input slot `slot` from `op` and returns the tensor it held.
    ///
    /// Later slots shift down by one; the recorded uses of every affected
    /// tensor are renumbered to match.
    pub fn detach_input(&mut self, op: OpId, slot: usize) -> Result<TensorId> {
        self.check_op(op)?;
        if slot >= self.op(op).num_inputs() {
            return Err(IrError::not_found(
                EntityKind::Tensor,
                format!("{op} input slot {slot}"),
            ));
        }

        let mut affected: Vec<TensorId> = self.op(op).inputs()[slot..].to_vec();
        affected.sort();
        affected.dedup();

        let removed = self.op_storage_mut(op).remove_input(slot);
        for tensor in affected {
            self.tensor_storage_mut(tensor)
                .remap_uses(|user, i| match (user == op, i.cmp(&slot)) {
                    (false, _) | (true, Ordering::Less) => Some(i),
                    (true, Ordering::Equal) => None,
                    (true, Ordering::Greater) => Some(i - 1),
                });
        }
        Ok(removed)
    }

    /// Removes every input of `op`.
    pub fn detach_inputs(&mut self, op: OpId) -> Result<()> {
        self.check_op(op)?;
        while let Some(last) = self.op(op).num_inputs().checked_sub(1) {
            self.detach_input(op, last)?;
        }
        Ok(())
    }

    /// Clears the outputs of `op`, leaving each former output without a
    /// producer. Returns the detached tensors.
    pub fn detach_outputs(&mut self, op: OpId) -> Result<Vec<TensorId>> {
        self.check_op(op)?;
        let outputs = self.op_storage_mut(op).take_outputs();
        for &tensor in &outputs {
            self.tensor_storage_mut(tensor).clear_defining_op();
        }
        Ok(outputs)
    }

    /// Makes every consumer of `old` read `new` instead.
    ///
    /// A subgraph output naming `old` is redirected to `new`, or dropped if
    /// `new` is already an output. Returns the number of rewired input slots.
    pub fn replace_uses(&mut self, old: TensorId, new: TensorId) -> Result<usize> {
        self.check_tensor(old)?;
        self.check_tensor(new)?;
        if old == new {
            return Ok(0);
        }

        let uses: Vec<(OpId, usize)> = self.tensor(old).uses().collect();
        for &(user, slot) in &uses {
            self.op_storage_mut(user).set_input(slot, new);
            self.tensor_storage_mut(new).push_user(user, slot);
        }
        self.tensor_storage_mut(old).remap_uses(|_, _| None);

        let outputs = self.outputs_mut();
        if outputs.contains(&new) {
            outputs.retain(|&t| t != old);
        } else if let Some(slot) = outputs.iter_mut().find(|t| **t == old) {
            *slot = new;
        }
        Ok(uses.len())
    }
}
