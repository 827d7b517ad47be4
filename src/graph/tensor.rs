//! Tensor - the value nodes of a subgraph.
//!
//! A tensor carries its type, quantization and optional constant data, plus
//! the def-use edges linking it to the operation that produces it and the
//! operations that consume it. The edge fields are only ever written through
//! [`Subgraph::add_input`](super::Subgraph::add_input) and
//! [`Subgraph::add_output`](super::Subgraph::add_output) so both sides of an
//! edge always agree.

use serde::{Deserialize, Serialize};

use super::arena::OpId;

/// Element type of a tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    #[default]
    None,
    Bool,
    Int4,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float16,
    BFloat16,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
}

/// Type of a tensor: element type plus an optional static layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TensorType {
    /// Known rank. A dimension of `-1` is dynamic.
    Ranked {
        element_type: ElementType,
        dims: Vec<i32>,
    },
    /// Unknown rank.
    Unranked { element_type: ElementType },
}

impl TensorType {
    pub fn ranked(element_type: ElementType, dims: impl Into<Vec<i32>>) -> Self {
        TensorType::Ranked {
            element_type,
            dims: dims.into(),
        }
    }

    pub fn unranked(element_type: ElementType) -> Self {
        TensorType::Unranked { element_type }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            TensorType::Ranked { element_type, .. } | TensorType::Unranked { element_type } => {
                *element_type
            }
        }
    }

    /// Returns the dimensions if the tensor is ranked.
    pub fn dims(&self) -> Option<&[i32]> {
        match self {
            TensorType::Ranked { dims, .. } => Some(dims),
            TensorType::Unranked { .. } => None,
        }
    }

    pub fn rank(&self) -> Option<usize> {
        self.dims().map(<[i32]>::len)
    }

    /// Number of elements, if every dimension is static and the product
    /// fits in a `usize`.
    pub fn num_elements(&self) -> Option<usize> {
        self.dims()?
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(usize::try_from(d).ok()?))
    }
}

impl Default for TensorType {
    fn default() -> Self {
        TensorType::Unranked {
            element_type: ElementType::None,
        }
    }
}

/// Quantization parameters attached to a tensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Quantization {
    #[default]
    None,
    /// Affine quantization with one scale and zero point for the whole tensor.
    PerTensor { scale: f32, zero_point: i64 },
}

impl Quantization {
    pub fn per_tensor(scale: f32, zero_point: i64) -> Self {
        Quantization::PerTensor { scale, zero_point }
    }

    pub fn is_quantized(&self) -> bool {
        !matches!(self, Quantization::None)
    }
}

/// A tensor in a subgraph.
#[derive(Debug, Clone, Default)]
pub struct Tensor {
    /// Element type and shape.
    pub tensor_type: TensorType,
    /// Quantization parameters.
    pub quantization: Quantization,
    /// Constant data. Empty if the tensor is not a constant.
    pub weights: Vec<u8>,
    /// Authored name, may be empty.
    pub name: String,

    users: Vec<OpId>,
    user_arg_inds: Vec<usize>,
    defining_op: Option<OpId>,
    defining_op_out_ind: usize,
}

impl Tensor {
    /// Operations consuming this tensor, in the order the edges were added.
    pub fn users(&self) -> &[OpId] {
        &self.users
    }

    /// Input slot of the corresponding entry in [`users`](Self::users).
    pub fn user_arg_inds(&self) -> &[usize] {
        &self.user_arg_inds
    }

    /// Pairs of (consumer, input slot).
    pub fn uses(&self) -> impl Iterator<Item = (OpId, usize)> + '_ {
        self.users
            .iter()
            .copied()
            .zip(self.user_arg_inds.iter().copied())
    }

    pub fn num_uses(&self) -> usize {
        self.users.len()
    }

    /// The producing operation. `None` for subgraph inputs and constants.
    pub fn defining_op(&self) -> Option<OpId> {
        self.defining_op
    }

    /// Which output slot of [`defining_op`](Self::defining_op) this tensor is.
    pub fn defining_op_out_ind(&self) -> usize {
        self.defining_op_out_ind
    }

    pub fn is_constant(&self) -> bool {
        !self.weights.is_empty()
    }

    pub(super) fn push_user(&mut self, op: OpId, arg_ind: usize) {
        self.users.push(op);
        self.user_arg_inds.push(arg_ind);
    }

    /// Rewrites the slot of every use; uses mapped to `None` are dropped.
    /// The two lists stay paired.
    pub(super) fn remap_uses(&mut self, mut f: impl FnMut(OpId, usize) -> Option<usize>) {
        let (users, inds): (Vec<OpId>, Vec<usize>) = self
            .uses()
            .filter_map(|(op, i)| f(op, i).map(|j| (op, j)))
            .unzip();
        self.users = users;
        self.user_arg_inds = inds;
    }

    pub(super) fn set_defining_op(&mut self, op: OpId, out_ind: usize) {
        self.defining_op = Some(op);
        self.defining_op_out_ind = out_ind;
    }

    pub(super) fn clear_defining_op(&mut self) {
        self.defining_op = None;
        self.defining_op_out_ind = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_type_accessors() {
        let ty = TensorType::ranked(ElementType::Float32, [1, 28, 28, 3]);
        assert_eq!(ty.element_type(), ElementType::Float32);
        assert_eq!(ty.rank(), Some(4));
        assert_eq!(ty.num_elements(), Some(28 * 28 * 3));

        let dynamic = TensorType::ranked(ElementType::Int8, [-1, 10]);
        assert_eq!(dynamic.num_elements(), None);

        let huge = TensorType::ranked(ElementType::Float32, [i32::MAX; 3]);
        assert_eq!(huge.num_elements(), None);

        let unranked = TensorType::unranked(ElementType::Int32);
        assert_eq!(unranked.dims(), None);
        assert_eq!(unranked.rank(), None);
    }

    #[test]
    fn test_quantization() {
        assert!(!Quantization::default().is_quantized());
        let q = Quantization::per_tensor(0.5, -128);
        assert!(q.is_quantized());
        assert_eq!(
            q,
            Quantization::PerTensor {
                scale: 0.5,
                zero_point: -128
            }
        );
    }

    #[test]
    fn test_new_tensor_has_no_edges() {
        let tensor = Tensor::default();
        assert!(tensor.users().is_empty());
        assert!(tensor.user_arg_inds().is_empty());
        assert!(tensor.defining_op().is_none());
        assert!(!tensor.is_constant());
        assert!(tensor.name.is_empty());
    }
}
