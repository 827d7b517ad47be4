//! The graph IR: models, subgraphs, tensors and operations.
//!
//! A [`Model`] owns its [`Subgraph`]s, and each subgraph owns its tensors and
//! operations. Everything else refers to them by [`TensorId`] and [`OpId`],
//! which stay valid for the lifetime of the owning subgraph.
//!
//! # Example
//!
//! ```
//! use modelir::graph::{Model, OpCode, OpOptions, Signature};
//!
//! let mut model = Model::new();
//! let index = model.emplace_subgraph();
//! let sg = model.subgraph_mut(index).unwrap();
//!
//! let a = sg.add_tensor();
//! let b = sg.add_tensor();
//! let op = sg.add_op(OpCode::Relu, OpOptions::None);
//! sg.add_input(op, a).unwrap();
//! sg.add_output(op, b).unwrap();
//! sg.mark_input(a).unwrap();
//! sg.mark_output(b).unwrap();
//!
//! model
//!     .push_signature(Signature::default_for(index, vec!["a".into()], vec!["b".into()]))
//!     .unwrap();
//! assert!(model.validate().is_ok());
//! ```

mod arena;
mod edges;
mod model;
mod op_list;
mod operation;
mod options;
mod signature;
mod subgraph;
mod tensor;

pub use arena::{ArenaId, OpId, TensorId};
pub use model::Model;
pub use op_list::OpList;
pub use operation::Operation;
pub use options::{FusedActivation, OpCode, OpOptions, Padding};
pub use signature::{DEFAULT_SIGNATURE_KEY, Signature};
pub use subgraph::Subgraph;
pub use tensor::{ElementType, Quantization, Tensor, TensorType};
