//! # modelir
//!
//! An in-memory, mutable intermediate representation for neural-network
//! models, built for graph rewriting passes.
//!
//! A [`Model`] owns an ordered list of [`Subgraph`]s together with named
//! signatures and binary metadata. Each subgraph stores its tensors and
//! operations in append-only arenas addressed by [`TensorId`] and [`OpId`],
//! and keeps bidirectional def-use edges between them.
//!
//! ## Features
//!
//! - **Stable handles**: ids never move when a subgraph grows, so passes can
//!   hold them across insertions.
//! - **Def-use edges**: every tensor knows its producer and all its
//!   `(user, argument slot)` pairs.
//! - **Rewrite helpers**: detaching edges, redirecting uses and dead code
//!   elimination keep both sides of every edge consistent.
//! - **Interchange**: models round-trip through an index-addressed JSON form.
//!
//! ## Example
//!
//! ```
//! use modelir::prelude::*;
//!
//! let mut model = Model::new();
//! let index = model.emplace_subgraph();
//! let sg = model.subgraph_mut(index).unwrap();
//!
//! let x = sg.add_tensor();
//! let y = sg.add_tensor();
//! let relu = sg.add_op(OpCode::Relu, OpOptions::None);
//! sg.add_input(relu, x).unwrap();
//! sg.add_output(relu, y).unwrap();
//! sg.mark_input(x).unwrap();
//! sg.mark_output(y).unwrap();
//!
//! assert_eq!(sg.tensor(x).users(), &[relu]);
//! assert_eq!(sg.tensor(y).defining_op(), Some(relu));
//! assert!(model.validate().is_ok());
//! ```

pub mod errors;
pub mod export;
pub mod graph;
pub mod passes;

// Re-exports for convenience
pub use errors::{IrError, Result};
pub use graph::{Model, OpId, Subgraph, TensorId};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::errors::{EntityKind, IrError, Result};
    pub use crate::export::ExportConfig;
    pub use crate::graph::{
        DEFAULT_SIGNATURE_KEY, ElementType, FusedActivation, Model, OpCode, OpId, OpList,
        OpOptions, Operation, Padding, Quantization, Signature, Subgraph, Tensor, TensorId,
        TensorType,
    };
    pub use crate::passes::{DceStats, dead_code_elimination};
}
