//! Interchange export and import.
//!
//! [`Model::export`](crate::graph::Model::export) walks a model the same way
//! a serializer for the on-disk format does: subgraphs in order, tensors and
//! operations in view order, edges as tensor indices, then signatures,
//! metadata and the custom op code. [`Model::import`](crate::graph::Model::import)
//! rebuilds a model from that description.
//!
//! # Example
//!
//! ```
//! use modelir::export::ExportConfig;
//! use modelir::graph::{Model, OpCode, OpOptions};
//!
//! let mut model = Model::new();
//! let index = model.emplace_subgraph();
//! let sg = model.subgraph_mut(index).unwrap();
//! let x = sg.add_tensor();
//! let y = sg.add_tensor();
//! let op = sg.add_op(OpCode::Logistic, OpOptions::None);
//! sg.add_input(op, x).unwrap();
//! sg.add_output(op, y).unwrap();
//!
//! let json = model.to_json(&ExportConfig::default()).unwrap();
//! let restored = Model::from_json(&json).unwrap();
//! assert_eq!(restored.main_subgraph().unwrap().ops().len(), 1);
//! ```

mod config;
mod format;
mod reader;
mod writer;

pub use config::ExportConfig;
pub use format::{MetadataExport, ModelExport, OperationExport, SubgraphExport, TensorExport};
