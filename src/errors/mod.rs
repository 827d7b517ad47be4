//! Error types for the IR.

mod ir_error;

pub use ir_error::{EntityKind, IrError, Result};
