//! Graph passes built on the subgraph editing primitives.
//!
//! Passes leave every def-use invariant intact when they return.

mod dce;

pub use dce::{DceStats, dead_code_elimination};
