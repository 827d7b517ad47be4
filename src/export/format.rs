//! Index-addressed interchange format for a whole model.
//!
//! Tensors are referred to by their position in the owning subgraph's tensor
//! list, which is how the serialized model format addresses them too.

use serde::{Deserialize, Serialize};

use crate::graph::{OpCode, OpOptions, Quantization, Signature, TensorType};

/// Export format for a complete model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelExport {
    pub subgraphs: Vec<SubgraphExport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<Signature>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<MetadataExport>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub custom_op_code: String,
}

/// Export format for one subgraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgraphExport {
    pub tensors: Vec<TensorExport>,
    pub operations: Vec<OperationExport>,
    pub inputs: Vec<usize>,
    pub outputs: Vec<usize>,
}

/// Export format for one tensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorExport {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "type")]
    pub tensor_type: TensorType,
    #[serde(default)]
    pub quantization: Quantization,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weights: Vec<u8>,
}

/// Export format for one operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationExport {
    pub op_code: OpCode,
    /// Custom code name. Only written for custom operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_code: Option<String>,
    #[serde(default)]
    pub options: OpOptions,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_options: Vec<u8>,
    pub inputs: Vec<usize>,
    pub outputs: Vec<usize>,
}

/// Export format for a metadata entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataExport {
    pub name: String,
    pub data: Vec<u8>,
}
