//! Model to interchange format.

use std::collections::HashMap;

use super::config::ExportConfig;
use super::format::{MetadataExport, ModelExport, OperationExport, SubgraphExport, TensorExport};
use crate::errors::{IrError, Result};
use crate::graph::{Model, Subgraph, TensorId};

/// Maps tensor ids of one subgraph to their position in the tensor view.
struct TensorIndex {
    positions: HashMap<TensorId, usize>,
}

impl TensorIndex {
    fn new(sg: &Subgraph) -> Self {
        Self {
            positions: sg
                .tensors()
                .iter()
                .enumerate()
                .map(|(i, &id)| (id, i))
                .collect(),
        }
    }

    fn lookup(&self, id: TensorId) -> Result<usize> {
        self.positions.get(&id).copied().ok_or_else(|| {
            IrError::integrity(format!("{id} is referenced but not in the tensor view"))
        })
    }

    fn lookup_all(&self, ids: &[TensorId]) -> Result<Vec<usize>> {
        ids.iter().map(|&id| self.lookup(id)).collect()
    }
}

impl Model {
    /// Walks the model into its interchange form.
    ///
    /// Only published tensors and operations are written. An edge to an
    /// unpublished tensor is an integrity violation.
    pub fn export(&self, config: &ExportConfig) -> Result<ModelExport> {
        let subgraphs = self
            .subgraphs()
            .iter()
            .map(|sg| export_subgraph(sg, self.custom_op_code(), config))
            .collect::<Result<Vec<_>>>()?;

        Ok(ModelExport {
            subgraphs,
            signatures: self.signatures().to_vec(),
            metadata: self
                .metadata()
                .map(|(name, data)| MetadataExport {
                    name: name.to_string(),
                    data: data.to_vec(),
                })
                .collect(),
            custom_op_code: self.custom_op_code().to_string(),
        })
    }

    /// Exports the model as a JSON string.
    pub fn to_json(&self, config: &ExportConfig) -> Result<String> {
        let export = self.export(config)?;
        let json = if config.pretty {
            serde_json::to_string_pretty(&export)?
        } else {
            serde_json::to_string(&export)?
        };
        Ok(json)
    }
}

fn export_subgraph(
    sg: &Subgraph,
    custom_op_code: &str,
    config: &ExportConfig,
) -> Result<SubgraphExport> {
    let index = TensorIndex::new(sg);

    let tensors = sg
        .iter_tensors()
        .map(|(_, tensor)| TensorExport {
            name: tensor.name.clone(),
            tensor_type: tensor.tensor_type.clone(),
            quantization: tensor.quantization,
            weights: if config.include_weights {
                tensor.weights.clone()
            } else {
                Vec::new()
            },
        })
        .collect();

    let operations = sg
        .iter_ops()
        .map(|(_, op)| {
            Ok(OperationExport {
                op_code: op.op_code,
                custom_code: op
                    .op_code
                    .is_custom()
                    .then(|| custom_op_code.to_string()),
                options: op.options.clone(),
                custom_options: op.custom_options.clone(),
                inputs: index.lookup_all(op.inputs())?,
                outputs: index.lookup_all(op.outputs())?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SubgraphExport {
        tensors,
        operations,
        inputs: index.lookup_all(sg.inputs())?,
        outputs: index.lookup_all(sg.outputs())?,
    })
}
