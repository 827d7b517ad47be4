//! Interchange format to model.

use super::format::{ModelExport, SubgraphExport};
use crate::errors::{IrError, Result};
use crate::graph::{Model, Subgraph, TensorId};

impl Model {
    /// Builds a model from its interchange form.
    ///
    /// Edges are attached in slot order through the subgraph's edge
    /// primitives, and the finished model is validated.
    pub fn import(export: ModelExport) -> Result<Model> {
        let custom_op_code = resolve_custom_op_code(&export)?;
        let mut model = Model::new();

        for (i, sg_export) in export.subgraphs.into_iter().enumerate() {
            let index = model.emplace_subgraph();
            import_subgraph(model.subgraph_mut(index)?, sg_export).map_err(|e| match e {
                IrError::IntegrityViolation(msg) => {
                    IrError::IntegrityViolation(format!("subgraph {i}: {msg}"))
                }
                other => other,
            })?;
        }

        for signature in export.signatures {
            model.push_signature(signature)?;
        }
        for entry in export.metadata {
            model.push_metadata(entry.name, entry.data)?;
        }
        model.set_custom_op_code(custom_op_code);

        model.validate()?;
        log::debug!(
            "Imported model with {} subgraphs and {} signatures",
            model.num_subgraphs(),
            model.signatures().len()
        );
        Ok(model)
    }

    /// Parses a JSON interchange document into a model.
    pub fn from_json(json: &str) -> Result<Model> {
        let export: ModelExport = serde_json::from_str(json)?;
        Model::import(export)
    }
}

/// Picks the custom op code from the model header or, when that is empty,
/// from the custom operations. All names given must agree.
fn resolve_custom_op_code(export: &ModelExport) -> Result<String> {
    let mut resolved = export.custom_op_code.clone();
    let names = export
        .subgraphs
        .iter()
        .flat_map(|sg| &sg.operations)
        .filter(|op| op.op_code.is_custom())
        .filter_map(|op| op.custom_code.as_deref());

    for name in names {
        if resolved.is_empty() {
            resolved = name.to_string();
        } else if resolved != name {
            return Err(IrError::integrity(format!(
                "custom operations disagree on their code: '{resolved}' and '{name}'"
            )));
        }
    }
    Ok(resolved)
}

fn import_subgraph(sg: &mut Subgraph, export: SubgraphExport) -> Result<()> {
    let ids: Vec<TensorId> = export
        .tensors
        .into_iter()
        .map(|t| {
            let id = sg.add_tensor();
            let tensor = sg.tensor_mut(id);
            tensor.name = t.name;
            tensor.tensor_type = t.tensor_type;
            tensor.quantization = t.quantization;
            tensor.weights = t.weights;
            id
        })
        .collect();

    let resolve = |index: usize| {
        ids.get(index).copied().ok_or_else(|| {
            IrError::integrity(format!(
                "tensor index {index} out of range ({} tensors)",
                ids.len()
            ))
        })
    };

    for op_export in export.operations {
        let op = sg.add_op(op_export.op_code, op_export.options);
        sg.op_mut(op).custom_options = op_export.custom_options;
        for index in op_export.inputs {
            sg.add_input(op, resolve(index)?)?;
        }
        for index in op_export.outputs {
            sg.add_output(op, resolve(index)?)?;
        }
    }

    for index in export.inputs {
        sg.mark_input(resolve(index)?)?;
    }
    for index in export.outputs {
        sg.mark_output(resolve(index)?)?;
    }

    log::trace!(
        "Imported subgraph with {} tensors and {} operations",
        sg.tensors().len(),
        sg.ops().len()
    );
    Ok(())
}
