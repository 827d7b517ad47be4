//! Dead code elimination.

use crate::errors::Result;
use crate::graph::{OpId, Subgraph, TensorId};

/// What a dead code elimination run removed from the views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DceStats {
    pub removed_ops: usize,
    pub removed_tensors: usize,
}

/// Removes operations whose results are never read, then tensors that are
/// no longer connected to anything.
///
/// An operation is dead when it has at least one output and none of its
/// outputs has a user or is a subgraph output. Removing it frees its inputs,
/// so the sweep repeats until nothing changes. Operations without outputs
/// are kept. Removed entities stay in storage.
pub fn dead_code_elimination(sg: &mut Subgraph) -> Result<DceStats> {
    let mut stats = DceStats::default();

    loop {
        let dead: Vec<OpId> = sg
            .iter_ops()
            .filter(|(_, op)| {
                !op.outputs().is_empty()
                    && op
                        .outputs()
                        .iter()
                        .all(|&t| sg[t].users().is_empty() && !sg.is_output(t))
            })
            .map(|(id, _)| id)
            .collect();
        if dead.is_empty() {
            break;
        }

        for op in dead {
            log::trace!("Removing dead operation {op} ({:?})", sg[op].op_code);
            sg.detach_inputs(op)?;
            sg.detach_outputs(op)?;
            sg.remove_op(op)?;
            stats.removed_ops += 1;
        }
    }

    let orphans: Vec<TensorId> = sg
        .iter_tensors()
        .filter(|&(id, tensor)| {
            tensor.defining_op().is_none()
                && tensor.users().is_empty()
                && !sg.is_input(id)
                && !sg.is_output(id)
        })
        .map(|(id, _)| id)
        .collect();
    for tensor in orphans {
        sg.remove_tensor(tensor)?;
        stats.removed_tensors += 1;
    }

    log::debug!(
        "Dead code elimination removed {} operations and {} tensors",
        stats.removed_ops,
        stats.removed_tensors
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{OpCode, OpOptions};

    #[test]
    fn test_removes_dangling_chain() {
        // x -> relu -> y -> tanh -> z (unused), x -> logistic -> out
        let mut sg = Subgraph::new();
        let x = sg.add_tensor();
        let y = sg.add_tensor();
        let z = sg.add_tensor();
        let out = sg.add_tensor();
        let relu = sg.add_op(OpCode::Relu, OpOptions::None);
        let tanh = sg.add_op(OpCode::Tanh, OpOptions::None);
        let logistic = sg.add_op(OpCode::Logistic, OpOptions::None);
        sg.add_input(relu, x).unwrap();
        sg.add_output(relu, y).unwrap();
        sg.add_input(tanh, y).unwrap();
        sg.add_output(tanh, z).unwrap();
        sg.add_input(logistic, x).unwrap();
        sg.add_output(logistic, out).unwrap();
        sg.mark_input(x).unwrap();
        sg.mark_output(out).unwrap();

        let stats = dead_code_elimination(&mut sg).unwrap();

        assert_eq!(
            stats,
            DceStats {
                removed_ops: 2,
                removed_tensors: 2
            }
        );
        assert_eq!(sg.ops(), &[logistic]);
        assert_eq!(sg.tensors(), &[x, out]);
        assert_eq!(sg[x].users(), &[logistic]);
        assert_eq!(sg[x].user_arg_inds(), &[0]);
        assert!(sg.validate().is_ok());
    }

    #[test]
    fn test_keeps_live_graph_and_orphan_inputs() {
        let mut sg = Subgraph::new();
        let x = sg.add_tensor();
        let unused_input = sg.add_tensor();
        let out = sg.add_tensor();
        let op = sg.add_op(OpCode::Relu, OpOptions::None);
        let sink = sg.add_op(OpCode::Custom, OpOptions::None);
        sg.add_input(op, x).unwrap();
        sg.add_output(op, out).unwrap();
        sg.add_input(sink, x).unwrap();
        sg.mark_input(x).unwrap();
        sg.mark_input(unused_input).unwrap();
        sg.mark_output(out).unwrap();

        let stats = dead_code_elimination(&mut sg).unwrap();

        assert_eq!(stats, DceStats::default());
        assert_eq!(sg.ops(), &[op, sink]);
        assert_eq!(sg.tensors().len(), 3);
    }
}
