//! OpList - worklist of operations selected during a pass.

use std::collections::LinkedList;

use super::arena::OpId;

/// An ordered selection of operations.
///
/// Elements live in individually allocated nodes, so pushing never moves
/// previously pushed entries. [`to_vec`](Self::to_vec) hands out an
/// independent snapshot.
#[derive(Debug, Clone, Default)]
pub struct OpList {
    ops: LinkedList<OpId>,
}

impl OpList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `op`. Duplicates are kept.
    pub fn push(&mut self, op: OpId) {
        self.ops.push_back(op);
    }

    /// Returns the selected operations in push order.
    pub fn to_vec(&self) -> Vec<OpId> {
        let mut res = Vec::with_capacity(self.ops.len());
        res.extend(self.ops.iter().copied());
        res
    }

    pub fn iter(&self) -> impl Iterator<Item = OpId> + '_ {
        self.ops.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl FromIterator<OpId> for OpList {
    fn from_iter<I: IntoIterator<Item = OpId>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl Extend<OpId> for OpList {
    fn extend<I: IntoIterator<Item = OpId>>(&mut self, iter: I) {
        self.ops.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::arena::ArenaId;

    #[test]
    fn test_push_order_and_duplicates() {
        let mut list = OpList::new();
        let ids: Vec<OpId> = [3, 1, 3, 0].into_iter().map(OpId::from_index).collect();
        for &id in &ids {
            list.push(id);
        }

        assert_eq!(list.len(), 4);
        assert_eq!(list.to_vec(), ids);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut list = OpList::new();
        list.push(OpId::from_index(0));
        list.push(OpId::from_index(1));

        let snapshot = list.to_vec();
        for i in 2..100 {
            list.push(OpId::from_index(i));
        }

        assert_eq!(snapshot, vec![OpId::from_index(0), OpId::from_index(1)]);
        assert_eq!(list.len(), 100);
        assert_eq!(list.to_vec()[99], OpId::from_index(99));
    }

    #[test]
    fn test_collect() {
        let list: OpList = (0..3).map(OpId::from_index).collect();
        assert_eq!(list.iter().count(), 3);
        assert!(!list.is_empty());
    }
}
