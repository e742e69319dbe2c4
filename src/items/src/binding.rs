//! Binding Table: item pickups that complete puzzle steps

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use world::{ItemId, PuzzleId};

/// Target of a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepBinding {
    pub puzzle: PuzzleId,
    pub step: usize,
}

/// Item id → puzzle step. Each item has at most one binding; several items
/// may point at steps of the same puzzle.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    entries: HashMap<ItemId, StepBinding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; returns the binding that was replaced
    pub fn bind(&mut self, item: ItemId, puzzle: PuzzleId, step: usize) -> Option<StepBinding> {
        self.entries.insert(item, StepBinding { puzzle, step })
    }

    pub fn unbind(&mut self, item: ItemId) -> Option<StepBinding> {
        self.entries.remove(&item)
    }

    pub fn get(&self, item: ItemId) -> Option<StepBinding> {
        self.entries.get(&item).copied()
    }

    /// Items bound to steps of `puzzle`, ordered by step
    pub fn bindings_for(&self, puzzle: PuzzleId) -> Vec<(ItemId, usize)> {
        let mut bound: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, binding)| binding.puzzle == puzzle)
            .map(|(item, binding)| (*item, binding.step))
            .collect();
        bound.sort_by_key(|(item, step)| (*step, *item));
        bound
    }

    /// Entries in ascending item order
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, StepBinding)> + '_ {
        let mut entries: Vec<_> = self.entries.iter().map(|(item, binding)| (*item, *binding)).collect();
        entries.sort_by_key(|(item, _)| *item);
        entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_overwrites_and_reports_previous() {
        let mut table = BindingTable::new();
        assert_eq!(table.bind(ItemId(1), PuzzleId(7), 0), None);
        assert_eq!(
            table.bind(ItemId(1), PuzzleId(8), 2),
            Some(StepBinding { puzzle: PuzzleId(7), step: 0 })
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(ItemId(1)), Some(StepBinding { puzzle: PuzzleId(8), step: 2 }));
    }

    #[test]
    fn many_items_to_one_puzzle() {
        let mut table = BindingTable::new();
        table.bind(ItemId(3), PuzzleId(1), 1);
        table.bind(ItemId(2), PuzzleId(1), 0);
        table.bind(ItemId(9), PuzzleId(4), 0);

        assert_eq!(table.bindings_for(PuzzleId(1)), vec![(ItemId(2), 0), (ItemId(3), 1)]);
        assert!(table.bindings_for(PuzzleId(99)).is_empty());
        assert_eq!(table.iter().map(|(item, _)| item).collect::<Vec<_>>(), vec![ItemId(2), ItemId(3), ItemId(9)]);
    }

    #[test]
    fn unbind_unknown_is_none() {
        let mut table = BindingTable::new();
        assert_eq!(table.unbind(ItemId(5)), None);
        assert!(table.get(ItemId(5)).is_none());
        assert!(table.is_empty());
    }
}
