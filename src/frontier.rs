//! Min-priority frontier ordered by `(cost, insertion sequence)`.
//!
//! The same board may sit in the heap several times with different costs.
//! The frontier does not deduplicate; callers skip stale entries on pop.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::puzzle::Board;

/// Ordering key. The sequence number only breaks ties between equal costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrontierKey {
    pub cost: u32,
    pub sequence: u64,
}

/// A popped frontier entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub key: FrontierKey,
    pub board: Board,
}

/// `BinaryHeap` is a max-heap, so entries are stored under `Reverse` keys.
#[derive(Debug)]
struct HeapEntry {
    key: Reverse<FrontierKey>,
    board: Board,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Uniform-cost frontier.
///
/// Sequence numbers are unique and increasing, so the key order is total
/// even though boards themselves are unordered.
#[derive(Debug, Default)]
pub struct CostFrontier {
    heap: BinaryHeap<HeapEntry>,
    next_sequence: u64,
    high_water: usize,
}

impl CostFrontier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `board` at `cost`, stamping it with the next sequence number.
    pub fn push(&mut self, cost: u32, board: Board) -> FrontierKey {
        let key = FrontierKey {
            cost,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.heap.push(HeapEntry {
            key: Reverse(key),
            board,
        });
        self.high_water = self.high_water.max(self.heap.len());
        key
    }

    /// Remove the entry with the lowest cost, earliest sequence first.
    #[must_use]
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.heap.pop().map(|e| FrontierEntry {
            key: e.key.0,
            board: e.board,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Largest size the heap has reached.
    #[must_use]
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// Total number of pushes so far.
    #[must_use]
    pub fn pushed(&self) -> u64 {
        self.next_sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Move;

    fn goal() -> Board {
        Board::goal(3).unwrap()
    }

    #[test]
    fn pop_returns_lowest_cost_first() {
        let mut frontier = CostFrontier::new();
        frontier.push(10, goal());
        frontier.push(5, goal());
        frontier.push(15, goal());

        let costs: Vec<u32> = std::iter::from_fn(|| frontier.pop())
            .map(|e| e.key.cost)
            .collect();
        assert_eq!(costs, vec![5, 10, 15]);
    }

    #[test]
    fn equal_costs_pop_in_insertion_order() {
        let mut frontier = CostFrontier::new();
        let start = goal();
        let up = start.apply(Move::Up).unwrap();
        let left = start.apply(Move::Left).unwrap();

        frontier.push(1, up.clone());
        frontier.push(1, left.clone());
        frontier.push(0, start.clone());

        assert_eq!(frontier.pop().unwrap().board, start);
        let a = frontier.pop().unwrap();
        let b = frontier.pop().unwrap();
        assert_eq!((a.board, a.key.sequence), (up, 0));
        assert_eq!((b.board, b.key.sequence), (left, 1));
    }

    #[test]
    fn duplicate_boards_coexist() {
        let mut frontier = CostFrontier::new();
        frontier.push(4, goal());
        frontier.push(2, goal());
        assert_eq!(frontier.len(), 2);

        assert_eq!(frontier.pop().unwrap().key.cost, 2);
        assert_eq!(frontier.pop().unwrap().key.cost, 4);
        assert!(frontier.pop().is_none());
    }

    #[test]
    fn empty_pop_is_none() {
        let mut frontier = CostFrontier::new();
        assert!(frontier.is_empty());
        assert!(frontier.pop().is_none());
    }

    #[test]
    fn high_water_and_push_count_survive_pops() {
        let mut frontier = CostFrontier::new();
        frontier.push(1, goal());
        frontier.push(2, goal());
        frontier.push(3, goal());
        let _ = frontier.pop();
        let _ = frontier.pop();

        assert_eq!(frontier.high_water(), 3, "high water should not decrease on pop");
        assert_eq!(frontier.pushed(), 3);
        assert_eq!(frontier.len(), 1);
    }
}
