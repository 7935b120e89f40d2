//! Uniform-cost search and path reconstruction.
//!
//! Dijkstra over the implicit board graph with unit edge costs. Stale
//! frontier entries are skipped on pop instead of being updated in place.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, debug_span, trace};

use crate::error::{Result, SearchError};
use crate::frontier::CostFrontier;
use crate::puzzle::{Board, Move};

/// Cost of a single slide.
const STEP_COST: u32 = 1;

/// Predecessor and the move that reached a board at its best known cost.
/// Both are `None` for the start.
#[derive(Debug, Clone)]
struct BackLink {
    parent: Option<Board>,
    movement: Option<Move>,
}

/// A minimum-cost path from start to goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Boards from start to goal inclusive.
    pub states: Vec<Board>,
    /// `moves[i]` turns `states[i]` into `states[i + 1]`.
    pub moves: Vec<Move>,
    pub cost: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Solved(Solution),
    /// The start fails the parity check; nothing was expanded.
    Unsolvable,
}

impl Outcome {
    #[must_use]
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Self::Solved(solution) => Some(solution),
            Self::Unsolvable => None,
        }
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        matches!(self, Self::Solved(_))
    }
}

/// Counters for one search call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Boards whose neighbors were generated.
    pub expanded: u64,
    /// Size of the closed set at termination, goal included.
    pub closed: u64,
    /// Popped entries skipped because their board was already closed.
    pub stale_discarded: u64,
    pub frontier_pushes: u64,
    pub frontier_high_water: usize,
}

#[derive(Debug, Clone)]
pub struct SearchReport {
    pub outcome: Outcome,
    pub stats: SearchStats,
    /// Boards in the order they were closed, when requested.
    pub closed_order: Option<Vec<Board>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Keep every closed board in [`SearchReport::closed_order`].
    pub record_closed_order: bool,
}

/// Reusable search entry point. Each call owns all of its working state.
#[derive(Debug, Clone, Default)]
pub struct Searcher {
    options: SearchOptions,
}

impl Searcher {
    #[must_use]
    pub fn new(options: SearchOptions) -> Self {
        Self { options }
    }

    /// Find a minimum-cost move sequence from `start` to `goal`.
    ///
    /// # Errors
    ///
    /// [`SearchError::SizeMismatch`] when the boards differ in side length,
    /// [`SearchError::InvariantViolation`] when the frontier runs dry on an
    /// instance that passed the parity check.
    pub fn solve(&self, start: &Board, goal: &Board) -> Result<SearchReport> {
        if start.size() != goal.size() {
            return Err(SearchError::SizeMismatch {
                start: start.size(),
                goal: goal.size(),
            });
        }

        let span = debug_span!("solve", size = start.size());
        let _guard = span.enter();

        if !start.is_solvable() {
            debug!(inversions = start.inversions(), "start fails parity check");
            return Ok(SearchReport {
                outcome: Outcome::Unsolvable,
                stats: SearchStats::default(),
                closed_order: self.options.record_closed_order.then(Vec::new),
            });
        }

        let mut frontier = CostFrontier::new();
        let mut best_cost: FxHashMap<Board, u32> = FxHashMap::default();
        let mut links: FxHashMap<Board, BackLink> = FxHashMap::default();
        let mut closed: FxHashSet<Board> = FxHashSet::default();
        let mut closed_order = self.options.record_closed_order.then(Vec::new);
        let mut stats = SearchStats::default();

        best_cost.insert(start.clone(), 0);
        links.insert(
            start.clone(),
            BackLink {
                parent: None,
                movement: None,
            },
        );
        frontier.push(0, start.clone());

        while let Some(entry) = frontier.pop() {
            let cost = entry.key.cost;
            let current = entry.board;

            if closed.contains(&current) {
                stats.stale_discarded += 1;
                continue;
            }
            closed.insert(current.clone());
            if let Some(order) = closed_order.as_mut() {
                order.push(current.clone());
            }

            if current == *goal {
                stats.closed = closed.len() as u64;
                stats.frontier_pushes = frontier.pushed();
                stats.frontier_high_water = frontier.high_water();
                let solution = reconstruct_path(&links, goal, cost);
                debug!(
                    cost,
                    expanded = stats.expanded,
                    stale = stats.stale_discarded,
                    "goal closed"
                );
                return Ok(SearchReport {
                    outcome: Outcome::Solved(solution),
                    stats,
                    closed_order,
                });
            }

            stats.expanded += 1;
            trace!(cost, blank = current.blank_index(), "expanding");

            for (movement, next) in current.neighbors() {
                let candidate = cost + STEP_COST;
                let improves = best_cost.get(&next).map_or(true, |&known| candidate < known);
                if !improves {
                    continue;
                }
                best_cost.insert(next.clone(), candidate);
                links.insert(
                    next.clone(),
                    BackLink {
                        parent: Some(current.clone()),
                        movement: Some(movement),
                    },
                );
                frontier.push(candidate, next);
            }
        }

        debug!(expanded = stats.expanded, "frontier exhausted before goal");
        Err(SearchError::InvariantViolation {
            expanded: stats.expanded,
        })
    }
}

/// Solve with default options.
///
/// # Errors
///
/// See [`Searcher::solve`].
pub fn solve(start: &Board, goal: &Board) -> Result<SearchReport> {
    Searcher::default().solve(start, goal)
}

/// Follow back-links from `goal` to the start and return the path in
/// start-to-goal order.
fn reconstruct_path(links: &FxHashMap<Board, BackLink>, goal: &Board, cost: u32) -> Solution {
    let mut states = Vec::new();
    let mut moves = Vec::new();
    let mut cursor = Some(goal);

    while let Some(board) = cursor {
        states.push(board.clone());
        let link = links.get(board);
        if let Some(m) = link.and_then(|l| l.movement) {
            moves.push(m);
        }
        cursor = link.and_then(|l| l.parent.as_ref());
    }

    states.reverse();
    moves.reverse();
    Solution {
        states,
        moves,
        cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(tiles: &[u8]) -> Board {
        Board::from_tiles(tiles).unwrap()
    }

    #[test]
    fn one_tile_off_needs_two_moves() {
        let start = board(&[1, 2, 3, 4, 0, 6, 7, 5, 8]);
        let goal = Board::goal(3).unwrap();

        let report = solve(&start, &goal).unwrap();
        let solution = report.outcome.solution().unwrap();
        assert_eq!(solution.cost, 2);
        assert_eq!(solution.moves, vec![Move::Down, Move::Right]);
        assert_eq!(solution.states.len(), 3);
        assert_eq!(solution.states[0], start);
        assert_eq!(solution.states[2], goal);
    }

    #[test]
    fn start_equal_to_goal_costs_nothing() {
        let goal = Board::goal(3).unwrap();
        let report = solve(&goal, &goal).unwrap();
        let solution = report.outcome.solution().unwrap();

        assert_eq!(solution.cost, 0);
        assert!(solution.moves.is_empty());
        assert_eq!(solution.states, vec![goal]);
        assert_eq!(report.stats.expanded, 0);
        assert_eq!(report.stats.closed, 1);
    }

    #[test]
    fn odd_parity_start_is_unsolvable_without_expanding() {
        let start = board(&[1, 2, 3, 4, 5, 6, 8, 7, 0]);
        let goal = Board::goal(3).unwrap();

        let report = solve(&start, &goal).unwrap();
        assert_eq!(report.outcome, Outcome::Unsolvable);
        assert_eq!(report.stats, SearchStats::default());
    }

    #[test]
    fn mismatched_sizes_are_rejected() {
        let err = solve(&Board::goal(3).unwrap(), &Board::goal(2).unwrap()).unwrap_err();
        assert_eq!(err, SearchError::SizeMismatch { start: 3, goal: 2 });
    }

    #[test]
    fn unreachable_goal_is_reported_as_invariant_violation() {
        // The start passes the parity check, but the goal lies in the other
        // parity class, so the whole reachable half is exhausted.
        let start = Board::goal(2).unwrap();
        let goal = board(&[2, 1, 3, 0]);

        let err = solve(&start, &goal).unwrap_err();
        assert_eq!(err, SearchError::InvariantViolation { expanded: 12 });
    }

    #[test]
    fn closed_order_has_no_repeats() {
        let start = board(&[4, 1, 3, 7, 2, 6, 0, 5, 8]);
        let goal = Board::goal(3).unwrap();
        let searcher = Searcher::new(SearchOptions {
            record_closed_order: true,
        });

        let report = searcher.solve(&start, &goal).unwrap();
        let order = report.closed_order.unwrap();
        let distinct: FxHashSet<&Board> = order.iter().collect();
        assert_eq!(distinct.len(), order.len());
        assert_eq!(order.len() as u64, report.stats.closed);
        assert_eq!(order.first(), Some(&start));
        assert_eq!(order.last(), Some(&goal));
    }

    #[test]
    fn reconstruct_walks_links_back_to_start() {
        let start = Board::goal(3).unwrap();
        let mid = start.apply(Move::Up).unwrap();
        let end = mid.apply(Move::Left).unwrap();

        let mut links = FxHashMap::default();
        links.insert(
            start.clone(),
            BackLink {
                parent: None,
                movement: None,
            },
        );
        links.insert(
            mid.clone(),
            BackLink {
                parent: Some(start.clone()),
                movement: Some(Move::Up),
            },
        );
        links.insert(
            end.clone(),
            BackLink {
                parent: Some(mid.clone()),
                movement: Some(Move::Left),
            },
        );

        let solution = reconstruct_path(&links, &end, 2);
        assert_eq!(solution.states, vec![start, mid, end]);
        assert_eq!(solution.moves, vec![Move::Up, Move::Left]);
    }
}
