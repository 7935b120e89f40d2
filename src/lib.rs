//! Optimal sliding-tile puzzle solver.
//!
//! Uniform-cost search over the implicit graph of board configurations,
//! guarded by an inversion-parity solvability check.
//!
//! # Key types
//!
//! - [`Board`]: immutable, structurally hashed configuration
//! - [`Move`]: direction the blank travels
//! - [`CostFrontier`]: min-heap keyed by `(cost, sequence)`
//! - [`Searcher`]: search driver returning a [`SearchReport`]

#![forbid(unsafe_code)]

pub mod cli;
pub mod error;
pub mod frontier;
pub mod puzzle;
pub mod search;

pub use error::{Result, SearchError};
pub use frontier::{CostFrontier, FrontierEntry, FrontierKey};
pub use puzzle::{Board, Move, BLANK};
pub use search::{solve, Outcome, SearchOptions, SearchReport, SearchStats, Searcher, Solution};
