//! Board representation, legal moves and the solvability parity check.

use rand::{seq::SliceRandom, Rng};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SearchError};

/// Value stored in the blank cell.
pub const BLANK: u8 = 0;

/// Largest supported side length; tiles must fit in a `u8`.
pub const MAX_SIZE: usize = 16;

/// Direction the blank travels. Equivalently, the tile on that side of the
/// blank slides into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Expansion order used by [`Board::neighbors`].
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// `(row, column)` displacement of the blank.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Move::Up => 'U',
            Move::Down => 'D',
            Move::Left => 'L',
            Move::Right => 'R',
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// An immutable N×N configuration stored row-major.
///
/// Equality and hashing are structural over the tiles, so the same
/// arrangement reached along different paths is the same search node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    tiles: Box<[u8]>,
    blank: usize,
}

impl Board {
    /// Build a board of side `size` from row-major `tiles`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidConfiguration`] unless `tiles` is a
    /// permutation of `0..size*size` with `2 <= size <= MAX_SIZE`.
    pub fn new(size: usize, tiles: Vec<u8>) -> Result<Self> {
        check_size(size)?;
        let cells = size * size;
        if tiles.len() != cells {
            return Err(SearchError::invalid(format!(
                "expected {cells} tiles for a {size}x{size} board, got {}",
                tiles.len()
            )));
        }

        let mut seen = vec![false; cells];
        for &tile in &tiles {
            let slot = seen.get_mut(tile as usize).ok_or_else(|| {
                SearchError::invalid(format!("tile {tile} outside 0..{cells}"))
            })?;
            if *slot {
                let what = if tile == BLANK {
                    "more than one blank".to_string()
                } else {
                    format!("tile {tile} appears twice")
                };
                return Err(SearchError::invalid(what));
            }
            *slot = true;
        }

        // A full permutation always contains exactly one blank.
        let blank = tiles
            .iter()
            .position(|&t| t == BLANK)
            .ok_or_else(|| SearchError::invalid("no blank"))?;

        Ok(Self {
            size,
            tiles: tiles.into_boxed_slice(),
            blank,
        })
    }

    /// Build a square board, inferring the side length from the tile count.
    ///
    /// # Errors
    ///
    /// Fails when the count is not a perfect square or the tiles are not a
    /// valid permutation.
    pub fn from_tiles(tiles: &[u8]) -> Result<Self> {
        let size = (1..=MAX_SIZE)
            .find(|n| n * n == tiles.len())
            .ok_or_else(|| {
                SearchError::invalid(format!("{} tiles do not form a square grid", tiles.len()))
            })?;
        Self::new(size, tiles.to_vec())
    }

    /// The standard goal: `1, 2, …, N²−1` followed by the blank.
    ///
    /// # Errors
    ///
    /// Fails when `size` is outside the supported range.
    pub fn goal(size: usize) -> Result<Self> {
        check_size(size)?;
        let cells = size * size;
        let tiles = (1..cells)
            .map(|v| u8::try_from(v).unwrap_or(u8::MAX))
            .chain(std::iter::once(BLANK))
            .collect();
        Self::new(size, tiles)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    pub fn blank_index(&self) -> usize {
        self.blank
    }

    pub fn index_to_coord(&self, index: usize) -> (usize, usize) {
        (index / self.size, index % self.size)
    }

    pub fn coord_to_index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Board after sliding in direction `movement`, or `None` when the blank
    /// already sits on that edge.
    pub fn apply(&self, movement: Move) -> Option<Self> {
        let (row, col) = self.index_to_coord(self.blank);
        let (dr, dc) = movement.as_offset();

        let new_row = row.checked_add_signed(dr)?;
        let new_col = col.checked_add_signed(dc)?;
        if new_row >= self.size || new_col >= self.size {
            return None;
        }

        let target = self.coord_to_index(new_row, new_col);
        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, target);

        Some(Self {
            size: self.size,
            tiles,
            blank: target,
        })
    }

    /// Every board one legal slide away, in [`Move::ALL`] order.
    pub fn neighbors(&self) -> impl Iterator<Item = (Move, Board)> + '_ {
        Move::ALL
            .into_iter()
            .filter_map(move |m| self.apply(m).map(|next| (m, next)))
    }

    /// Pairs of non-blank tiles out of row-major order.
    pub fn inversions(&self) -> usize {
        Self::count_inversions(&self.tiles)
    }

    /// Parity test against the standard goal ordering.
    ///
    /// Odd sides need an even inversion count. Even sides need
    /// `inversions + blank row` to be odd.
    pub fn is_solvable(&self) -> bool {
        let inversions = self.inversions();

        if self.size % 2 == 1 {
            inversions % 2 == 0
        } else {
            let (blank_row, _) = self.index_to_coord(self.blank);
            (inversions + blank_row) % 2 == 1
        }
    }

    fn count_inversions(tiles: &[u8]) -> usize {
        let placed: Vec<u8> = tiles.iter().copied().filter(|&t| t != BLANK).collect();
        placed
            .iter()
            .enumerate()
            .map(|(i, &val)| placed[i + 1..].iter().filter(|&&next| next < val).count())
            .sum()
    }

    /// Uniformly shuffled board of side `size`, redrawn until solvable.
    ///
    /// # Errors
    ///
    /// Fails when `size` is outside the supported range.
    pub fn random_solvable<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self> {
        let mut tiles = Self::goal(size)?.tiles.into_vec();

        loop {
            tiles.shuffle(rng);
            let board = Self::new(size, tiles.clone())?;
            if board.is_solvable() {
                return Ok(board);
            }
        }
    }

    /// Walk `steps` random legal moves, never undoing the previous move.
    ///
    /// The result is at most `steps` moves from `self`.
    pub fn random_walk<R: Rng + ?Sized>(&self, steps: usize, rng: &mut R) -> Self {
        let mut board = self.clone();
        let mut last: Option<Move> = None;

        for _ in 0..steps {
            let options: Vec<(Move, Board)> = board
                .neighbors()
                .filter(|(m, _)| last.map_or(true, |l| *m != l.opposite()))
                .collect();
            let Some((m, next)) = options.choose(rng).cloned() else {
                break;
            };
            last = Some(m);
            board = next;
        }

        board
    }
}

/// Rejects side lengths before anything is sized from them.
fn check_size(size: usize) -> Result<()> {
    if (2..=MAX_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(SearchError::invalid(format!(
            "side length {size} outside 2..={MAX_SIZE}"
        )))
    }
}

impl FromStr for Board {
    type Err = SearchError;

    /// Parse tiles separated by commas and/or whitespace, e.g. `1,2,3,4,0,6,7,5,8`.
    fn from_str(s: &str) -> Result<Self> {
        let tiles = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| {
                if part == "_" {
                    return Ok(BLANK);
                }
                part.parse::<u8>()
                    .map_err(|_| SearchError::invalid(format!("`{part}` is not a tile number")))
            })
            .collect::<Result<Vec<u8>>>()?;
        Self::from_tiles(&tiles)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.tiles.len() - 1).to_string().len();
        for row in self.tiles.chunks(self.size) {
            for (col, &val) in row.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                if val == BLANK {
                    write!(f, "{:>width$}", "_")?;
                } else {
                    write!(f, "{val:>width$}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
