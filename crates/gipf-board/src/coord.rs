//! Board geometry: coordinates, directions, and the entry table.
//!
//! The board is a hexagon of 61 points laid out in 9 columns ("letters").
//! Column `letter` holds `9 - |letter - 4|` points, numbered from 0.
//!
//! ```text
//!   letter:  0  1  2  3  4  5  6  7  8
//!   points:  5  6  7  8  9  8  7  6  5
//! ```
//!
//! The outer ring of 24 points is the *perimeter*: pieces are placed there
//! and immediately pushed inward. The 37 points inside it are the playing
//! cells, the only ones that ever hold a piece between moves.

use std::fmt;

use crate::BoardError;

/// Number of columns in the grid.
pub const GRID_LETTERS: u8 = 9;

/// Index of the central column.
const CENTER: u8 = 4;

/// A point on the 61-point grid, identified by column (`letter`) and
/// position within the column (`number`).
///
/// A `Coord` can only be built through [`Coord::new`], so every value in
/// circulation is inside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    letter: u8,
    number: u8,
}

impl Coord {
    /// Returns the coordinate if `(letter, number)` lies on the grid.
    pub const fn new(letter: u8, number: u8) -> Option<Self> {
        if letter >= GRID_LETTERS {
            return None;
        }
        if number > column_max(letter) {
            return None;
        }
        Some(Self { letter, number })
    }

    /// Converts the signed pair carried by wire messages.
    ///
    /// # Errors
    /// Returns [`BoardError::InvalidCoordinate`] for negative values or
    /// points off the grid.
    pub fn from_wire(letter: i8, number: i8) -> Result<Self, BoardError> {
        let invalid = BoardError::InvalidCoordinate { letter, number };
        let l = u8::try_from(letter).map_err(|_| invalid.clone())?;
        let n = u8::try_from(number).map_err(|_| invalid.clone())?;
        Self::new(l, n).ok_or(invalid)
    }

    /// Column index, 0..=8.
    pub fn letter(self) -> u8 {
        self.letter
    }

    /// Position within the column.
    pub fn number(self) -> u8 {
        self.number
    }

    /// Wire representation `(letter, number)`.
    pub fn to_wire(self) -> (i8, i8) {
        // Both components are at most 8.
        (self.letter as i8, self.number as i8)
    }

    /// `true` for the 37 playing cells.
    pub fn is_interior(self) -> bool {
        (1..GRID_LETTERS - 1).contains(&self.letter)
            && self.number >= 1
            && self.number < column_max(self.letter)
    }

    /// `true` for the 24 entry points on the outer ring.
    pub fn is_perimeter(self) -> bool {
        !self.is_interior()
    }

    /// The neighbouring grid point in `direction`, or `None` if the step
    /// leaves the grid.
    ///
    /// The two halves of the hexagon use different offsets: moving
    /// "diagonally" towards the centre column keeps `number`, moving away
    /// from it shifts `number` by one.
    pub fn next(self, direction: Direction) -> Option<Self> {
        let l = i16::from(self.letter);
        let n = i16::from(self.number);
        let c = i16::from(CENTER);
        let (nl, nn) = match direction {
            Direction::North => (l, n + 1),
            Direction::NorthEast if l < c => (l + 1, n + 1),
            Direction::NorthEast => (l + 1, n),
            Direction::SouthEast if l < c => (l + 1, n),
            Direction::SouthEast => (l + 1, n - 1),
            Direction::South => (l, n - 1),
            Direction::SouthWest if l <= c => (l - 1, n - 1),
            Direction::SouthWest => (l - 1, n),
            Direction::NorthWest if l <= c => (l - 1, n),
            Direction::NorthWest => (l - 1, n + 1),
        };
        let nl = u8::try_from(nl).ok()?;
        let nn = u8::try_from(nn).ok()?;
        Self::new(nl, nn)
    }

    /// Iterates over every point of the grid, column by column.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..GRID_LETTERS).flat_map(|letter| {
            (0..=column_max(letter)).map(move |number| Coord { letter, number })
        })
    }

    /// Iterates over the 24 perimeter points.
    pub fn perimeter() -> impl Iterator<Item = Coord> {
        Self::all().filter(|c| c.is_perimeter())
    }

    /// Iterates over the 37 playing cells.
    pub fn interior() -> impl Iterator<Item = Coord> {
        Self::all().filter(|c| c.is_interior())
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.letter, self.number)
    }
}

/// Largest `number` in a column.
const fn column_max(letter: u8) -> u8 {
    let offset = if letter > CENTER {
        letter - CENTER
    } else {
        CENTER - letter
    };
    2 * CENTER - offset
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// One of the six axial directions, numbered 1 through 6 clockwise:
///
/// ```text
///            1
///        6   |   2
///          >-o-<
///        5   |   3
///            4
/// ```
///
/// `d` and `d + 3 (mod 6)` are opposites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Direction {
    North = 1,
    NorthEast = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    NorthWest = 6,
}

impl Direction {
    /// All six directions in wire order.
    pub const ALL: [Direction; 6] = [
        Direction::North,
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    /// The wire value, 1..=6.
    pub fn to_wire(self) -> i8 {
        self as i8
    }

    pub fn opposite(self) -> Self {
        Self::ALL[(self.index() + 3) % 6]
    }

    fn index(self) -> usize {
        (self as i8 - 1) as usize
    }
}

impl TryFrom<i8> for Direction {
    type Error = BoardError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1..=6 => Ok(Self::ALL[(value - 1) as usize]),
            _ => Err(BoardError::InvalidDirection(value)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wire())
    }
}

// ---------------------------------------------------------------------------
// Entry table
// ---------------------------------------------------------------------------

use Direction::{
    North as N, NorthEast as NE, NorthWest as NW, South as S, SouthEast as SE, SouthWest as SW,
};

/// Inward directions for every perimeter point, keyed by `(letter, number)`.
/// Corners admit one direction, every other perimeter point two.
const ENTRY_TABLE: [((u8, u8), &[Direction]); 24] = [
    ((0, 0), &[NE]),
    ((1, 0), &[N, NE]),
    ((2, 0), &[N, NE]),
    ((3, 0), &[N, NE]),
    ((4, 0), &[N]),
    ((5, 0), &[NW, N]),
    ((6, 0), &[NW, N]),
    ((7, 0), &[NW, N]),
    ((8, 0), &[NW]),
    ((8, 1), &[SW, NW]),
    ((8, 2), &[SW, NW]),
    ((8, 3), &[SW, NW]),
    ((8, 4), &[SW]),
    ((7, 5), &[S, SW]),
    ((6, 6), &[S, SW]),
    ((5, 7), &[S, SW]),
    ((4, 8), &[S]),
    ((3, 7), &[SE, S]),
    ((2, 6), &[SE, S]),
    ((1, 5), &[SE, S]),
    ((0, 4), &[SE]),
    ((0, 3), &[NE, SE]),
    ((0, 2), &[NE, SE]),
    ((0, 1), &[NE, SE]),
];

/// Directions in which a new piece may be introduced at `cell`.
///
/// Only perimeter points have entries; interior cells yield an empty
/// slice.
pub fn entry_directions(cell: Coord) -> &'static [Direction] {
    ENTRY_TABLE
        .iter()
        .find(|((l, n), _)| *l == cell.letter && *n == cell.number)
        .map(|(_, dirs)| *dirs)
        .unwrap_or(&[])
}
