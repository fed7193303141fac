//! The board: piece placement, pushing, capture resolution, and the win check.
//!
//! The board has no notion of whose turn it is. It only knows which cells
//! hold which colour and how many pieces each colour still has in reserve.

use std::fmt;

use crate::lines::{lines, ray};
use crate::{entry_directions, BoardError, Coord, Direction, Line, GRID_LETTERS};

/// Pieces each colour starts with in reserve.
pub const INITIAL_RESERVE: u8 = 15;

/// A capture needs at least this many same-coloured pieces in a row.
pub const CAPTURE_RUN: usize = 4;

/// A player's colour. The discriminants are the wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Color {
    White = 1,
    Black = 2,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    pub fn to_wire(self) -> i8 {
        self as i8
    }
}

impl TryFrom<i8> for Color {
    type Error = BoardError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::White),
            2 => Ok(Self::Black),
            _ => Err(BoardError::InvalidColor(value)),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "white"),
            Self::Black => write!(f, "black"),
        }
    }
}

/// What a successful [`Board::resolve_captures`] removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    /// The line the capture happened on.
    pub line: &'static Line,
    /// Every cell that was emptied, with the colour it held.
    pub removed: Vec<(Coord, Color)>,
    /// How many of the removed pieces went back to the capturer's reserve.
    pub returned: u8,
}

/// Cell contents plus both reserves.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Color>; GRID_LETTERS as usize]; GRID_LETTERS as usize],
    reserve_white: u8,
    reserve_black: u8,
}

impl Board {
    /// The standard opening position: three pieces of each colour on
    /// alternating corners of the playing area, 15 in each reserve.
    pub fn new() -> Self {
        let layout = [
            ((1, 1), Color::Black),
            ((1, 4), Color::White),
            ((4, 1), Color::White),
            ((4, 7), Color::Black),
            ((7, 1), Color::Black),
            ((7, 4), Color::White),
        ];
        let mut board = Self::empty(INITIAL_RESERVE, INITIAL_RESERVE);
        for ((letter, number), color) in layout {
            if let Some(cell) = Coord::new(letter, number) {
                board.set(cell, Some(color));
            }
        }
        board
    }

    /// Builds an arbitrary position. Pieces placed on perimeter points are
    /// ignored; only playing cells hold pieces between moves.
    pub fn with_layout(
        pieces: &[(Coord, Color)],
        reserve_white: u8,
        reserve_black: u8,
    ) -> Self {
        let mut board = Self::empty(reserve_white, reserve_black);
        for &(cell, color) in pieces {
            if cell.is_interior() {
                board.set(cell, Some(color));
            }
        }
        board
    }

    fn empty(reserve_white: u8, reserve_black: u8) -> Self {
        Self {
            cells: [[None; GRID_LETTERS as usize]; GRID_LETTERS as usize],
            reserve_white,
            reserve_black,
        }
    }

    /// The colour at `cell`, or `None` when it is empty.
    pub fn get(&self, cell: Coord) -> Option<Color> {
        self.cells[cell.letter() as usize][cell.number() as usize]
    }

    fn set(&mut self, cell: Coord, value: Option<Color>) {
        self.cells[cell.letter() as usize][cell.number() as usize] = value;
    }

    /// Pieces `color` may still place.
    pub fn reserve(&self, color: Color) -> u8 {
        match color {
            Color::White => self.reserve_white,
            Color::Black => self.reserve_black,
        }
    }

    fn reserve_mut(&mut self, color: Color) -> &mut u8 {
        match color {
            Color::White => &mut self.reserve_white,
            Color::Black => &mut self.reserve_black,
        }
    }

    /// Every occupied cell with its colour.
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Color)> + '_ {
        Coord::all().filter_map(|c| self.get(c).map(|color| (c, color)))
    }

    /// Number of pieces of `color` on the board.
    pub fn count(&self, color: Color) -> usize {
        self.pieces().filter(|&(_, c)| c == color).count()
    }

    /// Directions a new piece may be introduced from at `cell`.
    pub fn entry_directions(&self, cell: Coord) -> &'static [Direction] {
        entry_directions(cell)
    }

    /// `true` if walking from `origin` in `direction` reaches an empty
    /// playing cell before leaving the board.
    pub fn can_place_and_push(&self, origin: Coord, direction: Direction) -> bool {
        ray(origin, direction).any(|c| self.get(c).is_none())
    }

    /// Introduces a piece of `color` at the perimeter point `origin` and
    /// slides it one step in `direction`, pushing the occupied run ahead of
    /// it along by one cell.
    ///
    /// The chain stops at the first empty cell. If it instead runs off the
    /// far edge, the trailing piece leaves play without returning to any
    /// reserve.
    ///
    /// # Errors
    /// Any [`BoardError`] leaves the board unchanged.
    pub fn place_and_push(
        &mut self,
        origin: Coord,
        direction: Direction,
        color: Color,
    ) -> Result<(), BoardError> {
        if !origin.is_perimeter() {
            return Err(BoardError::NotAnEntryPoint(origin));
        }
        if !entry_directions(origin).contains(&direction) {
            return Err(BoardError::IllegalEntryDirection(origin, direction));
        }
        if self.reserve(color) == 0 {
            return Err(BoardError::ReserveExhausted(color));
        }
        if !self.can_place_and_push(origin, direction) {
            return Err(BoardError::LineFull(origin, direction));
        }

        *self.reserve_mut(color) -= 1;

        let mut carried = Some(color);
        for cell in ray(origin, direction) {
            let displaced = self.get(cell);
            self.set(cell, carried);
            if displaced.is_none() {
                return Ok(());
            }
            carried = displaced;
        }
        // Walked off the board with a piece still in hand; it is lost.
        Ok(())
    }

    /// Finds every line holding a run of at least four same-coloured
    /// pieces and, if there is exactly one, removes the whole contiguous
    /// occupied span around that run.
    ///
    /// Removed pieces of `capturing` go back to its reserve; pieces of the
    /// other colour are out of the game. With zero or several qualifying
    /// lines nothing happens.
    pub fn resolve_captures(&mut self, capturing: Color) -> Option<Capture> {
        let mut candidates: Vec<_> = lines()
            .iter()
            .filter_map(|line| self.capture_span(line).map(|span| (line, span)))
            .collect();

        if candidates.len() != 1 {
            return None;
        }
        let (line, span) = candidates.pop()?;

        let mut removed = Vec::with_capacity(span.len());
        let mut returned = 0;
        for &cell in &line.cells()[span] {
            if let Some(color) = self.get(cell) {
                if color == capturing {
                    *self.reserve_mut(color) += 1;
                    returned += 1;
                }
                removed.push((cell, color));
                self.set(cell, None);
            }
        }
        Some(Capture {
            line,
            removed,
            returned,
        })
    }

    /// The index range of `line` that would be captured, if any: the first
    /// run of [`CAPTURE_RUN`] or more same-coloured pieces, widened over any
    /// adjacent pieces of either colour.
    fn capture_span(&self, line: &Line) -> Option<std::ops::Range<usize>> {
        let colors: Vec<Option<Color>> = line.cells().iter().map(|&c| self.get(c)).collect();

        let mut run_start = 0;
        let mut found = None;
        for i in 1..=colors.len() {
            let run_over = i == colors.len() || colors[i] != colors[run_start];
            if run_over {
                if colors[run_start].is_some() && i - run_start >= CAPTURE_RUN {
                    found = Some(run_start..i);
                    break;
                }
                run_start = i;
            }
        }
        let run = found?;

        let mut start = run.start;
        while start > 0 && colors[start - 1].is_some() {
            start -= 1;
        }
        let mut end = run.end;
        while end < colors.len() && colors[end].is_some() {
            end += 1;
        }
        Some(start..end)
    }

    /// White wins once Black's reserve is empty, and vice versa. Black's
    /// condition is checked first.
    pub fn check_winner(&self) -> Option<Color> {
        if self.reserve_white == 0 {
            Some(Color::Black)
        } else if self.reserve_black == 0 {
            Some(Color::White)
        } else {
            None
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {{ white: {}, black: {} }}",
            self.reserve_white, self.reserve_black
        )?;
        for letter in 1..GRID_LETTERS - 1 {
            let row: String = Coord::interior()
                .filter(|c| c.letter() == letter)
                .map(|c| match self.get(c) {
                    Some(Color::White) => 'W',
                    Some(Color::Black) => 'B',
                    None => '.',
                })
                .collect();
            writeln!(f, "  {letter}: {row}")?;
        }
        Ok(())
    }
}
