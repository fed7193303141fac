//! The fixed set of straight lines used for capture detection.

use std::sync::LazyLock;

use crate::{Coord, Direction};

/// The three axes; every line runs along one of them.
const AXES: [Direction; 3] = [Direction::North, Direction::NorthEast, Direction::SouthEast];

/// A maximal straight run of playing cells across the hexagon.
///
/// Described by the perimeter point it starts from and its direction;
/// `cells` lists the interior cells in walking order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    start: Coord,
    direction: Direction,
    cells: Vec<Coord>,
}

impl Line {
    /// The perimeter point the line is walked from.
    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The playing cells covered, in order.
    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }
}

static LINES: LazyLock<Vec<Line>> = LazyLock::new(build_lines);

/// All 21 lines (7 per axis), computed on first use.
pub fn lines() -> &'static [Line] {
    &LINES
}

fn build_lines() -> Vec<Line> {
    let mut lines = Vec::new();
    for direction in AXES {
        for start in Coord::perimeter() {
            let cells = ray(start, direction).collect::<Vec<_>>();
            if !cells.is_empty() {
                lines.push(Line {
                    start,
                    direction,
                    cells,
                });
            }
        }
    }
    lines
}

/// Walks from `origin` (exclusive) in `direction`, yielding playing cells
/// until the walk leaves the interior.
pub(crate) fn ray(origin: Coord, direction: Direction) -> impl Iterator<Item = Coord> {
    std::iter::successors(origin.next(direction), move |c| c.next(direction))
        .take_while(|c| c.is_interior())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seven_lines_per_axis() {
        assert_eq!(lines().len(), 21);
        for axis in AXES {
            let count = lines().iter().filter(|l| l.direction() == axis).count();
            assert_eq!(count, 7, "{axis}");
        }
    }

    #[test]
    fn test_line_lengths_span_four_to_seven() {
        let mut lengths: Vec<usize> = lines()
            .iter()
            .filter(|l| l.direction() == Direction::North)
            .map(|l| l.cells().len())
            .collect();
        lengths.sort_unstable();
        assert_eq!(lengths, vec![4, 4, 5, 5, 6, 6, 7]);
    }

    #[test]
    fn test_every_interior_cell_is_on_one_line_per_axis() {
        for cell in Coord::interior() {
            for axis in AXES {
                let hits = lines()
                    .iter()
                    .filter(|l| l.direction() == axis && l.cells().contains(&cell))
                    .count();
                assert_eq!(hits, 1, "{cell} on axis {axis}");
            }
        }
    }

    #[test]
    fn test_ray_from_corner_runs_through_the_centre() {
        let corner = Coord::new(0, 0).unwrap();
        let cells: Vec<_> = ray(corner, Direction::NorthEast).collect();
        assert_eq!(cells.len(), 7);
        assert_eq!(cells[3], Coord::new(4, 4).unwrap());
    }
}
