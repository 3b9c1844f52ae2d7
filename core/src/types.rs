use ndarray::Array2;

/// Single coordinate axis used for board sides and positions.
pub type Coord = u8;

/// Count type used for visited-cell and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Whether `b` is reachable from `a` with a single knight move.
pub const fn is_knight_step(a: Coord2, b: Coord2) -> bool {
    let dr = a.0.abs_diff(b.0);
    let dc = a.1.abs_diff(b.1);
    (dr == 1 && dc == 2) || (dr == 2 && dc == 1)
}

pub trait KnightMoveIterExt {
    fn iter_knight_moves(&self, index: Coord2) -> KnightMoveIter;
}

impl<T> KnightMoveIterExt for Array2<T> {
    fn iter_knight_moves(&self, index: Coord2) -> KnightMoveIter {
        let (rows, cols) = self.dim();
        let bounds = (
            Coord::try_from(rows).unwrap_or(Coord::MAX),
            Coord::try_from(cols).unwrap_or(Coord::MAX),
        );
        KnightMoveIter::new(index, bounds)
    }
}

const KNIGHT_DISPLACEMENTS: [(isize, isize); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let (row, col) = coords;
    let (dr, dc) = delta;
    let (max_row, max_col) = bounds;

    let next_row = row.checked_add_signed(dr.try_into().ok()?)?;
    if next_row >= max_row {
        return None;
    }

    let next_col = col.checked_add_signed(dc.try_into().ok()?)?;
    if next_col >= max_col {
        return None;
    }

    Some((next_row, next_col))
}

/// In-bounds knight destinations from `center`, in a fixed order.
#[derive(Debug)]
pub struct KnightMoveIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl KnightMoveIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for KnightMoveIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = KNIGHT_DISPLACEMENTS.get(usize::from(self.index)) {
            self.index += 1;
            if let Some(target) = apply_delta(self.center, delta, self.bounds) {
                return Some(target);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_has_two_knight_moves() {
        let moves: Vec<_> = KnightMoveIter::new((0, 0), (5, 5)).collect();
        assert_eq!(moves, vec![(1, 2), (2, 1)]);
    }

    #[test]
    fn center_of_large_board_has_all_eight() {
        let moves: Vec<_> = KnightMoveIter::new((3, 3), (8, 8)).collect();
        assert_eq!(moves.len(), 8);
        assert!(moves.iter().all(|&m| is_knight_step((3, 3), m)));
    }

    #[test]
    fn center_of_three_by_three_is_isolated() {
        assert_eq!(KnightMoveIter::new((1, 1), (3, 3)).count(), 0);
    }

    #[test]
    fn knight_step_rejects_other_shapes() {
        assert!(is_knight_step((2, 2), (0, 1)));
        assert!(!is_knight_step((2, 2), (2, 2)));
        assert!(!is_knight_step((2, 2), (3, 3)));
        assert!(!is_knight_step((2, 2), (0, 0)));
    }
}
