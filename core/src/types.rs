/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for hazard counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Maps `(x, y)` onto the `[row, column]` index of a `height × width` grid.
///
/// Grids are stored row-major, so the flat offset of a position is `y * width + x`.
pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.1.into(), self.0.into()]
    }
}

/// Shape of a `height × width` grid for a board of `size`.
pub fn grid_shape((width, height): Coord2) -> [usize; 2] {
    [height.into(), width.into()]
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Whether `coords` lies inside a board of `size`.
pub const fn in_bounds(coords: Coord2, size: Coord2) -> bool {
    coords.0 < size.0 && coords.1 < size.1
}

/// Iterates every position of a board of `size` in row-major order.
pub fn iter_positions((width, height): Coord2) -> impl Iterator<Item = Coord2> {
    (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
}

/// `[c - 1, c + 1]` clipped to `0..len`.
const fn clipped_span(c: Coord, len: Coord) -> (Coord, Coord) {
    let last = len.saturating_sub(1);
    let high = c.saturating_add(1);
    (c.saturating_sub(1), if high < last { high } else { last })
}

/// Positions at Chebyshev distance 1 from `center`, clipped to `bounds`.
///
/// Walks the clipped 3x3 window row by row and skips the center, so the order is fixed: NW, N, NE, W, E, SW,
/// S, SE. Nothing is allocated. An out-of-bounds center has no neighbors.
#[derive(Clone, Debug)]
pub struct NeighborIter {
    center: Coord2,
    min_x: Coord,
    max_x: Coord,
    max_y: Coord,
    cursor: Option<Coord2>,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        let (min_x, max_x) = clipped_span(center.0, bounds.0);
        let (min_y, max_y) = clipped_span(center.1, bounds.1);
        Self {
            center,
            min_x,
            max_x,
            max_y,
            cursor: in_bounds(center, bounds).then_some((min_x, min_y)),
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (x, y) = self.cursor?;
            self.cursor = if x < self.max_x {
                Some((x + 1, y))
            } else if y < self.max_y {
                Some((self.min_x, y + 1))
            } else {
                None
            };

            if (x, y) != self.center {
                return Some((x, y));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.cursor.map(|_| 8))
    }
}
