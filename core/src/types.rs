use ndarray::Array2;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional cell coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Pixel position in the host's screen space.
pub type ScreenPos = (i32, i32);

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

/// Whether `a` and `b` are the same cell or touch each other (8-connectivity).
pub const fn is_within_one(a: Coord2, b: Coord2) -> bool {
    a.0.abs_diff(b.0) <= 1 && a.1.abs_diff(b.1) <= 1
}

pub trait NeighborIterExt {
    /// The up to eight cells touching `index`, clipped to the array bounds.
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;

    /// `index` itself followed by its neighbors, i.e. the clipped 3x3 block around it.
    fn iter_neighborhood(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        NeighborIter::new(index, array_bounds(self), false)
    }

    fn iter_neighborhood(&self, index: Coord2) -> NeighborIter {
        NeighborIter::new(index, array_bounds(self), true)
    }
}

fn array_bounds<T>(array: &Array2<T>) -> Coord2 {
    let (x, y) = array.dim();
    (
        x.try_into().unwrap_or(Coord::MAX),
        y.try_into().unwrap_or(Coord::MAX),
    )
}

// center first, so the 3x3 walk can skip it by starting at 1
const DISPLACEMENTS: [(i8, i8); 9] = [
    (0, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

fn offset(coords: Coord2, (dx, dy): (i8, i8), (max_x, max_y): Coord2) -> Option<Coord2> {
    let x = coords.0.checked_add_signed(dx).filter(|&x| x < max_x)?;
    let y = coords.1.checked_add_signed(dy).filter(|&y| y < max_y)?;
    Some((x, y))
}

#[derive(Clone, Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: usize,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2, include_center: bool) -> Self {
        Self {
            center,
            bounds,
            index: if include_center { 0 } else { 1 },
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = DISPLACEMENTS.get(self.index) {
            self.index += 1;
            if let Some(coords) = offset(self.center, delta, self.bounds) {
                return Some(coords);
            }
        }
        None
    }
}
