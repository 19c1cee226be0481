use hexbench_core::Coord;

// Offsets for even and odd rows; odd rows sit half a column to the right.
const EVEN_ROW: [(i32, i32); 6] = [(0, 1), (0, -1), (-1, -1), (-1, 0), (1, -1), (1, 0)];
const ODD_ROW: [(i32, i32); 6] = [(0, 1), (0, -1), (-1, 0), (-1, 1), (1, 0), (1, 1)];

/// Cached hex neighbour computation helper.
///
/// Enumerates the six tiles sharing an edge with a given tile, filtered by
/// a predicate.
pub struct HexNeighbors {
    buf: Vec<Coord>,
}

impl Default for HexNeighbors {
    fn default() -> Self {
        Self::new()
    }
}

impl HexNeighbors {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(6),
        }
    }

    /// Neighbours of `c` for which `keep` returns `true`.
    pub fn all(&mut self, c: Coord, keep: impl Fn(Coord) -> bool) -> &[Coord] {
        self.buf.clear();
        let dirs = if c.is_odd_row() { &ODD_ROW } else { &EVEN_ROW };
        for &(dr, dc) in dirs {
            let n = Coord::new(c.row + dr, c.col + dc);
            if keep(n) {
                self.buf.push(n);
            }
        }
        &self.buf
    }
}

/// Whether `a` and `b` share an edge.
pub fn are_adjacent(a: Coord, b: Coord) -> bool {
    let dirs = if a.is_odd_row() { &ODD_ROW } else { &EVEN_ROW };
    dirs.iter().any(|&(dr, dc)| a.row + dr == b.row && a.col + dc == b.col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexbench_core::TileGrid;

    #[test]
    fn neighbours_are_geometric_neighbours() {
        let g = TileGrid::new(8, 8, 9.0).unwrap();
        let expected = g.layout().adjacent_distance().powi(2);
        let mut nb = HexNeighbors::new();
        for c in [Coord::new(2, 2), Coord::new(3, 3), Coord::new(4, 0), Coord::new(5, 7)] {
            let found = nb.all(c, |n| g.contains(n)).to_vec();
            assert!(!found.is_empty());
            let center = g.tile(c).unwrap().center;
            for n in found {
                let d = center.distance_sq(g.tile(n).unwrap().center);
                assert!((d - expected).abs() < 1e-9, "{c} -> {n}");
                assert!(are_adjacent(c, n) && are_adjacent(n, c));
            }
        }
    }

    #[test]
    fn filter_applies() {
        let mut nb = HexNeighbors::new();
        assert_eq!(nb.all(Coord::new(0, 0), |n| n.row >= 0 && n.col >= 0).len(), 2);
        assert_eq!(nb.all(Coord::new(3, 3), |_| true).len(), 6);
        assert!(!are_adjacent(Coord::new(0, 0), Coord::new(0, 2)));
    }
}
