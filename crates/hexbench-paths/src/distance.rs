use hexbench_core::Coord;

/// Number of hex steps between two tiles, ignoring weights.
#[inline]
pub fn hex_distance(a: Coord, b: Coord) -> i32 {
    let (ax, az) = to_axial(a);
    let (bx, bz) = to_axial(b);
    let dx = ax - bx;
    let dz = az - bz;
    let dy = -dx - dz;
    dx.abs().max(dy.abs()).max(dz.abs())
}

#[inline]
fn to_axial(c: Coord) -> (i32, i32) {
    (c.col - (c.row - (c.row & 1)) / 2, c.row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        let o = Coord::new(3, 3);
        assert_eq!(hex_distance(o, o), 0);
        for n in [Coord::new(2, 3), Coord::new(2, 4), Coord::new(4, 4), Coord::new(3, 2)] {
            assert_eq!(hex_distance(o, n), 1);
        }
        assert_eq!(hex_distance(Coord::new(0, 0), Coord::new(0, 5)), 5);
        assert_eq!(hex_distance(Coord::new(0, 0), Coord::new(4, 2)), 4);
        assert_eq!(hex_distance(Coord::new(0, 0), Coord::new(4, 0)), 4);
        assert_eq!(hex_distance(Coord::new(4, 0), Coord::new(0, 0)), 4);
    }
}
