//! Checks on a reported solution path.
//!
//! The algorithm is untrusted, so its path is checked rather than assumed
//! correct. Every check runs independently and every failure is reported;
//! validation never touches the algorithm or the session.

use hexbench_core::{Coord, TileGrid};

use crate::error::ValidationFault;

/// Tolerance on the squared centre distance between consecutive steps.
pub const ADJACENCY_EPSILON: f64 = 1e-5;

/// Faults found in one path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationReport {
    faults: Vec<ValidationFault>,
}

impl ValidationReport {
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }

    #[inline]
    pub fn faults(&self) -> &[ValidationFault] {
        &self.faults
    }

    #[inline]
    pub fn into_faults(self) -> Vec<ValidationFault> {
        self.faults
    }

    /// Number of endpoint faults (start or goal mismatch).
    pub fn endpoint_faults(&self) -> usize {
        self.faults
            .iter()
            .filter(|f| {
                matches!(
                    f,
                    ValidationFault::StartMismatch { .. } | ValidationFault::GoalMismatch { .. }
                )
            })
            .count()
    }
}

/// Validates paths between a fixed start and goal on one grid.
#[derive(Copy, Clone, Debug)]
pub struct Validator<'a> {
    grid: &'a TileGrid,
    start: Coord,
    goal: Coord,
}

impl<'a> Validator<'a> {
    pub fn new(grid: &'a TileGrid, start: Coord, goal: Coord) -> Self {
        Self { grid, start, goal }
    }

    /// Check `path` (goal first, start last). `done` says whether the
    /// algorithm reported completion.
    pub fn validate(&self, path: &[Coord], done: bool) -> ValidationReport {
        let mut faults = Vec::new();
        let (Some(&first), Some(&last)) = (path.first(), path.last()) else {
            if done {
                faults.push(ValidationFault::NoPathOnCompletion);
            }
            return ValidationReport { faults };
        };

        if last != self.start {
            faults.push(ValidationFault::StartMismatch {
                expected: self.start,
                found: last,
            });
        }
        if first != self.goal {
            faults.push(ValidationFault::GoalMismatch {
                expected: self.goal,
                found: first,
            });
        }

        for (index, &coord) in path.iter().enumerate() {
            if !self.grid.contains(coord) {
                faults.push(ValidationFault::OutOfGrid { index, coord });
            }
        }

        let expected = self.grid.layout().adjacent_distance().powi(2);
        for (index, pair) in path.windows(2).enumerate() {
            let (from, to) = (pair[0], pair[1]);
            let (Some(a), Some(b)) = (self.grid.tile(from), self.grid.tile(to)) else {
                continue;
            };
            let distance_sq = a.center.distance_sq(b.center);
            if (distance_sq - expected).abs() > ADJACENCY_EPSILON {
                faults.push(ValidationFault::NonAdjacentStep {
                    index,
                    from,
                    to,
                    distance_sq,
                });
            }
        }

        for f in &faults {
            log::warn!("solution fault: {f}");
        }
        ValidationReport { faults }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexbench_core::PixelPoint;

    fn grid() -> TileGrid {
        TileGrid::new(6, 6, 10.0).unwrap()
    }

    fn c(row: i32, col: i32) -> Coord {
        Coord::new(row, col)
    }

    #[test]
    fn adjacent_path_is_clean() {
        let g = grid();
        let v = Validator::new(&g, c(0, 0), c(2, 1));
        // Goal first: (2,1) -> (1,0) -> (0,0).
        let r = v.validate(&[c(2, 1), c(1, 0), c(0, 0)], true);
        assert!(r.is_clean(), "{:?}", r.faults());
    }

    #[test]
    fn two_radii_pass_three_radii_fail() {
        let mut g = grid();
        assert!(Validator::new(&g, c(0, 0), c(0, 1)).validate(&[c(0, 1), c(0, 0)], true).is_clean());

        // Pull (0,1) out to three radii from (0,0).
        let a = g.tile(c(0, 0)).unwrap().center;
        g.tile_mut(c(0, 1)).unwrap().center = PixelPoint::new(a.x + 30.0, a.y);
        let r = Validator::new(&g, c(0, 0), c(0, 1)).validate(&[c(0, 1), c(0, 0)], true);
        assert_eq!(r.faults().len(), 1);
        assert!(matches!(
            r.faults()[0],
            ValidationFault::NonAdjacentStep { index: 0, distance_sq, .. } if distance_sq == 900.0
        ));
    }

    #[test]
    fn wrong_goal_is_one_endpoint_fault() {
        let g = grid();
        let v = Validator::new(&g, c(0, 0), c(0, 3));
        // Ends at the start, begins one tile short of the goal, and skips a tile.
        let r = v.validate(&[c(0, 2), c(0, 0)], true);
        assert_eq!(r.endpoint_faults(), 1);
        assert!(matches!(r.faults()[0], ValidationFault::GoalMismatch { found, .. } if found == c(0, 2)));
        assert_eq!(r.faults().len(), 2);
    }

    #[test]
    fn both_endpoints_reported_separately() {
        let g = grid();
        let v = Validator::new(&g, c(0, 0), c(0, 3));
        let r = v.validate(&[c(0, 1), c(0, 2)], true);
        assert_eq!(r.endpoint_faults(), 2);
        assert_eq!(r.faults().len(), 2);
    }

    #[test]
    fn empty_path() {
        let g = grid();
        let v = Validator::new(&g, c(0, 0), c(5, 5));
        assert_eq!(v.validate(&[], true).faults(), &[ValidationFault::NoPathOnCompletion]);
        assert!(v.validate(&[], false).is_clean());
    }

    #[test]
    fn out_of_grid_elements_skip_adjacency() {
        let g = grid();
        let v = Validator::new(&g, c(0, 0), c(0, 1));
        let r = v.validate(&[c(0, 1), c(-1, 0), c(0, 0)], true);
        assert_eq!(
            r.faults(),
            &[ValidationFault::OutOfGrid {
                index: 1,
                coord: c(-1, 0)
            }]
        );
    }
}
