//! Connected groups of same-colored stones.

use crate::board::Board;
use crate::point::{Color, Coord};

/// Handle into a board's dense group table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub(crate) usize);

/// A maximal connected set of same-colored stones.
///
/// `bounds` holds every coordinate orthogonally adjacent to the group that is
/// not itself a member, each at most once. Bounds may be occupied by enemy
/// stones; only the empty ones are liberties.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub(crate) id: GroupId,
    pub(crate) color: Color,
    pub(crate) bounds: Vec<Coord>,
    pub(crate) points: Vec<Coord>,
}

impl Group {
    pub(crate) fn new(id: GroupId, color: Color) -> Self {
        Group {
            id,
            color,
            bounds: Vec::new(),
            points: Vec::new(),
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Boundary coordinates (adjacent, not members).
    pub fn bounds(&self) -> &[Coord] {
        &self.bounds
    }

    /// Member stones.
    pub fn points(&self) -> &[Coord] {
        &self.points
    }

    /// Number of stones in the group.
    pub fn size(&self) -> usize {
        self.points.len()
    }

    /// Count boundary coordinates that are currently empty.
    pub fn liberties(&self, board: &Board) -> usize {
        self.bounds
            .iter()
            .filter(|&&c| board.point(c).is_empty())
            .count()
    }

    /// Empty boundary coordinates.
    pub fn liberty_points<'a>(&'a self, board: &'a Board) -> impl Iterator<Item = Coord> + 'a {
        self.bounds
            .iter()
            .copied()
            .filter(|&c| board.point(c).is_empty())
    }

    /// Add a coordinate to the bounds unless it is already there.
    pub(crate) fn add_bound(&mut self, c: Coord) {
        if !self.bounds.contains(&c) {
            self.bounds.push(c);
        }
    }

    /// Drop duplicate bounds and any bound for which `keep` is false.
    pub(crate) fn retain_bounds(&mut self, mut keep: impl FnMut(Coord) -> bool) {
        let mut seen: Vec<Coord> = Vec::with_capacity(self.bounds.len());
        self.bounds.retain(|&c| {
            if seen.contains(&c) || !keep(c) {
                return false;
            }
            seen.push(c);
            true
        });
    }

    /// Bounding box of the boundary as `(min_x, min_y, max_x, max_y)`.
    pub fn bounding_box(&self) -> Option<(usize, usize, usize, usize)> {
        let mut iter = self.bounds.iter();
        let &(x0, y0) = iter.next()?;
        Some(iter.fold((x0, y0, x0, y0), |(ax, ay, bx, by), &(x, y)| {
            (ax.min(x), ay.min(y), bx.max(x), by.max(y))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retain_dedups_and_filters() {
        let mut g = Group::new(GroupId(0), Color::Black);
        g.bounds = vec![(1, 0), (2, 0), (1, 0), (3, 3), (2, 0)];
        g.retain_bounds(|c| c != (3, 3));
        assert_eq!(g.bounds(), &[(1, 0), (2, 0)]);
    }

    #[test]
    fn add_bound_is_unique() {
        let mut g = Group::new(GroupId(0), Color::White);
        g.add_bound((0, 1));
        g.add_bound((0, 1));
        assert_eq!(g.bounds().len(), 1);
    }

    #[test]
    fn bounding_box_spans_bounds() {
        let mut g = Group::new(GroupId(1), Color::Black);
        assert_eq!(g.bounding_box(), None);
        g.bounds = vec![(2, 1), (0, 3), (4, 2)];
        assert_eq!(g.bounding_box(), Some((0, 1, 4, 3)));
    }
}
