//! Square board with live group tracking.
//!
//! Points live in a flat row-major array and groups in a dense table indexed
//! by [`GroupId`], so cloning a board for search is two bulk copies rather
//! than a graph walk.

use std::fmt;

use crate::game::Tally;
use crate::group::{Group, GroupId};
use crate::point::{Color, Coord, Permit, Point, Territory};
use crate::snapshot::PointView;

/// Orthogonal neighbors of a coordinate, in top, right, bottom, left order.
pub type Neighbors = std::iter::Flatten<std::array::IntoIter<Option<Coord>, 4>>;

/// Stones removed by one capture sweep, by the color of the removed stones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Captured {
    pub black: Vec<Coord>,
    pub white: Vec<Coord>,
}

impl Captured {
    pub fn of(&self, color: Color) -> &[Coord] {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    fn of_mut(&mut self, color: Color) -> &mut Vec<Coord> {
        match color {
            Color::Black => &mut self.black,
            Color::White => &mut self.white,
        }
    }

    pub fn total(&self) -> usize {
        self.black.len() + self.white.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    points: Vec<Point>,
    groups: Vec<Option<Group>>,
}

impl Board {
    /// An empty `size`x`size` board.
    pub fn new(size: usize) -> Self {
        let points = (0..size * size)
            .map(|i| Point::new(i % size, i / size))
            .collect();
        Self {
            size,
            points,
            groups: Vec::new(),
        }
    }

    /// Board side length.
    pub fn size(&self) -> usize {
        self.size
    }

    fn idx(&self, (x, y): Coord) -> usize {
        y * self.size + x
    }

    /// Whether `(x, y)` lies on the board.
    pub fn contains(&self, (x, y): Coord) -> bool {
        x < self.size && y < self.size
    }

    /// The point at `at`, `None` off the board.
    pub fn get(&self, at: Coord) -> Option<&Point> {
        if !self.contains(at) {
            return None;
        }
        Some(&self.points[self.idx(at)])
    }

    /// The point at an on-board coordinate.
    ///
    /// # Panics
    ///
    /// Panics if `at` is off the board.
    pub fn point(&self, at: Coord) -> &Point {
        &self.points[self.idx(at)]
    }

    fn point_mut(&mut self, at: Coord) -> &mut Point {
        let i = self.idx(at);
        &mut self.points[i]
    }

    /// Look up a live group by id.
    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.0).and_then(Option::as_ref)
    }

    /// The group owning the stone at `at`, if any.
    pub fn group_at(&self, at: Coord) -> Option<&Group> {
        self.get(at)?.group.and_then(|id| self.group(id))
    }

    /// Live groups, in table order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter().flatten()
    }

    /// All coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let size = self.size;
        (0..size * size).map(move |i| (i % size, i / size))
    }

    /// Every point, row-major.
    pub fn cells(&self) -> &[Point] {
        &self.points
    }

    /// Number of stones on the board.
    pub fn stone_count(&self) -> usize {
        self.points.iter().filter(|p| !p.is_empty()).count()
    }

    /// On-board orthogonal neighbors of a coordinate.
    pub fn neighbors(&self, (x, y): Coord) -> Neighbors {
        let s = self.size;
        [
            (y > 0).then(|| (x, y - 1)),
            (x + 1 < s).then(|| (x + 1, y)),
            (y + 1 < s).then(|| (x, y + 1)),
            (x > 0).then(|| (x - 1, y)),
        ]
        .into_iter()
        .flatten()
    }

    fn new_group(&mut self, color: Color) -> GroupId {
        let slot = self
            .groups
            .iter()
            .position(Option::is_none)
            .unwrap_or(self.groups.len());
        if slot == self.groups.len() {
            self.groups.push(None);
        }
        let id = GroupId(slot);
        self.groups[slot] = Some(Group::new(id, color));
        id
    }

    /// Place a stone, joining or merging the adjacent same-colored groups.
    ///
    /// The placed point is closed to both colors. Captures are not resolved
    /// here, see [`Board::do_captures`].
    pub(crate) fn add_point(&mut self, at: Coord, color: Color) -> GroupId {
        let mut friendly: Vec<GroupId> = Vec::with_capacity(4);
        for n in self.neighbors(at) {
            let p = self.point(n);
            if p.color == Some(color) {
                if let Some(id) = p.group.filter(|id| !friendly.contains(id)) {
                    friendly.push(id);
                }
            }
        }
        let id = match friendly.first() {
            Some(&id) => id,
            None => self.new_group(color),
        };

        let p = self.point_mut(at);
        p.color = Some(color);
        p.group = Some(id);
        p.permit = Permit::CLOSED;
        p.territory = Territory::None;

        let neighbors = self.neighbors(at);
        let size = self.size;
        let Board { points, groups, .. } = self;
        let Some(group) = groups[id.0].as_mut() else {
            return id;
        };
        group.points.push(at);
        for (nx, ny) in neighbors {
            if points[ny * size + nx].group != Some(id) {
                group.add_bound((nx, ny));
            }
        }
        group.retain_bounds(|c| c != at);

        for &other in friendly.iter().skip(1) {
            self.merge(id, other);
        }
        id
    }

    /// Fold group `from` into group `into`.
    fn merge(&mut self, into: GroupId, from: GroupId) {
        let Some(absorbed) = self.groups[from.0].take() else {
            return;
        };
        for &c in &absorbed.points {
            self.point_mut(c).group = Some(into);
        }
        let size = self.size;
        let Board { points, groups, .. } = self;
        let Some(target) = groups[into.0].as_mut() else {
            return;
        };
        target.points.extend_from_slice(&absorbed.points);
        target.bounds.extend_from_slice(&absorbed.bounds);
        target.retain_bounds(|(x, y)| points[y * size + x].group != Some(into));
    }

    fn remove_group(&mut self, id: GroupId) -> Vec<Coord> {
        let Some(group) = self.groups[id.0].take() else {
            return Vec::new();
        };
        for &c in &group.points {
            self.point_mut(c).clear();
        }
        group.points
    }

    /// Remove every group without liberties: the opponent's first, then
    /// `friendly`'s own.
    ///
    /// Enemy groups go first so that a move filling the last liberty of an
    /// enemy group counts as a capture rather than as suicide.
    pub(crate) fn do_captures(&mut self, friendly: Color) -> Captured {
        let mut captured = Captured::default();
        for color in [friendly.opponent(), friendly] {
            let dead: Vec<GroupId> = self
                .groups()
                .filter(|g| g.color == color && g.liberties(self) == 0)
                .map(|g| g.id)
                .collect();
            for id in dead {
                let removed = self.remove_group(id);
                captured.of_mut(color).extend(removed);
            }
        }
        captured
    }

    /// An empty point whose neighbors all belong to some group.
    pub fn is_eye(&self, at: Coord) -> bool {
        self.point(at).is_empty() && self.neighbors(at).all(|n| self.point(n).group.is_some())
    }

    /// Legality of playing into an eye: a color may play when it captures an
    /// adjacent enemy group in atari, or joins a friendly group that keeps a
    /// liberty.
    fn eye_permit(&self, at: Coord) -> Permit {
        let mut black_atari = false;
        let mut black_alive = false;
        let mut white_atari = false;
        let mut white_alive = false;
        for n in self.neighbors(at) {
            let Some(group) = self.group_at(n) else {
                continue;
            };
            let libs = group.liberties(self);
            let (atari, alive) = match group.color {
                Color::Black => (&mut black_atari, &mut black_alive),
                Color::White => (&mut white_atari, &mut white_alive),
            };
            if libs == 1 {
                *atari = true;
            } else if libs > 1 {
                *alive = true;
            }
        }
        Permit {
            black: white_atari || black_alive,
            white: black_atari || white_alive,
        }
    }

    /// Recompute suicide legality for every empty point, then close the ko
    /// point to both colors.
    pub(crate) fn apply_permissions(&mut self, ko: Option<Coord>) {
        for i in 0..self.points.len() {
            let at = self.points[i].coord();
            if !self.points[i].is_empty() {
                continue;
            }
            let permit = if self.is_eye(at) {
                self.eye_permit(at)
            } else {
                Permit::OPEN
            };
            self.points[i].permit = permit;
        }
        if let Some(ko) = ko {
            self.point_mut(ko).permit = Permit::CLOSED;
        }
    }

    /// Area score: one per stone plus every empty region bordered by a single
    /// color.
    ///
    /// Regions are labelled in one raster pass. An empty point joins the
    /// region above it, else the region to its left, else starts a new one;
    /// when the regions above and to the left differ they are unioned. Each
    /// region's tag blends the colors of the stones it touches, so a region
    /// touching both colors ends up `Both` and scores for neither side. The
    /// final tags are left on the points' `territory` fields.
    pub fn score(&mut self) -> Tally {
        struct Region {
            tag: Territory,
            points: Vec<usize>,
        }

        let size = self.size;
        let mut tally = Tally::default();
        let mut regions: Vec<Option<Region>> = Vec::new();
        let mut label: Vec<Option<usize>> = vec![None; size * size];

        for i in 0..size * size {
            let (x, y) = (i % size, i / size);
            let up = (y > 0).then(|| i - size);
            let left = (x > 0).then(|| i - 1);

            if let Some(color) = self.points[i].color {
                *tally.get_mut(color) += 1;
                self.points[i].territory = Territory::None;
                for r in [up, left].into_iter().flatten().filter_map(|n| label[n]) {
                    if let Some(region) = regions[r].as_mut() {
                        region.tag = region.tag.blend(color.into());
                    }
                }
                continue;
            }

            let up_region = up.and_then(|n| label[n]);
            let left_region = left.and_then(|n| label[n]);
            let r = match up_region.or(left_region) {
                Some(r) => r,
                None => {
                    regions.push(Some(Region {
                        tag: Territory::None,
                        points: Vec::new(),
                    }));
                    regions.len() - 1
                }
            };
            label[i] = Some(r);

            let mut tag = regions[r].as_ref().map_or(Territory::None, |reg| reg.tag);
            for n in [up, left].into_iter().flatten() {
                if let Some(c) = self.points[n].color {
                    tag = tag.blend(c.into());
                }
            }
            let mut moved = Vec::new();
            if let Some(l) = left_region.filter(|&l| l != r) {
                if let Some(absorbed) = regions[l].take() {
                    tag = tag.blend(absorbed.tag);
                    for &j in &absorbed.points {
                        label[j] = Some(r);
                    }
                    moved = absorbed.points;
                }
            }
            if let Some(region) = regions[r].as_mut() {
                region.tag = tag;
                region.points.extend(moved);
                region.points.push(i);
            }
        }

        for region in regions.into_iter().flatten() {
            if let Some(owner) = region.tag.owner() {
                *tally.get_mut(owner) += region.points.len() as u32;
            }
            for j in region.points {
                self.points[j].territory = region.tag;
            }
        }
        tally
    }

    /// Read-only view of every point, one row per `y`, without group ids.
    pub fn points(&self) -> Vec<Vec<PointView>> {
        self.points
            .chunks(self.size.max(1))
            .map(|row| row.iter().map(PointView::from).collect())
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size {
            for x in 0..self.size {
                let ch = match self.point((x, y)).color {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
