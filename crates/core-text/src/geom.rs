//! Cell-space geometry shared by every layer of the editor.
//!
//! All coordinates are signed so intermediate arithmetic (scroll offsets,
//! rect intersection, motion deltas) can go negative before it is clamped.
//! Conventions:
//! * `Point` orders lexicographically by `(y, x)`, which is document order
//!   when the point is interpreted as a `(column, row)` cursor.
//! * A `Rect` with zero or negative size is valid and represents "nothing".
//!   `intersection` of disjoint rects produces such a rect; callers test
//!   `area() > 0` instead of assuming a well-formed result.

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Sub, SubAssign};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn origin() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Clamp `x` into `[min, max]` (upper bound inclusive: a cursor may sit
    /// one past the last character).
    pub fn clamp_x(&mut self, min: i32, max: i32) {
        if self.x > max {
            self.x = max;
        }
        if self.x < min {
            self.x = min;
        }
    }

    /// Clamp `y` into `[min, max)` (upper bound exclusive: rows are indices).
    pub fn clamp_y(&mut self, min: i32, max: i32) {
        if self.y >= max {
            self.y = max - 1;
        }
        if self.y < min {
            self.y = min;
        }
    }

    /// Row component as an index; negative rows map to 0.
    pub fn row(&self) -> usize {
        self.y.max(0) as usize
    }

    /// Column component as an index; negative columns map to 0.
    pub fn col(&self) -> usize {
        self.x.max(0) as usize
    }

    /// Construct from unsigned (column, row) indices.
    pub fn at(col: usize, row: usize) -> Self {
        Self {
            x: col as i32,
            y: row as i32,
        }
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in terminal cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub pos: Point,
    pub size: Point,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            pos: Point::new(x, y),
            size: Point::new(width, height),
        }
    }

    pub fn from_parts(pos: Point, size: Point) -> Self {
        Self { pos, size }
    }

    pub fn width(&self) -> i32 {
        self.size.x
    }

    pub fn height(&self) -> i32 {
        self.size.y
    }

    /// Area; degenerate rects (any non-positive side) report 0.
    pub fn area(&self) -> i64 {
        if self.size.x <= 0 || self.size.y <= 0 {
            0
        } else {
            self.size.x as i64 * self.size.y as i64
        }
    }

    pub fn right(&self) -> i32 {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> i32 {
        self.pos.y + self.size.y
    }

    pub fn top_left(&self) -> Point {
        self.pos
    }

    pub fn translate(&mut self, delta: Point) {
        self.pos += delta;
    }

    /// Grow (or shrink, for negative `d`) by `d` cells on every side.
    pub fn inflate(mut self, d: i32) -> Self {
        self.pos -= Point::new(d, d);
        self.size += Point::new(2 * d, 2 * d);
        self
    }

    pub fn contains_point(&self, p: Point) -> bool {
        let rel = p - self.pos;
        0 <= rel.x && rel.x < self.size.x && 0 <= rel.y && rel.y < self.size.y
    }

    /// True when `other` lies entirely inside `self` (degenerate `other`
    /// is contained anywhere).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.intersection(other).area() == other.area()
    }

    pub fn intersection(&self, other: &Rect) -> Rect {
        let x = self.pos.x.max(other.pos.x);
        let y = self.pos.y.max(other.pos.y);
        let r = self.right().min(other.right());
        let b = self.bottom().min(other.bottom());
        Rect::new(x, y, r - x, b - y)
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.intersection(other).area() > 0
    }

    /// Copy with negative size components replaced by zero.
    pub fn clamped(&self) -> Rect {
        Rect::from_parts(self.pos, Point::new(self.size.x.max(0), self.size.y.max(0)))
    }
}

/// Selection interval: an unordered pair of points. `anchor` stays where the
/// selection started, `active` follows the cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Range {
    pub anchor: Point,
    pub active: Point,
}

impl Range {
    pub fn new(anchor: Point, active: Point) -> Self {
        Self { anchor, active }
    }

    pub fn collapsed(p: Point) -> Self {
        Self {
            anchor: p,
            active: p,
        }
    }

    /// `(min, max)` by document order regardless of selection direction.
    pub fn ordered(&self) -> (Point, Point) {
        if self.anchor <= self.active {
            (self.anchor, self.active)
        } else {
            (self.active, self.anchor)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    pub fn extend(&mut self, p: Point) {
        self.active = p;
    }

    /// Rows touched by the range (inclusive).
    pub fn rows(&self) -> std::ops::RangeInclusive<usize> {
        let (start, stop) = self.ordered();
        start.row()..=stop.row()
    }
}
