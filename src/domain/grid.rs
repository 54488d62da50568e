/// Grid geometry: coordinates, facing, and the (position, facing) pose.
///
/// Coordinates are signed so that neighbours of edge cells can be formed
/// and then rejected by a bounds check instead of underflowing.
/// `y` grows southward: north is `(0, -1)`.

use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Pos { x, y }
    }

    pub fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Cell `n` steps away in direction `facing`.
    pub fn step(self, facing: Facing, n: i32) -> Pos {
        let (dx, dy) = facing.delta();
        Pos { x: self.x + dx * n, y: self.y + dy * n }
    }

    /// Orthogonal neighbours in N, E, S, W order.
    pub fn neighbors4(self) -> [Pos; 4] {
        Facing::ALL.map(|f| self.step(f, 1))
    }

    /// King-move neighbours (8-connectivity).
    pub fn neighbors8(self) -> [Pos; 8] {
        let Pos { x, y } = self;
        [
            Pos::new(x - 1, y - 1), Pos::new(x, y - 1), Pos::new(x + 1, y - 1),
            Pos::new(x - 1, y),                         Pos::new(x + 1, y),
            Pos::new(x - 1, y + 1), Pos::new(x, y + 1), Pos::new(x + 1, y + 1),
        ]
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── Facing ──

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Facing {
    North,
    East,
    South,
    West,
}

impl Facing {
    /// Clockwise order; `index()` follows it.
    pub const ALL: [Facing; 4] = [Facing::North, Facing::East, Facing::South, Facing::West];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Facing::North => (0, -1),
            Facing::East => (1, 0),
            Facing::South => (0, 1),
            Facing::West => (-1, 0),
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Facing {
        Facing::ALL[i % 4]
    }

    pub fn right(self) -> Facing {
        Facing::from_index(self.index() + 1)
    }

    pub fn left(self) -> Facing {
        Facing::from_index(self.index() + 3)
    }

    pub fn reverse(self) -> Facing {
        Facing::from_index(self.index() + 2)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Facing::North => "north",
            Facing::East => "east",
            Facing::South => "south",
            Facing::West => "west",
        }
    }
}

impl FromStr for Facing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" => Ok(Facing::North),
            "east" => Ok(Facing::East),
            "south" => Ok(Facing::South),
            "west" => Ok(Facing::West),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Pose ──

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Pose {
    pub pos: Pos,
    pub facing: Facing,
}

impl Pose {
    pub const fn new(x: i32, y: i32, facing: Facing) -> Self {
        Pose { pos: Pos::new(x, y), facing }
    }

    pub fn ahead(self) -> Pos {
        self.pos.step(self.facing, 1)
    }

    pub fn behind(self) -> Pos {
        self.pos.step(self.facing.reverse(), 1)
    }

    pub fn left_side(self) -> Pos {
        self.pos.step(self.facing.left(), 1)
    }

    pub fn right_side(self) -> Pos {
        self.pos.step(self.facing.right(), 1)
    }
}
