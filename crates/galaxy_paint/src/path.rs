//! Path building and representation

use smallvec::SmallVec;

/// A 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Path command
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
}

/// A 2D path composed of commands
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: SmallVec<[PathCommand; 4]>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single straight segment
    pub fn line(from: Point, to: Point) -> Self {
        let mut path = Self::new();
        path.move_to(from.x, from.y);
        path.line_to(to.x, to.y);
        path
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::LineTo(Point::new(x, y)));
        self
    }

    /// Straight segments of the path, in drawing order
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let mut cursor: Option<Point> = None;
        self.commands.iter().filter_map(move |cmd| match *cmd {
            PathCommand::MoveTo(p) => {
                cursor = Some(p);
                None
            }
            PathCommand::LineTo(p) => {
                let from = cursor.replace(p)?;
                Some((from, p))
            }
        })
    }
}
