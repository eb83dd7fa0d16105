//! Grid points

use galaxy_animation::TweenHandle;
use galaxy_paint::Point;
use smallvec::SmallVec;

/// One point of the field.
///
/// Points live in a flat array indexed `col * density + row`; `id` is that
/// index and never changes while the point exists.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Particle {
    pub id: usize,
    /// Current position
    pub x: f32,
    pub y: f32,
    /// Rest anchor the jitter wanders around
    pub ox: f32,
    pub oy: f32,
    /// Draw radius
    pub r: f32,
    /// Self alpha for the current frame
    pub ca: f32,
    /// Link strength for the current frame
    pub active: f32,
    /// Nearest neighbors by id, at most `links` entries
    pub closest: SmallVec<[usize; 8]>,
    /// Jitter tweens for the x and y axis
    pub(crate) jitter: [TweenHandle; 2],
}

impl Particle {
    pub fn new(id: usize, x: f32, y: f32, r: f32) -> Self {
        Self {
            id,
            x,
            y,
            ox: x,
            oy: y,
            r,
            ..Default::default()
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Move the point and its anchor
    pub fn place(&mut self, x: f32, y: f32) {
        self.x = x;
        self.ox = x;
        self.y = y;
        self.oy = y;
    }

    pub fn jitter(&self, axis: Axis) -> TweenHandle {
        self.jitter[axis.index()]
    }
}

/// Jitter axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::X, Axis::Y];

    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    pub fn get(self, particle: &Particle) -> f32 {
        match self {
            Axis::X => particle.x,
            Axis::Y => particle.y,
        }
    }

    pub fn set(self, particle: &mut Particle, value: f32) {
        match self {
            Axis::X => particle.x = value,
            Axis::Y => particle.y = value,
        }
    }

    pub fn origin(self, particle: &Particle) -> f32 {
        match self {
            Axis::X => particle.ox,
            Axis::Y => particle.oy,
        }
    }

    pub(crate) fn set_jitter(self, particle: &mut Particle, handle: TweenHandle) {
        particle.jitter[self.index()] = handle;
    }
}
