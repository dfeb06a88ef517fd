use glam::Vec2;

/// An axis-aligned rectangle, anchored at its top-left corner. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    pub fn left(&self) -> f32 {
        self.origin.x
    }

    pub fn right(&self) -> f32 {
        self.origin.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.origin.y
    }

    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.y
    }

    /// A rectangle with no area overlaps nothing.
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Returns `true` if the interiors overlap. Rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        self.left() < other.right() && other.left() < self.right() && self.top() < other.bottom() && other.top() < self.bottom()
    }
}

/// Trait for anything that can participate in collision detection.
pub trait Collidable {
    /// Returns the current bounding box.
    fn bounds(&self) -> Rect;

    /// Checks if this is colliding with another collidable.
    fn is_colliding_with(&self, other: &dyn Collidable) -> bool {
        self.bounds().intersects(&other.bounds())
    }
}

impl Collidable for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}
