//! 2D vector value type.  Every operation returns a new value.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `angle` radians.
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn add(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(self, other: Vector2) -> Vector2 {
        Vector2::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(self, factor: f32) -> Vector2 {
        Vector2::new(self.x * factor, self.y * factor)
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// A zero-length vector normalizes to itself rather than NaN.
    pub fn normalize(self) -> Vector2 {
        let len = self.length();
        let len = if len == 0.0 { 1.0 } else { len };
        Vector2::new(self.x / len, self.y / len)
    }

    pub fn distance_to(self, other: Vector2) -> f32 {
        self.subtract(other).length()
    }

    /// Heading in radians, as `atan2(y, x)`.
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Rotated a quarter turn counter-clockwise: `(-y, x)`.
    pub fn perpendicular(self) -> Vector2 {
        Vector2::new(-self.y, self.x)
    }
}

impl std::ops::Add for Vector2 {
    type Output = Vector2;

    fn add(self, other: Vector2) -> Vector2 {
        Vector2::add(self, other)
    }
}

impl std::ops::Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, other: Vector2) -> Vector2 {
        self.subtract(other)
    }
}

impl std::ops::Mul<f32> for Vector2 {
    type Output = Vector2;

    fn mul(self, factor: f32) -> Vector2 {
        self.scale(factor)
    }
}
