use std::fmt;
use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A point in 3-dimensional space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    /// East-west position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// North-south position.
    pub z: f64,
}

impl Coordinate {
    /// The origin `(0, 0, 0)`.
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a coordinate from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Move this point by `vector`.
    pub fn apply_vector(self, vector: Vector) -> Self {
        Self::new(self.x + vector.x, self.y + vector.y, self.z + vector.z)
    }

    /// Reinterpret this point as an offset from the origin.
    pub fn to_vector(self) -> Vector {
        Vector::new(self.x, self.y, self.z)
    }

    /// The offset that moves this point onto `other`.
    pub fn vector_to(self, other: Coordinate) -> Vector {
        other.to_vector().subtract(self.to_vector())
    }

    /// Whether every component is finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add<Vector> for Coordinate {
    type Output = Coordinate;

    fn add(self, rhs: Vector) -> Coordinate {
        self.apply_vector(rhs)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// An offset between two points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    /// East-west offset.
    pub x: f64,
    /// Vertical offset.
    pub y: f64,
    /// North-south offset.
    pub z: f64,
}

impl Vector {
    /// The zero offset.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a vector from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component-wise sum.
    #[allow(clippy::should_implement_trait)]
    pub fn add(self, other: Vector) -> Vector {
        Vector::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Component-wise difference.
    pub fn subtract(self, other: Vector) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// The point this offset reaches from the origin.
    pub fn to_coordinate(self) -> Coordinate {
        Coordinate::new(self.x, self.y, self.z)
    }

    /// Whether every component is finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::add(self, rhs)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        self.subtract(rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}, {}>", self.x, self.y, self.z)
    }
}
