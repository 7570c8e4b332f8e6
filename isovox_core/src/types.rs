//! Core types for isovox surface extraction.
//!
//! Provides voxel coordinates, world-space points, and the edge identity used to
//! share vertices between neighbouring voxels.

use core::ops::{Add, Div, Mul, Neg, Sub};

/// Integer voxel coordinate in index space.
///
/// Coordinates are signed so fields may extend in every direction from the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Coord {
    /// X index.
    pub x: i32,
    /// Y index.
    pub y: i32,
    /// Z index.
    pub z: i32,
}

impl Coord {
    /// Create a new voxel coordinate.
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Offset this coordinate by `(dx, dy, dz)`.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Offset this coordinate, or `None` if any component leaves the `i32` range.
    #[inline]
    pub fn checked_offset(self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            z: self.z.checked_add(dz)?,
        })
    }

    /// Convert to an array.
    #[inline]
    pub const fn as_array(&self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[i32; 3]> for Coord {
    #[inline]
    fn from(arr: [i32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }
}

impl From<(i32, i32, i32)> for Coord {
    #[inline]
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Coord> for [i32; 3] {
    #[inline]
    fn from(c: Coord) -> Self {
        c.as_array()
    }
}

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Axis {
    /// The x axis.
    X = 0,
    /// The y axis.
    Y = 1,
    /// The z axis.
    Z = 2,
}

impl Axis {
    /// Component index of this axis (0, 1 or 2).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Identity of a lattice edge.
///
/// An edge is named by its low endpoint and the axis it runs along, so every
/// voxel touching the edge derives the same key for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    /// Low endpoint x.
    pub x: i32,
    /// Low endpoint y.
    pub y: i32,
    /// Low endpoint z.
    pub z: i32,
    /// Direction of the edge.
    pub axis: Axis,
}

impl EdgeKey {
    /// Create a new edge key.
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32, axis: Axis) -> Self {
        Self { x, y, z, axis }
    }

    /// The low endpoint of the edge.
    #[inline]
    pub const fn origin(&self) -> Coord {
        Coord::new(self.x, self.y, self.z)
    }
}

/// A 3D point in world space with named fields.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3 {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

impl Point3 {
    /// Create a new Point3.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Create a Point3 with all components set to the same value.
    #[inline]
    pub const fn splat(v: f64) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// Convert to an array.
    #[inline]
    pub const fn as_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Component by axis index (0 = x, 1 = y, 2 = z).
    #[inline]
    pub fn get(&self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Mutable component by axis index (0 = x, 1 = y, 2 = z).
    #[inline]
    pub fn get_mut(&mut self, axis: usize) -> &mut f64 {
        match axis {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => &mut self.z,
        }
    }

    /// Linear interpolation between two points.
    #[inline]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Dot product with another point (treating both as vectors).
    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product with another point (treating both as vectors).
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Squared length of the vector.
    #[inline]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// Length (magnitude) of the vector.
    #[inline]
    pub fn length(self) -> f64 {
        libm::sqrt(self.length_squared())
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self {
            x: if self.x < other.x { self.x } else { other.x },
            y: if self.y < other.y { self.y } else { other.y },
            z: if self.z < other.z { self.z } else { other.z },
        }
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self {
            x: if self.x > other.x { self.x } else { other.x },
            y: if self.y > other.y { self.y } else { other.y },
            z: if self.z > other.z { self.z } else { other.z },
        }
    }

    /// Largest component.
    #[inline]
    pub fn max_element(self) -> f64 {
        let xy = if self.x > self.y { self.x } else { self.y };
        if xy > self.z {
            xy
        } else {
            self.z
        }
    }

    /// Whether every component is finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Point3 {
    #[inline]
    fn from(arr: [f64; 3]) -> Self {
        Self {
            x: arr[0],
            y: arr[1],
            z: arr[2],
        }
    }
}

impl From<Point3> for [f64; 3] {
    #[inline]
    fn from(p: Point3) -> Self {
        p.as_array()
    }
}

impl From<(f64, f64, f64)> for Point3 {
    #[inline]
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self { x, y, z }
    }
}

impl Add for Point3 {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Point3 {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f64> for Point3 {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl Mul<Point3> for f64 {
    type Output = Point3;

    #[inline]
    fn mul(self, point: Point3) -> Point3 {
        point * self
    }
}

impl Div<f64> for Point3 {
    type Output = Self;

    #[inline]
    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
        }
    }
}

impl Neg for Point3 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}
