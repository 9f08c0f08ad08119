//! Query shapes and their hit records.

use nalgebra::{Point3, Vector3};

use crate::Triangle;

/// A ray `origin + t * direction`, restricted to `t` in `[t_min, t_max]`.
///
/// The direction does not need to be normalized; `t` is measured in
/// multiples of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
    pub t_min: f32,
    pub t_max: f32,
}

impl Ray {
    /// Creates a ray covering `[0, ∞)`.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self::with_interval(origin, direction, 0.0, f32::INFINITY)
    }

    /// Creates a ray covering `[t_min, t_max]`.
    pub fn with_interval(
        origin: Point3<f32>,
        direction: Vector3<f32>,
        t_min: f32,
        t_max: f32,
    ) -> Self {
        Self {
            origin,
            direction,
            t_min,
            t_max,
        }
    }

    /// Returns the point at parameter `t`.
    #[inline]
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }
}

/// Closest intersection of a ray with the mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Ray parameter of the hit.
    pub t: f32,
    pub point: Point3<f32>,
    /// The stored triangle that was hit.
    pub triangle: Triangle,
}

/// A line segment from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Point3<f32>,
    pub end: Point3<f32>,
}

impl LineSegment {
    pub fn new(start: Point3<f32>, end: Point3<f32>) -> Self {
        Self { start, end }
    }

    /// The ray from `start` towards `end` covering `[0, 1]`.
    #[inline]
    pub fn to_ray(&self) -> Ray {
        Ray::with_interval(self.start, self.end - self.start, 0.0, 1.0)
    }
}

/// Intersection of a segment with the mesh closest to its start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    /// Fraction of the way from start to end, in `[0, 1]`.
    pub t: f32,
    pub point: Point3<f32>,
    pub triangle: Triangle,
}

/// A solid sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Point3<f32>,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Point3<f32>, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Contact between a sphere and a stored triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereHit {
    /// Point of the triangle closest to the sphere center.
    pub point: Point3<f32>,
    pub triangle: Triangle,
}
