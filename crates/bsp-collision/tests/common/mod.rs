//! Meshes and brute-force references shared by the integration tests.

#![allow(dead_code)]

use std::f32::consts::PI;

use bsp_collision::{Ray, Sphere, Triangle, TriangleMesh};
use nalgebra::{Point3, Vector3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn unit_cube() -> TriangleMesh {
    TriangleMesh::cuboid(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
}

/// Latitude/longitude sphere with triangle fans at the poles.
pub fn uv_sphere(center: Point3<f32>, radius: f32, stacks: u32, slices: u32) -> TriangleMesh {
    let mut positions = vec![center + Vector3::z() * radius];
    for i in 1..stacks {
        let phi = PI * i as f32 / stacks as f32;
        for j in 0..slices {
            let theta = 2.0 * PI * j as f32 / slices as f32;
            let direction = Vector3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());
            positions.push(center + direction * radius);
        }
    }
    let south = positions.len() as u32;
    positions.push(center - Vector3::z() * radius);

    let ring = |i: u32, j: u32| 1 + (i - 1) * slices + j % slices;
    let mut indices = Vec::new();
    for j in 0..slices {
        indices.extend([0, ring(1, j), ring(1, j + 1)]);
    }
    for i in 1..stacks - 1 {
        for j in 0..slices {
            let (a, b) = (ring(i, j), ring(i, j + 1));
            let (c, d) = (ring(i + 1, j), ring(i + 1, j + 1));
            indices.extend([a, c, d, a, d, b]);
        }
    }
    for j in 0..slices {
        indices.extend([ring(stacks - 1, j), south, ring(stacks - 1, j + 1)]);
    }

    TriangleMesh::new(positions, indices)
}

/// Concatenates meshes into one.
pub fn merge(meshes: &[TriangleMesh]) -> TriangleMesh {
    let mut positions = Vec::new();
    let mut indices = Vec::new();
    for mesh in meshes {
        let base = positions.len() as u32;
        positions.extend_from_slice(mesh.positions());
        indices.extend(mesh.indices().iter().map(|i| i + base));
    }
    TriangleMesh::new(positions, indices)
}

/// A few hundred triangles: two spheres, a floor slab and a block.
pub fn scene() -> TriangleMesh {
    merge(&[
        uv_sphere(Point3::origin(), 1.0, 12, 16),
        uv_sphere(Point3::new(-2.0, 1.0, 0.0), 0.6, 8, 10),
        TriangleMesh::cuboid(Point3::new(-3.0, -3.0, -1.5), Point3::new(3.0, 3.0, -1.2)),
        TriangleMesh::cuboid(Point3::new(1.5, -0.5, -1.2), Point3::new(2.5, 0.5, 0.0)),
    ])
}

/// Rays from far outside the scene aimed at random points inside it.
pub fn random_rays(count: usize, seed: u64) -> Vec<Ray> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let origin = random_direction(&mut rng) * 8.0;
            let target = Vector3::new(
                rng.random_range(-2.5..2.5),
                rng.random_range(-2.5..2.5),
                rng.random_range(-1.4..1.0),
            );
            Ray::new(Point3::from(origin), target - origin)
        })
        .collect()
}

/// Spheres scattered through the scene, some touching geometry.
pub fn random_spheres(count: usize, seed: u64) -> Vec<Sphere> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let center = Point3::new(
                rng.random_range(-3.0..3.0),
                rng.random_range(-3.0..3.0),
                rng.random_range(-2.0..1.5),
            );
            Sphere::new(center, rng.random_range(0.0..0.5))
        })
        .collect()
}

fn random_direction<R: Rng>(rng: &mut R) -> Vector3<f32> {
    loop {
        let v = Vector3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        if let Some(unit) = v.try_normalize(1e-3) {
            if v.norm() <= 1.0 {
                return unit;
            }
        }
    }
}

/// Closest hit parameter over every mesh triangle.
pub fn brute_force_ray(mesh: &TriangleMesh, ray: &Ray) -> Option<f32> {
    mesh.triangles()
        .filter_map(|t| t.intersect_ray(&ray.origin, &ray.direction, ray.t_min, ray.t_max))
        .min_by(f32::total_cmp)
}

/// Distance from the sphere center to the closest touching triangle.
pub fn brute_force_sphere(mesh: &TriangleMesh, sphere: &Sphere, tolerance: f32) -> Option<f32> {
    mesh.triangles()
        .filter_map(|t| t.intersect_sphere(&sphere.center, sphere.radius, tolerance))
        .map(|point| (point - sphere.center).norm())
        .min_by(f32::total_cmp)
}

pub fn total_area(triangles: &[Triangle]) -> f32 {
    triangles.iter().map(Triangle::area).sum()
}
