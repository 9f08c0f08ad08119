//! Tree queries checked against brute force over the input mesh.

mod common;

use std::thread;

use approx::assert_abs_diff_eq;
use bsp_collision::{BspTree, BuildConfig, Ray, Sphere};

use common::{brute_force_ray, brute_force_sphere, init_logging, random_rays, random_spheres, scene};

fn check_ray(tree: &BspTree, expected: Option<f32>, ray: &Ray) {
    let actual = tree.intersect_ray(ray).map(|hit| hit.t);
    match (expected, actual) {
        (Some(expected), Some(actual)) => assert_abs_diff_eq!(expected, actual, epsilon = 1e-3),
        (None, None) => {}
        _ => panic!("ray {ray:?}: brute force {expected:?}, tree {actual:?}"),
    }
}

#[test]
fn rays_match_brute_force() {
    init_logging();
    let mesh = scene();
    let rays = random_rays(300, 1);

    for threshold in [12, 2] {
        let tree = BspTree::create(&mesh, &BuildConfig::default().with_leaf_threshold(threshold))
            .unwrap();
        let mut hits = 0;
        for ray in &rays {
            let expected = brute_force_ray(&mesh, ray);
            hits += usize::from(expected.is_some());
            check_ray(&tree, expected, ray);
        }
        assert!(hits > 0 && hits < rays.len(), "need both hits and misses, got {hits}");
    }
}

#[test]
fn hit_points_lie_on_hit_triangles() {
    let mesh = scene();
    let tree = BspTree::create(&mesh, &BuildConfig::default()).unwrap();

    for ray in random_rays(100, 2) {
        if let Some(hit) = tree.intersect_ray(&ray) {
            let on_triangle = hit.triangle.closest_point(&hit.point);
            assert_abs_diff_eq!((on_triangle - hit.point).norm(), 0.0, epsilon = 1e-3);
        }
    }
}

#[test]
fn spheres_match_brute_force() {
    init_logging();
    let mesh = scene();
    let tree = BspTree::create(&mesh, &BuildConfig::default().with_leaf_threshold(4)).unwrap();
    let eps = tree.epsilon();

    let mut touching = 0;
    for sphere in random_spheres(300, 3) {
        let expected = brute_force_sphere(&mesh, &sphere, eps);
        let any = tree.intersect_sphere(&sphere);
        let closest = tree.closest_sphere_contact(&sphere);
        assert_eq!(expected.is_some(), any.is_some(), "sphere {sphere:?}");
        assert_eq!(expected.is_some(), closest.is_some(), "sphere {sphere:?}");

        let (Some(expected), Some(any), Some(closest)) = (expected, any, closest) else {
            continue;
        };
        touching += 1;
        // Any contact is within reach, the closest one matches brute force
        assert!((any.point - sphere.center).norm() <= sphere.radius + eps + 1e-5);
        assert_abs_diff_eq!((closest.point - sphere.center).norm(), expected, epsilon = 1e-4);
    }
    assert!(touching > 0);
}

#[test]
fn zero_radius_sphere_on_surface() {
    let mesh = scene();
    let tree = BspTree::create(&mesh, &BuildConfig::default()).unwrap();

    for triangle in mesh.triangles().step_by(7) {
        let on_surface = Sphere::new(triangle.centroid(), 0.0);
        assert!(tree.intersect_sphere(&on_surface).is_some(), "missed {triangle:?}");
    }
}

#[test]
fn concurrent_queries() {
    init_logging();
    let mesh = scene();
    let tree = BspTree::create(&mesh, &BuildConfig::default().with_leaf_threshold(3)).unwrap();
    let rays = random_rays(400, 4);
    let expected: Vec<Option<f32>> = rays.iter().map(|ray| brute_force_ray(&mesh, ray)).collect();

    thread::scope(|scope| {
        for (rays, expected) in rays.chunks(100).zip(expected.chunks(100)) {
            let tree = &tree;
            scope.spawn(move || {
                for (ray, expected) in rays.iter().zip(expected) {
                    check_ray(tree, *expected, ray);
                }
            });
        }
    });
}
