//! Indexed triangle mesh used as build input.

use log::warn;
use nalgebra::Point3;

use crate::{MeshError, MeshValidation, Polygon, Triangle};

/// A static triangle mesh: vertex positions plus a flat index list,
/// three indices per triangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    positions: Vec<Point3<f32>>,
    indices: Vec<u32>,
}

impl TriangleMesh {
    /// Creates a mesh from positions and a flat triangle index list.
    ///
    /// The data is checked when the tree is built, not here.
    pub fn new(positions: Vec<Point3<f32>>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Creates a mesh from unindexed triangles.
    pub fn from_triangles(triangles: &[Triangle]) -> Self {
        let positions: Vec<Point3<f32>> = triangles
            .iter()
            .flat_map(|t| t.vertices().iter().copied())
            .collect();
        let indices = (0..positions.len() as u32).collect();
        Self { positions, indices }
    }

    /// Creates the closed, outward-facing box spanning `min..max`
    /// (8 vertices, 12 triangles).
    pub fn cuboid(min: Point3<f32>, max: Point3<f32>) -> Self {
        let positions = vec![
            Point3::new(min.x, min.y, min.z),
            Point3::new(max.x, min.y, min.z),
            Point3::new(max.x, max.y, min.z),
            Point3::new(min.x, max.y, min.z),
            Point3::new(min.x, min.y, max.z),
            Point3::new(max.x, min.y, max.z),
            Point3::new(max.x, max.y, max.z),
            Point3::new(min.x, max.y, max.z),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 3, 2,  0, 2, 1, // -z
            4, 5, 6,  4, 6, 7, // +z
            0, 1, 5,  0, 5, 4, // -y
            3, 7, 6,  3, 6, 2, // +y
            0, 4, 7,  0, 7, 3, // -x
            1, 2, 6,  1, 6, 5, // +x
        ];
        Self { positions, indices }
    }

    /// Returns the vertex positions.
    #[inline]
    pub fn positions(&self) -> &[Point3<f32>] {
        &self.positions
    }

    /// Returns the flat index list.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of whole triangles described by the index list.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates over the triangles.
    ///
    /// # Panics
    /// Panics if an index is out of bounds; [`TriangleMesh::validate`] first.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            Triangle::new(
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            )
        })
    }

    /// Sum of all triangle areas.
    pub fn total_area(&self) -> f32 {
        self.triangles().map(|t| t.area()).sum()
    }

    /// Checks the index structure: whole triangles and in-bounds indices.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::IndexCount(self.indices.len()));
        }
        let vertex_count = self.positions.len();
        for (i, &index) in self.indices.iter().enumerate() {
            if index as usize >= vertex_count {
                return Err(MeshError::IndexOutOfBounds {
                    triangle: i / 3,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Converts the mesh into build polygons, one per triangle.
    ///
    /// Under [`MeshValidation::Strict`] the first non-finite vertex or
    /// degenerate triangle is an error; under [`MeshValidation::Lenient`]
    /// such triangles are dropped.
    pub(crate) fn to_polygons(
        &self,
        validation: MeshValidation,
    ) -> Result<Vec<Polygon>, MeshError> {
        self.validate()?;

        let mut polygons = Vec::with_capacity(self.triangle_count());
        let mut dropped = 0usize;

        for (triangle, tri) in self.indices.chunks_exact(3).enumerate() {
            let non_finite = tri
                .iter()
                .map(|&i| i as usize)
                .find(|&i| !self.positions[i].coords.iter().all(|c| c.is_finite()));

            let polygon = match non_finite {
                Some(_) => None,
                None => Polygon::new(tri.iter().map(|&i| self.positions[i as usize]).collect()),
            };

            match (polygon, validation) {
                (Some(polygon), _) => polygons.push(polygon),
                (None, MeshValidation::Lenient) => dropped += 1,
                (None, MeshValidation::Strict) => {
                    return Err(match non_finite {
                        Some(vertex) => MeshError::NonFiniteVertex { vertex },
                        None => MeshError::DegenerateTriangle { triangle },
                    });
                }
            }
        }

        if dropped > 0 {
            warn!(
                "Dropped {} of {} triangles with non-finite or degenerate geometry",
                dropped,
                self.triangle_count()
            );
        }

        Ok(polygons)
    }
}
