//! CPU-side triangle meshes.

use glam::{Mat4, Vec2, Vec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// An inverted box that any point expands.
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Smallest box containing every point.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().fold(Self::EMPTY, |b, p| Self {
            min: b.min.min(p),
            max: b.max.max(p),
        })
    }

    /// Whether no point has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Box containing all eight transformed corners.
    #[must_use]
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        if self.is_empty() {
            return *self;
        }
        let corners = (0..8).map(|i| {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            matrix.transform_point3(corner)
        });
        Self::from_points(corners)
    }
}

/// Indexed triangle list with per-vertex attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    /// Object-space positions.
    pub positions: Vec<Vec3>,
    /// Unit normals, one per position.
    pub normals: Vec<Vec3>,
    /// Texture coordinates, one per position.
    pub uvs: Vec<Vec2>,
    /// Triangle list indices.
    pub indices: Vec<u32>,
    /// Bounds of `positions`.
    pub bounds: Aabb,
}

impl MeshData {
    /// Build a mesh, filling in whatever optional attributes are missing.
    ///
    /// Missing indices become `0..n`, missing normals are averaged from the
    /// faces, missing uvs are zero. Out-of-range indices drop their
    /// triangle.
    #[must_use]
    pub fn new(
        positions: Vec<Vec3>,
        normals: Option<Vec<Vec3>>,
        uvs: Option<Vec<Vec2>>,
        indices: Option<Vec<u32>>,
    ) -> Self {
        let count = positions.len();
        let indices = indices
            .unwrap_or_else(|| (0..count as u32).collect())
            .chunks_exact(3)
            .filter(|tri| tri.iter().all(|&i| (i as usize) < count))
            .flatten()
            .copied()
            .collect::<Vec<_>>();

        let normals = match normals {
            Some(n) if n.len() == count => n,
            _ => face_normals(&positions, &indices),
        };
        let uvs = match uvs {
            Some(uv) if uv.len() == count => uv,
            _ => vec![Vec2::ZERO; count],
        };
        let bounds = Aabb::from_points(positions.iter().copied());

        Self {
            positions,
            normals,
            uvs,
            indices,
            bounds,
        }
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as object-space corner triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }
}

/// Area-weighted vertex normals.
fn face_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let n = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
    }
    normals
        .into_iter()
        .map(|n| n.normalize_or(Vec3::Y))
        .collect()
}
