//! Node hierarchy and local transforms.

use glam::{Mat4, Quat, Vec3};

/// Translation, rotation and scale, applied scale-first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation.
    pub translation: Vec3,
    /// Rotation.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No-op transform.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Decompose an affine matrix.
    #[must_use]
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let (scale, rotation, translation) =
            matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Compose into a matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            self.rotation,
            self.translation,
        )
    }
}

/// One node of a model's hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    /// Name from the source file, if any.
    pub name: Option<String>,
    /// Parent node index within the same model.
    pub parent: Option<usize>,
    /// Transform relative to the parent (or the model root).
    pub local: Transform,
}

/// Resolve every node's transform relative to the model root.
///
/// Nodes whose parent chain forms a cycle are treated as roots.
#[must_use]
pub fn resolve_node_matrices(nodes: &[SceneNode]) -> Vec<Mat4> {
    let mut resolved: Vec<Option<Mat4>> = vec![None; nodes.len()];
    for index in 0..nodes.len() {
        resolve(nodes, index, &mut resolved, 0);
    }
    resolved
        .into_iter()
        .map(|m| m.unwrap_or(Mat4::IDENTITY))
        .collect()
}

fn resolve(
    nodes: &[SceneNode],
    index: usize,
    resolved: &mut [Option<Mat4>],
    depth: usize,
) -> Mat4 {
    if let Some(m) = resolved[index] {
        return m;
    }
    let local = nodes[index].local.matrix();
    let matrix = match nodes[index].parent {
        Some(parent) if parent < nodes.len() && depth < nodes.len() => {
            resolve(nodes, parent, resolved, depth + 1) * local
        }
        _ => local,
    };
    resolved[index] = Some(matrix);
    matrix
}
