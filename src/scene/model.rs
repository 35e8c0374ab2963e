//! A loaded model placed in the scene.

use glam::{Mat4, Quat, Vec3};

use super::material::{Material, TextureImage};
use super::mesh::{Aabb, MeshData};
use super::node::{resolve_node_matrices, SceneNode, Transform};
use crate::animation::{AnimationClip, AnimationMixer};
use crate::manifest::{FloatMotion, ModelSpec};

/// One mesh drawn with one material at one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drawable {
    /// Node whose world matrix positions the mesh.
    pub node: usize,
    /// Index into [`SceneModel::meshes`].
    pub mesh: usize,
    /// Index into [`SceneModel::materials`].
    pub material: usize,
}

/// Everything decoded from one model file, before placement.
#[derive(Debug, Clone, Default)]
pub struct ModelData {
    /// Node hierarchy.
    pub nodes: Vec<SceneNode>,
    /// Triangle meshes.
    pub meshes: Vec<MeshData>,
    /// Materials, shared between drawables.
    pub materials: Vec<Material>,
    /// Decoded textures referenced by materials.
    pub textures: Vec<TextureImage>,
    /// Mesh/material/node triples.
    pub drawables: Vec<Drawable>,
    /// Animation clips.
    pub clips: Vec<AnimationClip>,
}

/// A placed, animated model.
#[derive(Debug, Clone)]
pub struct SceneModel {
    /// Name from the manifest.
    pub name: String,
    /// Root placement (scale, `(x, y)` offset and Y rotation).
    pub root: Transform,
    /// Per-frame bobbing.
    pub float: Option<FloatMotion>,
    /// Whether the vertex bend applies.
    pub bend: bool,
    /// Navigation target on click.
    pub link: Option<String>,
    /// Node hierarchy; animated in place.
    pub nodes: Vec<SceneNode>,
    /// Triangle meshes.
    pub meshes: Vec<MeshData>,
    /// Materials; hover highlight mutates these.
    pub materials: Vec<Material>,
    /// Decoded textures.
    pub textures: Vec<TextureImage>,
    /// What to draw.
    pub drawables: Vec<Drawable>,
    /// Plays every clip of the file.
    pub mixer: AnimationMixer,
}

impl SceneModel {
    /// Place decoded model data according to its manifest entry.
    #[must_use]
    pub fn new(spec: &ModelSpec, data: ModelData) -> Self {
        let root = Transform {
            translation: Vec3::new(spec.offset[0], spec.offset[1], 0.0),
            rotation: Quat::from_rotation_y(spec.rotate_y),
            scale: Vec3::splat(spec.scale),
        };
        Self {
            name: spec.name.clone(),
            root,
            float: spec.float,
            bend: spec.bend,
            link: spec.link.clone(),
            nodes: data.nodes,
            meshes: data.meshes,
            materials: data.materials,
            textures: data.textures,
            drawables: data.drawables,
            mixer: AnimationMixer::new(data.clips),
        }
    }

    /// Whether hover and click apply to this model.
    #[must_use]
    pub fn is_clickable(&self) -> bool {
        self.link.is_some()
    }

    /// Whether the root scale flips triangle winding.
    #[must_use]
    pub fn is_mirrored(&self) -> bool {
        self.root.scale.x * self.root.scale.y * self.root.scale.z < 0.0
    }

    /// World matrix of every node (root placement included).
    #[must_use]
    pub fn world_matrices(&self) -> Vec<Mat4> {
        let root = self.root.matrix();
        resolve_node_matrices(&self.nodes)
            .into_iter()
            .map(|m| root * m)
            .collect()
    }

    /// World matrix of a single node, or the root matrix for an unknown
    /// index.
    #[must_use]
    pub fn world_matrix(&self, node: usize) -> Mat4 {
        self.world_matrices()
            .get(node)
            .copied()
            .unwrap_or_else(|| self.root.matrix())
    }

    /// World-space bounds of every drawable.
    #[must_use]
    pub fn world_bounds(&self) -> Aabb {
        let matrices = self.world_matrices();
        self.drawables
            .iter()
            .filter_map(|d| {
                let mesh = self.meshes.get(d.mesh)?;
                let matrix = matrices.get(d.node)?;
                Some(mesh.bounds.transformed(matrix))
            })
            .fold(Aabb::EMPTY, |acc, b| Aabb {
                min: acc.min.min(b.min),
                max: acc.max.max(b.max),
            })
    }

    /// Set the emissive color of the material drawn by `drawable`.
    ///
    /// Materials are shared, so every drawable using the same material
    /// lights up with it.
    pub fn set_highlight(&mut self, drawable: usize, color: [f32; 3]) {
        if let Some(material) = self.material_mut(drawable) {
            material.highlight(color);
        }
    }

    /// Restore the original emissive color of the material drawn by
    /// `drawable`.
    pub fn clear_highlight(&mut self, drawable: usize) {
        if let Some(material) = self.material_mut(drawable) {
            material.restore_emissive();
        }
    }

    fn material_mut(&mut self, drawable: usize) -> Option<&mut Material> {
        let index = self.drawables.get(drawable)?.material;
        self.materials.get_mut(index)
    }

    /// Apply float motion and advance animations.
    pub fn tick(&mut self, elapsed: f32, dt: f32) {
        if let Some(float) = &self.float {
            self.root.translation.y = float.offset(elapsed);
        }
        self.mixer.update(dt, &mut self.nodes);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use glam::Vec2;

    use super::*;
    use crate::manifest::SceneManifest;

    /// Unit quad in the XY plane centred on the origin, one node, one
    /// material.
    pub(crate) fn quad_data() -> ModelData {
        let positions = vec![
            Vec3::new(-0.5, -0.5, 0.0),
            Vec3::new(0.5, -0.5, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
            Vec3::new(-0.5, 0.5, 0.0),
        ];
        let uvs = vec![Vec2::ZERO; 4];
        ModelData {
            nodes: vec![SceneNode {
                name: Some("quad".into()),
                parent: None,
                local: Transform::IDENTITY,
            }],
            meshes: vec![MeshData::new(
                positions,
                None,
                Some(uvs),
                Some(vec![0, 1, 2, 0, 2, 3]),
            )],
            materials: vec![Material::default()],
            textures: Vec::new(),
            drawables: vec![Drawable {
                node: 0,
                mesh: 0,
                material: 0,
            }],
            clips: Vec::new(),
        }
    }

    fn spec(name: &str) -> ModelSpec {
        SceneManifest::default()
            .models
            .into_iter()
            .find(|m| m.name == name)
            .unwrap_or_else(|| panic!("no model {name}"))
    }

    #[test]
    fn root_transform_follows_manifest() {
        let model = SceneModel::new(&spec("gold"), quad_data());
        assert_eq!(model.root.translation, Vec3::new(-0.4, 0.5, 0.0));
        assert_eq!(model.root.scale, Vec3::splat(0.05));
        assert!(model.is_clickable());
        assert!(model.bend);
    }

    #[test]
    fn negative_scale_is_mirrored() {
        assert!(SceneModel::new(&spec("anchoby"), quad_data()).is_mirrored());
        assert!(!SceneModel::new(&spec("mini"), quad_data()).is_mirrored());
    }

    #[test]
    fn tick_applies_float_motion() {
        let mut model = SceneModel::new(&spec("whaleshark"), quad_data());
        let t = std::f32::consts::FRAC_PI_2 / 1.5;
        model.tick(t, 0.016);
        assert!((model.root.translation.y - 1.07).abs() < 1e-5);
        assert_eq!(model.root.translation.x, -0.2);
    }

    #[test]
    fn tick_without_float_keeps_offset() {
        let mut model = SceneModel::new(&spec("gigante"), quad_data());
        model.tick(3.0, 0.016);
        assert_eq!(model.root.translation.y, 0.40);
    }

    #[test]
    fn world_bounds_include_root_scale() {
        let model = SceneModel::new(&spec("gold"), quad_data());
        let bounds = model.world_bounds();
        assert!((bounds.max.x - bounds.min.x - 0.05 * (0.5f32).cos()).abs() < 1e-4);
        assert!((bounds.max.y - bounds.min.y - 0.05).abs() < 1e-5);
    }

    #[test]
    fn highlight_targets_shared_material() {
        let mut data = quad_data();
        data.drawables.push(Drawable {
            node: 0,
            mesh: 0,
            material: 0,
        });
        let mut model = SceneModel::new(&spec("gold"), data);
        model.set_highlight(1, [0.0, 1.0, 0.0]);
        assert!(model.materials[0].is_highlighted());
        model.clear_highlight(0);
        assert!(!model.materials[0].is_highlighted());

        model.set_highlight(9, [1.0, 0.0, 0.0]);
        assert!(!model.materials[0].is_highlighted());
    }
}
