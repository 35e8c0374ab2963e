use glam::Vec3;

use crate::camera::ray::Ray;
use crate::scene::mesh::Aabb;
use crate::scene::Scene;

/// Nearest intersection found by [`raycast`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Model index in the scene.
    pub model: usize,
    /// Drawable index within the model.
    pub drawable: usize,
    /// Node the drawable hangs from.
    pub node: usize,
    /// Distance from the ray origin along its (unit) direction.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// Entry distance of a ray into a box (slab test). A ray starting inside
/// the box enters at 0.
#[must_use]
pub fn ray_aabb(origin: Vec3, direction: Vec3, aabb: &Aabb) -> Option<f32> {
    if aabb.is_empty() {
        return None;
    }
    let inv = direction.recip();
    let t0 = (aabb.min - origin) * inv;
    let t1 = (aabb.max - origin) * inv;
    let near = t0.min(t1);
    let far = t0.max(t1);
    // Axis-parallel lanes are ±inf (or NaN on a slab face); min/max skip NaN.
    let enter = near.max_element().max(0.0);
    let exit = far.min_element();
    (enter <= exit).then_some(enter)
}

/// Möller–Trumbore ray/triangle test. With `cull_back`, triangles whose
/// counter-clockwise front face points away from the ray are skipped.
#[must_use]
pub fn ray_triangle(
    origin: Vec3,
    direction: Vec3,
    tri: [Vec3; 3],
    cull_back: bool,
) -> Option<f32> {
    let e1 = tri[1] - tri[0];
    let e2 = tri[2] - tri[0];
    let p = direction.cross(e2);
    // Positive when the ray meets the front face.
    let det = e1.dot(p);
    let epsilon = f32::EPSILON * e1.length() * e2.length() * direction.length();
    if det.abs() <= epsilon || (cull_back && det < 0.0) {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = origin - tri[0];
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv_det;
    (t > 0.0).then_some(t)
}

/// Nearest hit among the `candidates` models.
///
/// Each drawable is tested in its own object space: the ray is mapped
/// through the inverse world matrix without renormalizing, so the ray
/// parameter stays a world-space distance. Back faces only count for
/// double-sided materials, judged by object-space winding.
#[must_use]
pub fn raycast(
    ray: &Ray,
    scene: &Scene,
    candidates: impl IntoIterator<Item = usize>,
) -> Option<Hit> {
    let mut best: Option<Hit> = None;
    for model_index in candidates {
        let Some(model) = scene.models.get(model_index) else {
            continue;
        };
        let limit = best.map_or(f32::INFINITY, |b| b.distance);
        match ray_aabb(ray.origin, ray.direction, &model.world_bounds()) {
            Some(enter) if enter < limit => {}
            _ => continue,
        }
        let matrices = model.world_matrices();
        for (drawable_index, drawable) in model.drawables.iter().enumerate() {
            let (Some(mesh), Some(world)) =
                (model.meshes.get(drawable.mesh), matrices.get(drawable.node))
            else {
                continue;
            };
            if world.determinant().abs() <= f32::MIN_POSITIVE {
                continue;
            }
            let inverse = world.inverse();
            let origin = inverse.transform_point3(ray.origin);
            let direction = inverse.transform_vector3(ray.direction);

            let limit = best.map_or(f32::INFINITY, |b| b.distance);
            match ray_aabb(origin, direction, &mesh.bounds) {
                Some(enter) if enter < limit => {}
                _ => continue,
            }

            let cull_back = !model
                .materials
                .get(drawable.material)
                .is_some_and(|m| m.double_sided);
            let nearest = mesh
                .triangles()
                .filter_map(|tri| ray_triangle(origin, direction, tri, cull_back))
                .fold(f32::INFINITY, f32::min);
            if nearest < best.map_or(f32::INFINITY, |b| b.distance) {
                best = Some(Hit {
                    model: model_index,
                    drawable: drawable_index,
                    node: drawable.node,
                    distance: nearest,
                    point: ray.at(nearest),
                });
            }
        }
    }
    best
}

/// Nearest hit among the clickable models.
#[must_use]
pub fn pick(ray: &Ray, scene: &Scene) -> Option<Hit> {
    raycast(ray, scene, scene.clickable_models())
}
