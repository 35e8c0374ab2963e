//! CPU ray picking and hover highlighting.
//!
//! Hover and click cast a ray from the camera through the cursor and test
//! it against the undeformed triangles of the clickable models. The nearest
//! hit drives the emissive highlight and the navigation target.

mod hover;
mod raycast;

pub use hover::{CursorIcon, HoverState};
pub use raycast::{pick, ray_aabb, ray_triangle, raycast, Hit};

use crate::scene::Scene;

/// Navigation target of the model that was hit, if it has one.
#[must_use]
pub fn click_target<'a>(scene: &'a Scene, hit: &Hit) -> Option<&'a str> {
    scene.models.get(hit.model)?.link.as_deref()
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::camera::ray::Ray;
    use crate::scene::tests::showcase_scene;

    #[test]
    fn clicking_gold_navigates_to_its_page() {
        let scene = showcase_scene();
        // Gold sits at (-0.4, 0.5, 0).
        let ray = Ray {
            origin: Vec3::new(-0.39, 0.505, 5.0),
            direction: Vec3::NEG_Z,
        };
        let hit = pick(&ray, &scene);
        let target = hit.as_ref().and_then(|h| click_target(&scene, h));
        assert_eq!(target, Some("/gold.html"));
    }
}
