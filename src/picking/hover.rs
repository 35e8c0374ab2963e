use super::raycast::Hit;
use crate::options::HoverOptions;
use crate::scene::Scene;
use crate::util::color::hex_to_linear;

/// Mouse cursor the front end should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorIcon {
    /// Arrow.
    #[default]
    Default,
    /// Hand, shown over clickable models.
    Pointer,
}

/// Tracks which drawable is highlighted under the cursor.
#[derive(Debug, Clone)]
pub struct HoverState {
    /// `(model, drawable)` currently highlighted.
    hovered: Option<(usize, usize)>,
    color: [f32; 3],
    enabled: bool,
    cursor: CursorIcon,
}

impl HoverState {
    /// Hover tracking with the configured highlight color.
    #[must_use]
    pub fn new(options: &HoverOptions) -> Self {
        Self {
            hovered: None,
            color: hex_to_linear(options.highlight_color),
            enabled: options.enabled,
            cursor: CursorIcon::Default,
        }
    }

    /// `(model, drawable)` under the cursor.
    #[must_use]
    pub fn hovered(&self) -> Option<(usize, usize)> {
        self.hovered
    }

    /// Cursor as of the last update.
    #[must_use]
    pub fn cursor(&self) -> CursorIcon {
        self.cursor
    }

    /// Whether hovering highlights anything.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Apply new options; disabling clears the current highlight.
    pub fn set_options(&mut self, options: &HoverOptions, scene: &mut Scene) {
        self.color = hex_to_linear(options.highlight_color);
        if let Some((model, drawable)) = self.hovered {
            if let Some(m) = scene.models.get_mut(model) {
                m.set_highlight(drawable, self.color);
            }
        }
        self.set_enabled(options.enabled, scene);
    }

    /// Turn highlighting on or off.
    pub fn set_enabled(&mut self, enabled: bool, scene: &mut Scene) {
        self.enabled = enabled;
        if !enabled {
            self.release(scene);
            self.cursor = CursorIcon::Default;
        }
    }

    /// Move the highlight to `hit`. Returns the new cursor when it changes.
    pub fn update(&mut self, scene: &mut Scene, hit: Option<&Hit>) -> Option<CursorIcon> {
        let target = hit
            .filter(|_| self.enabled)
            .map(|h| (h.model, h.drawable));
        if target != self.hovered {
            self.release(scene);
            if let Some((model, drawable)) = target {
                if let Some(m) = scene.models.get_mut(model) {
                    m.set_highlight(drawable, self.color);
                }
            }
            self.hovered = target;
        }

        let cursor = if self.hovered.is_some() {
            CursorIcon::Pointer
        } else {
            CursorIcon::Default
        };
        (cursor != std::mem::replace(&mut self.cursor, cursor)).then_some(cursor)
    }

    fn release(&mut self, scene: &mut Scene) {
        if let Some((model, drawable)) = self.hovered.take() {
            if let Some(m) = scene.models.get_mut(model) {
                m.clear_highlight(drawable);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::scene::tests::showcase_scene;

    fn hit(scene: &Scene, name: &str) -> Hit {
        let model = scene
            .models
            .iter()
            .position(|m| m.name == name)
            .unwrap();
        Hit {
            model,
            drawable: 0,
            node: 0,
            distance: 1.0,
            point: Vec3::ZERO,
        }
    }

    fn emissive(scene: &Scene, name: &str) -> [f32; 3] {
        scene.model(name).unwrap().materials[0].emissive
    }

    #[test]
    fn hover_highlights_and_restores() {
        let mut scene = showcase_scene();
        let mut hover = HoverState::new(&HoverOptions::default());
        let gold = hit(&scene, "gold");

        assert_eq!(hover.update(&mut scene, Some(&gold)), Some(CursorIcon::Pointer));
        assert_eq!(emissive(&scene, "gold"), [0.0, 1.0, 0.0]);

        // Same target again: nothing changes.
        assert_eq!(hover.update(&mut scene, Some(&gold)), None);

        assert_eq!(hover.update(&mut scene, None), Some(CursorIcon::Default));
        assert_eq!(emissive(&scene, "gold"), [0.0, 0.0, 0.0]);
        assert_eq!(hover.hovered(), None);
    }

    #[test]
    fn moving_between_models_swaps_highlight() {
        let mut scene = showcase_scene();
        let mut hover = HoverState::new(&HoverOptions::default());
        let gold = hit(&scene, "gold");
        let shark = hit(&scene, "whaleshark");

        let _ = hover.update(&mut scene, Some(&gold));
        assert_eq!(hover.update(&mut scene, Some(&shark)), None);
        assert!(!scene.model("gold").unwrap().materials[0].is_highlighted());
        assert!(scene.model("whaleshark").unwrap().materials[0].is_highlighted());
    }

    #[test]
    fn disabling_clears_highlight() {
        let mut scene = showcase_scene();
        let mut hover = HoverState::new(&HoverOptions::default());
        let gold = hit(&scene, "gold");
        let _ = hover.update(&mut scene, Some(&gold));

        hover.set_enabled(false, &mut scene);
        assert!(!scene.model("gold").unwrap().materials[0].is_highlighted());
        assert_eq!(hover.cursor(), CursorIcon::Default);
        assert_eq!(hover.update(&mut scene, Some(&gold)), None);
        assert!(!scene.model("gold").unwrap().materials[0].is_highlighted());
    }

    #[test]
    fn custom_color_is_linearized() {
        let mut scene = showcase_scene();
        let options = HoverOptions {
            enabled: true,
            highlight_color: 0xff_00_00,
        };
        let mut hover = HoverState::new(&options);
        let gold = hit(&scene, "gold");
        let _ = hover.update(&mut scene, Some(&gold));
        assert_eq!(emissive(&scene, "gold"), [1.0, 0.0, 0.0]);
    }
}
