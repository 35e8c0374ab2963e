//! Input and command dispatch for SceneEngine

use super::command::{SceneCommand, SceneEvent};
use super::SceneEngine;
use crate::camera::rig::CameraRig;
use crate::input::InputEvent;
use crate::picking::{click_target, pick, HoverState};
use crate::scene::Scene;

impl SceneEngine {
    /// Process a platform-agnostic input event.
    ///
    /// This is the primary input entry point. The
    /// [`InputProcessor`](crate::input::InputProcessor) turns gestures into
    /// commands, which then run through [`Self::execute`].
    ///
    /// ```ignore
    /// if let Some(SceneEvent::Navigate(url)) =
    ///     engine.handle_input(InputEvent::MouseButton { button, pressed })
    /// {
    ///     open(url);
    /// }
    /// ```
    pub fn handle_input(&mut self, event: InputEvent) -> Option<SceneEvent> {
        let command = self.input.handle_event(event)?;
        self.execute(command)
    }

    /// Run one command.
    pub fn execute(&mut self, command: SceneCommand) -> Option<SceneEvent> {
        dispatch(
            command,
            &mut self.camera_controller,
            &mut self.scene,
            &mut self.hover,
        )
    }

    /// Cursor position in normalized device coordinates, if known.
    #[must_use]
    pub fn cursor_ndc(&self) -> Option<glam::Vec2> {
        self.input.cursor_ndc()
    }
}

/// Apply `command` to the camera, scene and hover state.
pub(crate) fn dispatch(
    command: SceneCommand,
    rig: &mut CameraRig,
    scene: &mut Scene,
    hover: &mut HoverState,
) -> Option<SceneEvent> {
    match command {
        SceneCommand::RotateCamera { delta } => {
            let _ = rig.rotate(delta);
            None
        }
        SceneCommand::PanCamera { delta } => {
            let _ = rig.pan(delta);
            None
        }
        SceneCommand::Zoom { delta } => {
            let _ = rig.zoom(delta);
            None
        }
        SceneCommand::RestartFlyThrough => {
            log::debug!("fly-through restarted");
            rig.restart_fly_through();
            None
        }
        SceneCommand::SkipFlyThrough => {
            rig.skip_fly_through();
            None
        }
        SceneCommand::Hover { ndc } => {
            let hit = pick(&rig.ray_from_ndc(ndc), scene);
            hover
                .update(scene, hit.as_ref())
                .map(SceneEvent::CursorChanged)
        }
        SceneCommand::ClearHover => {
            hover.update(scene, None).map(SceneEvent::CursorChanged)
        }
        SceneCommand::Click { ndc } => {
            let hit = pick(&rig.ray_from_ndc(ndc), scene)?;
            let link = click_target(scene, &hit)?;
            log::info!("navigating to {link}");
            Some(SceneEvent::Navigate(link.to_owned()))
        }
        SceneCommand::ToggleHover => {
            let before = hover.cursor();
            hover.set_enabled(!hover.is_enabled(), scene);
            log::debug!("hover highlight enabled: {}", hover.is_enabled());
            let after = hover.cursor();
            (after != before).then_some(SceneEvent::CursorChanged(after))
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;
    use crate::camera::rig::CameraMode;
    use crate::engine::command::CursorIcon;
    use crate::options::Options;
    use crate::scene::tests::showcase_scene;

    struct Harness {
        rig: CameraRig,
        scene: Scene,
        hover: HoverState,
    }

    impl Harness {
        fn new() -> Self {
            let options = Options::default();
            let mut rig =
                CameraRig::new(&options.camera, &options.fly_through, (800, 600));
            rig.skip_fly_through();
            rig.update(0.0);
            Self {
                rig,
                scene: showcase_scene(),
                hover: HoverState::new(&options.hover),
            }
        }

        fn run(&mut self, command: SceneCommand) -> Option<SceneEvent> {
            dispatch(command, &mut self.rig, &mut self.scene, &mut self.hover)
        }

        /// NDC of a world point as seen by the rig's camera.
        fn ndc_of(&self, point: Vec3) -> Vec2 {
            let clip = self.rig.camera.build_matrix() * point.extend(1.0);
            Vec2::new(clip.x / clip.w, clip.y / clip.w)
        }
    }

    #[test]
    fn hovering_a_linked_model_shows_pointer() {
        let mut h = Harness::new();
        // Slightly off the quad diagonal of the gold model.
        let ndc = h.ndc_of(Vec3::new(-0.39, 0.505, 0.0));
        let event = h.run(SceneCommand::Hover { ndc });
        assert_eq!(event, Some(SceneEvent::CursorChanged(CursorIcon::Pointer)));
        let (model, _) = h.hover.hovered().unwrap();
        assert_eq!(h.scene.models[model].name, "gold");
        assert!(h.scene.models[model].materials[0].is_highlighted());

        // Same target again: no new event.
        assert_eq!(h.run(SceneCommand::Hover { ndc }), None);

        let event = h.run(SceneCommand::ClearHover);
        assert_eq!(event, Some(SceneEvent::CursorChanged(CursorIcon::Default)));
        assert!(!h.scene.models[model].materials[0].is_highlighted());
    }

    #[test]
    fn clicking_a_linked_model_navigates() {
        let mut h = Harness::new();
        let ndc = h.ndc_of(Vec3::new(-0.39, 0.505, 0.0));
        assert_eq!(
            h.run(SceneCommand::Click { ndc }),
            Some(SceneEvent::Navigate("/gold.html".into()))
        );
    }

    #[test]
    fn clicking_empty_space_does_nothing() {
        let mut h = Harness::new();
        assert_eq!(
            h.run(SceneCommand::Click {
                ndc: Vec2::new(0.99, 0.99)
            }),
            None
        );
    }

    #[test]
    fn toggling_hover_off_drops_the_highlight() {
        let mut h = Harness::new();
        let ndc = h.ndc_of(Vec3::new(-0.39, 0.505, 0.0));
        let _ = h.run(SceneCommand::Hover { ndc });
        let event = h.run(SceneCommand::ToggleHover);
        assert_eq!(event, Some(SceneEvent::CursorChanged(CursorIcon::Default)));
        assert!(h.hover.hovered().is_none());
        // Disabled: hovering highlights nothing.
        assert_eq!(h.run(SceneCommand::Hover { ndc }), None);
        assert!(h.hover.hovered().is_none());
        // Re-enabled with no cursor change.
        assert_eq!(h.run(SceneCommand::ToggleHover), None);
    }

    #[test]
    fn restart_and_skip_switch_camera_mode() {
        let mut h = Harness::new();
        assert_eq!(h.rig.mode(), CameraMode::Orbit);
        let _ = h.run(SceneCommand::RestartFlyThrough);
        assert_eq!(h.rig.mode(), CameraMode::FlyThrough);
        let _ = h.run(SceneCommand::SkipFlyThrough);
        assert_eq!(h.rig.mode(), CameraMode::Orbit);
    }
}
