//! The engine: owns the GPU context, the scene and every subsystem, and
//! turns input into camera motion, hover highlights and navigation.

pub mod command;
mod input;
mod options;

use crate::camera::controller::CameraController;
use crate::camera::rig::CameraMode;
use crate::error::TidepoolError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::DepthTexture;
use crate::input::InputProcessor;
use crate::options::Options;
use crate::picking::HoverState;
use crate::renderer::{BackgroundPass, Lighting, MeshRenderer, ShadowPass};
use crate::scene::Scene;
use crate::util::color::hex_to_wgpu;
use crate::util::frame_timing::{FrameTick, FrameTiming};

pub use command::{CursorIcon, SceneCommand, SceneEvent};

/// Render size for a window of `physical` pixels at `scale_factor`, with
/// the device pixel ratio clamped to `pixel_ratio`.
#[must_use]
pub fn render_size(
    physical: (u32, u32),
    scale_factor: f64,
    pixel_ratio: f64,
) -> (u32, u32) {
    if scale_factor <= 0.0 {
        return physical;
    }
    let scale = pixel_ratio / scale_factor;
    let w = (f64::from(physical.0) * scale).round() as u32;
    let h = (f64::from(physical.1) * scale).round() as u32;
    (w.max(1).min(physical.0.max(1)), h.max(1).min(physical.1.max(1)))
}

/// Interactive showcase renderer.
pub struct SceneEngine {
    context: RenderContext,
    camera_controller: CameraController,
    lighting: Lighting,
    meshes: MeshRenderer,
    shadow_pass: ShadowPass,
    background: BackgroundPass,
    depth: DepthTexture,
    scene: Scene,
    hover: HoverState,
    input: InputProcessor,
    options: Options,
    frame_timing: FrameTiming,
    elapsed: f32,
    window_size: (u32, u32),
    scale_factor: f64,
}

impl SceneEngine {
    /// Create the GPU context on `window`, build every pass and upload
    /// `scene`.
    ///
    /// `size` is the window size in physical pixels.
    ///
    /// # Errors
    ///
    /// Returns [`TidepoolError::Gpu`] if no adapter or device is available
    /// and [`TidepoolError::Shader`] if a shader fails to compose.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        scale_factor: f64,
        options: Options,
        scene: Scene,
    ) -> Result<Self, TidepoolError> {
        let surface_size = render_size(
            size,
            scale_factor,
            options.renderer.pixel_ratio(scale_factor),
        );
        let context = RenderContext::new(window, surface_size).await?;
        let mut shader_composer = ShaderComposer::new()?;

        let camera_controller = CameraController::new(&context, &options);
        let lighting =
            Lighting::new(&context.device, &options.lighting, &options.renderer);
        let meshes = MeshRenderer::new(
            &context.device,
            &context.queue,
            context.format(),
            &camera_controller.layout,
            &lighting.layout,
            &mut shader_composer,
        )?;
        let shadow_pass = ShadowPass::new(
            &context.device,
            &lighting,
            &meshes,
            &mut shader_composer,
        )?;
        let background = BackgroundPass::new(
            &context.device,
            context.format(),
            &mut shader_composer,
        )?;
        let (w, h) = context.size();
        let depth = DepthTexture::new(&context.device, "Depth Texture", w, h, false);

        let mut input = InputProcessor::with_key_bindings(options.keybindings.clone());
        input.set_viewport(size.0, size.1);

        let mut engine = Self {
            context,
            camera_controller,
            lighting,
            meshes,
            shadow_pass,
            background,
            depth,
            scene: Scene::default(),
            hover: HoverState::new(&options.hover),
            input,
            options,
            frame_timing: FrameTiming::new(),
            elapsed: 0.0,
            window_size: size,
            scale_factor,
        };
        engine.set_scene(scene);
        log::info!(
            "engine ready: {} models, surface {}x{}",
            engine.scene.models.len(),
            w,
            h
        );
        Ok(engine)
    }

    /// Replace the scene and upload its meshes, textures and backdrop.
    pub fn set_scene(&mut self, scene: Scene) {
        self.hover = HoverState::new(&self.options.hover);
        self.scene = scene;
        self.meshes
            .upload_scene(&self.context.device, &self.context.queue, &self.scene);
        self.background.set_image(
            &self.context.device,
            &self.context.queue,
            self.scene.background.as_ref(),
        );
    }

    /// Track a new window size in physical pixels. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.window_size = (width, height);
        self.input.set_viewport(width, height);
        let (w, h) = render_size(
            self.window_size,
            self.scale_factor,
            self.options.renderer.pixel_ratio(self.scale_factor),
        );
        self.context.resize(w, h);
        self.camera_controller.resize(w, h);
        self.depth =
            DepthTexture::new(&self.context.device, "Depth Texture", w, h, false);
    }

    /// Track a new display scale factor.
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
        let (w, h) = self.window_size;
        self.resize(w, h);
    }

    /// Advance the scene and camera by `dt` seconds and upload uniforms.
    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        self.scene.tick(FrameTick {
            elapsed: self.elapsed,
            delta: dt,
        });
        self.camera_controller.update(dt);
        self.camera_controller.update_gpu(&self.context.queue);
        self.meshes
            .prepare(&self.context.queue, &self.scene, &self.options.bend);
    }

    /// Sample the frame clock, update, and render.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain frame cannot be
    /// acquired.
    pub fn frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let tick = self.frame_timing.tick();
        self.update(tick.delta);
        self.render()
    }

    /// Encode and present one frame: shadow map, background, meshes.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain frame cannot be
    /// acquired.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();

        if self.options.renderer.shadows {
            self.shadow_pass
                .render(&mut encoder, &self.lighting, &self.meshes);
        }
        self.background.render(
            &mut encoder,
            &view,
            hex_to_wgpu(self.options.renderer.clear_color),
        );
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Mesh Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            depth_slice: None,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Discard,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
            pass.set_bind_group(0, &self.camera_controller.bind_group, &[]);
            pass.set_bind_group(1, &self.lighting.bind_group, &[]);
            self.meshes.draw(&mut pass);
        }

        self.context.submit(encoder);
        frame.present();
        Ok(())
    }

    /// Reconfigure the surface after `Lost`/`Outdated`.
    pub fn reconfigure(&self) {
        self.context.reconfigure();
    }

    /// The loaded scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Who currently drives the camera.
    #[must_use]
    pub fn camera_mode(&self) -> CameraMode {
        self.camera_controller.mode()
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_size_clamps_pixel_ratio() {
        // A 3x display limited to 2x renders at two thirds of the
        // physical size.
        assert_eq!(render_size((3000, 1500), 3.0, 2.0), (2000, 1000));
        assert_eq!(render_size((800, 600), 1.0, 1.0), (800, 600));
        assert_eq!(render_size((800, 600), 0.0, 1.0), (800, 600));
    }

    #[test]
    fn render_size_never_exceeds_the_window() {
        assert_eq!(render_size((100, 50), 0.5, 1.0), (100, 50));
        assert_eq!(render_size((1, 1), 3.0, 1.0), (1, 1));
    }
}
