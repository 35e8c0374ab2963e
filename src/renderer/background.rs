use crate::error::TidepoolError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, filtering_sampler, texture_2d,
};
use crate::gpu::shader_composer::{ShaderComposer, BACKGROUND_SHADER};
use crate::gpu::texture::SampledTexture;
use crate::scene::TextureImage;

/// Clears the frame and stretches the backdrop image over it.
pub struct BackgroundPass {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    image: Option<(SampledTexture, wgpu::BindGroup)>,
}

impl BackgroundPass {
    /// Build the full-screen pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`TidepoolError::Shader`] if the background shader fails to
    /// compose.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, TidepoolError> {
        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Background Bind Group Layout"),
                entries: &[texture_2d(0), filtering_sampler(1)],
            });
        let shader = shader_composer.compose(
            device,
            "Background Shader",
            BACKGROUND_SHADER,
            "background.wgsl",
        )?;
        let pipeline = create_screen_space_pipeline(
            device,
            "Background",
            &shader,
            format,
            &[&layout],
        );
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Background Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        Ok(Self {
            pipeline,
            layout,
            sampler,
            image: None,
        })
    }

    /// Replace (or remove) the backdrop.
    pub fn set_image(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: Option<&TextureImage>,
    ) {
        self.image = image.map(|image| {
            let texture =
                SampledTexture::from_image(device, queue, "Background", image);
            let bind_group =
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Background Bind Group"),
                    layout: &self.layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(
                                &texture.view,
                            ),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(
                                &self.sampler,
                            ),
                        },
                    ],
                });
            (texture, bind_group)
        });
    }

    /// Whether a backdrop image is set.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Clear `view` to `clear_color`, then draw the backdrop if any.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        clear_color: wgpu::Color,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Background Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        if let Some((_, bind_group)) = &self.image {
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, bind_group, &[]);
            pass.draw(0..3, 0..1);
        }
    }
}
