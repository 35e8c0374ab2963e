use super::lighting::Lighting;
use super::mesh::{mesh_vertex_buffer_layout, MeshRenderer};
use super::pipeline_util::{depth_stencil_state, double_sided_triangles};
use crate::error::TidepoolError;
use crate::gpu::shader_composer::{ShaderComposer, SHADOW_SHADER};

/// Depth-only render of shadow casters from the directional light.
pub struct ShadowPass {
    pipeline: wgpu::RenderPipeline,
}

impl ShadowPass {
    /// Build the depth pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`TidepoolError::Shader`] if the shadow shader fails to
    /// compose.
    pub fn new(
        device: &wgpu::Device,
        lighting: &Lighting,
        meshes: &MeshRenderer,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, TidepoolError> {
        let shader = shader_composer.compose(
            device,
            "Shadow Shader",
            SHADOW_SHADER,
            "shadow.wgsl",
        )?;
        let layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Shadow Pipeline Layout"),
                bind_group_layouts: &[
                    &lighting.light_camera_layout,
                    meshes.draw_layout(),
                ],
                push_constant_ranges: &[],
            });
        let pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Shadow Pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[mesh_vertex_buffer_layout()],
                    compilation_options: Default::default(),
                },
                fragment: None,
                primitive: double_sided_triangles(),
                depth_stencil: Some(depth_stencil_state()),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });
        Ok(Self { pipeline })
    }

    /// Clear the shadow map and render every caster into it.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        lighting: &Lighting,
        meshes: &MeshRenderer,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Shadow Pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(
                wgpu::RenderPassDepthStencilAttachment {
                    view: &lighting.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                },
            ),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &lighting.light_camera_bind_group, &[]);
        meshes.draw_depth(&mut pass);
    }
}
