use std::ops::{Deref, DerefMut};

use wgpu::util::DeviceExt;

use super::core::CameraUniform;
use super::rig::CameraRig;
use crate::gpu::render_context::RenderContext;
use crate::options::Options;

/// Owns the [`CameraRig`] and the GPU resources that expose it to shaders.
///
/// Dereferences to the rig, so input and update calls go straight through.
pub struct CameraController {
    rig: CameraRig,

    /// CPU copy of the camera uniform.
    pub uniform: CameraUniform,
    /// GPU uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Bind group layout (binding 0 = camera uniform).
    pub layout: wgpu::BindGroupLayout,
    /// Bind group referencing [`Self::buffer`].
    pub bind_group: wgpu::BindGroup,
}

impl CameraController {
    /// Create the rig for the current surface size and upload the initial
    /// uniform.
    pub fn new(context: &RenderContext, options: &Options) -> Self {
        let rig = CameraRig::new(
            &options.camera,
            &options.fly_through,
            (context.config.width, context.config.height),
        );

        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&rig.camera);

        let buffer =
            context
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Camera Buffer"),
                    contents: bytemuck::cast_slice(&[uniform]),
                    usage: wgpu::BufferUsages::UNIFORM
                        | wgpu::BufferUsages::COPY_DST,
                });

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX
                        | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );

        let bind_group =
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                    label: Some("Camera Bind Group"),
                });

        Self {
            rig,
            uniform,
            buffer,
            layout,
            bind_group,
        }
    }

    /// Upload the current camera state.
    pub fn update_gpu(&mut self, queue: &wgpu::Queue) {
        self.uniform.update_view_proj(&self.rig.camera);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

impl Deref for CameraController {
    type Target = CameraRig;

    fn deref(&self) -> &CameraRig {
        &self.rig
    }
}

impl DerefMut for CameraController {
    fn deref_mut(&mut self) -> &mut CameraRig {
        &mut self.rig
    }
}
