use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::camera::core::CameraUniform;
use crate::gpu::pipeline_helpers::{
    comparison_sampler, depth_texture_2d, shadow_sampler, uniform_buffer,
};
use crate::gpu::texture::DepthTexture;
use crate::options::{LightingOptions, RendererOptions};
use crate::util::color::hex_to_linear;

/// Lighting configuration shared by the mesh shader.
/// NOTE: Must match the WGSL `LightingUniform` layout exactly (128 bytes)
///
/// WGSL layout:
///   ambient: vec4<f32>          (offset 0)
///   light_color: vec4<f32>      (offset 16)
///   light_direction: vec4<f32>  (offset 32)
///   light_view_proj: mat4x4     (offset 48)
///   shadow: vec4<f32>           (offset 112)
///   Total: 128 bytes
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    /// Linear ambient color times intensity (w unused).
    pub ambient: [f32; 4],
    /// Linear directional color times intensity (w unused).
    pub light_color: [f32; 4],
    /// Unit vector toward the light (w unused).
    pub light_direction: [f32; 4],
    /// World to light clip space.
    pub light_view_proj: [[f32; 4]; 4],
    /// Enabled flag, depth bias, texel size, soft flag.
    pub shadow: [f32; 4],
}

impl LightingUniform {
    /// Build from options.
    #[must_use]
    pub fn from_options(lighting: &LightingOptions, renderer: &RendererOptions) -> Self {
        let [ar, ag, ab] = hex_to_linear(lighting.ambient_color);
        let [lr, lg, lb] = hex_to_linear(lighting.directional_color);
        let a = lighting.ambient_intensity;
        let l = lighting.directional_intensity;
        let direction = Vec3::from_array(lighting.directional_position)
            .normalize_or(Vec3::Y);
        let size = lighting.shadow_map_size.max(1) as f32;
        Self {
            ambient: [ar * a, ag * a, ab * a, 1.0],
            light_color: [lr * l, lg * l, lb * l, 1.0],
            light_direction: direction.extend(0.0).to_array(),
            light_view_proj: light_view_proj(lighting).to_cols_array_2d(),
            shadow: [
                f32::from(u8::from(renderer.shadows)),
                lighting.shadow_bias,
                1.0 / size,
                f32::from(u8::from(renderer.soft_shadows)),
            ],
        }
    }
}

/// Orthographic light frustum looking from the light position at the
/// origin.
#[must_use]
pub fn light_view_proj(lighting: &LightingOptions) -> Mat4 {
    let e = lighting.shadow_extent;
    let eye = Vec3::from_array(lighting.directional_position);
    let up = if eye.cross(Vec3::Y).length_squared() < 1e-6 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    let view = Mat4::look_at_rh(eye, Vec3::ZERO, up);
    let proj = Mat4::orthographic_rh(-e, e, -e, e, 0.5, lighting.shadow_far);
    proj * view
}

/// Light uniform, shadow map and the light-space camera the shadow pass
/// renders with.
pub struct Lighting {
    /// CPU copy of the lighting uniform.
    pub uniform: LightingUniform,
    /// Lighting uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Layout: uniform, shadow depth texture, comparison sampler.
    pub layout: wgpu::BindGroupLayout,
    /// Bind group for the mesh pass.
    pub bind_group: wgpu::BindGroup,
    /// Depth target written by the shadow pass.
    pub shadow_map: DepthTexture,
    shadow_map_size: u32,
    sampler: wgpu::Sampler,
    /// Light-space [`CameraUniform`] buffer.
    pub light_camera_buffer: wgpu::Buffer,
    /// Layout of [`Self::light_camera_bind_group`].
    pub light_camera_layout: wgpu::BindGroupLayout,
    /// Bind group 0 of the shadow pass.
    pub light_camera_bind_group: wgpu::BindGroup,
}

impl Lighting {
    /// Create buffers and a shadow map sized from `lighting`.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        lighting: &LightingOptions,
        renderer: &RendererOptions,
    ) -> Self {
        let uniform = LightingUniform::from_options(lighting, renderer);
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Lighting Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Lighting Bind Group Layout"),
                entries: &[
                    uniform_buffer(0, None),
                    depth_texture_2d(1),
                    comparison_sampler(2),
                ],
            });

        let shadow_map_size = lighting.shadow_map_size.max(1);
        let shadow_map = DepthTexture::new(
            device,
            "Shadow Map",
            shadow_map_size,
            shadow_map_size,
            true,
        );
        let sampler = shadow_sampler(device);
        let bind_group =
            create_bind_group(device, &layout, &buffer, &shadow_map, &sampler);

        let light_camera = light_camera_uniform(lighting);
        let light_camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Light Camera Buffer"),
                contents: bytemuck::cast_slice(&[light_camera]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let light_camera_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Light Camera Bind Group Layout"),
                entries: &[uniform_buffer(0, None)],
            });
        let light_camera_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Light Camera Bind Group"),
                layout: &light_camera_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: light_camera_buffer.as_entire_binding(),
                }],
            });

        Self {
            uniform,
            buffer,
            layout,
            bind_group,
            shadow_map,
            shadow_map_size,
            sampler,
            light_camera_buffer,
            light_camera_layout,
            light_camera_bind_group,
        }
    }

    /// Re-upload after an options change, reallocating the shadow map if
    /// its size changed.
    pub fn apply_options(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        lighting: &LightingOptions,
        renderer: &RendererOptions,
    ) {
        let size = lighting.shadow_map_size.max(1);
        if size != self.shadow_map_size {
            log::debug!("shadow map resized to {size}");
            self.shadow_map =
                DepthTexture::new(device, "Shadow Map", size, size, true);
            self.shadow_map_size = size;
            self.bind_group = create_bind_group(
                device,
                &self.layout,
                &self.buffer,
                &self.shadow_map,
                &self.sampler,
            );
        }
        self.uniform = LightingUniform::from_options(lighting, renderer);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
        queue.write_buffer(
            &self.light_camera_buffer,
            0,
            bytemuck::cast_slice(&[light_camera_uniform(lighting)]),
        );
    }
}

fn light_camera_uniform(lighting: &LightingOptions) -> CameraUniform {
    let eye = Vec3::from_array(lighting.directional_position);
    CameraUniform {
        view_proj: light_view_proj(lighting).to_cols_array_2d(),
        position: eye.to_array(),
        aspect: 1.0,
        forward: (-eye).normalize_or(Vec3::NEG_Y).to_array(),
        fovy: 0.0,
    }
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    shadow_map: &DepthTexture,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Lighting Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&shadow_map.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    #[test]
    fn uniform_matches_wgsl_size() {
        assert_eq!(std::mem::size_of::<LightingUniform>(), 128);
    }

    #[test]
    fn light_frustum_covers_the_showcase() {
        let lighting = LightingOptions::default();
        let m = light_view_proj(&lighting);
        for p in [
            Vec3::ZERO,
            Vec3::new(-0.4, 0.5, 0.0),
            Vec3::new(0.2, 1.0, 0.0),
        ] {
            let clip = m * p.extend(1.0);
            let ndc = clip.truncate() / clip.w;
            assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0, "{p}");
            assert!((0.0..=1.0).contains(&ndc.z), "{p}");
        }
        // The light itself sits before the near plane.
        let eye = m * Vec4::new(5.0, 5.0, 5.0, 1.0);
        assert!(eye.z / eye.w < 0.0);
    }

    #[test]
    fn options_feed_the_uniform() {
        let lighting = LightingOptions {
            ambient_intensity: 0.5,
            ..LightingOptions::default()
        };
        let renderer = RendererOptions {
            soft_shadows: false,
            ..RendererOptions::default()
        };
        let u = LightingUniform::from_options(&lighting, &renderer);
        assert_eq!(u.ambient[0], 0.5);
        assert_eq!(u.light_color[1], 1.0);
        let dir = Vec3::from_slice(&u.light_direction[..3]);
        assert!((dir - Vec3::ONE.normalize()).length() < 1e-6);
        assert_eq!(u.shadow, [1.0, 0.002, 1.0 / 1024.0, 0.0]);
    }
}
