//! Lit, textured, optionally bent triangle meshes.
//!
//! Every drawable of every model gets one [`DrawUniform`] slot in a single
//! uniform buffer, addressed with a dynamic offset. Vertex and index
//! buffers are uploaded once when the scene is set; per frame only the
//! draw uniforms are rewritten.

use glam::Mat4;
use wgpu::util::DeviceExt;

use super::pipeline_util::{
    color_targets, depth_stencil_state, double_sided_triangles,
};
use crate::error::TidepoolError;
use crate::gpu::pipeline_helpers::{
    filtering_sampler, linear_sampler, texture_2d, uniform_buffer,
};
use crate::gpu::shader_composer::{ShaderComposer, MESH_SHADER};
use crate::gpu::texture::SampledTexture;
use crate::options::BendOptions;
use crate::scene::{Material, MeshData, Scene, SceneModel, TextureImage};

// ==================== VERTEX FORMAT ====================

/// 32-byte mesh vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space normal.
    pub normal: [f32; 3],
    /// Texture coordinate.
    pub uv: [f32; 2],
}

/// Vertex layout shared by the mesh and shadow pipelines.
pub fn mesh_vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<MeshVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 12,
                shader_location: 1,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 24,
                shader_location: 2,
            },
        ],
    }
}

fn mesh_vertices(mesh: &MeshData) -> Vec<MeshVertex> {
    mesh.positions
        .iter()
        .zip(&mesh.normals)
        .zip(&mesh.uvs)
        .map(|((p, n), uv)| MeshVertex {
            position: p.to_array(),
            normal: n.to_array(),
            uv: uv.to_array(),
        })
        .collect()
}

// ==================== DRAW UNIFORM ====================

/// Per-drawable uniform.
/// NOTE: Must match the WGSL `DrawUniform` layout exactly (208 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    /// Object to world.
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of `model`.
    pub normal_matrix: [[f32; 4]; 4],
    /// Linear base color factor.
    pub base_color: [f32; 4],
    /// Current emissive color (w unused).
    pub emissive: [f32; 4],
    /// Metallic, roughness, receive-shadow flag, unused.
    pub material: [f32; 4],
    /// Time, bend frequency, bend amplitude, enabled flag.
    pub bend: [f32; 4],
    /// Sway frequency, sway amplitude, unused, unused.
    pub sway: [f32; 4],
}

impl DrawUniform {
    fn new(
        model: Mat4,
        material: &Material,
        bend_enabled: bool,
        time: f32,
        bend: &BendOptions,
    ) -> Self {
        let [er, eg, eb] = material.emissive;
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
            base_color: material.base_color,
            emissive: [er, eg, eb, 0.0],
            material: [
                material.metallic,
                material.roughness,
                f32::from(u8::from(material.receive_shadow)),
                0.0,
            ],
            bend: [
                time,
                bend.bend_frequency,
                bend.bend_amplitude,
                f32::from(u8::from(bend_enabled)),
            ],
            sway: [bend.sway_frequency, bend.sway_amplitude, 0.0, 0.0],
        }
    }
}

/// Draw uniforms for every drawable, models in order.
#[must_use]
pub fn draw_uniforms(scene: &Scene, bend: &BendOptions) -> Vec<DrawUniform> {
    let time = scene.bend_time(bend.time_scale);
    let fallback = Material::default();
    let mut uniforms = Vec::new();
    for model in &scene.models {
        let matrices = model.world_matrices();
        let root = model.root.matrix();
        uniforms.extend(model.drawables.iter().map(|d| {
            let matrix = matrices.get(d.node).copied().unwrap_or(root);
            let material = model.materials.get(d.material).unwrap_or(&fallback);
            DrawUniform::new(matrix, material, model.bend, time, bend)
        }));
    }
    uniforms
}

// ==================== GPU RESOURCES ====================

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuDrawable {
    mesh: usize,
    material: usize,
    offset: u32,
    casts_shadow: bool,
}

struct GpuModel {
    meshes: Vec<Option<GpuMesh>>,
    /// Kept alive alongside the bind groups that view them.
    _textures: Vec<SampledTexture>,
    materials: Vec<wgpu::BindGroup>,
    drawables: Vec<GpuDrawable>,
}

/// Draws every scene model with the mesh pipeline, and their depth for
/// the shadow pass.
pub struct MeshRenderer {
    pipeline: wgpu::RenderPipeline,
    draw_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white: SampledTexture,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    stride: u64,
    draw_count: usize,
    models: Vec<GpuModel>,
}

impl MeshRenderer {
    /// Build the pipeline. Call [`Self::upload_scene`] before drawing.
    ///
    /// # Errors
    ///
    /// Returns [`TidepoolError::Shader`] if the mesh shader fails to
    /// compose.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
        lighting_layout: &wgpu::BindGroupLayout,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, TidepoolError> {
        let draw_size = wgpu::BufferSize::new(size_of::<DrawUniform>() as u64);
        let draw_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Draw Bind Group Layout"),
                entries: &[uniform_buffer(0, draw_size)],
            });
        let texture_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Material Texture Bind Group Layout"),
                entries: &[texture_2d(0), filtering_sampler(1)],
            });

        let shader =
            shader_composer.compose(device, "Mesh Shader", MESH_SHADER, "mesh.wgsl")?;
        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Mesh Pipeline Layout"),
                bind_group_layouts: &[
                    camera_layout,
                    lighting_layout,
                    &draw_layout,
                    &texture_layout,
                ],
                push_constant_ranges: &[],
            });
        let pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Mesh Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[mesh_vertex_buffer_layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &color_targets(format),
                    compilation_options: Default::default(),
                }),
                primitive: double_sided_triangles(),
                depth_stencil: Some(depth_stencil_state()),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        let alignment =
            u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let stride =
            (size_of::<DrawUniform>() as u64).div_ceil(alignment) * alignment;
        let (draw_buffer, draw_bind_group) =
            create_draw_buffer(device, &draw_layout, stride, 1);

        Ok(Self {
            pipeline,
            draw_layout,
            texture_layout,
            sampler: linear_sampler(device, "Material Sampler"),
            white: SampledTexture::from_image(
                device,
                queue,
                "White Texture",
                &TextureImage::white(),
            ),
            draw_buffer,
            draw_bind_group,
            stride,
            draw_count: 0,
            models: Vec::new(),
        })
    }

    /// Layout of the per-draw uniform (group 2 here, group 1 in the
    /// shadow pass).
    pub fn draw_layout(&self) -> &wgpu::BindGroupLayout {
        &self.draw_layout
    }

    /// Upload geometry and textures for every model and size the draw
    /// buffer.
    pub fn upload_scene(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &Scene,
    ) {
        let mut next = 0u32;
        self.models = scene
            .models
            .iter()
            .map(|model| {
                let gpu = self.upload_model(device, queue, model, next);
                next += gpu.drawables.len() as u32;
                gpu
            })
            .collect();
        self.draw_count = next as usize;

        let (buffer, bind_group) = create_draw_buffer(
            device,
            &self.draw_layout,
            self.stride,
            self.draw_count.max(1),
        );
        self.draw_buffer = buffer;
        self.draw_bind_group = bind_group;
        log::debug!(
            "uploaded {} models, {} drawables",
            self.models.len(),
            self.draw_count
        );
    }

    fn upload_model(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        model: &SceneModel,
        first_slot: u32,
    ) -> GpuModel {
        let meshes = model
            .meshes
            .iter()
            .enumerate()
            .map(|(i, mesh)| upload_mesh(device, &format!("{} mesh {i}", model.name), mesh))
            .collect();

        let textures: Vec<SampledTexture> = model
            .textures
            .iter()
            .enumerate()
            .map(|(i, image)| {
                SampledTexture::from_image(
                    device,
                    queue,
                    &format!("{} texture {i}", model.name),
                    image,
                )
            })
            .collect();

        let materials = model
            .materials
            .iter()
            .map(|material| {
                let view = material
                    .base_color_texture
                    .and_then(|i| textures.get(i))
                    .map_or(&self.white.view, |t| &t.view);
                self.texture_bind_group(device, view)
            })
            .collect();

        let stride = self.stride as u32;
        let drawables = model
            .drawables
            .iter()
            .enumerate()
            .map(|(i, d)| GpuDrawable {
                mesh: d.mesh,
                material: d.material,
                offset: (first_slot + i as u32) * stride,
                casts_shadow: model
                    .materials
                    .get(d.material)
                    .is_none_or(|m| m.cast_shadow),
            })
            .collect();

        GpuModel {
            meshes,
            _textures: textures,
            materials,
            drawables,
        }
    }

    fn texture_bind_group(
        &self,
        device: &wgpu::Device,
        view: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material Texture Bind Group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    /// Write this frame's draw uniforms.
    pub fn prepare(&self, queue: &wgpu::Queue, scene: &Scene, bend: &BendOptions) {
        let uniforms = draw_uniforms(scene, bend);
        if uniforms.is_empty() {
            return;
        }
        let count = uniforms.len().min(self.draw_count);
        let stride = self.stride as usize;
        let mut bytes = vec![0u8; count * stride];
        for (slot, uniform) in bytes.chunks_exact_mut(stride).zip(&uniforms) {
            slot[..size_of::<DrawUniform>()]
                .copy_from_slice(bytemuck::bytes_of(uniform));
        }
        queue.write_buffer(&self.draw_buffer, 0, &bytes);
    }

    /// Draw every drawable. Groups 0 and 1 must already be bound.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        for model in &self.models {
            for drawable in &model.drawables {
                let (Some(Some(mesh)), Some(material)) = (
                    model.meshes.get(drawable.mesh),
                    model.materials.get(drawable.material),
                ) else {
                    continue;
                };
                render_pass.set_bind_group(2, &self.draw_bind_group, &[drawable.offset]);
                render_pass.set_bind_group(3, material, &[]);
                draw_mesh(render_pass, mesh);
            }
        }
    }

    /// Draw shadow casters with whatever depth pipeline is bound; the draw
    /// uniform goes to group 1.
    pub fn draw_depth(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        for model in &self.models {
            for drawable in model.drawables.iter().filter(|d| d.casts_shadow) {
                let Some(Some(mesh)) = model.meshes.get(drawable.mesh) else {
                    continue;
                };
                render_pass.set_bind_group(1, &self.draw_bind_group, &[drawable.offset]);
                draw_mesh(render_pass, mesh);
            }
        }
    }
}

fn draw_mesh(render_pass: &mut wgpu::RenderPass<'_>, mesh: &GpuMesh) {
    render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
    render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
}

fn upload_mesh(
    device: &wgpu::Device,
    label: &str,
    mesh: &MeshData,
) -> Option<GpuMesh> {
    if mesh.indices.is_empty() {
        return None;
    }
    let vertex_buffer =
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} vertices")),
            contents: bytemuck::cast_slice(&mesh_vertices(mesh)),
            usage: wgpu::BufferUsages::VERTEX,
        });
    let index_buffer =
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} indices")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
    Some(GpuMesh {
        vertex_buffer,
        index_buffer,
        index_count: mesh.indices.len() as u32,
    })
}

fn create_draw_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    slots: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Draw Uniform Buffer"),
        size: stride * slots as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Draw Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(size_of::<DrawUniform>() as u64),
            }),
        }],
    });
    (buffer, bind_group)
}
