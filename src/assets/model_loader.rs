//! glTF 2.0 (`.gltf` and `.glb`) decoding into [`ModelData`].

use base64::Engine as _;
use glam::{Quat, Vec2, Vec3};
use gltf::animation::util::ReadOutputs;
use rustc_hash::FxHashSet;

use super::image_loader::decode_image;
use super::source::{resolve_uri, AssetSource};
use crate::animation::{AnimationClip, Channel, ChannelValues, Interpolation};
use crate::error::TidepoolError;
use crate::manifest::ModelSpec;
use crate::scene::{
    Drawable, Material, MeshData, ModelData, SceneModel, SceneNode, TextureImage, Transform,
};

/// Read, decode and place the model described by `spec`.
///
/// # Errors
///
/// Returns [`TidepoolError::AssetLoad`] if the file or one of its buffers
/// is missing or malformed. Broken textures only log a warning.
pub fn load_model(source: &dyn AssetSource, spec: &ModelSpec) -> Result<SceneModel, TidepoolError> {
    let bytes = source.read(&spec.path)?;
    let data = parse_model(source, &spec.path, &bytes)?;
    Ok(SceneModel::new(spec, data))
}

/// Decode glTF or GLB bytes. External buffers and images are read from
/// `source` relative to `path`.
///
/// # Errors
///
/// Returns [`TidepoolError::AssetLoad`] on malformed files or missing
/// buffers.
pub fn parse_model(
    source: &dyn AssetSource,
    path: &str,
    bytes: &[u8],
) -> Result<ModelData, TidepoolError> {
    let gltf = gltf::Gltf::from_slice(bytes).map_err(|e| TidepoolError::asset(path, e))?;
    let buffers = load_buffers(&gltf, source, path)?;
    let document = &gltf.document;

    let textures = load_textures(document, &buffers, source, path);
    let mut materials: Vec<Material> = document.materials().map(|m| convert_material(&m)).collect();
    let nodes = convert_nodes(document);

    let mut meshes = Vec::new();
    // Per glTF mesh: (index into `meshes`, material index) per primitive.
    let mut primitives: Vec<Vec<(usize, Option<usize>)>> = Vec::new();
    for mesh in document.meshes() {
        let mut converted = Vec::new();
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::debug!("{path}: skipping non-triangle primitive in mesh {}", mesh.index());
                continue;
            }
            let reader = primitive.reader(|b| buffers.get(b.index()).map(Vec::as_slice));
            let Some(positions) = reader.read_positions() else {
                log::debug!("{path}: primitive without positions in mesh {}", mesh.index());
                continue;
            };
            let positions = positions.map(Vec3::from).collect();
            let normals = reader.read_normals().map(|n| n.map(Vec3::from).collect());
            let uvs = reader
                .read_tex_coords(0)
                .map(|uv| uv.into_f32().map(Vec2::from).collect());
            let indices = reader.read_indices().map(|i| i.into_u32().collect());
            converted.push((meshes.len(), primitive.material().index()));
            meshes.push(MeshData::new(positions, normals, uvs, indices));
        }
        primitives.push(converted);
    }

    let default_material = materials.len();
    let mut drawables = Vec::new();
    for node in reachable_nodes(document) {
        let Some(mesh) = node.mesh() else { continue };
        for &(mesh_index, material) in primitives.get(mesh.index()).into_iter().flatten() {
            drawables.push(Drawable {
                node: node.index(),
                mesh: mesh_index,
                material: material.unwrap_or(default_material),
            });
        }
    }
    if drawables.iter().any(|d| d.material == default_material) {
        materials.push(Material::default());
    }

    let clips = document
        .animations()
        .map(|a| convert_animation(&a, &buffers))
        .collect();

    Ok(ModelData {
        nodes,
        meshes,
        materials,
        textures,
        drawables,
        clips,
    })
}

/// External files a glTF document needs besides itself, as asset paths
/// resolved against `path`. `data:` URIs and GLB chunks are excluded.
///
/// # Errors
///
/// Returns [`TidepoolError::AssetLoad`] if `bytes` is not valid glTF.
pub fn referenced_uris(path: &str, bytes: &[u8]) -> Result<Vec<String>, TidepoolError> {
    let gltf = gltf::Gltf::from_slice(bytes).map_err(|e| TidepoolError::asset(path, e))?;
    let buffers = gltf.document.buffers().filter_map(|b| match b.source() {
        gltf::buffer::Source::Uri(uri) => Some(uri),
        gltf::buffer::Source::Bin => None,
    });
    let images = gltf.document.images().filter_map(|i| match i.source() {
        gltf::image::Source::Uri { uri, .. } => Some(uri),
        gltf::image::Source::View { .. } => None,
    });
    let mut seen = FxHashSet::default();
    Ok(buffers
        .chain(images)
        .filter(|uri| !uri.starts_with("data:"))
        .map(|uri| resolve_uri(path, uri))
        .filter(|uri| seen.insert(uri.clone()))
        .collect())
}

fn load_buffers(
    gltf: &gltf::Gltf,
    source: &dyn AssetSource,
    path: &str,
) -> Result<Vec<Vec<u8>>, TidepoolError> {
    gltf.document
        .buffers()
        .map(|buffer| {
            let data = match buffer.source() {
                gltf::buffer::Source::Bin => gltf
                    .blob
                    .clone()
                    .ok_or_else(|| TidepoolError::asset(path, "GLB binary chunk is missing"))?,
                gltf::buffer::Source::Uri(uri) => read_uri(source, path, uri)?,
            };
            if data.len() < buffer.length() {
                return Err(TidepoolError::asset(
                    path,
                    format!(
                        "buffer {} holds {} bytes, expected {}",
                        buffer.index(),
                        data.len(),
                        buffer.length()
                    ),
                ));
            }
            Ok(data)
        })
        .collect()
}

fn read_uri(source: &dyn AssetSource, path: &str, uri: &str) -> Result<Vec<u8>, TidepoolError> {
    if uri.starts_with("data:") {
        decode_data_uri(uri).ok_or_else(|| TidepoolError::asset(path, "unsupported data URI"))
    } else {
        source.read(&resolve_uri(path, uri))
    }
}

fn decode_data_uri(uri: &str) -> Option<Vec<u8>> {
    let (_, payload) = uri.split_once(";base64,")?;
    base64::engine::general_purpose::STANDARD.decode(payload).ok()
}

fn load_textures(
    document: &gltf::Document,
    buffers: &[Vec<u8>],
    source: &dyn AssetSource,
    path: &str,
) -> Vec<TextureImage> {
    document
        .images()
        .map(|image| {
            let decoded = match image.source() {
                gltf::image::Source::View { view, .. } => {
                    let start = view.offset();
                    buffers
                        .get(view.buffer().index())
                        .and_then(|b| b.get(start..start + view.length()))
                        .ok_or_else(|| TidepoolError::asset(path, "image view out of range"))
                        .and_then(|bytes| decode_image(path, bytes))
                }
                gltf::image::Source::Uri { uri, .. } => read_uri(source, path, uri)
                    .and_then(|bytes| decode_image(&resolve_uri(path, uri), &bytes)),
            };
            decoded.unwrap_or_else(|e| {
                log::warn!("{e}; using a white texture");
                TextureImage::white()
            })
        })
        .collect()
}

fn convert_material(material: &gltf::Material<'_>) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let strength = material.emissive_strength().unwrap_or(1.0);
    let emissive = material.emissive_factor().map(|c| c * strength);
    Material {
        base_color: pbr.base_color_factor(),
        base_color_texture: pbr
            .base_color_texture()
            .map(|info| info.texture().source().index()),
        metallic: pbr.metallic_factor(),
        roughness: pbr.roughness_factor(),
        double_sided: material.double_sided(),
        ..Material::default()
    }
    .with_emissive(emissive)
}

fn convert_nodes(document: &gltf::Document) -> Vec<SceneNode> {
    let mut nodes: Vec<SceneNode> = document
        .nodes()
        .map(|node| {
            let (translation, rotation, scale) = node.transform().decomposed();
            SceneNode {
                name: node.name().map(str::to_owned),
                parent: None,
                local: Transform {
                    translation: Vec3::from(translation),
                    rotation: Quat::from_array(rotation),
                    scale: Vec3::from(scale),
                },
            }
        })
        .collect();
    for node in document.nodes() {
        for child in node.children() {
            if let Some(entry) = nodes.get_mut(child.index()) {
                entry.parent = Some(node.index());
            }
        }
    }
    nodes
}

/// Nodes of the default scene (or the first scene), depth-first. Files
/// without scenes draw every node.
fn reachable_nodes(document: &gltf::Document) -> Vec<gltf::Node<'_>> {
    let Some(scene) = document.default_scene().or_else(|| document.scenes().next()) else {
        return document.nodes().collect();
    };
    let mut visited = vec![false; document.nodes().len()];
    let mut stack: Vec<gltf::Node<'_>> = scene.nodes().collect();
    let mut out = Vec::new();
    while let Some(node) = stack.pop() {
        if std::mem::replace(&mut visited[node.index()], true) {
            continue;
        }
        stack.extend(node.children());
        out.push(node);
    }
    out
}

fn convert_animation(animation: &gltf::Animation<'_>, buffers: &[Vec<u8>]) -> AnimationClip {
    let channels = animation
        .channels()
        .filter_map(|channel| {
            let reader = channel.reader(|b| buffers.get(b.index()).map(Vec::as_slice));
            let times: Vec<f32> = reader.read_inputs()?.collect();
            let values = match reader.read_outputs()? {
                ReadOutputs::Translations(it) => {
                    ChannelValues::Translation(it.map(Vec3::from).collect())
                }
                ReadOutputs::Rotations(it) => {
                    ChannelValues::Rotation(it.into_f32().map(Quat::from_array).collect())
                }
                ReadOutputs::Scales(it) => ChannelValues::Scale(it.map(Vec3::from).collect()),
                ReadOutputs::MorphTargetWeights(_) => return None,
            };
            let interpolation = match channel.sampler().interpolation() {
                gltf::animation::Interpolation::Linear => Interpolation::Linear,
                gltf::animation::Interpolation::Step => Interpolation::Step,
                gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
            };
            Some(Channel {
                node: channel.target().node().index(),
                times,
                values,
                interpolation,
            })
        })
        .collect();
    AnimationClip::new(animation.name().map(str::to_owned), channels)
}
