use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::{Vec2, Vec3};
use tidepool::camera::fly_through::FlyThrough;
use tidepool::camera::rig::CameraRig;
use tidepool::options::FlyThroughOptions;
use tidepool::picking::pick;
use tidepool::renderer::mesh::draw_uniforms;
use tidepool::scene::{
    Drawable, Material, MeshData, ModelData, SceneModel, SceneNode, Transform,
};
use tidepool::util::frame_timing::FrameTick;
use tidepool::{Options, Scene, SceneManifest};

/// A `cells` x `cells` grid in the XY plane, one unit across.
fn grid(cells: u32) -> ModelData {
    let step = 1.0 / cells as f32;
    let mut positions = Vec::new();
    for y in 0..=cells {
        for x in 0..=cells {
            positions.push(Vec3::new(
                x as f32 * step - 0.5,
                y as f32 * step - 0.5,
                0.0,
            ));
        }
    }
    let row = cells + 1;
    let mut indices = Vec::new();
    for y in 0..cells {
        for x in 0..cells {
            let i = y * row + x;
            indices.extend_from_slice(&[i, i + 1, i + row + 1, i, i + row + 1, i + row]);
        }
    }
    ModelData {
        nodes: vec![SceneNode {
            name: Some("grid".into()),
            parent: None,
            local: Transform::IDENTITY,
        }],
        meshes: vec![MeshData::new(positions, None, None, Some(indices))],
        materials: vec![Material::default()],
        textures: Vec::new(),
        drawables: vec![Drawable {
            node: 0,
            mesh: 0,
            material: 0,
        }],
        clips: Vec::new(),
    }
}

fn showcase(cells: u32) -> Scene {
    let models = SceneManifest::default()
        .models
        .iter()
        .map(|spec| SceneModel::new(spec, grid(cells)))
        .collect();
    Scene::new(models, None)
}

fn pick_benchmark(c: &mut Criterion) {
    let options = Options::default();
    let mut rig = CameraRig::new(&options.camera, &options.fly_through, (1280, 800));
    rig.skip_fly_through();
    rig.update(0.0);

    let mut group = c.benchmark_group("pick");
    for cells in [8, 32, 64] {
        let scene = showcase(cells);
        let hit_ray = rig.ray_from_ndc(Vec2::new(-0.1, 0.1));
        let miss_ray = rig.ray_from_ndc(Vec2::new(0.99, 0.99));
        group.bench_function(format!("{cells}x{cells}_hit"), |b| {
            b.iter(|| black_box(pick(black_box(&hit_ray), &scene)));
        });
        group.bench_function(format!("{cells}x{cells}_miss"), |b| {
            b.iter(|| black_box(pick(black_box(&miss_ray), &scene)));
        });
    }
    group.finish();
}

fn fly_through_benchmark(c: &mut Criterion) {
    let path = FlyThrough::new(&FlyThroughOptions::default());
    c.bench_function("fly_through_sample", |b| {
        b.iter(|| black_box(path.sample(black_box(0.37))));
    });
}

fn frame_update_benchmark(c: &mut Criterion) {
    let options = Options::default();
    let mut scene = showcase(8);
    let mut elapsed = 0.0;
    c.bench_function("scene_tick_and_draw_uniforms", |b| {
        b.iter(|| {
            elapsed += 0.016;
            scene.tick(FrameTick {
                elapsed,
                delta: 0.016,
            });
            black_box(draw_uniforms(&scene, &options.bend))
        });
    });
}

criterion_group!(
    benches,
    pick_benchmark,
    fly_through_benchmark,
    frame_update_benchmark
);
criterion_main!(benches);
