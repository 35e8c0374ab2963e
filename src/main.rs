use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tidepool::{Options, SceneManifest, Viewer};

const USAGE: &str = "Usage: tidepool [ASSET_DIR] [OPTIONS_TOML]";

/// `scene.toml` in the asset directory, or the built-in showcase.
fn load_manifest(asset_root: &Path) -> SceneManifest {
    let path = asset_root.join("scene.toml");
    if !path.exists() {
        log::info!("{} not found, using the built-in scene", path.display());
        return SceneManifest::default();
    }
    SceneManifest::load(&path).unwrap_or_else(|e| {
        log::error!("{}: {e}", path.display());
        SceneManifest::default()
    })
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let asset_root = args.next().map_or_else(|| PathBuf::from("assets"), PathBuf::from);

    let options = match args.next() {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(options) => options,
            Err(e) => {
                log::error!("{path}: {e}\n{USAGE}");
                return ExitCode::FAILURE;
            }
        },
        None => Options::default(),
    };

    let result = Viewer::builder()
        .with_options(options)
        .with_manifest(load_manifest(&asset_root))
        .with_asset_root(asset_root)
        .build()
        .run();
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
