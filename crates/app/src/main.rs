use std::path::PathBuf;

use bevy::prelude::*;
use bevy::window::PresentMode;

use painter::GridDesignerPlugin;
use tiles::{GridConfig, LayerMask, TileFile};

mod demo_scene;

/// Environment variable naming a JSON grid config.
const CONFIG_ENV: &str = "GRID_DESIGNER_CONFIG";

/// Environment variable naming the saved tile list.
const TILES_ENV: &str = "GRID_DESIGNER_TILES";
/// Tile list used when neither argument nor environment names one.
const DEFAULT_TILES_PATH: &str = "grid_tiles.json";

/// Config file from the first argument, else from `GRID_DESIGNER_CONFIG`.
fn config_path(args: &[String], env: Option<String>) -> Option<PathBuf> {
    args.get(1).cloned().or(env).map(PathBuf::from)
}

/// Tile list from the second argument, else `GRID_DESIGNER_TILES`, else the
/// default file in the working directory.
fn tiles_path(args: &[String], env: Option<String>) -> PathBuf {
    args.get(2)
        .cloned()
        .or(env)
        .map_or_else(|| PathBuf::from(DEFAULT_TILES_PATH), PathBuf::from)
}

/// Config used when no file is given: the canopy layer is seen through.
fn demo_config() -> GridConfig {
    GridConfig {
        ignored_layers: LayerMask::from_layers(&[demo_scene::CANOPY_LAYER]),
        ..Default::default()
    }
}

fn load_config(path: Option<PathBuf>) -> GridConfig {
    let Some(path) = path else {
        return demo_config();
    };
    match GridConfig::load(&path) {
        Ok(config) => {
            info!("Loaded grid config from {}", path.display());
            config
        }
        Err(e) => {
            warn!(
                "Could not load grid config {}: {e}. Using demo defaults.",
                path.display()
            );
            demo_config()
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let path = config_path(&args, std::env::var(CONFIG_ENV).ok());
    let tiles = tiles_path(&args, std::env::var(TILES_ENV).ok());

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Grid Designer".to_string(),
            resolution: (1280.0, 720.0).into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }));

    // Logging is up once DefaultPlugins are added. The tile file must be in
    // place before the designer plugin loads the grid.
    app.insert_resource(load_config(path))
        .insert_resource(TileFile::new(tiles))
        .add_plugins(GridDesignerPlugin)
        .add_systems(Startup, demo_scene::setup_demo_scene);

    app.run();
}
