//! Saved tile lists.
//!
//! A tile file is the JSON form of a `TileSet`: the painted positions in
//! paint order. Writes go to `{path}.tmp` first and are renamed over the
//! target, so an interrupted save leaves the previous file intact.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use bevy::prelude::*;

use crate::config::GridConfig;
use crate::error::TileFileError;
use crate::tile_grid::TileGrid;
use crate::tile_set::TileSet;

/// Where the session's tiles are loaded from and saved to.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct TileFile {
    pub path: PathBuf,
}

impl TileFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn write_replacing(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);

    let mut file = File::create(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    fs::rename(&tmp_path, path)
}

pub fn save_tiles(tiles: &TileSet, path: impl AsRef<Path>) -> Result<(), TileFileError> {
    let json = serde_json::to_string_pretty(tiles)?;
    write_replacing(path.as_ref(), json.as_bytes())?;
    Ok(())
}

pub fn load_tiles(path: impl AsRef<Path>) -> Result<TileSet, TileFileError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Grid over the tiles saved at `path`, with the mesh redrawn for `config`.
pub fn load_grid(path: impl AsRef<Path>, config: &GridConfig) -> Result<TileGrid, TileFileError> {
    let tiles = load_tiles(path)?;
    Ok(TileGrid::from_tiles(tiles, config)?)
}

/// Startup grid for a session: the saved tiles if there are any, else empty.
pub fn initial_grid(file: Option<&TileFile>, config: &GridConfig) -> TileGrid {
    let Some(file) = file else {
        return TileGrid::new(config);
    };
    match load_grid(&file.path, config) {
        Ok(grid) => {
            info!(
                "Loaded {} tiles from {}",
                grid.tile_count(),
                file.path.display()
            );
            grid
        }
        Err(e) if e.is_not_found() => {
            info!("No saved tiles at {}, starting empty", file.path.display());
            TileGrid::new(config)
        }
        Err(e) => {
            warn!(
                "Could not load tiles from {}: {e}. Starting empty.",
                file.path.display()
            );
            TileGrid::new(config)
        }
    }
}
