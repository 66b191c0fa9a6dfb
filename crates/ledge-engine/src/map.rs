//! Tile-map loading.
//!
//! Maps are small JSON documents (Tiled-style field names): a tile grid per
//! layer, where `0` means "no tile" and any other value is a tile source id.
//! The loader only feeds the physics world — every non-zero cell becomes an
//! entity with a [`Body`] and a [`TileTag`] on the tile grid. Sprite lookup
//! for the source ids is the rendering collaborator's business.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use ledge_ecs::world::World;

use crate::math::Vec2;
use crate::spawn;
use crate::EngineError;

// ---------------------------------------------------------------------------
// Document shape
// ---------------------------------------------------------------------------

/// Top-level map document.
#[derive(Debug, Clone, Deserialize)]
pub struct MapDocument {
    /// Width of one tile in world units.
    #[serde(rename = "tilewidth")]
    pub tile_width: u32,
    /// Height of one tile in world units.
    #[serde(rename = "tileheight")]
    pub tile_height: u32,
    /// Layer width in tiles.
    pub width: u32,
    /// Layer height in tiles.
    pub height: u32,
    /// Tile layers; the first one is the collision layer.
    pub layers: Vec<TileLayer>,
}

/// One tile layer: a row-major grid of tile source ids.
#[derive(Debug, Clone, Deserialize)]
pub struct TileLayer {
    /// Row-major tile ids, `0` = empty.
    pub data: Vec<u32>,
    /// Layer name (informational).
    pub name: String,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parse a map document from a JSON string and spawn its collision tiles.
///
/// Returns the number of tiles spawned.
pub fn load_map_str(world: &mut World, json: &str) -> Result<usize, EngineError> {
    let document: MapDocument = serde_json::from_str(json)?;
    spawn_tiles(world, &document)
}

/// Read and load a map document from disk.
pub fn load_map(world: &mut World, path: impl AsRef<Path>) -> Result<usize, EngineError> {
    let json = fs::read_to_string(path)?;
    load_map_str(world, &json)
}

/// Spawn a tile entity for every non-zero cell of the collision layer.
pub fn spawn_tiles(world: &mut World, document: &MapDocument) -> Result<usize, EngineError> {
    let layer = document
        .layers
        .first()
        .ok_or_else(|| EngineError::MapFormat("map document has no layers".to_owned()))?;

    let cells = (document.width * document.height) as usize;
    if layer.data.len() != cells {
        return Err(EngineError::MapFormat(format!(
            "layer '{}' has {} cells, expected {} ({}x{})",
            layer.name,
            layer.data.len(),
            cells,
            document.width,
            document.height
        )));
    }

    let tile_size = Vec2::new(document.tile_width as f32, document.tile_height as f32);
    let mut spawned = 0usize;
    for y in 0..document.height {
        for x in 0..document.width {
            let source_id = layer.data[(y * document.width + x) as usize];
            if source_id == 0 {
                continue;
            }
            let position = Vec2::new(x as f32 * tile_size.x, y as f32 * tile_size.y);
            spawn::spawn_tile(world, position, tile_size)?;
            spawned += 1;
        }
    }

    info!(layer = %layer.name, tiles = spawned, "loaded tile map");
    Ok(spawned)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
