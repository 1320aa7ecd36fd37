//! Terrain generation: cellular-automata (C5) and maze (C6) generators,
//! plus the shared post-processing decorators (C8).

mod cellular;
mod decorate;
mod maze;

pub use cellular::{CellularAutomataGenerator, CellularConfig};
pub use decorate::decorate_for_biome;
pub use maze::MazeGenerator;

use crate::context::GenContext;
use crate::error::Result;
use crate::model::{BiomeType, GameMap, TerrainParams};

/// Sub-interface of [`crate::registry::Generator`] exposed by terrain
/// generators (§6 "In-process API").
pub trait TerrainGenerator: Send + Sync {
    /// Synthesize terrain into a freshly allocated [`GameMap`].
    fn generate_terrain(&self, ctx: &mut GenContext, params: &TerrainParams) -> Result<GameMap>;

    /// Re-derive the walkable regions of `map` and report whether they form
    /// exactly one connected component.
    fn validate_connectivity(&self, map: &GameMap) -> bool {
        crate::connectivity::is_fully_connected(map)
    }

    /// Apply this generator's biome-specific post-processing pass in
    /// isolation (useful for testing/composition outside the full
    /// `generate_terrain` pipeline).
    fn generate_biome(&self, map: &mut GameMap, biome: BiomeType, ctx: &mut GenContext) -> Result<()> {
        decorate_for_biome(map, biome, ctx);
        Ok(())
    }

    fn validate(&self, params: &TerrainParams) -> Result<()> {
        params.validate()
    }

    fn get_type(&self) -> &'static str {
        "terrain"
    }

    fn get_version(&self) -> &'static str {
        "1.0.0"
    }
}

/// §6 "Recognised constraints keys": `"width"`/`"height"`, default 50.
/// Shared by both terrain generators so the two agree on sizing.
pub(crate) fn dimensions_from_constraints(params: &TerrainParams) -> (usize, usize) {
    let width = params
        .constraints
        .get("width")
        .and_then(|v| v.as_u64())
        .map(|v| v as usize)
        .unwrap_or(50);
    let height = params
        .constraints
        .get("height")
        .and_then(|v| v.as_u64())
        .map(|v| v as usize)
        .unwrap_or(50);
    (width, height)
}
