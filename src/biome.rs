//! Biome catalogue (C3): a process-wide immutable table mapping
//! [`BiomeType`] to density/water/feature/tile-distribution defaults, §4.2.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::model::{BiomeType, ConnectivityLevel, TerrainParams};

/// A biome-specific terrain feature tag consulted by the post-processing
/// decorators (§4.8) and by the maze generator's feature pass (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainFeature {
    Water,
    Vegetation,
    Torches,
    Doors,
    CaveDecor,
    Traps,
    SecretDoors,
}

/// Static, process-wide biome definition. Returned definitions are
/// defensive copies (the struct is `Clone`); callers may not mutate shared
/// state.
#[derive(Debug, Clone)]
pub struct BiomeDef {
    pub biome: BiomeType,
    pub default_density: f64,
    pub water_level_range: (f64, f64),
    pub roughness_range: (f64, f64),
    pub connectivity_level: ConnectivityLevel,
    pub features: Vec<TerrainFeature>,
    /// Sprite label -> probability; probabilities sum to 1 +/- 0.01.
    pub tile_distribution: HashMap<&'static str, f64>,
}

fn dist(pairs: &[(&'static str, f64)]) -> HashMap<&'static str, f64> {
    pairs.iter().cloned().collect()
}

fn build_catalogue() -> HashMap<BiomeType, BiomeDef> {
    let mut table = HashMap::new();

    table.insert(
        BiomeType::Cave,
        BiomeDef {
            biome: BiomeType::Cave,
            default_density: 0.45,
            water_level_range: (0.05, 0.25),
            roughness_range: (0.4, 0.8),
            connectivity_level: ConnectivityLevel::Moderate,
            features: vec![
                TerrainFeature::Water,
                TerrainFeature::CaveDecor,
                TerrainFeature::Torches,
                TerrainFeature::Vegetation,
            ],
            tile_distribution: dist(&[("floor", 0.55), ("wall", 0.40), ("water", 0.05)]),
        },
    );

    table.insert(
        BiomeType::Dungeon,
        BiomeDef {
            biome: BiomeType::Dungeon,
            default_density: 0.40,
            water_level_range: (0.0, 0.1),
            roughness_range: (0.1, 0.3),
            connectivity_level: ConnectivityLevel::High,
            features: vec![TerrainFeature::Doors, TerrainFeature::Torches],
            tile_distribution: dist(&[("floor", 0.62), ("wall", 0.36), ("door", 0.02)]),
        },
    );

    table.insert(
        BiomeType::Forest,
        BiomeDef {
            biome: BiomeType::Forest,
            default_density: 0.35,
            water_level_range: (0.1, 0.3),
            roughness_range: (0.3, 0.6),
            connectivity_level: ConnectivityLevel::Moderate,
            features: vec![
                TerrainFeature::Vegetation,
                TerrainFeature::Water,
                TerrainFeature::CaveDecor,
            ],
            tile_distribution: dist(&[("floor", 0.55), ("wall", 0.25), ("vegetation", 0.2)]),
        },
    );

    table.insert(
        BiomeType::Mountain,
        BiomeDef {
            biome: BiomeType::Mountain,
            default_density: 0.55,
            water_level_range: (0.0, 0.1),
            roughness_range: (0.6, 0.9),
            connectivity_level: ConnectivityLevel::High,
            features: vec![TerrainFeature::CaveDecor, TerrainFeature::Torches],
            tile_distribution: dist(&[("floor", 0.45), ("wall", 0.55)]),
        },
    );

    table.insert(
        BiomeType::Swamp,
        BiomeDef {
            biome: BiomeType::Swamp,
            default_density: 0.40,
            water_level_range: (0.3, 0.6),
            roughness_range: (0.2, 0.5),
            connectivity_level: ConnectivityLevel::Moderate,
            features: vec![
                TerrainFeature::Water,
                TerrainFeature::Vegetation,
                TerrainFeature::CaveDecor,
            ],
            tile_distribution: dist(&[("floor", 0.40), ("wall", 0.25), ("water", 0.25), ("vegetation", 0.10)]),
        },
    );

    table.insert(
        BiomeType::Desert,
        BiomeDef {
            biome: BiomeType::Desert,
            default_density: 0.30,
            water_level_range: (0.0, 0.05),
            roughness_range: (0.2, 0.4),
            connectivity_level: ConnectivityLevel::Minimal,
            features: vec![TerrainFeature::CaveDecor],
            tile_distribution: dist(&[("floor", 0.68), ("wall", 0.32)]),
        },
    );

    table
}

static CATALOGUE: OnceLock<HashMap<BiomeType, BiomeDef>> = OnceLock::new();

/// The process-wide biome catalogue.
pub struct BiomeCatalogue;

impl BiomeCatalogue {
    fn table() -> &'static HashMap<BiomeType, BiomeDef> {
        CATALOGUE.get_or_init(build_catalogue)
    }

    pub fn get(biome: BiomeType) -> Result<BiomeDef> {
        Self::table()
            .get(&biome)
            .cloned()
            .ok_or_else(|| Error::UnknownBiome(format!("{biome:?}")))
    }

    /// Apply biome defaults to `params` in place: for each numeric field
    /// that is exactly zero, substitute the biome default; unconditionally
    /// set `biome_type` and `connectivity` (§4.2).
    pub fn apply_defaults(params: &mut TerrainParams, biome: BiomeType) -> Result<()> {
        let def = Self::get(biome)?;
        if params.density == 0.0 {
            params.density = def.default_density;
        }
        if params.water_level == 0.0 {
            params.water_level = (def.water_level_range.0 + def.water_level_range.1) / 2.0;
        }
        if params.roughness == 0.0 {
            params.roughness = (def.roughness_range.0 + def.roughness_range.1) / 2.0;
        }
        params.biome_type = biome;
        params.connectivity = def.connectivity_level;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_biome_distribution_sums_near_one() {
        for biome in [
            BiomeType::Cave,
            BiomeType::Dungeon,
            BiomeType::Forest,
            BiomeType::Mountain,
            BiomeType::Swamp,
            BiomeType::Desert,
        ] {
            let def = BiomeCatalogue::get(biome).unwrap();
            let sum: f64 = def.tile_distribution.values().sum();
            assert!((sum - 1.0).abs() <= 0.01, "{biome:?} sums to {sum}");
        }
    }

    #[test]
    fn apply_defaults_only_touches_zero_fields() {
        let mut params = TerrainParams {
            base: crate::model::GenerationParams::default(),
            biome_type: BiomeType::Cave,
            density: 0.9,
            water_level: 0.0,
            roughness: 0.1,
            connectivity: ConnectivityLevel::None,
        };
        BiomeCatalogue::apply_defaults(&mut params, BiomeType::Cave).unwrap();
        assert_eq!(params.density, 0.9);
        assert!(params.water_level > 0.0);
        assert_eq!(params.connectivity, ConnectivityLevel::Moderate);
    }
}
