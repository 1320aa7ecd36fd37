//! Generator registry & factory (C13), §4.12.
//!
//! A process-wide, thread-safe mapping from string name to [`Generator`].
//! Registration happens once at process init; lookup happens per
//! generation. The factory functions at the bottom of this module are the
//! "look up by name, validate, dispatch" entry points described in §4.12
//! and §6 ("Constructor surface" / "Recognised constraints keys").

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use crate::cancel::CancellationToken;
use crate::context::{ContentType, GenContext};
use crate::error::{Error, Result};
use crate::level::RoomCorridorGenerator;
use crate::model::{GameMap, Level, LevelParams, Properties, TerrainParams};
use crate::terrain::{CellularAutomataGenerator, MazeGenerator, TerrainGenerator};

/// Opaque result of a registered generator's `Generate` call. A sum type of
/// tagged variants per the §9 design note ("no dynamic-class hierarchy is
/// required"): callers type-assert via the `into_*` accessors below.
#[derive(Debug, Clone)]
pub enum GeneratedContent {
    Terrain(GameMap),
    Level(Level),
}

impl GeneratedContent {
    pub fn into_terrain(self) -> Result<GameMap> {
        match self {
            GeneratedContent::Terrain(m) => Ok(m),
            GeneratedContent::Level(_) => Err(Error::invalid_parameter(
                "generator produced a Level, expected terrain",
            )),
        }
    }

    pub fn into_level(self) -> Result<Level> {
        match self {
            GeneratedContent::Level(l) => Ok(l),
            GeneratedContent::Terrain(_) => Err(Error::invalid_parameter(
                "generator produced terrain, expected a Level",
            )),
        }
    }
}

/// Uniform contract every registered generator implements (§4.12 table).
pub trait Generator: Send + Sync {
    /// `constraints` is the same `Properties` bag carried by
    /// `GenerationParams::constraints` (§6's "Recognised constraints
    /// keys"): a terrain generator expects `"terrain_params"` (plus
    /// optional `"width"`/`"height"`), a level generator expects
    /// `"level_params"`.
    fn generate(&self, cancel: CancellationToken, constraints: &Properties) -> Result<GeneratedContent>;

    fn validate(&self, constraints: &Properties) -> Result<()>;

    fn get_type(&self) -> &'static str;

    fn get_version(&self) -> &'static str;
}

fn require_constraint<'a>(constraints: &'a Properties, key: &str) -> Result<&'a serde_json::Value> {
    constraints
        .get(key)
        .ok_or_else(|| Error::MissingConstraint(key.to_string()))
}

fn parse_constraint<T: serde::de::DeserializeOwned>(constraints: &Properties, key: &'static str) -> Result<T> {
    let value = require_constraint(constraints, key)?;
    serde_json::from_value(value.clone()).map_err(|_| Error::InvalidConstraint {
        key: key.to_string(),
        expected: "matching parameter record",
    })
}

/// Merge the factory-level `"width"`/`"height"` overrides (default 50, per
/// §6) into a [`TerrainParams`]' own constraints map, which is what
/// [`crate::terrain::dimensions_from_constraints`] actually reads.
fn with_dimension_overrides(mut params: TerrainParams, top: &Properties) -> TerrainParams {
    if let Some(w) = top.get("width") {
        params.base.constraints.insert("width".to_string(), w.clone());
    }
    if let Some(h) = top.get("height") {
        params.base.constraints.insert("height".to_string(), h.clone());
    }
    params
}

/// Registry entry wrapping a [`TerrainGenerator`] behind the uniform
/// [`Generator`] contract.
struct TerrainEntry<G: TerrainGenerator> {
    inner: G,
    tag: &'static str,
}

impl<G: TerrainGenerator> Generator for TerrainEntry<G> {
    fn generate(&self, cancel: CancellationToken, constraints: &Properties) -> Result<GeneratedContent> {
        let params: TerrainParams = parse_constraint(constraints, "terrain_params")?;
        let params = with_dimension_overrides(params, constraints);
        self.inner.validate(&params)?;
        let seed_manager = crate::seed::SeedManager::new(params.seed as u64);
        let mut ctx = GenContext::new(
            seed_manager.derive_stream(self.tag),
            ContentType::Terrain,
            self.tag,
            params.seed as u64,
        )
        .with_cancellation(cancel);
        let map = self
            .inner
            .generate_terrain(&mut ctx, &params)
            .map_err(|e| e.wrap(self.tag))?;
        Ok(GeneratedContent::Terrain(map))
    }

    fn validate(&self, constraints: &Properties) -> Result<()> {
        let params: TerrainParams = parse_constraint(constraints, "terrain_params")?;
        self.inner.validate(&params)
    }

    fn get_type(&self) -> &'static str {
        self.inner.get_type()
    }

    fn get_version(&self) -> &'static str {
        self.inner.get_version()
    }
}

/// Registry entry wrapping the room-corridor level generator.
struct RoomCorridorEntry;

impl Generator for RoomCorridorEntry {
    fn generate(&self, cancel: CancellationToken, constraints: &Properties) -> Result<GeneratedContent> {
        let params: LevelParams = parse_constraint(constraints, "level_params")?;
        let mut gen = RoomCorridorGenerator::with_seed(params.seed);
        let level = gen.generate_level_cancellable(&params, cancel)?;
        Ok(GeneratedContent::Level(level))
    }

    fn validate(&self, constraints: &Properties) -> Result<()> {
        let params: LevelParams = parse_constraint(constraints, "level_params")?;
        params.validate()
    }

    fn get_type(&self) -> &'static str {
        "level"
    }

    fn get_version(&self) -> &'static str {
        "1.0.0"
    }
}

/// Process-wide registry: reader-writer lock, write-once at init, read-many
/// during generation (§5 "Shared resources").
pub struct GeneratorRegistry {
    entries: RwLock<HashMap<String, Arc<dyn Generator>>>,
}

impl GeneratorRegistry {
    fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide instance, populated with the built-in generators on
    /// first access.
    pub fn global() -> &'static GeneratorRegistry {
        static REGISTRY: OnceLock<GeneratorRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let registry = GeneratorRegistry::new();
            registry.register_generator(
                "cellular_automata",
                Arc::new(TerrainEntry {
                    inner: CellularAutomataGenerator::default(),
                    tag: "terrain.cellular",
                }),
            );
            registry.register_generator(
                "maze",
                Arc::new(TerrainEntry {
                    inner: MazeGenerator::default(),
                    tag: "terrain.maze",
                }),
            );
            registry.register_generator("room_corridor", Arc::new(RoomCorridorEntry));
            registry
        })
    }

    /// Register (or replace) a generator under `name`. Takes the write lock.
    pub fn register_generator(&self, name: impl Into<String>, generator: Arc<dyn Generator>) {
        let mut entries = self.entries.write().expect("generator registry poisoned");
        entries.insert(name.into(), generator);
    }

    /// Look up a generator by name. Takes the read lock.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Generator>> {
        let entries = self.entries.read().expect("generator registry poisoned");
        entries
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownGenerator(name.to_string()))
    }
}

/// Factory: look up `name`, validate `params`, dispatch, and type-assert
/// the result as terrain (§4.12 "Factory methods").
pub fn generate_terrain(name: &str, params: &TerrainParams, cancel: CancellationToken) -> Result<GameMap> {
    let generator = GeneratorRegistry::global().get(name)?;
    let mut constraints = Properties::new();
    constraints.insert(
        "terrain_params".to_string(),
        serde_json::to_value(params).expect("TerrainParams always serializes"),
    );
    generator.validate(&constraints)?;
    generator.generate(cancel, &constraints)?.into_terrain()
}

/// Factory: look up `name`, validate `params`, dispatch, and type-assert
/// the result as a level.
pub fn generate_level(name: &str, params: &LevelParams, cancel: CancellationToken) -> Result<Level> {
    let generator = GeneratorRegistry::global().get(name)?;
    let mut constraints = Properties::new();
    constraints.insert(
        "level_params".to_string(),
        serde_json::to_value(params).expect("LevelParams always serializes"),
    );
    generator.validate(&constraints)?;
    generator.generate(cancel, &constraints)?.into_level()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BiomeType, ConnectivityLevel, CorridorStyle, GenerationParams, LevelTheme};

    fn terrain_params(seed: i64) -> TerrainParams {
        TerrainParams {
            base: GenerationParams {
                seed,
                difficulty: 5,
                player_level: 1,
                timeout: std::time::Duration::from_secs(5),
                constraints: Properties::new(),
            },
            biome_type: BiomeType::Cave,
            density: 0.45,
            water_level: 0.1,
            roughness: 0.5,
            connectivity: ConnectivityLevel::Moderate,
        }
    }

    fn level_params(seed: i64) -> LevelParams {
        LevelParams {
            base: GenerationParams {
                seed,
                difficulty: 5,
                player_level: 1,
                timeout: std::time::Duration::from_secs(5),
                constraints: Properties::new(),
            },
            min_rooms: 4,
            max_rooms: 6,
            room_types: vec![],
            corridor_style: CorridorStyle::Straight,
            level_theme: LevelTheme::Classic,
            has_boss: false,
            secret_rooms: 0,
            connectivity: ConnectivityLevel::Moderate,
        }
    }

    #[test]
    fn unknown_generator_name_rejected() {
        let err = generate_terrain("nonexistent", &terrain_params(1), CancellationToken::new());
        assert!(matches!(err, Err(Error::UnknownGenerator(_))));
    }

    #[test]
    fn factory_dispatches_cellular_automata() {
        let mut params = terrain_params(123);
        params.base.constraints.insert("width".into(), serde_json::json!(24));
        params.base.constraints.insert("height".into(), serde_json::json!(24));
        let map = generate_terrain("cellular_automata", &params, CancellationToken::new()).unwrap();
        assert_eq!(map.width(), 24);
        assert_eq!(map.height(), 24);
    }

    #[test]
    fn factory_dispatches_room_corridor() {
        let level = generate_level("room_corridor", &level_params(999999), CancellationToken::new()).unwrap();
        assert!(level.width >= 30);
        assert!(level.properties.contains_key("room_count"));
    }
}
