//! I3/P3: every generated map's walkable tiles form exactly one connected
//! component, across every terrain generator, biome, and connectivity
//! level, and across the room-corridor level path.

use dungeon_forge::cancel::CancellationToken;
use dungeon_forge::connectivity::is_fully_connected;
use dungeon_forge::model::{
    BiomeType, ConnectivityLevel, CorridorStyle, GenerationParams, LevelParams, LevelTheme, Properties,
    TerrainParams,
};
use dungeon_forge::{generate_level, generate_terrain, GameMap};
use std::time::Duration;

fn base(seed: i64) -> GenerationParams {
    GenerationParams {
        seed,
        difficulty: 6,
        player_level: 3,
        timeout: Duration::from_secs(10),
        constraints: Properties::new(),
    }
}

fn terrain_params(seed: i64, biome_type: BiomeType, connectivity: ConnectivityLevel) -> TerrainParams {
    let mut base = base(seed);
    base.constraints.insert("width".into(), serde_json::json!(40));
    base.constraints.insert("height".into(), serde_json::json!(40));
    TerrainParams {
        base,
        biome_type,
        density: 0.45,
        water_level: 0.1,
        roughness: 0.5,
        connectivity,
    }
}

#[test]
fn cellular_automata_is_always_connected_across_biomes() {
    for biome in [
        BiomeType::Cave,
        BiomeType::Dungeon,
        BiomeType::Forest,
        BiomeType::Mountain,
        BiomeType::Swamp,
        BiomeType::Desert,
    ] {
        for seed in [1, 2, 3] {
            let params = terrain_params(seed, biome, ConnectivityLevel::Moderate);
            let map = generate_terrain("cellular_automata", &params, CancellationToken::new()).unwrap();
            assert!(is_fully_connected(&map), "{biome:?} seed {seed} produced a split map");
        }
    }
}

#[test]
fn maze_is_always_connected() {
    for seed in [11, 22, 33] {
        let params = terrain_params(seed, BiomeType::Dungeon, ConnectivityLevel::Moderate);
        let map = generate_terrain("maze", &params, CancellationToken::new()).unwrap();
        assert!(is_fully_connected(&map));
    }
}

#[test]
fn every_connectivity_level_yields_a_connected_map() {
    for level in [
        ConnectivityLevel::Minimal,
        ConnectivityLevel::Moderate,
        ConnectivityLevel::High,
        ConnectivityLevel::Complete,
    ] {
        let params = terrain_params(99, BiomeType::Cave, level);
        let map = generate_terrain("cellular_automata", &params, CancellationToken::new()).unwrap();
        assert!(is_fully_connected(&map), "level {level:?} left a disconnected map");
    }
}

#[test]
fn room_corridor_levels_are_fully_connected() {
    for seed in [1, 2, 3] {
        let params = LevelParams {
            base: base(seed),
            min_rooms: 4,
            max_rooms: 7,
            room_types: vec![],
            corridor_style: CorridorStyle::Straight,
            level_theme: LevelTheme::Classic,
            has_boss: false,
            secret_rooms: 0,
            connectivity: ConnectivityLevel::Moderate,
        };
        let level = generate_level("room_corridor", &params, CancellationToken::new()).unwrap();
        let mut map = GameMap::new(level.width, level.height);
        map.blit_rows(0, 0, &level.tiles);
        assert!(is_fully_connected(&map));
    }
}
