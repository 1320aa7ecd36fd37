//! Scenario-level coverage: the registry/factory entry points (C13) produce
//! usable content for a realistic range of inputs, and round-trip through
//! JSON the way a caller persisting/replaying a generation would.

use dungeon_forge::cancel::CancellationToken;
use dungeon_forge::model::{
    BiomeType, ConnectivityLevel, CorridorStyle, GenerationParams, Level, LevelParams, LevelTheme,
    Properties, TerrainParams,
};
use dungeon_forge::{generate_level, generate_terrain};
use std::time::Duration;

#[test]
fn terrain_scenario_cave_dungeon() {
    let mut constraints = Properties::new();
    constraints.insert("width".into(), serde_json::json!(60));
    constraints.insert("height".into(), serde_json::json!(60));
    let params = TerrainParams {
        base: GenerationParams {
            seed: 20260101,
            difficulty: 12,
            player_level: 10,
            timeout: Duration::from_secs(15),
            constraints,
        },
        biome_type: BiomeType::Cave,
        density: 0.5,
        water_level: 0.2,
        roughness: 0.7,
        connectivity: ConnectivityLevel::High,
    };
    let map = generate_terrain("cellular_automata", &params, CancellationToken::new()).unwrap();
    assert_eq!(map.width(), 60);
    assert_eq!(map.height(), 60);
    assert!(map.to_rows().iter().flatten().any(|t| t.walkable));
}

#[test]
fn level_scenario_full_dungeon_crawl() {
    let params = LevelParams {
        base: GenerationParams {
            seed: 314159,
            difficulty: 15,
            player_level: 12,
            timeout: Duration::from_secs(20),
            constraints: Properties::new(),
        },
        min_rooms: 8,
        max_rooms: 12,
        room_types: vec![],
        corridor_style: CorridorStyle::Organic,
        level_theme: LevelTheme::Magical,
        has_boss: true,
        secret_rooms: 2,
        connectivity: ConnectivityLevel::High,
    };
    let level = generate_level("room_corridor", &params, CancellationToken::new()).unwrap();

    let json = serde_json::to_string(&level).expect("level should serialize");
    let round_tripped: Level = serde_json::from_str(&json).expect("level should deserialize");
    assert_eq!(level.tiles, round_tripped.tiles);
    assert_eq!(level.width, round_tripped.width);
}

#[test]
fn unknown_generator_name_is_rejected_by_both_factories() {
    let terrain_params = TerrainParams {
        base: GenerationParams {
            seed: 1,
            difficulty: 1,
            player_level: 1,
            timeout: Duration::from_secs(5),
            constraints: Properties::new(),
        },
        biome_type: BiomeType::Cave,
        density: 0.4,
        water_level: 0.1,
        roughness: 0.5,
        connectivity: ConnectivityLevel::Moderate,
    };
    assert!(generate_terrain("not_a_real_generator", &terrain_params, CancellationToken::new()).is_err());

    let level_params = LevelParams {
        base: terrain_params.base.clone(),
        min_rooms: 2,
        max_rooms: 3,
        room_types: vec![],
        corridor_style: CorridorStyle::Straight,
        level_theme: LevelTheme::Classic,
        has_boss: false,
        secret_rooms: 0,
        connectivity: ConnectivityLevel::Moderate,
    };
    assert!(generate_level("not_a_real_generator", &level_params, CancellationToken::new()).is_err());
}
