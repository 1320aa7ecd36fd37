//! P8: malformed or out-of-range parameters are rejected before any
//! generation work happens, through the registry/factory entry points.

use dungeon_forge::cancel::CancellationToken;
use dungeon_forge::model::{
    BiomeType, ConnectivityLevel, CorridorStyle, GenerationParams, LevelParams, LevelTheme, Properties,
    TerrainParams,
};
use dungeon_forge::{generate_level, generate_terrain};
use std::time::Duration;

fn base(seed: i64, difficulty: i32) -> GenerationParams {
    GenerationParams {
        seed,
        difficulty,
        player_level: 1,
        timeout: Duration::from_secs(5),
        constraints: Properties::new(),
    }
}

#[test]
fn difficulty_out_of_range_is_rejected() {
    let params = TerrainParams {
        base: base(1, 25),
        biome_type: BiomeType::Cave,
        density: 0.4,
        water_level: 0.1,
        roughness: 0.5,
        connectivity: ConnectivityLevel::Moderate,
    };
    assert!(generate_terrain("cellular_automata", &params, CancellationToken::new()).is_err());
}

#[test]
fn density_out_of_unit_range_is_rejected() {
    let params = TerrainParams {
        base: base(1, 5),
        biome_type: BiomeType::Cave,
        density: 1.5,
        water_level: 0.1,
        roughness: 0.5,
        connectivity: ConnectivityLevel::Moderate,
    };
    assert!(generate_terrain("cellular_automata", &params, CancellationToken::new()).is_err());
}

#[test]
fn min_rooms_above_max_rooms_is_rejected() {
    let params = LevelParams {
        base: base(1, 5),
        min_rooms: 10,
        max_rooms: 4,
        room_types: vec![],
        corridor_style: CorridorStyle::Straight,
        level_theme: LevelTheme::Classic,
        has_boss: false,
        secret_rooms: 0,
        connectivity: ConnectivityLevel::Moderate,
    };
    assert!(generate_level("room_corridor", &params, CancellationToken::new()).is_err());
}

#[test]
fn max_rooms_below_two_is_rejected() {
    let params = LevelParams {
        base: base(1, 5),
        min_rooms: 1,
        max_rooms: 1,
        room_types: vec![],
        corridor_style: CorridorStyle::Straight,
        level_theme: LevelTheme::Classic,
        has_boss: false,
        secret_rooms: 0,
        connectivity: ConnectivityLevel::Moderate,
    };
    assert!(generate_level("room_corridor", &params, CancellationToken::new()).is_err());
}

#[test]
fn zero_min_rooms_is_rejected() {
    let params = LevelParams {
        base: base(1, 5),
        min_rooms: 0,
        max_rooms: 6,
        room_types: vec![],
        corridor_style: CorridorStyle::Straight,
        level_theme: LevelTheme::Classic,
        has_boss: false,
        secret_rooms: 0,
        connectivity: ConnectivityLevel::Moderate,
    };
    assert!(generate_level("room_corridor", &params, CancellationToken::new()).is_err());
}

#[test]
fn valid_parameters_are_accepted() {
    let params = LevelParams {
        base: base(1, 5),
        min_rooms: 4,
        max_rooms: 6,
        room_types: vec![],
        corridor_style: CorridorStyle::Straight,
        level_theme: LevelTheme::Classic,
        has_boss: false,
        secret_rooms: 0,
        connectivity: ConnectivityLevel::Moderate,
    };
    assert!(generate_level("room_corridor", &params, CancellationToken::new()).is_ok());
}
