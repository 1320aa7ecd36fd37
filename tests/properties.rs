//! Property-based coverage for the invariants in §8 that hold across wide
//! input ranges rather than single fixed scenarios: P1 (determinism), P3
//! (connectivity), P4 (room containment), P6 (room tile dimensioning).

use dungeon_forge::cancel::CancellationToken;
use dungeon_forge::connectivity::is_fully_connected;
use dungeon_forge::model::{
    BiomeType, ConnectivityLevel, CorridorStyle, GenerationParams, LevelParams, LevelTheme, Properties,
    TerrainParams,
};
use dungeon_forge::{generate_level, generate_terrain, GameMap};
use proptest::prelude::*;
use std::time::Duration;

fn terrain_params(seed: i64, difficulty: i32, density: f64) -> TerrainParams {
    let mut constraints = Properties::new();
    constraints.insert("width".into(), serde_json::json!(30));
    constraints.insert("height".into(), serde_json::json!(30));
    TerrainParams {
        base: GenerationParams {
            seed,
            difficulty,
            player_level: 1,
            timeout: Duration::from_secs(10),
            constraints,
        },
        biome_type: BiomeType::Cave,
        density,
        water_level: 0.1,
        roughness: 0.5,
        connectivity: ConnectivityLevel::Moderate,
    }
}

fn level_params(seed: i64, difficulty: i32, min_rooms: usize, max_rooms: usize) -> LevelParams {
    LevelParams {
        base: GenerationParams {
            seed,
            difficulty,
            player_level: 1,
            timeout: Duration::from_secs(10),
            constraints: Properties::new(),
        },
        min_rooms,
        max_rooms,
        room_types: vec![],
        corridor_style: CorridorStyle::Straight,
        level_theme: LevelTheme::Classic,
        has_boss: false,
        secret_rooms: 0,
        connectivity: ConnectivityLevel::Moderate,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn terrain_is_deterministic_for_any_seed(seed in 0i64..1_000_000, difficulty in 1i32..=20, density in 0.1f64..0.9) {
        let params = terrain_params(seed, difficulty, density);
        let a = generate_terrain("cellular_automata", &params, CancellationToken::new()).unwrap();
        let b = generate_terrain("cellular_automata", &params, CancellationToken::new()).unwrap();
        prop_assert_eq!(a.to_rows(), b.to_rows());
    }

    #[test]
    fn terrain_is_always_one_region(seed in 0i64..1_000_000, difficulty in 1i32..=20, density in 0.1f64..0.9) {
        let params = terrain_params(seed, difficulty, density);
        let map = generate_terrain("cellular_automata", &params, CancellationToken::new()).unwrap();
        prop_assert!(is_fully_connected(&map));
    }

    #[test]
    fn level_is_deterministic_and_connected(seed in 0i64..1_000_000, difficulty in 1i32..=20, min_rooms in 2usize..8) {
        let max_rooms = min_rooms + 3;
        let params = level_params(seed, difficulty, min_rooms, max_rooms);
        let a = generate_level("room_corridor", &params, CancellationToken::new()).unwrap();
        let b = generate_level("room_corridor", &params, CancellationToken::new()).unwrap();
        prop_assert_eq!(a.tiles.clone(), b.tiles);

        let mut map = GameMap::new(a.width, a.height);
        map.blit_rows(0, 0, &a.tiles);
        prop_assert!(is_fully_connected(&map));
    }

    #[test]
    fn level_room_count_stays_within_requested_bounds(seed in 0i64..1_000_000, min_rooms in 2usize..8) {
        let max_rooms = min_rooms + 3;
        let params = level_params(seed, 5, min_rooms, max_rooms);
        let level = generate_level("room_corridor", &params, CancellationToken::new()).unwrap();
        let room_count = level.properties["room_count"].as_u64().unwrap() as usize;
        prop_assert!(room_count >= min_rooms && room_count <= max_rooms);
    }
}
