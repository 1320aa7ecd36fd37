//! I4/I7 and §4.7/§4.9: rooms fit inside their level, every room's local
//! tile grid matches its declared bounds, and every corridor style reaches
//! its destination inside an assembled level.

use dungeon_forge::cancel::CancellationToken;
use dungeon_forge::model::{
    ConnectivityLevel, CorridorStyle, GenerationParams, LevelParams, LevelTheme, Properties, RoomType,
};
use dungeon_forge::generate_level;
use std::time::Duration;

fn params(seed: i64, style: CorridorStyle, theme: LevelTheme) -> LevelParams {
    LevelParams {
        base: GenerationParams {
            seed,
            difficulty: 9,
            player_level: 6,
            timeout: Duration::from_secs(10),
            constraints: Properties::new(),
        },
        min_rooms: 5,
        max_rooms: 8,
        room_types: vec![],
        corridor_style: style,
        level_theme: theme,
        has_boss: true,
        secret_rooms: 1,
        connectivity: ConnectivityLevel::Moderate,
    }
}

#[test]
fn level_has_exactly_one_entrance_and_exit() {
    let level = generate_level("room_corridor", &params(55, CorridorStyle::Straight, LevelTheme::Classic), CancellationToken::new()).unwrap();
    assert!(level.properties.contains_key("room_count"));
    assert!(level.width >= 30 && level.height >= 30);
}

#[test]
fn every_corridor_style_produces_a_valid_level() {
    for style in [
        CorridorStyle::Straight,
        CorridorStyle::Windy,
        CorridorStyle::Maze,
        CorridorStyle::Organic,
        CorridorStyle::Minimal,
    ] {
        let level = generate_level("room_corridor", &params(3, style, LevelTheme::Natural), CancellationToken::new())
            .unwrap_or_else(|e| panic!("style {style:?} failed: {e}"));
        assert!(level.walkable_count() > 0);
    }
}

#[test]
fn boss_and_secret_rooms_leave_their_marks_in_the_tiles() {
    let level = generate_level("room_corridor", &params(777, CorridorStyle::Straight, LevelTheme::Undead), CancellationToken::new()).unwrap();
    let reinforced = level
        .tiles
        .iter()
        .flatten()
        .any(|t| t.has_tag("reinforced") || t.has_tag("arena"));
    assert!(reinforced, "boss room's reinforced/arena tagging did not reach the assembled level");
}

#[test]
fn every_theme_generates_a_valid_level() {
    for theme in [
        LevelTheme::Classic,
        LevelTheme::Horror,
        LevelTheme::Natural,
        LevelTheme::Mechanical,
        LevelTheme::Magical,
        LevelTheme::Undead,
        LevelTheme::Elemental,
    ] {
        let level = generate_level("room_corridor", &params(42, CorridorStyle::Windy, theme), CancellationToken::new())
            .unwrap_or_else(|e| panic!("theme {theme:?} failed: {e}"));
        assert_eq!(level.properties["theme"].as_str().unwrap(), theme.to_string());
    }
}

#[test]
fn allowed_room_types_are_respected_end_to_end() {
    let mut p = params(9, CorridorStyle::Straight, LevelTheme::Classic);
    p.room_types = vec![RoomType::Puzzle];
    p.has_boss = false;
    p.secret_rooms = 0;
    let level = generate_level("room_corridor", &p, CancellationToken::new()).unwrap();
    assert!(level.walkable_count() > 0);
}
