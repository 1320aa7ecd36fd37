//! Typed room content generators (C10), §4.7.
//!
//! Given an already-placed rectangle (from the BSP layout, C9), a
//! [`RoomType`] and a [`LevelTheme`], fills in the room's local tiles,
//! doors, features and properties. The room-corridor generator (C12) adds
//! further connection-specific doors on top of whatever canonical doors a
//! room type stakes out here (e.g. a puzzle room's fixed entrance/exit).

use crate::context::GenContext;
use crate::model::{LevelTheme, Position, Properties, Rectangle, RoomFeature, RoomLayout, RoomType, Tile};

/// Build a room's local tile grid (all floor, walled border) plus its
/// type-specific doors, features and properties.
pub fn generate_room(
    ctx: &mut GenContext,
    id: impl Into<String>,
    room_type: RoomType,
    bounds: Rectangle,
    theme: LevelTheme,
    difficulty: i32,
) -> RoomLayout {
    let tiles = base_tiles(bounds);
    let mut layout = RoomLayout {
        id: id.into(),
        room_type,
        bounds,
        tiles,
        doors: Vec::new(),
        features: Vec::new(),
        properties: Properties::new(),
        connected: Vec::new(),
        difficulty,
    };

    match room_type {
        RoomType::Combat => fill_combat(ctx, &mut layout, theme),
        RoomType::Treasure => fill_treasure(ctx, &mut layout),
        RoomType::Puzzle => fill_puzzle(ctx, &mut layout, theme),
        RoomType::Boss => fill_boss(ctx, &mut layout, theme),
        RoomType::Entrance => fill_entrance(&mut layout),
        RoomType::Exit => fill_exit(&mut layout),
        RoomType::Secret => fill_secret(ctx, &mut layout),
        RoomType::Shop => fill_shop(&mut layout),
        RoomType::Rest => fill_rest(&mut layout),
        RoomType::Trap => fill_trap(ctx, &mut layout),
        RoomType::Story => fill_story(&mut layout),
    }

    layout
}

fn base_tiles(bounds: Rectangle) -> Vec<Vec<Tile>> {
    (0..bounds.height)
        .map(|y| {
            (0..bounds.width)
                .map(|x| {
                    let on_border = x == 0 || y == 0 || x == bounds.width - 1 || y == bounds.height - 1;
                    if on_border {
                        Tile::wall()
                    } else {
                        Tile::floor()
                    }
                })
                .collect()
        })
        .collect()
}

fn local_center(bounds: &Rectangle) -> Position {
    Position::new(bounds.width as i32 / 2, bounds.height as i32 / 2)
}

fn random_interior_position(ctx: &mut GenContext, bounds: &Rectangle) -> Position {
    if bounds.width <= 2 || bounds.height <= 2 {
        return local_center(bounds);
    }
    Position::new(
        ctx.random_int_range(1, bounds.width as i32 - 2),
        ctx.random_int_range(1, bounds.height as i32 - 2),
    )
}

/// Clamp a candidate position to `[1, extent-2]` on both axes (interior,
/// never a corner), per §4.7's door-placement clause.
fn clamp_interior(bounds: &Rectangle, x: i32, y: i32) -> Position {
    Position::new(
        x.clamp(1, bounds.width as i32 - 2),
        y.clamp(1, bounds.height as i32 - 2),
    )
}

/// Place a door in local coordinates and record it (tagged into `layout`'s
/// tiles as a door sprite, pushed into `doors` translated to world space).
fn place_door(layout: &mut RoomLayout, local: Position) {
    let (lx, ly) = (local.x as usize, local.y as usize);
    if ly < layout.tiles.len() && lx < layout.tiles[ly].len() {
        layout.tiles[ly][lx] = Tile::door();
    }
    layout
        .doors
        .push(Position::new(layout.bounds.x + local.x, layout.bounds.y + local.y));
}

/// A door on a random wall, position clamped away from corners (§4.7
/// "combat"/"generic" door placement clause).
fn random_wall_door(ctx: &mut GenContext, bounds: &Rectangle) -> Position {
    let w = bounds.width as i32;
    let h = bounds.height as i32;
    match ctx.rng().range_usize(0, 4) {
        0 => clamp_interior(bounds, ctx.random_int_range(0, w - 1), 0),
        1 => clamp_interior(bounds, ctx.random_int_range(0, w - 1), h - 1),
        2 => clamp_interior(bounds, 0, ctx.random_int_range(0, h - 1)),
        _ => clamp_interior(bounds, w - 1, ctx.random_int_range(0, h - 1)),
    }
}

fn top_center(bounds: &Rectangle) -> Position {
    Position::new(bounds.width as i32 / 2, 0)
}

fn bottom_center(bounds: &Rectangle) -> Position {
    Position::new(bounds.width as i32 / 2, bounds.height as i32 - 1)
}

/// Theme -> `{enemy_a, enemy_b, enemy_c}`, consulted by combat and boss
/// rooms (§4.7 "enemy_types from theme table").
fn theme_enemies(theme: LevelTheme) -> [&'static str; 3] {
    match theme {
        LevelTheme::Classic => ["goblin", "orc", "skeleton"],
        LevelTheme::Horror => ["zombie", "wraith", "shadow"],
        LevelTheme::Natural => ["wolf", "bear", "spider"],
        LevelTheme::Mechanical => ["automaton", "turret", "drone"],
        LevelTheme::Magical => ["elemental", "wisp", "construct"],
        LevelTheme::Undead => ["zombie", "skeleton", "ghoul"],
        LevelTheme::Elemental => ["fire_spirit", "ice_shard", "storm_wisp"],
    }
}

/// Theme -> puzzle-type vocabulary (§4.7 "Puzzle").
fn theme_puzzle_types(theme: LevelTheme) -> [&'static str; 3] {
    match theme {
        LevelTheme::Mechanical => ["gear", "circuit", "weight"],
        LevelTheme::Magical => ["runes", "elemental", "focus"],
        _ => ["lever", "pressure", "riddle"],
    }
}

/// Theme -> boss-type vocabulary (§4.7 "Boss").
fn theme_boss(theme: LevelTheme) -> &'static str {
    match theme {
        LevelTheme::Classic => "orc_warlord",
        LevelTheme::Horror => "eldritch_horror",
        LevelTheme::Natural => "ancient_treant",
        LevelTheme::Mechanical => "war_golem",
        LevelTheme::Magical => "arcane_sentinel",
        LevelTheme::Undead => "lich",
        LevelTheme::Elemental => "elemental_avatar",
    }
}

/// Combat room (§4.7 "Combat"): `1 + difficulty/4 + rng(0,3)` tactical
/// features chosen from `{cover, elevation, trap, hazard}`, 1-3 doors on
/// random walls, themed enemy roster, difficulty-scaled loot chance.
fn fill_combat(ctx: &mut GenContext, room: &mut RoomLayout, theme: LevelTheme) {
    let feature_kinds = ["cover", "elevation", "trap", "hazard"];
    let count = 1 + room.difficulty / 4 + ctx.random_int_range(0, 3);
    for _ in 0..count {
        let pos = random_interior_position(ctx, &room.bounds);
        let kind = feature_kinds[ctx.rng().range_usize(0, feature_kinds.len())];
        room.features.push(RoomFeature::new(kind, pos));
    }

    let door_count = 1 + ctx.rng().range_usize(0, 3);
    for _ in 0..door_count {
        let door = random_wall_door(ctx, &room.bounds);
        place_door(room, door);
    }

    let enemies = theme_enemies(theme);
    let mut enemy_types: Vec<String> = enemies.iter().map(|s| s.to_string()).collect();
    if room.difficulty > 10 {
        enemy_types.push(format!("elite_{}", enemies[0]));
    }

    room.properties.insert("enemy_count".into(), (2 + room.difficulty / 3).into());
    room.properties.insert("enemy_types".into(), enemy_types.into());
    room.properties.insert("loot_chance".into(), (0.3 + 0.02 * room.difficulty as f64).into());
}

/// Treasure room (§4.7 "Treasure"): decorated walls, polished floor,
/// 1-3 chests with difficulty-scaled rarity/contents, a centred guardian
/// above difficulty 7, single door centred on the top edge.
fn fill_treasure(ctx: &mut GenContext, room: &mut RoomLayout) {
    for row in room.tiles.iter_mut() {
        for tile in row.iter_mut() {
            if !tile.walkable {
                tile.tag("decorated", true);
            } else {
                tile.tag("polished", true);
            }
        }
    }

    let difficulty = room.difficulty;
    let chest_count = (1 + difficulty / 5 + ctx.random_int_range(0, 2)).max(1);
    for _ in 0..chest_count {
        let pos = random_interior_position(ctx, &room.bounds);
        let rarity = if difficulty < 5 {
            "common"
        } else if difficulty < 10 {
            "uncommon"
        } else if difficulty < 15 {
            "rare"
        } else {
            "epic"
        };
        let locked = difficulty > 5;
        let trapped = difficulty > 8 && ctx.random_float() < 0.3;

        let mut contents = vec!["gold".to_string()];
        if difficulty > 3 {
            contents.push("gems".to_string());
        }
        if difficulty > 7 {
            contents.push("magic_item".to_string());
        }
        if difficulty > 12 {
            contents.push("artifact".to_string());
        }

        room.features.push(
            RoomFeature::new("treasure_chest", pos)
                .with("rarity", rarity)
                .with("locked", locked)
                .with("trapped", trapped)
                .with("contents", contents),
        );
    }

    if difficulty > 7 {
        room.features.push(RoomFeature::new("guardian", local_center(&room.bounds)));
    }

    place_door(room, top_center(&room.bounds));

    room.properties.insert("treasure_value".into(), (100 * difficulty).into());
    room.properties.insert("requires_key".into(), (difficulty > 10).into());
}

/// Puzzle room (§4.7 "Puzzle"): theme-selected puzzle type, `2 +
/// difficulty/3` elements at random interior positions, entrance/exit
/// doors top/bottom centre.
fn fill_puzzle(ctx: &mut GenContext, room: &mut RoomLayout, theme: LevelTheme) {
    let kinds = theme_puzzle_types(theme);
    let kind = kinds[ctx.rng().range_usize(0, kinds.len())];

    let element_count = 2 + room.difficulty / 3;
    for _ in 0..element_count {
        let pos = random_interior_position(ctx, &room.bounds);
        room.features.push(RoomFeature::new("puzzle_element", pos).with("puzzle_type", kind));
    }

    place_door(room, top_center(&room.bounds));
    place_door(room, bottom_center(&room.bounds));

    room.properties.insert("puzzle_type".into(), kind.into());
    room.properties.insert("requires_solution".into(), true.into());
}

/// Boss room (§4.7 "Boss"): reinforced walls, arena floor, themed boss
/// spawn with `1 + difficulty/8` phases, a per-phase environmental hazard,
/// single top-centre entrance, two mid-height side escape routes.
fn fill_boss(ctx: &mut GenContext, room: &mut RoomLayout, theme: LevelTheme) {
    for row in room.tiles.iter_mut() {
        for tile in row.iter_mut() {
            if !tile.walkable {
                tile.tag("reinforced", true);
            } else {
                tile.tag("arena", true);
            }
        }
    }

    let difficulty = room.difficulty;
    let phases = 1 + difficulty / 8;
    room.features.push(
        RoomFeature::new("boss_spawn", local_center(&room.bounds))
            .with("boss_type", theme_boss(theme))
            .with("difficulty", (difficulty + 2) as i64)
            .with("phases", phases as i64),
    );

    for i in 1..=phases {
        let pos = random_interior_position(ctx, &room.bounds);
        room.features.push(
            RoomFeature::new("environmental_hazard", pos)
                .with("trigger", format!("boss_health_{}", 75 - 25 * i)),
        );
    }

    place_door(room, top_center(&room.bounds));

    let mid_y = room.bounds.height as i32 / 2;
    let escape_routes = vec![
        Position::new(0, mid_y),
        Position::new(room.bounds.width as i32 - 1, mid_y),
    ];
    room.properties.insert(
        "escape_routes".into(),
        serde_json::to_value(escape_routes).expect("Position always serializes"),
    );
}

/// Entrance room (§4.7): safe zone with a healing feature and single
/// top-centre door.
fn fill_entrance(room: &mut RoomLayout) {
    room.features.push(RoomFeature::new("healing", local_center(&room.bounds)));
    place_door(room, top_center(&room.bounds));
    room.properties.insert("safe_zone".into(), true.into());
}

/// Exit room (§4.7): safe zone with an exit portal and single top-centre
/// door.
fn fill_exit(room: &mut RoomLayout) {
    room.features.push(RoomFeature::new("exit_portal", local_center(&room.bounds)));
    place_door(room, top_center(&room.bounds));
    room.properties.insert("safe_zone".into(), true.into());
}

/// Secret room (§4.7): hidden, a chance at special loot, discovery XP
/// scaled by difficulty.
fn fill_secret(ctx: &mut GenContext, room: &mut RoomLayout) {
    let pos = local_center(&room.bounds);
    if ctx.random_float() < 0.7 {
        room.features.push(RoomFeature::new("special_loot", pos));
    }
    room.properties.insert("hidden".into(), true.into());
    room.properties.insert("discovery_xp".into(), (10 * room.difficulty).into());
}

/// Shop room (§4.7): a merchant feature, fixed buy/sell price multipliers.
fn fill_shop(room: &mut RoomLayout) {
    room.features.push(RoomFeature::new("merchant", local_center(&room.bounds)));
    room.properties.insert("buy_prices".into(), 1.0.into());
    room.properties.insert("sell_prices".into(), 0.5.into());
}

/// Rest room (§4.7): a rest point, no hostiles.
fn fill_rest(room: &mut RoomLayout) {
    room.features.push(RoomFeature::new("rest_point", local_center(&room.bounds)));
    room.properties.insert("safe".into(), true.into());
}

/// Trap room (§4.7): hidden traps scaled by difficulty, danger level tag.
fn fill_trap(ctx: &mut GenContext, room: &mut RoomLayout) {
    let count = (1 + room.difficulty / 3).clamp(1, 6);
    for _ in 0..count {
        let pos = random_interior_position(ctx, &room.bounds);
        room.features.push(RoomFeature::new("hidden_trap", pos).with("severity", room.difficulty as i64));
    }
    room.properties.insert("trap_density".into(), room.difficulty.into());
    room.properties.insert("danger_level".into(), "high".into());
}

/// Story room (§4.7): a narrative trigger, lore points scaled by
/// difficulty.
fn fill_story(room: &mut RoomLayout) {
    room.features.push(
        RoomFeature::new("narrative", local_center(&room.bounds)).with("narrative_id", room.id.clone()),
    );
    room.properties.insert("lore_points".into(), room.difficulty.into());
}

/// Assign room types to `n` BSP leaves per the index rule in §4.6: index 0
/// is always `entrance`, index `n-1` is always `exit`, index `n-2` is
/// `boss` when `has_boss`. Every other index is drawn from `room_types`
/// (uniformly, when the caller supplied an allowed set) or from the
/// default weighted distribution. `secret_rooms` of the remaining interior
/// indices are then forced to `Secret` on top of that draw, so the
/// room-corridor generator (C12) has somewhere to hang its secret-door
/// features (§4.10 step 6).
pub fn assign_room_types(
    ctx: &mut GenContext,
    n: usize,
    has_boss: bool,
    secret_rooms: usize,
    room_types: &[RoomType],
) -> Vec<RoomType> {
    if n == 0 {
        return Vec::new();
    }

    let weights: [(RoomType, f64); 6] = [
        (RoomType::Combat, 0.40),
        (RoomType::Treasure, 0.20),
        (RoomType::Puzzle, 0.15),
        (RoomType::Rest, 0.10),
        (RoomType::Trap, 0.10),
        (RoomType::Secret, 0.05),
    ];

    let mut types = Vec::with_capacity(n);
    for i in 0..n {
        let t = if i == 0 {
            RoomType::Entrance
        } else if i == n - 1 {
            RoomType::Exit
        } else if has_boss && n >= 2 && i == n - 2 {
            RoomType::Boss
        } else if !room_types.is_empty() {
            room_types[ctx.rng().range_usize(0, room_types.len())]
        } else {
            *ctx.rng().weighted_pick(&weights).unwrap_or(&RoomType::Combat)
        };
        types.push(t);
    }

    // I5/§9 Open Question 2: retag if the boss claim collided with entrance
    // (n < 2) so entrance/exit still both exist.
    if n > 1 && types[n - 1] != RoomType::Exit {
        types[n - 1] = RoomType::Exit;
    }

    let interior: Vec<usize> = (1..n.saturating_sub(1))
        .filter(|&i| !(has_boss && i == n - 2))
        .collect();
    let mut remaining = interior;
    for _ in 0..secret_rooms.min(remaining.len()) {
        let idx = remaining.remove(ctx.rng().range_usize(0, remaining.len()));
        types[idx] = RoomType::Secret;
    }

    types
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContentType;
    use crate::rng::Rng;

    fn ctx(seed: u64) -> GenContext {
        GenContext::new(Rng::new(seed), ContentType::Level, "rooms", seed)
    }

    const ALL_TYPES: [RoomType; 11] = [
        RoomType::Combat,
        RoomType::Treasure,
        RoomType::Puzzle,
        RoomType::Boss,
        RoomType::Entrance,
        RoomType::Exit,
        RoomType::Secret,
        RoomType::Shop,
        RoomType::Rest,
        RoomType::Trap,
        RoomType::Story,
    ];

    #[test]
    fn every_room_dimensions_match_bounds_i7() {
        let bounds = Rectangle::new(0, 0, 9, 7);
        let mut c = ctx(1);
        for rt in ALL_TYPES {
            let room = generate_room(&mut c, "r", rt, bounds, LevelTheme::Classic, 10);
            assert!(room.check_dimensioning(), "{rt:?} failed dimension check");
        }
    }

    #[test]
    fn doors_stay_inside_bounds_and_on_the_border() {
        let bounds = Rectangle::new(3, 4, 9, 7);
        let mut c = ctx(9);
        for rt in ALL_TYPES {
            let room = generate_room(&mut c, "r", rt, bounds, LevelTheme::Mechanical, 8);
            for door in &room.doors {
                assert!(bounds.contains(*door), "{rt:?} door {door:?} escapes {bounds:?}");
            }
        }
    }

    #[test]
    fn combat_room_enemy_roster_matches_theme() {
        let bounds = Rectangle::new(0, 0, 10, 8);
        let mut c = ctx(2);
        let room = generate_room(&mut c, "r", RoomType::Combat, bounds, LevelTheme::Horror, 15);
        let enemy_types = room.properties["enemy_types"].as_array().unwrap();
        assert!(enemy_types.iter().any(|v| v == "zombie"));
        assert!(enemy_types.iter().any(|v| v.as_str().unwrap().starts_with("elite_")));
    }

    #[test]
    fn boss_room_has_phase_scaled_hazards() {
        let bounds = Rectangle::new(0, 0, 12, 12);
        let mut c = ctx(3);
        let room = generate_room(&mut c, "r", RoomType::Boss, bounds, LevelTheme::Undead, 16);
        let spawn = room.features.iter().find(|f| f.kind == "boss_spawn").unwrap();
        assert_eq!(spawn.properties["boss_type"], "lich");
        let hazards = room.features.iter().filter(|f| f.kind == "environmental_hazard").count();
        assert_eq!(hazards, 1 + 16 / 8);
    }

    #[test]
    fn treasure_room_scales_rarity_and_contents_with_difficulty() {
        let bounds = Rectangle::new(0, 0, 10, 8);
        let mut c = ctx(4);
        let room = generate_room(&mut c, "r", RoomType::Treasure, bounds, LevelTheme::Classic, 14);
        let chest = room.features.iter().find(|f| f.kind == "treasure_chest").unwrap();
        assert_eq!(chest.properties["rarity"], "epic");
        assert_eq!(chest.properties["locked"], true);
        let contents = chest.properties["contents"].as_array().unwrap();
        assert!(contents.iter().any(|v| v == "artifact"));
        assert!(room.features.iter().any(|f| f.kind == "guardian"));
    }

    #[test]
    fn assign_room_types_places_entrance_and_exit() {
        let mut c = ctx(2);
        let types = assign_room_types(&mut c, 6, true, 1, &[]);
        assert_eq!(types[0], RoomType::Entrance);
        assert_eq!(types[5], RoomType::Exit);
        assert_eq!(types[4], RoomType::Boss);
        assert!(types.contains(&RoomType::Secret));
    }

    #[test]
    fn single_room_is_just_entrance() {
        let mut c = ctx(3);
        let types = assign_room_types(&mut c, 1, false, 0, &[]);
        assert_eq!(types, vec![RoomType::Entrance]);
    }

    #[test]
    fn respects_allowed_room_types() {
        let mut c = ctx(4);
        let allowed = [RoomType::Puzzle];
        let types = assign_room_types(&mut c, 5, false, 0, &allowed);
        for (i, t) in types.iter().enumerate() {
            if i != 0 && i != types.len() - 1 {
                assert_eq!(*t, RoomType::Puzzle);
            }
        }
    }
}
