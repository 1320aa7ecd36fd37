//! Room-corridor level generator (C12), §4.10.
//!
//! Orchestrates BSP room layout (C9), typed room content (C10), the
//! corridor planner (C11), and the connectivity engine (C7) into one
//! assembled [`Level`]. This is the `LevelGenerator` sub-interface from §6.

use crate::cancel::CancellationToken;
use crate::connectivity;
use crate::context::{ContentType, GenContext};
use crate::corridor::plan_corridor;
use crate::error::{Error, Result};
use crate::model::{
    Corridor, CorridorStyle, GameMap, Level, LevelParams, LevelTheme, Position, Properties,
    Rectangle, RoomFeature, RoomLayout, RoomType,
};
use crate::rooms::{bsp::layout_rooms, generators::assign_room_types, generators::generate_room};
use crate::seed::SeedManager;

/// §6 "LevelGenerator sub-interface": `GenerateLevel`, `GenerateRoom`,
/// `ConnectRooms`. Implementations carry internal RNG state and are
/// **not** safe to share across concurrent calls (§5 "Shared resources");
/// callers wanting parallelism must build a fresh instance per call.
pub trait LevelGenerator {
    fn generate_level(&mut self, params: &LevelParams) -> Result<Level>;
    fn generate_room(
        &mut self,
        room_type: RoomType,
        bounds: Rectangle,
        theme: LevelTheme,
        difficulty: i32,
    ) -> RoomLayout;
    fn connect_rooms(
        &mut self,
        a: &RoomLayout,
        b: &RoomLayout,
        theme: LevelTheme,
        style: CorridorStyle,
    ) -> Corridor;
}

/// Version tag reported in a level's `properties["version"]` (§6 "Output
/// properties").
const VERSION: &str = "1.0.0";

pub struct RoomCorridorGenerator {
    seed: i64,
}

impl Default for RoomCorridorGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomCorridorGenerator {
    /// Non-deterministic wall-clock seed (§6 "Constructor surface").
    pub fn new() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self { seed: nanos as i64 }
    }

    /// Deterministic construction, for tests/replays.
    pub fn with_seed(seed: i64) -> Self {
        Self { seed }
    }

    pub fn set_seed(&mut self, seed: i64) {
        self.seed = seed;
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }

    pub(crate) fn generate_level_cancellable(
        &mut self,
        params: &LevelParams,
        cancel: CancellationToken,
    ) -> Result<Level> {
        params.validate().map_err(|e| e.wrap("room_corridor"))?;

        let seed_manager = SeedManager::new(self.seed as u64);
        let mut main = GenContext::new(
            seed_manager.derive_stream("level.main"),
            ContentType::Level,
            "level.main",
            self.seed as u64,
        )
        .with_cancellation(cancel.clone());

        // Step 2: dimensions.
        let room_count = params.min_rooms
            + main.random_int_range(0, (params.max_rooms - params.min_rooms) as i32) as usize;
        let (mut width, mut height) = level_dimensions(&mut main, params.level_theme, room_count);
        width = width.max(30);
        height = height.max(30);

        main.check_cancelled().map_err(|e| e.wrap("room_corridor"))?;

        // Step 3: BSP layout.
        let mut bsp_ctx = GenContext::new(
            seed_manager.derive_stream("level.bsp"),
            ContentType::Level,
            "level.bsp",
            self.seed as u64,
        )
        .with_cancellation(cancel.clone());
        let inset = Rectangle::new(5, 5, width.saturating_sub(10), height.saturating_sub(10));
        let bsp = layout_rooms(&mut bsp_ctx, inset, room_count);
        let n = bsp.rooms.len();
        if n == 0 {
            return Err(Error::invalid_parameter("BSP layout produced zero rooms").wrap("room_corridor"));
        }

        // Step 4: typed room content.
        let mut rooms_ctx = GenContext::new(
            seed_manager.derive_stream("level.rooms"),
            ContentType::Level,
            "level.rooms",
            self.seed as u64,
        )
        .with_cancellation(cancel.clone());
        let types = assign_room_types(
            &mut rooms_ctx,
            n,
            params.has_boss,
            params.secret_rooms,
            &params.room_types,
        );

        let mut rooms: Vec<RoomLayout> = Vec::with_capacity(n);
        for (i, (&bounds, &room_type)) in bsp.rooms.iter().zip(types.iter()).enumerate() {
            rooms_ctx.check_cancelled().map_err(|e| e.wrap("room_corridor"))?;
            let room = generate_room(
                &mut rooms_ctx,
                format!("room-{i}"),
                room_type,
                bounds,
                params.level_theme,
                params.difficulty,
            );
            rooms.push(room);
        }

        // Step 5: connections + corridors.
        let mut corridor_ctx = GenContext::new(
            seed_manager.derive_stream("level.corridor"),
            ContentType::Level,
            "level.corridor",
            self.seed as u64,
        )
        .with_cancellation(cancel.clone());
        let mut corridors: Vec<Corridor> = Vec::new();
        let mut edges: Vec<(usize, usize)> = (0..n.saturating_sub(1)).map(|i| (i, i + 1)).collect();
        if n > 3 {
            edges.push((0, n - 1));
        }
        for (a, b) in edges {
            corridor_ctx.check_cancelled().map_err(|e| e.wrap("room_corridor"))?;
            let (door_a, door_b) = {
                let room_a = &rooms[a];
                let room_b = &rooms[b];
                (
                    random_wall_door(&mut corridor_ctx, room_a.bounds),
                    random_wall_door(&mut corridor_ctx, room_b.bounds),
                )
            };
            rooms[a].doors.push(door_a);
            rooms[b].doors.push(door_b);
            rooms[a].connected.push(rooms[b].id.clone());
            rooms[b].connected.push(rooms[a].id.clone());

            let corridor = plan_corridor(
                &mut corridor_ctx,
                format!("corridor-{a}-{b}"),
                door_a,
                door_b,
                params.level_theme,
                params.corridor_style,
            );
            corridors.push(corridor);
        }

        // Step 6: secret-room features. `secret_rooms` rooms were already
        // tagged `RoomType::Secret` by `assign_room_types`; this step
        // attaches the discoverable feature each one needs, at a random
        // wall rather than a fixed spot (§4.10 step 6 / §4.2(218)).
        for room in rooms.iter_mut() {
            if room.room_type == RoomType::Secret {
                let pos = random_wall_position_local(&mut rooms_ctx, room.bounds);
                room.features.push(
                    RoomFeature::new("secret_door", pos)
                        .with("hidden", true)
                        .with("difficulty", (params.difficulty + 2) as i64),
                );
            }
        }

        // Step 7: validate the room graph is fully reachable from room 0,
        // and that an entrance and exit both exist (I5/I6).
        validate_room_graph(&rooms)?;

        // Step 8: compose the final tile grid.
        let mut map = GameMap::new(width, height);
        for room in &rooms {
            map.blit_rows(room.bounds.x, room.bounds.y, &room.tiles);
        }
        for corridor in &corridors {
            carve_corridor(&mut map, corridor);
        }
        for room in &rooms {
            for door in &room.doors {
                map.set(door.x, door.y, crate::model::Tile::door());
            }
        }

        // Open Question 1: apply the same graded connectivity policy the
        // terrain path uses, so I3 holds regardless of which path produced
        // the level.
        let mut connectivity_ctx = GenContext::new(
            seed_manager.derive_stream("level.connectivity"),
            ContentType::Level,
            "level.connectivity",
            self.seed as u64,
        )
        .with_cancellation(cancel);
        connectivity::enforce(&mut map, params.connectivity, &mut connectivity_ctx)
            .map_err(|e| e.wrap("room_corridor"))?;
        if !connectivity::is_fully_connected(&map) {
            return Err(Error::ConnectivityFailed(
                "walkable tiles still form more than one region after enforcement".into(),
            ));
        }

        let mut properties = Properties::new();
        properties.insert("theme".into(), params.level_theme.to_string().into());
        properties.insert("difficulty".into(), params.difficulty.into());
        properties.insert("room_count".into(), rooms.len().into());
        properties.insert("corridor_count".into(), corridors.len().into());
        properties.insert("generator".into(), "room_corridor".into());
        properties.insert("version".into(), VERSION.into());

        log::debug!(
            "room-corridor level generated {}x{} rooms={} corridors={}",
            width,
            height,
            rooms.len(),
            corridors.len()
        );

        Ok(Level {
            id: format!("level-{}", self.seed),
            name: format!("{} level", params.level_theme),
            width,
            height,
            tiles: map.to_rows(),
            properties,
        })
    }
}

impl LevelGenerator for RoomCorridorGenerator {
    fn generate_level(&mut self, params: &LevelParams) -> Result<Level> {
        self.generate_level_cancellable(params, CancellationToken::new())
    }

    fn generate_room(
        &mut self,
        room_type: RoomType,
        bounds: Rectangle,
        theme: LevelTheme,
        difficulty: i32,
    ) -> RoomLayout {
        let seed_manager = SeedManager::new(self.seed as u64);
        let mut ctx = GenContext::new(
            seed_manager.derive_stream("level.rooms.adhoc"),
            ContentType::Level,
            "level.rooms.adhoc",
            self.seed as u64,
        );
        generate_room(&mut ctx, "adhoc-room", room_type, bounds, theme, difficulty)
    }

    fn connect_rooms(
        &mut self,
        a: &RoomLayout,
        b: &RoomLayout,
        theme: LevelTheme,
        style: CorridorStyle,
    ) -> Corridor {
        let seed_manager = SeedManager::new(self.seed as u64);
        let mut ctx = GenContext::new(
            seed_manager.derive_stream("level.corridor.adhoc"),
            ContentType::Level,
            "level.corridor.adhoc",
            self.seed as u64,
        );
        plan_corridor(&mut ctx, format!("{}-{}", a.id, b.id), a.bounds.center(), b.bounds.center(), theme, style)
    }
}

/// §4.10 step 2: `base = 40 + 8*roomCount`, then theme-adjusted.
fn level_dimensions(ctx: &mut GenContext, theme: LevelTheme, room_count: usize) -> (usize, usize) {
    let base = 40 + 8 * room_count;
    match theme {
        LevelTheme::Horror => ((base + 20), base.saturating_sub(10)),
        LevelTheme::Natural => (
            (base as i32 + ctx.random_int_range(-10, 10)).max(0) as usize,
            (base as i32 + ctx.random_int_range(-10, 10)).max(0) as usize,
        ),
        _ => (base, base),
    }
}

/// Pick a wall position in room-local coordinates (`[0, width) x [0, height)`
/// with one axis pinned to an edge), clamped so it never lands on a corner.
/// Mirrors `rooms::generators::random_wall_door`, which every other
/// `RoomFeature` position is expressed in terms of.
fn random_wall_position_local(ctx: &mut GenContext, bounds: Rectangle) -> Position {
    let w = bounds.width as i32;
    let h = bounds.height as i32;
    let clamp_x = |v: i32| v.clamp(1, w - 2).max(1);
    let clamp_y = |v: i32| v.clamp(1, h - 2).max(1);
    match ctx.rng().range_usize(0, 4) {
        0 => Position::new(clamp_x(ctx.random_int_range(0, w - 1)), 0),
        1 => Position::new(clamp_x(ctx.random_int_range(0, w - 1)), h - 1),
        2 => Position::new(0, clamp_y(ctx.random_int_range(0, h - 1))),
        _ => Position::new(w - 1, clamp_y(ctx.random_int_range(0, h - 1))),
    }
}

/// Pick a door position on a random wall of `bounds` (world coordinates),
/// clamped so it never lands on a corner.
fn random_wall_door(ctx: &mut GenContext, bounds: Rectangle) -> Position {
    let side = ctx.rng().range_usize(0, 4);
    let w = bounds.width as i32;
    let h = bounds.height as i32;
    let clamp_x = |v: i32| v.clamp(bounds.x + 1, bounds.x + w - 2).max(bounds.x + 1);
    let clamp_y = |v: i32| v.clamp(bounds.y + 1, bounds.y + h - 2).max(bounds.y + 1);
    match side {
        0 => Position::new(clamp_x(bounds.x + ctx.random_int_range(0, w - 1)), bounds.y),
        1 => Position::new(clamp_x(bounds.x + ctx.random_int_range(0, w - 1)), bounds.y + h - 1),
        2 => Position::new(bounds.x, clamp_y(bounds.y + ctx.random_int_range(0, h - 1))),
        _ => Position::new(bounds.x + w - 1, clamp_y(bounds.y + ctx.random_int_range(0, h - 1))),
    }
}

/// Carve a corridor's path as floor tiles, thickened to `corridor.width`
/// by also filling cells to the right/below each path point.
fn carve_corridor(map: &mut GameMap, corridor: &Corridor) {
    for p in &corridor.path {
        for dx in 0..corridor.width as i32 {
            for dy in 0..corridor.width as i32 {
                if let Some(existing) = map.get(p.x + dx, p.y + dy) {
                    if !existing.walkable {
                        map.set(p.x + dx, p.y + dy, crate::model::Tile::floor());
                    }
                }
            }
        }
    }
    for feature in &corridor.features {
        if let Some(tile) = map.get(feature.position.x, feature.position.y).cloned() {
            if tile.walkable {
                let mut tile = tile;
                tile.tag(&feature.kind, true);
                map.set(feature.position.x, feature.position.y, tile);
            }
        }
    }
}

/// §4.10 step 7: flood-fill the room graph (not the tile grid) from
/// `rooms[0]`, using each room's `connected` id list.
fn validate_room_graph(rooms: &[RoomLayout]) -> Result<()> {
    if rooms.is_empty() {
        return Err(Error::ConnectivityFailed("no rooms generated".into()));
    }
    let by_id: std::collections::HashMap<&str, usize> =
        rooms.iter().enumerate().map(|(i, r)| (r.id.as_str(), i)).collect();

    let mut visited = vec![false; rooms.len()];
    let mut stack = vec![0usize];
    visited[0] = true;
    while let Some(i) = stack.pop() {
        for neighbor_id in &rooms[i].connected {
            if let Some(&j) = by_id.get(neighbor_id.as_str()) {
                if !visited[j] {
                    visited[j] = true;
                    stack.push(j);
                }
            }
        }
    }
    if let Some(unreached) = visited.iter().position(|&v| !v) {
        return Err(Error::ConnectivityFailed(format!(
            "room {} unreachable from room 0",
            rooms[unreached].id
        )));
    }

    let has_entrance = rooms.iter().any(|r| r.room_type == RoomType::Entrance);
    let has_exit = rooms.iter().any(|r| r.room_type == RoomType::Exit);
    if !has_entrance || !has_exit {
        return Err(Error::ConnectivityFailed(
            "level has no entrance or no exit room (I5)".into(),
        ));
    }
    Ok(())
}
