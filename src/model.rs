//! Core data model (spec §3): positions, tiles, grids, rooms, corridors,
//! levels, and the parameter records that drive generation.

use std::collections::HashMap;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque property bag used by tiles, rooms, features, and levels. Unknown
/// keys are preserved but never interpreted by the core pipeline.
pub type Properties = HashMap<String, Value>;

/// Grid coordinate. Non-negative by construction in every place the
/// pipeline produces one; stored as `i32` so callers can do bounds math
/// without casting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, y): (usize, usize)) -> Self {
        Position::new(x as i32, y as i32)
    }
}

/// Axis-aligned rectangle with `width > 0` and `height > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: usize,
    pub height: usize,
}

impl Rectangle {
    pub fn new(x: i32, y: i32, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> Position {
        Position::new(self.x + self.width as i32 / 2, self.y + self.height as i32 / 2)
    }

    pub fn contains(&self, p: Position) -> bool {
        p.x >= self.x
            && p.y >= self.y
            && p.x < self.x + self.width as i32
            && p.y < self.y + self.height as i32
    }

    /// Is `self` fully inside `outer` (used to check I4)?
    pub fn inside(&self, outer: &Rectangle) -> bool {
        self.x >= outer.x
            && self.y >= outer.y
            && self.x + self.width as i32 <= outer.x + outer.width as i32
            && self.y + self.height as i32 <= outer.y + outer.height as i32
    }
}

/// Sprite-label convention table (spec §3).
pub mod sprite {
    pub const FLOOR: (u8, u8) = (0, 0);
    pub const WALL: (u8, u8) = (1, 0);
    pub const WATER: (u8, u8) = (2, 0);
    pub const CAVE_DECORATION: (u8, u8) = (3, 1);
    pub const DOOR: (u8, u8) = (4, 0);
    pub const TORCH: (u8, u8) = (5, 0);
    pub const LIGHT_VEGETATION: (u8, u8) = (6, 0);
    pub const REEDS: (u8, u8) = (6, 1);
    pub const DENSE_VEGETATION: (u8, u8) = (7, 0);
    pub const MOSS: (u8, u8) = (7, 1);
}

/// One grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub walkable: bool,
    pub transparent: bool,
    pub sprite_x: u8,
    pub sprite_y: u8,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub decorations: Properties,
}

impl Default for Tile {
    fn default() -> Self {
        Tile::wall()
    }
}

impl Tile {
    pub fn wall() -> Self {
        Self {
            walkable: false,
            transparent: false,
            sprite_x: sprite::WALL.0,
            sprite_y: sprite::WALL.1,
            decorations: Properties::new(),
        }
    }

    pub fn floor() -> Self {
        Self {
            walkable: true,
            transparent: true,
            sprite_x: sprite::FLOOR.0,
            sprite_y: sprite::FLOOR.1,
            decorations: Properties::new(),
        }
    }

    pub fn water() -> Self {
        Self {
            walkable: false,
            transparent: true,
            sprite_x: sprite::WATER.0,
            sprite_y: sprite::WATER.1,
            decorations: Properties::new(),
        }
    }

    pub fn door() -> Self {
        Self {
            walkable: true,
            transparent: false,
            sprite_x: sprite::DOOR.0,
            sprite_y: sprite::DOOR.1,
            decorations: Properties::new(),
        }
    }

    pub fn with_sprite(mut self, sprite: (u8, u8)) -> Self {
        self.sprite_x = sprite.0;
        self.sprite_y = sprite.1;
        self
    }

    pub fn tag(&mut self, key: &str, value: impl Into<Value>) {
        self.decorations.insert(key.to_string(), value.into());
    }

    pub fn has_tag(&self, key: &str) -> bool {
        self.decorations.contains_key(key)
    }

    pub fn is_sprite(&self, sprite: (u8, u8)) -> bool {
        (self.sprite_x, self.sprite_y) == sprite
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sprite(sprite::DOOR) {
            write!(f, "+")
        } else if self.is_sprite(sprite::WATER) {
            write!(f, "~")
        } else if self.walkable {
            write!(f, ".")
        } else {
            write!(f, "#")
        }
    }
}

/// Raw terrain grid used by the terrain generators (C5/C6) before it is
/// blitted into a [`Level`].
///
/// Internally a flat row-major buffer (per the design notes in §9); the
/// nested `tiles[height][width]` shape is a presentation detail exposed
/// only at [`GameMap::to_rows`] for the external `Level`/`RoomLayout` shape.
#[derive(Debug, Clone)]
pub struct GameMap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl GameMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::wall(); width * height],
        }
    }

    pub fn filled_with(width: usize, height: usize, tile: Tile) -> Self {
        Self {
            width,
            height,
            tiles: vec![tile; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        if self.in_bounds(x, y) {
            Some(&self.tiles[y as usize * self.width + x as usize])
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) -> bool {
        if self.in_bounds(x, y) {
            self.tiles[y as usize * self.width + x as usize] = tile;
            true
        } else {
            false
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: usize, h: usize, tile: Tile) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx as i32, y + dy as i32, tile.clone());
            }
        }
    }

    pub fn count(&self, predicate: impl Fn(&Tile) -> bool) -> usize {
        self.tiles.iter().filter(|t| predicate(t)).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Tile)> {
        let w = self.width;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, t)| (i % w, i / w, t))
    }

    /// 8-neighbour wall count, out-of-bounds counts as wall (C5 step 2).
    pub fn wall_neighbors_8(&self, x: usize, y: usize) -> usize {
        let mut count = 0;
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (nx, ny) = (x as i32 + dx, y as i32 + dy);
                match self.get(nx, ny) {
                    Some(t) if !t.walkable => count += 1,
                    None => count += 1,
                    _ => {}
                }
            }
        }
        count
    }

    pub fn neighbors_4(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let (w, h) = (self.width, self.height);
        let mut n = Vec::with_capacity(4);
        if x > 0 {
            n.push((x - 1, y));
        }
        if x + 1 < w {
            n.push((x + 1, y));
        }
        if y > 0 {
            n.push((x, y - 1));
        }
        if y + 1 < h {
            n.push((x, y + 1));
        }
        n
    }

    pub fn neighbors_8(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let (w, h) = (self.width, self.height);
        let mut n = Vec::with_capacity(8);
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (nx, ny) = (x as i32 + dx, y as i32 + dy);
                if nx >= 0 && ny >= 0 && (nx as usize) < w && (ny as usize) < h {
                    n.push((nx as usize, ny as usize));
                }
            }
        }
        n
    }

    /// Render the internal flat buffer as `tiles[height][width]`, matching
    /// the external `Level`/`RoomLayout` shape (I7).
    pub fn to_rows(&self) -> Vec<Vec<Tile>> {
        (0..self.height)
            .map(|y| (0..self.width).map(|x| self[(x, y)].clone()).collect())
            .collect()
    }

    /// Blit `rows` (as produced by `to_rows`, or a room's local tiles) at
    /// world offset `(ox, oy)`.
    pub fn blit_rows(&mut self, ox: i32, oy: i32, rows: &[Vec<Tile>]) {
        for (dy, row) in rows.iter().enumerate() {
            for (dx, tile) in row.iter().enumerate() {
                self.set(ox + dx as i32, oy + dy as i32, tile.clone());
            }
        }
    }
}

impl Index<(usize, usize)> for GameMap {
    type Output = Tile;
    fn index(&self, (x, y): (usize, usize)) -> &Tile {
        &self.tiles[y * self.width + x]
    }
}

impl IndexMut<(usize, usize)> for GameMap {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Tile {
        &mut self.tiles[y * self.width + x]
    }
}

impl fmt::Display for GameMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                write!(f, "{}", self[(x, y)])?;
            }
            if y + 1 < self.height {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Bresenham-style line from `start` to `end` (inclusive).
pub fn line_points(start: (usize, usize), end: (usize, usize)) -> Vec<(usize, usize)> {
    let (mut x, mut y) = (start.0 as i32, start.1 as i32);
    let (tx, ty) = (end.0 as i32, end.1 as i32);
    let mut points = Vec::new();
    loop {
        if x >= 0 && y >= 0 {
            points.push((x as usize, y as usize));
        }
        if x == tx && y == ty {
            break;
        }
        if (x - tx).abs() > (y - ty).abs() {
            x += if tx > x { 1 } else { -1 };
        } else {
            y += if ty > y { 1 } else { -1 };
        }
    }
    points
}

// --- Enumerations (spec §3) ------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Entrance,
    Exit,
    Combat,
    Treasure,
    Puzzle,
    Boss,
    Secret,
    Shop,
    Rest,
    Trap,
    Story,
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RoomType::Entrance => "entrance",
            RoomType::Exit => "exit",
            RoomType::Combat => "combat",
            RoomType::Treasure => "treasure",
            RoomType::Puzzle => "puzzle",
            RoomType::Boss => "boss",
            RoomType::Secret => "secret",
            RoomType::Shop => "shop",
            RoomType::Rest => "rest",
            RoomType::Trap => "trap",
            RoomType::Story => "story",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelTheme {
    Classic,
    Horror,
    Natural,
    Mechanical,
    Magical,
    Undead,
    Elemental,
}

impl fmt::Display for LevelTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LevelTheme::Classic => "classic",
            LevelTheme::Horror => "horror",
            LevelTheme::Natural => "natural",
            LevelTheme::Mechanical => "mechanical",
            LevelTheme::Magical => "magical",
            LevelTheme::Undead => "undead",
            LevelTheme::Elemental => "elemental",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorridorStyle {
    Straight,
    Windy,
    Maze,
    Organic,
    Minimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiomeType {
    Cave,
    Dungeon,
    Forest,
    Mountain,
    Swamp,
    Desert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityLevel {
    None,
    Minimal,
    Moderate,
    High,
    Complete,
}

// --- Parameter records (spec §3) ------------------------------------------

/// Fields shared by every generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    pub seed: i64,
    pub difficulty: i32,
    pub player_level: i32,
    #[serde(with = "duration_millis")]
    pub timeout: Duration,
    #[serde(default)]
    pub constraints: Properties,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            seed: 0,
            difficulty: 1,
            player_level: 1,
            timeout: Duration::from_secs(30),
            constraints: Properties::new(),
        }
    }
}

impl GenerationParams {
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(1..=20).contains(&self.difficulty) {
            return Err(crate::error::Error::invalid_parameter(format!(
                "difficulty must be in [1,20], got {}",
                self.difficulty
            )));
        }
        if !(1..=20).contains(&self.player_level) {
            return Err(crate::error::Error::invalid_parameter(format!(
                "playerLevel must be in [1,20], got {}",
                self.player_level
            )));
        }
        Ok(())
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(d)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Parameters for a room-corridor level generation (C12).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelParams {
    #[serde(flatten)]
    pub base: GenerationParams,
    pub min_rooms: usize,
    pub max_rooms: usize,
    #[serde(default)]
    pub room_types: Vec<RoomType>,
    pub corridor_style: CorridorStyle,
    pub level_theme: LevelTheme,
    #[serde(default)]
    pub has_boss: bool,
    #[serde(default)]
    pub secret_rooms: usize,
    /// Not in the distilled spec's `LevelParams` table; added so the
    /// room-corridor path can run the same graded connectivity policy the
    /// terrain path runs (SPEC_FULL §0, Open Question 1).
    #[serde(default = "default_connectivity")]
    pub connectivity: ConnectivityLevel,
}

fn default_connectivity() -> ConnectivityLevel {
    ConnectivityLevel::Moderate
}

impl std::ops::Deref for LevelParams {
    type Target = GenerationParams;
    fn deref(&self) -> &GenerationParams {
        &self.base
    }
}

impl LevelParams {
    pub fn validate(&self) -> crate::error::Result<()> {
        self.base.validate()?;
        if self.min_rooms < 1 {
            return Err(crate::error::Error::invalid_parameter("minRooms must be >= 1"));
        }
        if self.max_rooms < self.min_rooms {
            return Err(crate::error::Error::invalid_parameter(
                "maxRooms must be >= minRooms",
            ));
        }
        if self.max_rooms < 2 {
            // Open Question 2: N=1 cannot hold a distinct entrance and
            // exit room (I5), so it is rejected rather than special-cased.
            return Err(crate::error::Error::invalid_parameter(
                "maxRooms must be >= 2 so a level can have a distinct entrance and exit room",
            ));
        }
        Ok(())
    }
}

/// Parameters for a terrain generation (C5/C6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainParams {
    #[serde(flatten)]
    pub base: GenerationParams,
    pub biome_type: BiomeType,
    pub density: f64,
    pub water_level: f64,
    pub roughness: f64,
    pub connectivity: ConnectivityLevel,
}

impl std::ops::Deref for TerrainParams {
    type Target = GenerationParams;
    fn deref(&self) -> &GenerationParams {
        &self.base
    }
}

impl TerrainParams {
    pub fn validate(&self) -> crate::error::Result<()> {
        self.base.validate()?;
        for (name, v) in [
            ("density", self.density),
            ("waterLevel", self.water_level),
            ("roughness", self.roughness),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(crate::error::Error::invalid_parameter(format!(
                    "{name} must be in [0,1], got {v}"
                )));
            }
        }
        Ok(())
    }
}

// --- Rooms, corridors, levels ---------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Position,
    #[serde(default)]
    pub properties: Properties,
}

impl RoomFeature {
    pub fn new(kind: impl Into<String>, position: Position) -> Self {
        Self {
            kind: kind.into(),
            position,
            properties: Properties::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomLayout {
    pub id: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub bounds: Rectangle,
    pub tiles: Vec<Vec<Tile>>,
    pub doors: Vec<Position>,
    pub features: Vec<RoomFeature>,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub connected: Vec<String>,
    pub difficulty: i32,
}

impl RoomLayout {
    /// I7: tile arrays must be exactly `bounds.height x bounds.width`.
    pub fn check_dimensioning(&self) -> bool {
        self.tiles.len() == self.bounds.height
            && self.tiles.iter().all(|row| row.len() == self.bounds.width)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorridorFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Position,
    #[serde(default)]
    pub properties: Properties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corridor {
    pub id: String,
    pub start: Position,
    pub end: Position,
    pub width: usize,
    pub style: CorridorStyle,
    pub path: Vec<Position>,
    pub features: Vec<CorridorFeature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub id: String,
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<Vec<Tile>>,
    #[serde(default)]
    pub properties: Properties,
}

impl Level {
    pub fn tile(&self, x: usize, y: usize) -> &Tile {
        &self.tiles[y][x]
    }

    pub fn walkable_count(&self) -> usize {
        self.tiles.iter().flatten().filter(|t| t.walkable).count()
    }
}
