//! # dungeon-forge
//!
//! A deterministic, seed-driven procedural content generation engine for
//! tile-based RPG dungeon levels.
//!
//! From a single root seed plus a small parameter record, the pipeline
//! produces a fully-connected, reproducible 2-D tiled level: either a
//! room-corridor layout (BSP rooms + a style-parameterised corridor
//! planner) or raw terrain (cellular-automata caves or a perfect maze),
//! post-processed with biome-appropriate decoration and connectivity
//! enforcement.
//!
//! ## Quick start
//!
//! ```rust
//! use dungeon_forge::level::RoomCorridorGenerator;
//! use dungeon_forge::model::{ConnectivityLevel, CorridorStyle, GenerationParams, LevelParams, LevelTheme, Properties};
//! use std::time::Duration;
//!
//! let params = LevelParams {
//!     base: GenerationParams {
//!         seed: 999_999,
//!         difficulty: 7,
//!         player_level: 10,
//!         timeout: Duration::from_secs(10),
//!         constraints: Properties::new(),
//!     },
//!     min_rooms: 4,
//!     max_rooms: 6,
//!     room_types: vec![],
//!     corridor_style: CorridorStyle::Straight,
//!     level_theme: LevelTheme::Classic,
//!     has_boss: false,
//!     secret_rooms: 0,
//!     connectivity: ConnectivityLevel::Moderate,
//! };
//!
//! let mut generator = RoomCorridorGenerator::with_seed(999_999);
//! let level = generator.generate_level(&params).unwrap();
//! assert_eq!(level.width, level.height);
//! ```
//!
//! ## Layout
//!
//! - [`model`] — the data model: positions, tiles, rooms, corridors, levels,
//!   and the parameter records that drive generation (spec §3).
//! - [`seed`] — the seed manager (C1): independent per-subsystem RNG streams
//!   derived from one root seed.
//! - [`context`] — the generation context (C2) carried by value into every
//!   algorithmic routine.
//! - [`biome`] — the static biome catalogue (C3).
//! - [`noise`] — the coherent-noise source (C4) used to optionally seed the
//!   cellular-automata generator.
//! - [`terrain`] — the cellular-automata (C5) and maze (C6) terrain
//!   generators, plus the shared post-processing decorators (C8).
//! - [`connectivity`] — flood-fill region discovery and the graded
//!   connectivity policies (C7).
//! - [`rooms`] — BSP room layout (C9) and typed room content (C10).
//! - [`corridor`] — the style-parameterised corridor planner (C11).
//! - [`level`] — the room-corridor level generator (C12).
//! - [`registry`] — the generator registry and factory (C13).
//! - [`error`] — the error taxonomy (spec §7).
//! - [`cancel`] — cooperative cancellation handle (spec §5).

pub mod biome;
pub mod cancel;
pub mod connectivity;
pub mod context;
pub mod corridor;
pub mod error;
pub mod level;
pub mod model;
pub mod noise;
pub mod registry;
pub mod rng;
pub mod rooms;
pub mod seed;
pub mod terrain;

pub use error::{Error, Result};
pub use level::{LevelGenerator, RoomCorridorGenerator};
pub use model::{GameMap, Level, LevelParams, TerrainParams, Tile};
pub use rng::Rng;
pub use registry::{generate_level, generate_terrain, GeneratedContent, Generator, GeneratorRegistry};
