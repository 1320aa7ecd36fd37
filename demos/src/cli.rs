//! Command-line surface for the demo binary. Not part of the library's
//! contract (§6) — purely a development aid for eyeballing what a seed
//! produces.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "dungeon-forge-demo")]
#[command(about = "Generate and inspect dungeon-forge content")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a room-corridor level and print it as ASCII art (or JSON).
    Generate {
        #[arg(long, default_value_t = 12345)]
        seed: i64,
        #[arg(long, value_enum, default_value_t = ThemeArg::Classic)]
        theme: ThemeArg,
        #[arg(long, default_value_t = 4)]
        min_rooms: usize,
        #[arg(long, default_value_t = 6)]
        max_rooms: usize,
        #[arg(long, default_value_t = 5)]
        difficulty: i32,
        #[arg(long, value_enum, default_value_t = CorridorStyleArg::Straight)]
        corridor_style: CorridorStyleArg,
        #[arg(long, value_enum, default_value_t = ConnectivityArg::Moderate)]
        connectivity: ConnectivityArg,
        #[arg(long)]
        has_boss: bool,
        #[arg(long, default_value_t = 0)]
        secret_rooms: usize,
        /// Dump the generated level as JSON instead of rendering ASCII art.
        #[arg(long)]
        json: bool,
    },
    /// Generate a raw terrain map and print it as ASCII art (or JSON).
    Terrain {
        #[arg(long, default_value_t = 12345)]
        seed: i64,
        /// Registered generator name: "cellular_automata" or "maze".
        #[arg(long, default_value = "cellular_automata")]
        generator: String,
        #[arg(long, value_enum, default_value_t = BiomeArg::Cave)]
        biome: BiomeArg,
        #[arg(long, default_value_t = 50)]
        width: usize,
        #[arg(long, default_value_t = 50)]
        height: usize,
        #[arg(long, default_value_t = 5)]
        difficulty: i32,
        #[arg(long, default_value_t = 0.45)]
        density: f64,
        #[arg(long, default_value_t = 0.1)]
        water_level: f64,
        #[arg(long, default_value_t = 0.5)]
        roughness: f64,
        #[arg(long, value_enum, default_value_t = ConnectivityArg::Moderate)]
        connectivity: ConnectivityArg,
        #[arg(long)]
        json: bool,
    },
    /// List the generators registered in the process-wide registry.
    List,
}

#[derive(Copy, Clone, ValueEnum)]
pub enum ThemeArg {
    Classic,
    Horror,
    Natural,
    Mechanical,
    Magical,
    Undead,
    Elemental,
}

impl From<ThemeArg> for dungeon_forge::model::LevelTheme {
    fn from(v: ThemeArg) -> Self {
        use dungeon_forge::model::LevelTheme::*;
        match v {
            ThemeArg::Classic => Classic,
            ThemeArg::Horror => Horror,
            ThemeArg::Natural => Natural,
            ThemeArg::Mechanical => Mechanical,
            ThemeArg::Magical => Magical,
            ThemeArg::Undead => Undead,
            ThemeArg::Elemental => Elemental,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub enum CorridorStyleArg {
    Straight,
    Windy,
    Maze,
    Organic,
    Minimal,
}

impl From<CorridorStyleArg> for dungeon_forge::model::CorridorStyle {
    fn from(v: CorridorStyleArg) -> Self {
        use dungeon_forge::model::CorridorStyle::*;
        match v {
            CorridorStyleArg::Straight => Straight,
            CorridorStyleArg::Windy => Windy,
            CorridorStyleArg::Maze => Maze,
            CorridorStyleArg::Organic => Organic,
            CorridorStyleArg::Minimal => Minimal,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub enum ConnectivityArg {
    None,
    Minimal,
    Moderate,
    High,
    Complete,
}

impl From<ConnectivityArg> for dungeon_forge::model::ConnectivityLevel {
    fn from(v: ConnectivityArg) -> Self {
        use dungeon_forge::model::ConnectivityLevel::*;
        match v {
            ConnectivityArg::None => None,
            ConnectivityArg::Minimal => Minimal,
            ConnectivityArg::Moderate => Moderate,
            ConnectivityArg::High => High,
            ConnectivityArg::Complete => Complete,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub enum BiomeArg {
    Cave,
    Dungeon,
    Forest,
    Mountain,
    Swamp,
    Desert,
}

impl From<BiomeArg> for dungeon_forge::model::BiomeType {
    fn from(v: BiomeArg) -> Self {
        use dungeon_forge::model::BiomeType::*;
        match v {
            BiomeArg::Cave => Cave,
            BiomeArg::Dungeon => Dungeon,
            BiomeArg::Forest => Forest,
            BiomeArg::Mountain => Mountain,
            BiomeArg::Swamp => Swamp,
            BiomeArg::Desert => Desert,
        }
    }
}
