//! dungeon-forge demo CLI. A thin shell over the registry/factory (C13);
//! carries no generation logic of its own.

mod cli;

use clap::Parser;
use cli::{Cli, Command};
use dungeon_forge::cancel::CancellationToken;
use dungeon_forge::model::{
    BiomeType, ConnectivityLevel, CorridorStyle, GenerationParams, LevelParams, LevelTheme, Properties,
    RoomType, TerrainParams, Tile,
};
use std::time::Duration;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Generate {
            seed,
            theme,
            min_rooms,
            max_rooms,
            difficulty,
            corridor_style,
            connectivity,
            has_boss,
            secret_rooms,
            json,
        } => generate_level(
            seed,
            theme.into(),
            min_rooms,
            max_rooms,
            difficulty,
            corridor_style.into(),
            connectivity.into(),
            has_boss,
            secret_rooms,
            json,
        ),
        Command::Terrain {
            seed,
            generator,
            biome,
            width,
            height,
            difficulty,
            density,
            water_level,
            roughness,
            connectivity,
            json,
        } => generate_terrain(
            seed,
            &generator,
            biome.into(),
            width,
            height,
            difficulty,
            density,
            water_level,
            roughness,
            connectivity.into(),
            json,
        ),
        Command::List => {
            list_generators();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[allow(clippy::too_many_arguments)]
fn generate_level(
    seed: i64,
    level_theme: LevelTheme,
    min_rooms: usize,
    max_rooms: usize,
    difficulty: i32,
    corridor_style: CorridorStyle,
    connectivity: ConnectivityLevel,
    has_boss: bool,
    secret_rooms: usize,
    json: bool,
) -> dungeon_forge::Result<()> {
    let params = LevelParams {
        base: GenerationParams {
            seed,
            difficulty,
            player_level: 1,
            timeout: Duration::from_secs(30),
            constraints: Properties::new(),
        },
        min_rooms,
        max_rooms,
        room_types: Vec::<RoomType>::new(),
        corridor_style,
        level_theme,
        has_boss,
        secret_rooms,
        connectivity,
    };

    let level = dungeon_forge::generate_level("room_corridor", &params, CancellationToken::new())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&level).expect("Level always serializes"));
    } else {
        println!("{} ({}x{})", level.name, level.width, level.height);
        println!("{}", render_tiles(&level.tiles));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn generate_terrain(
    seed: i64,
    generator: &str,
    biome_type: BiomeType,
    width: usize,
    height: usize,
    difficulty: i32,
    density: f64,
    water_level: f64,
    roughness: f64,
    connectivity: ConnectivityLevel,
    json: bool,
) -> dungeon_forge::Result<()> {
    let mut constraints = Properties::new();
    constraints.insert("width".to_string(), serde_json::json!(width));
    constraints.insert("height".to_string(), serde_json::json!(height));

    let params = TerrainParams {
        base: GenerationParams {
            seed,
            difficulty,
            player_level: 1,
            timeout: Duration::from_secs(30),
            constraints,
        },
        biome_type,
        density,
        water_level,
        roughness,
        connectivity,
    };

    let map = dungeon_forge::generate_terrain(generator, &params, CancellationToken::new())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&map.to_rows()).expect("tiles always serialize"));
    } else {
        println!("{map}");
    }
    Ok(())
}

fn render_tiles(tiles: &[Vec<Tile>]) -> String {
    let mut out = String::new();
    for row in tiles {
        for tile in row {
            out.push_str(&tile.to_string());
        }
        out.push('\n');
    }
    out.pop();
    out
}

fn list_generators() {
    println!("cellular_automata  (terrain)");
    println!("maze               (terrain)");
    println!("room_corridor      (level)");
}
