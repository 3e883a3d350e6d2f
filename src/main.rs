use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use log::LevelFilter;
use strata::{App, Command, WorldSource};
use strata_geom::{IVec3, Vec3};
use strata_io::DEFAULT_SAVE_DIR;
use strata_world::{WorldConfig, load_config_from_path};

const DEFAULT_CONFIG: &str = "strata.toml";

/// Headless driver: builds or loads a world, walks an observer across it
/// for a number of ticks and optionally saves the result.
#[derive(Parser, Debug)]
#[command(name = "strata", version, about = "Chunked voxel world, headless")]
struct Args {
    /// World config (TOML). Defaults to ./strata.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ticks to simulate.
    #[arg(long, default_value_t = 200)]
    ticks: u64,

    /// Observer movement per tick as `dx,dz`.
    #[arg(long, value_parser = parse_walk, allow_hyphen_values = true)]
    walk: Option<Walk>,

    /// Damage the voxel at `x,y,z` on the first tick. Repeatable.
    #[arg(long, value_parser = parse_ivec3, allow_hyphen_values = true)]
    damage: Vec<IVec3>,

    #[arg(long, default_value = DEFAULT_SAVE_DIR)]
    save_dir: PathBuf,

    /// Restore the matching save instead of generating.
    #[arg(long)]
    load: bool,

    /// Save the world after the last tick.
    #[arg(long)]
    save: bool,

    /// Overrides RUST_LOG (off, error, warn, info, debug, trace).
    #[arg(long)]
    log_level: Option<LevelFilter>,

    /// Also write the log to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(long)]
    workers: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Walk {
    dx: f32,
    dz: f32,
}

fn parse_walk(s: &str) -> Result<Walk, String> {
    let (dx, dz) = s
        .split_once(',')
        .ok_or_else(|| format!("expected dx,dz, got '{s}'"))?;
    let num = |t: &str| {
        t.trim()
            .parse::<f32>()
            .map_err(|e| format!("bad number '{t}': {e}"))
    };
    Ok(Walk {
        dx: num(dx)?,
        dz: num(dz)?,
    })
}

fn parse_ivec3(s: &str) -> Result<IVec3, String> {
    let parts = s
        .split(',')
        .map(|t| t.trim().parse::<i32>().map_err(|e| format!("bad integer '{t}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(IVec3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z, got '{s}'")),
    }
}

fn init_logging(args: &Args) -> Result<(), Box<dyn Error>> {
    match &args.log_file {
        Some(path) => {
            let level = args.log_level.unwrap_or(LevelFilter::Info);
            let cfg = simplelog::Config::default();
            simplelog::CombinedLogger::init(vec![
                simplelog::TermLogger::new(
                    level,
                    cfg.clone(),
                    simplelog::TerminalMode::Mixed,
                    simplelog::ColorChoice::Auto,
                ),
                simplelog::WriteLogger::new(level, cfg, File::create(path)?),
            ])?;
        }
        None => {
            let mut builder = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or("info"),
            );
            if let Some(level) = args.log_level {
                builder.filter_level(level);
            }
            builder.format_timestamp_millis().try_init()?;
        }
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<WorldConfig, Box<dyn Error>> {
    let path = args.config.clone().or_else(|| {
        let default = PathBuf::from(DEFAULT_CONFIG);
        default.exists().then_some(default)
    });
    let mut cfg = match path {
        Some(p) => {
            log::info!("config: {}", p.display());
            load_config_from_path(&p)?
        }
        None => {
            log::info!("config: built-in defaults");
            WorldConfig::default()
        }
    };
    if let Some(w) = args.workers {
        cfg.workers = w;
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    Ok(cfg)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(&args)?;
    let cfg = load_config(&args)?;

    let mut app = App::new(cfg, &args.save_dir)?;
    let source = if args.load {
        app.load_or_build()
    } else {
        app.build_world();
        WorldSource::Generated
    };
    log::info!(
        "world ready ({:?}): {} chunks, observer at ({:.1}, {:.1}, {:.1})",
        source,
        app.store().len(),
        app.observer().x,
        app.observer().y,
        app.observer().z
    );

    let tx = app.commands();
    for &pos in &args.damage {
        tx.send(Command::Damage { pos })?;
    }

    let t0 = Instant::now();
    let mut observer = app.observer();
    for _ in 0..args.ticks {
        if let Some(w) = args.walk {
            observer += Vec3::new(w.dx, 0.0, w.dz);
            tx.send(Command::MoveObserver(observer))?;
        }
        app.step();
    }

    let stream = app.streaming().stats();
    let edits = app.edits().stats();
    let (quads, visible) = app
        .visible_surfaces()
        .fold((0usize, 0usize), |(q, n), (_, s)| (q + s.quad_count(), n + 1));
    log::info!(
        target: "perf",
        "ms={} ticks={} chunks={} visible={} quads={}",
        t0.elapsed().as_millis(),
        app.tick(),
        app.store().len(),
        visible,
        quads
    );
    log::info!("streaming: {:?}", stream);
    log::info!("edits: {:?}", edits);

    if args.save {
        let path = app.save()?;
        log::info!("saved to {}", path.display());
    }
    Ok(())
}
