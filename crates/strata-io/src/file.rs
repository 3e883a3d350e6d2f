use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use strata_world::WorldConfig;

use crate::PersistError;
use crate::world_data::WorldData;

pub const DEFAULT_SAVE_DIR: &str = "savedata";

/// `World_{sx}_{sy}_{sz}_{wx}_{wy}_{wz}.dat`: one save slot per chunk size
/// and core extent.
pub fn save_file_name(cfg: &WorldConfig) -> String {
    let (c, w) = (cfg.chunk, cfg.world);
    format!(
        "World_{}_{}_{}_{}_{}_{}.dat",
        c.sx, c.sy, c.sz, w.x, w.y, w.z
    )
}

pub fn save_path(dir: &Path, cfg: &WorldConfig) -> PathBuf {
    dir.join(save_file_name(cfg))
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> PersistError + '_ {
    move |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes `data` to the save slot under `dir`, creating the directory. The
/// previous save is only replaced once the new one is fully written.
pub fn save_world(dir: &Path, cfg: &WorldConfig, data: &WorldData) -> Result<PathBuf, PersistError> {
    fs::create_dir_all(dir).map_err(io_err(dir))?;
    let path = save_path(dir, cfg);
    let tmp_path = path.with_extension("tmp");
    {
        let file = File::create(&tmp_path).map_err(io_err(&tmp_path))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, data)?;
        writer.flush().map_err(io_err(&tmp_path))?;
    }
    fs::rename(&tmp_path, &path).map_err(io_err(&path))?;
    log::info!(
        target: "io",
        "saved {} chunks to {}",
        data.chunk_count(),
        path.display()
    );
    Ok(path)
}

/// Reads the save slot under `dir`. `Ok(None)` when there is no save yet.
pub fn load_world(dir: &Path, cfg: &WorldConfig) -> Result<Option<WorldData>, PersistError> {
    let path = save_path(dir, cfg);
    let file = match File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!(target: "io", "no save at {}", path.display());
            return Ok(None);
        }
        Err(e) => return Err(io_err(&path)(e)),
    };
    let data: WorldData = serde_json::from_reader(BufReader::new(file))?;
    log::info!(
        target: "io",
        "loaded {} chunks from {}",
        data.chunk_count(),
        path.display()
    );
    Ok(Some(data))
}
