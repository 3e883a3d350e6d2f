use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use strata_blocks::VoxelType;
use strata_geom::IVec3;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level world settings, read from `strata.toml`.
#[derive(Clone, Debug, Deserialize)]
pub struct WorldConfig {
    /// Process RNG seed for per-voxel draws; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub noise_seed: i32,
    /// Generation/meshing threads; 0 lets rayon decide.
    #[serde(default)]
    pub workers: usize,
    #[serde(default = "default_water_level")]
    pub water_level: i32,
    #[serde(default = "default_draw_radius")]
    pub draw_radius: i32,
    #[serde(default = "default_place_type")]
    pub place_type: VoxelType,
    #[serde(default = "default_drop_strength")]
    pub drop_strength: i32,
    #[serde(default)]
    pub chunk: ChunkDims,
    #[serde(default = "default_world_extent")]
    pub world: Extent,
    #[serde(default = "default_world_extent")]
    pub extra: Extent,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub layers: NoiseLayers,
}

fn default_water_level() -> i32 {
    20
}
fn default_draw_radius() -> i32 {
    3
}
fn default_place_type() -> VoxelType {
    VoxelType::Dirt
}
fn default_drop_strength() -> i32 {
    6
}
fn default_world_extent() -> Extent {
    Extent { x: 5, y: 5, z: 5 }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            noise_seed: 0,
            workers: 0,
            water_level: default_water_level(),
            draw_radius: default_draw_radius(),
            place_type: default_place_type(),
            drop_strength: default_drop_strength(),
            chunk: ChunkDims::default(),
            world: default_world_extent(),
            extra: default_world_extent(),
            timing: TimingConfig::default(),
            layers: NoiseLayers::default(),
        }
    }
}

impl WorldConfig {
    /// Rejects settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.chunk;
        if c.sx == 0 || c.sy == 0 || c.sz == 0 {
            return Err(ConfigError::Invalid(format!(
                "chunk dims must be positive, got {}x{}x{}",
                c.sx, c.sy, c.sz
            )));
        }
        if c.volume() > i32::MAX as usize {
            return Err(ConfigError::Invalid("chunk volume overflows i32".into()));
        }
        if self.world.x <= 0 || self.world.y <= 0 || self.world.z <= 0 {
            return Err(ConfigError::Invalid(format!(
                "world extent must be positive, got {:?}",
                self.world
            )));
        }
        if self.extra.x < 0 || self.extra.y < 0 || self.extra.z < 0 {
            return Err(ConfigError::Invalid(format!(
                "extra extent must not be negative, got {:?}",
                self.extra
            )));
        }
        if self.draw_radius < 0 {
            return Err(ConfigError::Invalid(format!(
                "draw_radius must not be negative, got {}",
                self.draw_radius
            )));
        }
        if self.drop_strength < 0 {
            return Err(ConfigError::Invalid(format!(
                "drop_strength must not be negative, got {}",
                self.drop_strength
            )));
        }
        if self.place_type.is_damage_marker() || self.place_type.is_air() {
            return Err(ConfigError::Invalid(format!(
                "place_type {:?} is not a material",
                self.place_type
            )));
        }
        let t = &self.timing;
        if t.tick_ms == 0 {
            return Err(ConfigError::Invalid("timing.tick_ms must be positive".into()));
        }
        if t.steps_per_tick == 0 {
            return Err(ConfigError::Invalid(
                "timing.steps_per_tick must be positive".into(),
            ));
        }
        for (name, layer) in self.layers.named() {
            layer
                .validate()
                .map_err(|e| ConfigError::Invalid(format!("layers.{name}: {e}")))?;
        }
        Ok(())
    }

    /// Number of ticks covering `ms` of simulated time, at least one.
    #[inline]
    pub fn ticks_for(&self, ms: u64) -> u64 {
        ms.div_ceil(self.timing.tick_ms).max(1)
    }
}

/// Voxel size of one chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ChunkDims {
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
}

impl Default for ChunkDims {
    fn default() -> Self {
        Self {
            sx: 10,
            sy: 10,
            sz: 10,
        }
    }
}

impl ChunkDims {
    #[inline]
    pub const fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self { sx, sy, sz }
    }

    #[inline]
    pub fn volume(self) -> usize {
        self.sx * self.sy * self.sz
    }

    #[inline]
    pub fn as_ivec3(self) -> IVec3 {
        IVec3::new(self.sx as i32, self.sy as i32, self.sz as i32)
    }

    /// Flat index of local `(x, y, z)`: `x + sx * (y + sy * z)`.
    #[inline]
    pub fn index(self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < self.sx && y < self.sy && z < self.sz);
        x + self.sx * (y + self.sy * z)
    }

    /// Inverse of [`ChunkDims::index`].
    #[inline]
    pub fn coords(self, i: usize) -> (usize, usize, usize) {
        debug_assert!(i < self.volume());
        (i % self.sx, (i / self.sx) % self.sy, i / (self.sx * self.sy))
    }

    /// Flat index of a signed local position, or `None` when outside the chunk.
    #[inline]
    pub fn index_of(self, local: IVec3) -> Option<usize> {
        self.contains_local(local)
            .then(|| self.index(local.x as usize, local.y as usize, local.z as usize))
    }

    #[inline]
    pub fn local_of(self, i: usize) -> IVec3 {
        let (x, y, z) = self.coords(i);
        IVec3::new(x as i32, y as i32, z as i32)
    }

    #[inline]
    pub fn contains_local(self, p: IVec3) -> bool {
        p.x >= 0
            && p.y >= 0
            && p.z >= 0
            && (p.x as usize) < self.sx
            && (p.y as usize) < self.sy
            && (p.z as usize) < self.sz
    }
}

/// Size of a region in chunks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Extent {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,
    #[serde(default = "default_heal_delay_ms")]
    pub heal_delay_ms: u64,
    #[serde(default = "default_drop_delay_ms")]
    pub drop_delay_ms: u64,
    /// Streaming job steps executed per tick.
    #[serde(default = "default_steps_per_tick")]
    pub steps_per_tick: usize,
}

fn default_tick_ms() -> u64 {
    50
}
fn default_update_interval_ms() -> u64 {
    500
}
fn default_heal_delay_ms() -> u64 {
    3000
}
fn default_drop_delay_ms() -> u64 {
    100
}
fn default_steps_per_tick() -> usize {
    4
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            update_interval_ms: default_update_interval_ms(),
            heal_delay_ms: default_heal_delay_ms(),
            drop_delay_ms: default_drop_delay_ms(),
            steps_per_tick: default_steps_per_tick(),
        }
    }
}

/// One fBM feature. `threshold` is a probability for stone/ore layers and a
/// cut-off value for cave/tree layers.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct NoiseLayer {
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default = "default_height_scale")]
    pub height_scale: f32,
    #[serde(default = "default_height_offset")]
    pub height_offset: f32,
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_octaves() -> u32 {
    1
}
fn default_scale() -> f32 {
    0.5
}
fn default_height_scale() -> f32 {
    2.0
}
fn default_height_offset() -> f32 {
    1.0
}
fn default_threshold() -> f32 {
    1.0
}
fn default_enabled() -> bool {
    true
}

impl Default for NoiseLayer {
    fn default() -> Self {
        Self {
            octaves: default_octaves(),
            scale: default_scale(),
            height_scale: default_height_scale(),
            height_offset: default_height_offset(),
            threshold: default_threshold(),
            enabled: default_enabled(),
        }
    }
}

impl NoiseLayer {
    pub const fn new(
        octaves: u32,
        scale: f32,
        height_scale: f32,
        height_offset: f32,
        threshold: f32,
    ) -> Self {
        Self {
            octaves,
            scale,
            height_scale,
            height_offset,
            threshold,
            enabled: true,
        }
    }

    pub const fn disabled(self) -> Self {
        Self {
            enabled: false,
            ..self
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.octaves == 0 || self.octaves > 24 {
            return Err(format!("octaves must be in 1..=24, got {}", self.octaves));
        }
        let finite = [
            self.scale,
            self.height_scale,
            self.height_offset,
            self.threshold,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err("parameters must be finite".into());
        }
        Ok(())
    }
}

/// The six layers the generator reads.
#[derive(Clone, Debug, Deserialize)]
pub struct NoiseLayers {
    #[serde(default = "default_surface")]
    pub surface: NoiseLayer,
    #[serde(default = "default_stone")]
    pub stone: NoiseLayer,
    #[serde(default = "default_ore_high")]
    pub ore_high: NoiseLayer,
    #[serde(default = "default_ore_low")]
    pub ore_low: NoiseLayer,
    #[serde(default = "default_cave")]
    pub cave: NoiseLayer,
    #[serde(default = "default_tree")]
    pub tree: NoiseLayer,
}

fn default_surface() -> NoiseLayer {
    NoiseLayer::new(4, 0.01, 10.0, 5.0, 1.0)
}
fn default_stone() -> NoiseLayer {
    NoiseLayer::new(4, 0.02, 8.0, -2.0, 0.8)
}
fn default_ore_high() -> NoiseLayer {
    NoiseLayer::new(2, 0.05, 6.0, 0.0, 0.05)
}
fn default_ore_low() -> NoiseLayer {
    NoiseLayer::new(2, 0.05, 3.0, 0.0, 1.0)
}
fn default_cave() -> NoiseLayer {
    NoiseLayer::new(2, 0.06, 4.0, 0.0, 2.0)
}
fn default_tree() -> NoiseLayer {
    NoiseLayer::new(2, 0.1, 4.0, 0.0, 3.0)
}

impl Default for NoiseLayers {
    fn default() -> Self {
        Self {
            surface: default_surface(),
            stone: default_stone(),
            ore_high: default_ore_high(),
            ore_low: default_ore_low(),
            cave: default_cave(),
            tree: default_tree(),
        }
    }
}

impl NoiseLayers {
    pub fn named(&self) -> [(&'static str, &NoiseLayer); 6] {
        [
            ("surface", &self.surface),
            ("stone", &self.stone),
            ("ore_high", &self.ore_high),
            ("ore_low", &self.ore_low),
            ("cave", &self.cave),
            ("tree", &self.tree),
        ]
    }
}

pub fn load_config_from_path(path: &Path) -> Result<WorldConfig, ConfigError> {
    let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg: WorldConfig = toml::from_str(&s)?;
    cfg.validate()?;
    Ok(cfg)
}
