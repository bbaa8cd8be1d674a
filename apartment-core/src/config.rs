//! Configuration for the scene engine and the console.
//!
//! Both configs follow the same pattern: sensible defaults, `with_*`
//! builders, and `from_env` for `APARTMENT_*` overrides.

use std::path::PathBuf;
use std::time::Duration;

use crate::engine::loader::{AssetKind, AssetSpec};
use crate::error::ConfigError;

/// Shortest tick interval the engine runs at.
pub const MIN_TICK: Duration = Duration::from_millis(1);

/// Lowest loader throughput, in bytes per second.
pub const MIN_LOAD_RATE: u64 = 1;

/// Configuration for one scene engine instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Logical canvas width in engine units.
    pub width: f32,
    /// Logical canvas height in engine units.
    pub height: f32,
    /// Interval between engine ticks.
    pub tick: Duration,
    /// Assets the preload scene queues.
    pub assets: Vec<AssetSpec>,
    /// Loader throughput in bytes per second of engine time.
    pub load_rate: u64,
    /// Delay between load completion and the apartment scene starting.
    pub transition_delay: Duration,
    /// Delay before the `map` command's reply arrives.
    pub map_delay: Duration,
    /// Minimum engine time between two spontaneous outputs.
    pub chatter_interval: Duration,
    /// Rooms listed by the `map` command, in display order.
    pub floor_plan: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            tick: Duration::from_millis(16),
            assets: vec![
                AssetSpec::new("logo", AssetKind::Image, "assets/phaser-logo.png", 96_000),
                AssetSpec::new("startup", AssetKind::Audio, "assets/startup.wav", 176_000),
            ],
            load_rate: 400_000,
            transition_delay: Duration::from_millis(2000),
            map_delay: Duration::from_millis(600),
            chatter_interval: Duration::from_millis(250),
            floor_plan: ["客厅", "厨房", "卫生间", "卧室A", "卧室B", "阳台"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl EngineConfig {
    /// Defaults with any `APARTMENT_*` environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(ms) = env_u64("APARTMENT_TICK_MS")? {
            config = config.with_tick(Duration::from_millis(ms));
        }
        if let Some(rate) = env_u64("APARTMENT_LOAD_RATE")? {
            config = config.with_load_rate(rate);
        }
        if let Some(ms) = env_u64("APARTMENT_TRANSITION_MS")? {
            config.transition_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = env_u64("APARTMENT_MAP_DELAY_MS")? {
            config.map_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = env_u64("APARTMENT_CHATTER_MS")? {
            config.chatter_interval = Duration::from_millis(ms);
        }
        Ok(config)
    }

    /// Set the tick interval, no shorter than [`MIN_TICK`].
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick.max(MIN_TICK);
        self
    }

    /// Replace the preload asset list.
    pub fn with_assets(mut self, assets: Vec<AssetSpec>) -> Self {
        self.assets = assets;
        self
    }

    /// Set loader throughput in bytes per second, at least [`MIN_LOAD_RATE`].
    pub fn with_load_rate(mut self, bytes_per_sec: u64) -> Self {
        self.load_rate = bytes_per_sec.max(MIN_LOAD_RATE);
        self
    }

    /// Set the preload → apartment transition delay.
    pub fn with_transition_delay(mut self, delay: Duration) -> Self {
        self.transition_delay = delay;
        self
    }

    /// Set the `map` reply delay.
    pub fn with_map_delay(mut self, delay: Duration) -> Self {
        self.map_delay = delay;
        self
    }

    /// Set the spontaneous output rate limit.
    pub fn with_chatter_interval(mut self, interval: Duration) -> Self {
        self.chatter_interval = interval;
        self
    }

    /// Replace the floor plan.
    pub fn with_floor_plan(mut self, rooms: Vec<String>) -> Self {
        self.floor_plan = rooms;
        self
    }
}

/// Configuration for the console surface.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Identifier of the surface the engine is mounted into.
    pub container: String,
    /// JSON roster file; the built-in roster is used when unset.
    pub roster_path: Option<PathBuf>,
    /// Engine settings used on mount.
    pub engine: EngineConfig,
}

impl ConsoleConfig {
    /// Create a console config for the given container.
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            roster_path: None,
            engine: EngineConfig::default(),
        }
    }

    /// Defaults with environment overrides (`APARTMENT_ROSTER` and the
    /// engine variables).
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new("game-container").with_engine(EngineConfig::from_env()?);
        if let Ok(path) = std::env::var("APARTMENT_ROSTER") {
            if !path.trim().is_empty() {
                config.roster_path = Some(PathBuf::from(path));
            }
        }
        Ok(config)
    }

    /// Load residents from a JSON file.
    pub fn with_roster(mut self, path: impl Into<PathBuf>) -> Self {
        self.roster_path = Some(path.into());
        self
    }

    /// Set the engine configuration.
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::new("game-container")
    }
}

fn env_u64(var: &'static str) -> Result<Option<u64>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
        Err(_) => Ok(None),
    }
}
