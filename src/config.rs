/// Game configuration.
///
/// Settings come from an optional INI file.  Missing keys keep their
/// defaults, so an absent file simply means a default setup.
///
/// ```ini
/// [game]
/// difficulty = medium
///
/// [display]
/// cell_width = 8
/// cell_height = 16
/// frame_ms = 16
/// ```

use std::path::PathBuf;
use std::time::Duration;

use configparser::ini::Ini;
use log::info;

use crate::entities::Level;

const DEFAULT_LEVEL: Level = Level::Medium;
const DEFAULT_CELL_WIDTH: u32 = 8;
const DEFAULT_CELL_HEIGHT: u32 = 16;
const DEFAULT_FRAME_MS: u64 = 16;
pub const DEFAULT_CONFIG_PATH: &str = "./shooter.ini";

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Level picked when the menu is confirmed with Enter.
    pub level: Level,
    /// World units per terminal column.
    pub cell_width: u32,
    /// World units per terminal row.
    pub cell_height: u32,
    /// Frame budget of the game loop in milliseconds.
    pub frame_ms: u64,
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            frame_ms: DEFAULT_FRAME_MS,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    /// World size covered by a terminal of `cols` x `rows` cells.
    pub fn world_size(&self, cols: u16, rows: u16) -> (f32, f32) {
        (
            cols as f32 * self.cell_width as f32,
            rows as f32 * self.cell_height as f32,
        )
    }

    /// Load settings from `config_path`.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut ini = Ini::new();
        ini.load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&ini)
    }

    /// Load settings from INI text.
    pub fn load_from_str(&mut self, contents: &str) -> Result<(), String> {
        let mut ini = Ini::new();
        ini.read(contents.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&ini)
    }

    fn apply(&mut self, ini: &Ini) -> Result<(), String> {
        // [game] section
        if let Some(name) = ini.get("game", "difficulty") {
            self.level = Level::from_name(&name)
                .ok_or_else(|| format!("Unknown difficulty '{}'", name))?;
        }

        // [display] section
        if let Some(w) = ini.getuint("display", "cell_width")? {
            self.cell_width = (w as u32).max(1);
        }
        if let Some(h) = ini.getuint("display", "cell_height")? {
            self.cell_height = (h as u32).max(1);
        }
        if let Some(ms) = ini.getuint("display", "frame_ms")? {
            self.frame_ms = ms.max(1);
        }

        info!(
            "Loaded config: difficulty={}, cell={}x{}, frame={}ms",
            self.level.name(),
            self.cell_width,
            self.cell_height,
            self.frame_ms
        );
        Ok(())
    }
}
