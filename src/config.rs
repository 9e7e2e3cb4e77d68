use anyhow::Result;
use commandbox_core::{BlockPos, PermissionLevel, Vec3};
use commandbox_proxy::{ComputerSettings, PermissionGate, DEFAULT_INTERACT_RANGE};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fs, path::Path};
use tracing::warn;

use crate::world::GameRules;

pub const DEFAULT_CONFIG_PATH: &str = "config/commandbox.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Server-wide switch for command computers.
    pub enable_command_computers: bool,
    /// Require the elevated role instead of operator rights.
    pub command_require_elevated_role: bool,
    /// Tier commands run with (0..=4).
    pub permission_level: PermissionLevel,
    /// Reach in blocks for interacting with the computer.
    pub interact_range: f64,
    /// Names allowed to send commands.
    pub operators: BTreeSet<String>,
    /// Names holding the elevated role.
    pub elevated: BTreeSet<String>,
    pub computer: ComputerConfig,
    pub rules: GameRules,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ComputerConfig {
    pub id: u32,
    pub label: Option<String>,
    pub position: [i32; 3],
}

impl Default for ComputerConfig {
    fn default() -> Self {
        Self {
            id: 0,
            label: None,
            position: [0, 64, 0],
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            enable_command_computers: false,
            command_require_elevated_role: false,
            permission_level: PermissionLevel::GAME_MASTER,
            interact_range: DEFAULT_INTERACT_RANGE,
            operators: BTreeSet::new(),
            elevated: BTreeSet::new(),
            computer: ComputerConfig::default(),
            rules: GameRules::default(),
        }
    }
}

impl ProxyConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<ProxyConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    ProxyConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!("Config not found at {}. Using defaults", path.display());
                }
                ProxyConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    pub fn anchor(&self) -> BlockPos {
        let [x, y, z] = self.computer.position;
        BlockPos::new(x, y, z)
    }

    /// Default spot for the local actor: standing right next to the computer.
    pub fn actor_spawn(&self) -> Vec3 {
        let center = self.anchor().center();
        Vec3::new(center.x + 1.0, center.y, center.z)
    }

    pub fn computer_settings(&self) -> ComputerSettings {
        ComputerSettings {
            permission_level: self.permission_level,
            gate: PermissionGate::new(self.command_require_elevated_role)
                .with_interact_range(self.interact_range),
        }
    }
}
