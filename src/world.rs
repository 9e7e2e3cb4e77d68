//! In-memory sandbox host: world state, server settings and the local actor.

use commandbox_core::{BlockPos, Vec3};
use commandbox_proxy::{Actor, CommandHost, Denial, PermissionPolicy, PolicySource};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::info;

/// Ticks in one full day.
pub const TICKS_PER_DAY: u64 = 24_000;
/// Lowest buildable Y.
pub const MIN_BUILD_HEIGHT: i32 = -64;
/// Highest buildable Y.
pub const MAX_BUILD_HEIGHT: i32 = 319;

/// Blocks the sandbox knows how to place.
pub const BLOCK_NAMES: &[&str] = &[
    "air",
    "stone",
    "dirt",
    "grass",
    "sand",
    "glass",
    "redstone_block",
    "command_computer",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeatherState {
    #[default]
    Clear,
    Rain,
    Thunder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MobType {
    Pig,
    Cow,
    Sheep,
    Chicken,
    Villager,
    Zombie,
    Skeleton,
    Creeper,
}

/// The two rules that drive command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameRules {
    pub send_command_feedback: bool,
    pub command_block_output: bool,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            send_command_feedback: true,
            command_block_output: true,
        }
    }
}

/// Boolean rules addressable from `/gamerule`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameRule {
    SendCommandFeedback,
    CommandBlockOutput,
}

impl GameRule {
    pub const ALL: [GameRule; 2] = [Self::SendCommandFeedback, Self::CommandBlockOutput];

    pub fn name(self) -> &'static str {
        match self {
            Self::SendCommandFeedback => "sendCommandFeedback",
            Self::CommandBlockOutput => "commandBlockOutput",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|rule| rule.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for GameRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl GameRules {
    pub fn get(&self, rule: GameRule) -> bool {
        match rule {
            GameRule::SendCommandFeedback => self.send_command_feedback,
            GameRule::CommandBlockOutput => self.command_block_output,
        }
    }

    pub fn set(&mut self, rule: GameRule, value: bool) {
        match rule {
            GameRule::SendCommandFeedback => self.send_command_feedback = value,
            GameRule::CommandBlockOutput => self.command_block_output = value,
        }
    }
}

/// Minimal world the built-in commands operate on.
#[derive(Debug, Default)]
pub struct SandboxWorld {
    pub time: u64,
    pub weather: WeatherState,
    pub rules: GameRules,
    pub blocks: HashMap<BlockPos, String>,
    pub mobs: Vec<(MobType, Vec3)>,
    /// Broadcast chat lines (`/say`).
    pub chat: Vec<String>,
}

impl SandboxWorld {
    pub fn new(rules: GameRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn advance(&mut self) {
        self.time = self.time.wrapping_add(1);
    }

    pub fn time_of_day(&self) -> u64 {
        self.time % TICKS_PER_DAY
    }

    /// Block at `pos`, `air` when nothing was placed.
    pub fn block(&self, pos: BlockPos) -> &str {
        self.blocks.get(&pos).map(String::as_str).unwrap_or("air")
    }

    /// Place a block. Returns false if the same block is already there.
    pub fn set_block(&mut self, pos: BlockPos, block: &str) -> bool {
        if self.block(pos) == block {
            return false;
        }
        if block == "air" {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, block.to_string());
        }
        true
    }

    pub fn broadcast(&mut self, line: String) {
        info!(target: "chat", "{line}");
        self.chat.push(line);
    }
}

impl PolicySource for SandboxWorld {
    fn policy(&self) -> PermissionPolicy {
        PermissionPolicy {
            feedback_enabled: self.rules.send_command_feedback,
            logging_enabled: self.rules.command_block_output,
        }
    }
}

/// Server-wide command settings.
#[derive(Debug, Clone, Default)]
pub struct SandboxHost {
    pub command_computers_enabled: bool,
    pub operators: BTreeSet<String>,
}

impl CommandHost for SandboxHost {
    fn commands_enabled(&self) -> bool {
        self.command_computers_enabled
    }

    fn can_send_commands(&self, actor: &str) -> bool {
        self.operators.contains(actor)
    }
}

/// The local actor driving the console or a script.
#[derive(Debug, Clone)]
pub struct Session {
    pub name: String,
    pub elevated: bool,
    pub position: Vec3,
    pub alive: bool,
    pub status: Vec<Denial>,
}

impl Session {
    pub fn new(name: impl Into<String>, elevated: bool, position: Vec3) -> Self {
        Self {
            name: name.into(),
            elevated,
            position,
            alive: true,
            status: Vec::new(),
        }
    }

    /// Most recent status message, if any.
    pub fn last_status(&self) -> Option<Denial> {
        self.status.last().copied()
    }
}

impl Actor for Session {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_elevated_role(&self) -> bool {
        self.elevated
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn send_status_message(&mut self, denial: Denial) {
        info!(actor = %self.name, key = denial.translation_key(), "{denial}");
        self.status.push(denial);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_follows_game_rules() {
        let mut world = SandboxWorld::default();
        assert_eq!(world.policy(), PermissionPolicy::default());

        world.rules.set(GameRule::SendCommandFeedback, false);
        let policy = world.policy();
        assert!(!policy.feedback_enabled);
        assert!(policy.logging_enabled);
    }

    #[test]
    fn gamerule_names_are_case_insensitive() {
        assert_eq!(
            GameRule::from_name("COMMANDBLOCKOUTPUT"),
            Some(GameRule::CommandBlockOutput)
        );
        assert_eq!(GameRule::from_name("doDaylightCycle"), None);
    }

    #[test]
    fn setting_the_same_block_twice_fails() {
        let mut world = SandboxWorld::default();
        let pos = BlockPos::new(0, 64, 0);
        assert!(world.set_block(pos, "stone"));
        assert!(!world.set_block(pos, "stone"));
        assert!(world.set_block(pos, "air"));
        assert!(world.blocks.is_empty());
        assert!(!world.set_block(pos, "air"));
    }

    #[test]
    fn host_checks_operator_list() {
        let host = SandboxHost {
            command_computers_enabled: true,
            operators: ["admin".to_string()].into_iter().collect(),
        };
        assert!(host.can_send_commands("admin"));
        assert!(!host.can_send_commands("guest"));
    }
}
