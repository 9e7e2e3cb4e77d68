use commandbox_core::{BlockPos, PermissionLevel, Vec3};
use commandbox_proxy::{CommandInterpreter, ExecutionContext, InterpreterError};

use crate::world::{
    GameRule, MobType, SandboxWorld, WeatherState, BLOCK_NAMES, MAX_BUILD_HEIGHT,
    MIN_BUILD_HEIGHT,
};

/// Command names understood by [`BuiltinInterpreter`].
pub const COMMAND_NAMES: &[&str] = &[
    "help", "list", "say", "time", "weather", "setblock", "summon", "gamerule",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordArg {
    Absolute(f64),
    Relative(f64),
}

impl CoordArg {
    pub fn resolve(self, base: f64) -> f64 {
        match self {
            Self::Absolute(v) => v,
            Self::Relative(delta) => base + delta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCoordArg {
    Absolute(i32),
    Relative(i32),
}

impl BlockCoordArg {
    pub fn resolve(self, base: i32) -> i32 {
        match self {
            Self::Absolute(v) => v,
            Self::Relative(delta) => base.saturating_add(delta),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameCommand {
    Help,
    List,
    Say {
        message: String,
    },
    TimeSet {
        tick: u64,
    },
    TimeAdd {
        delta: u64,
    },
    TimeQuery,
    WeatherSet {
        state: WeatherState,
    },
    Setblock {
        x: BlockCoordArg,
        y: BlockCoordArg,
        z: BlockCoordArg,
        block: &'static str,
    },
    Summon {
        mob: MobType,
        x: CoordArg,
        y: CoordArg,
        z: CoordArg,
    },
    Gamerule {
        rule: GameRule,
        value: Option<bool>,
    },
}

impl GameCommand {
    /// Tier a source needs to run this command.
    pub fn required_level(&self) -> PermissionLevel {
        match self {
            Self::Help | Self::List => PermissionLevel::ALL,
            _ => PermissionLevel::GAME_MASTER,
        }
    }
}

/// Interpreter for the sandbox's built-in command set.
#[derive(Debug, Default)]
pub struct BuiltinInterpreter;

impl CommandInterpreter<SandboxWorld> for BuiltinInterpreter {
    fn execute(
        &mut self,
        ctx: &mut ExecutionContext<'_, SandboxWorld>,
        command: &str,
    ) -> Result<i32, InterpreterError> {
        let cmd = parse_command(command)?;
        let required = cmd.required_level();
        if !ctx.permission_level().allows(required) {
            return Err(InterpreterError::InsufficientPermission {
                required: required.get(),
                actual: ctx.permission_level().get(),
            });
        }
        execute_command(ctx, cmd)
    }

    fn commands(&self) -> Vec<String> {
        COMMAND_NAMES.iter().map(|name| name.to_string()).collect()
    }
}

pub fn execute_command(
    ctx: &mut ExecutionContext<'_, SandboxWorld>,
    cmd: GameCommand,
) -> Result<i32, InterpreterError> {
    match cmd {
        GameCommand::Help => {
            let lines = help_lines();
            let count = lines.len() as i32;
            for line in lines {
                ctx.send_feedback(line);
            }
            Ok(count)
        }
        GameCommand::List => {
            ctx.send_feedback(format!("Commands: {}", COMMAND_NAMES.join(", ")));
            Ok(COMMAND_NAMES.len() as i32)
        }
        GameCommand::Say { message } => {
            let line = format!("[{}] {message}", ctx.display_name());
            ctx.world_mut().broadcast(line);
            Ok(1)
        }
        GameCommand::TimeSet { tick } => {
            ctx.world_mut().time = tick;
            ctx.send_feedback(format!("Time set to tick {tick}"));
            Ok(1)
        }
        GameCommand::TimeAdd { delta } => {
            let new_tick = ctx.world().time.saturating_add(delta);
            ctx.world_mut().time = new_tick;
            ctx.send_feedback(format!("Time advanced by {delta} to {new_tick}"));
            Ok(1)
        }
        GameCommand::TimeQuery => {
            let daytime = ctx.world().time_of_day();
            ctx.send_feedback(format!("The time is {daytime}"));
            Ok(daytime as i32)
        }
        GameCommand::WeatherSet { state } => {
            ctx.world_mut().weather = state;
            ctx.send_feedback(format!("Weather set to {state:?}"));
            Ok(1)
        }
        GameCommand::Setblock { x, y, z, block } => {
            let base = ctx.position().block();
            let pos = BlockPos::new(x.resolve(base.x), y.resolve(base.y), z.resolve(base.z));
            if !(MIN_BUILD_HEIGHT..=MAX_BUILD_HEIGHT).contains(&pos.y) {
                return Err(InterpreterError::Failed(
                    "Cannot place block outside of the world".to_string(),
                ));
            }
            if !ctx.world_mut().set_block(pos, block) {
                return Err(InterpreterError::Failed("Could not set the block".to_string()));
            }
            ctx.send_feedback(format!("Set block at {pos} to {block}"));
            Ok(1)
        }
        GameCommand::Summon { mob, x, y, z } => {
            let base = ctx.position();
            let at = Vec3::new(x.resolve(base.x), y.resolve(base.y), z.resolve(base.z));
            ctx.world_mut().mobs.push((mob, at));
            ctx.send_feedback(format!(
                "Summoned {mob:?} at {:.2} {:.2} {:.2}",
                at.x, at.y, at.z
            ));
            Ok(1)
        }
        GameCommand::Gamerule { rule, value: None } => {
            let value = ctx.world().rules.get(rule);
            ctx.send_feedback(format!("Gamerule {rule} is currently set to: {value}"));
            Ok(i32::from(value))
        }
        GameCommand::Gamerule {
            rule,
            value: Some(value),
        } => {
            ctx.world_mut().rules.set(rule, value);
            ctx.send_feedback(format!("Gamerule {rule} is now set to: {value}"));
            Ok(1)
        }
    }
}

pub fn parse_command(input: &str) -> Result<GameCommand, InterpreterError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(GameCommand::Help);
    }

    let input = input.strip_prefix('/').unwrap_or(input).trim();
    if input.is_empty() {
        return Ok(GameCommand::Help);
    }

    let mut parts = input.split_whitespace();
    let cmd = parts
        .next()
        .ok_or_else(|| syntax("Missing command"))?
        .to_ascii_lowercase();
    let args: Vec<&str> = parts.collect();

    match cmd.as_str() {
        "help" | "?" => Ok(GameCommand::Help),
        "list" => Ok(GameCommand::List),
        "say" => {
            if args.is_empty() {
                return Err(syntax("Usage: /say <message>"));
            }
            Ok(GameCommand::Say {
                message: args.join(" "),
            })
        }
        "time" => parse_time_command(&args),
        "weather" => parse_weather_command(&args),
        "setblock" => parse_setblock_command(&args),
        "summon" => parse_summon_command(&args),
        "gamerule" => parse_gamerule_command(&args),
        _ => Err(InterpreterError::UnknownCommand(cmd)),
    }
}

fn syntax(message: impl Into<String>) -> InterpreterError {
    InterpreterError::Syntax(message.into())
}

fn parse_coord(s: &str) -> Result<CoordArg, InterpreterError> {
    let s = s.trim();
    if let Some(rest) = s.strip_prefix('~') {
        if rest.is_empty() {
            return Ok(CoordArg::Relative(0.0));
        }
        let delta = rest
            .parse::<f64>()
            .map_err(|_| syntax(format!("Invalid relative coordinate: {s}")))?;
        return Ok(CoordArg::Relative(delta));
    }
    let value = s
        .parse::<f64>()
        .map_err(|_| syntax(format!("Invalid coordinate: {s}")))?;
    Ok(CoordArg::Absolute(value))
}

fn parse_block_coord(s: &str) -> Result<BlockCoordArg, InterpreterError> {
    let s = s.trim();
    if let Some(rest) = s.strip_prefix('~') {
        if rest.is_empty() {
            return Ok(BlockCoordArg::Relative(0));
        }
        let delta = rest
            .parse::<i32>()
            .map_err(|_| syntax(format!("Invalid relative block coordinate: {s}")))?;
        return Ok(BlockCoordArg::Relative(delta));
    }
    let value = s
        .parse::<i32>()
        .map_err(|_| syntax(format!("Invalid block coordinate: {s}")))?;
    Ok(BlockCoordArg::Absolute(value))
}

fn parse_time_command(args: &[&str]) -> Result<GameCommand, InterpreterError> {
    let usage = || syntax("Usage: /time <set|add|query> <value>");
    let sub = args.first().ok_or_else(usage)?.to_ascii_lowercase();
    match (sub.as_str(), args.len()) {
        ("query", 2) if args[1].eq_ignore_ascii_case("daytime") => Ok(GameCommand::TimeQuery),
        ("set", 2) => {
            let value = args[1].to_ascii_lowercase();
            let tick = match value.as_str() {
                "day" => 1000,
                "noon" => 6000,
                "night" => 13000,
                "midnight" => 18000,
                _ => value
                    .parse::<u64>()
                    .map_err(|_| syntax("Invalid time value"))?,
            };
            Ok(GameCommand::TimeSet { tick })
        }
        ("add", 2) => {
            let delta = args[1]
                .parse::<u64>()
                .map_err(|_| syntax("Invalid time delta"))?;
            Ok(GameCommand::TimeAdd { delta })
        }
        _ => Err(usage()),
    }
}

fn parse_weather_command(args: &[&str]) -> Result<GameCommand, InterpreterError> {
    let usage = || syntax("Usage: /weather <clear|rain|thunder>");
    if args.len() != 1 {
        return Err(usage());
    }
    let state = match args[0].to_ascii_lowercase().as_str() {
        "clear" | "sun" => WeatherState::Clear,
        "rain" => WeatherState::Rain,
        "thunder" => WeatherState::Thunder,
        _ => return Err(usage()),
    };
    Ok(GameCommand::WeatherSet { state })
}

fn parse_setblock_command(args: &[&str]) -> Result<GameCommand, InterpreterError> {
    if args.len() != 4 {
        return Err(syntax("Usage: /setblock <x> <y> <z> <block>"));
    }
    let x = parse_block_coord(args[0])?;
    let y = parse_block_coord(args[1])?;
    let z = parse_block_coord(args[2])?;
    let token = args[3].trim().to_ascii_lowercase();
    let token = token.strip_prefix("minecraft:").unwrap_or(&token);
    let block = BLOCK_NAMES
        .iter()
        .copied()
        .find(|name| *name == token)
        .ok_or_else(|| syntax(format!("Unknown block name: {token}")))?;
    Ok(GameCommand::Setblock { x, y, z, block })
}

fn parse_summon_command(args: &[&str]) -> Result<GameCommand, InterpreterError> {
    let usage = || syntax("Usage: /summon <mob> [x y z]");
    let mob = parse_mob(args.first().ok_or_else(usage)?)?;
    let (x, y, z) = match args.len() {
        1 => (
            CoordArg::Relative(0.0),
            CoordArg::Relative(0.0),
            CoordArg::Relative(0.0),
        ),
        4 => (
            parse_coord(args[1])?,
            parse_coord(args[2])?,
            parse_coord(args[3])?,
        ),
        _ => return Err(usage()),
    };
    Ok(GameCommand::Summon { mob, x, y, z })
}

fn parse_mob(token: &str) -> Result<MobType, InterpreterError> {
    let mob = match token.trim().to_ascii_lowercase().as_str() {
        "pig" => MobType::Pig,
        "cow" => MobType::Cow,
        "sheep" => MobType::Sheep,
        "chicken" => MobType::Chicken,
        "villager" => MobType::Villager,
        "zombie" => MobType::Zombie,
        "skeleton" => MobType::Skeleton,
        "creeper" => MobType::Creeper,
        _ => return Err(syntax(format!("Unknown mob type: {token}"))),
    };
    Ok(mob)
}

fn parse_gamerule_command(args: &[&str]) -> Result<GameCommand, InterpreterError> {
    let usage = || syntax("Usage: /gamerule <rule> [true|false]");
    let name = args.first().ok_or_else(usage)?;
    let rule =
        GameRule::from_name(name).ok_or_else(|| syntax(format!("Unknown game rule: {name}")))?;
    let value = match args.get(1) {
        None => None,
        Some(raw) => Some(
            raw.to_ascii_lowercase()
                .parse::<bool>()
                .map_err(|_| syntax(format!("Invalid boolean: {raw}")))?,
        ),
    };
    if args.len() > 2 {
        return Err(usage());
    }
    Ok(GameCommand::Gamerule { rule, value })
}

fn help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  /help".to_string(),
        "  /list".to_string(),
        "  /say <message>".to_string(),
        "  /time set <tick|day|noon|night|midnight>".to_string(),
        "  /time add <delta>".to_string(),
        "  /time query daytime".to_string(),
        "  /weather <clear|rain|thunder>".to_string(),
        "  /setblock <x> <y> <z> <block>   (supports ~offset; block coords are ints)"
            .to_string(),
        "  /summon <mob> [x y z]       (supports ~offset)".to_string(),
        "  /gamerule <sendCommandFeedback|commandBlockOutput> [true|false]".to_string(),
    ]
}
