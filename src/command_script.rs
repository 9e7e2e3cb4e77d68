use anyhow::Result;
use commandbox_core::SimTick;
use commandbox_proxy::ExecOutcome;
use serde::Deserialize;
use std::{collections::VecDeque, fs, path::Path};

use crate::runtime::Runtime;

#[derive(Debug, Deserialize)]
struct CommandScriptFile {
    steps: Vec<CommandScriptStepDef>,
}

#[derive(Debug, Clone, Deserialize)]
struct CommandScriptStepDef {
    tick: u64,
    command: String,
    #[serde(default, rename = "async")]
    queued: bool,
}

/// One command released by [`CommandScriptPlayer::drain_ready_commands`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptCommand {
    pub command: String,
    /// Run through `exec_async` instead of `exec`.
    pub queued: bool,
}

/// What happened to a [`ScriptCommand`] handed to the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// Ran synchronously.
    Ran(ExecOutcome),
    /// Queued as the given task id; completes on the next tick.
    Queued(u64),
    /// The gate turned the actor away.
    Denied,
}

impl ScriptCommand {
    /// Send the command through `exec` or `exec_async` depending on the step.
    pub fn dispatch(&self, runtime: &mut Runtime) -> StepResult {
        if self.queued {
            return runtime
                .queue(&self.command)
                .map_or(StepResult::Denied, StepResult::Queued);
        }
        runtime
            .submit(&self.command)
            .map_or(StepResult::Denied, StepResult::Ran)
    }
}

#[derive(Debug, Clone)]
struct CommandScriptStep {
    tick: SimTick,
    command: ScriptCommand,
}

/// Deterministic command script runner.
///
/// Scripts are a simple list of `{tick, command, async?}` steps, executed in file order.
#[derive(Debug)]
pub struct CommandScriptPlayer {
    pending: VecDeque<CommandScriptStep>,
}

impl CommandScriptPlayer {
    /// Load a command script from a JSON file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Load a command script from an in-memory JSON string.
    pub fn from_str(contents: &str) -> Result<Self> {
        let file: CommandScriptFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("command script contains no steps");
        }

        let mut pending = VecDeque::with_capacity(file.steps.len());
        let mut last_tick: Option<u64> = None;
        for step in file.steps {
            let command = step.command.trim().to_string();
            if command.is_empty() {
                anyhow::bail!("command script contains an empty command");
            }

            if let Some(prev) = last_tick {
                if step.tick < prev {
                    anyhow::bail!("command script steps must be sorted by tick");
                }
            }
            last_tick = Some(step.tick);

            pending.push_back(CommandScriptStep {
                tick: SimTick(step.tick),
                command: ScriptCommand {
                    command,
                    queued: step.queued,
                },
            });
        }

        Ok(Self { pending })
    }

    /// Drain and return all commands scheduled for ticks `<= tick`.
    pub fn drain_ready_commands(&mut self, tick: SimTick) -> Vec<ScriptCommand> {
        let mut commands = Vec::new();
        while self.pending.front().is_some_and(|step| step.tick <= tick) {
            if let Some(step) = self.pending.pop_front() {
                commands.push(step.command);
            }
        }
        commands
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }
}
