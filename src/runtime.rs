//! Single-threaded host loop: one world, one command computer, one actor.

use anyhow::{Context, Result};
use commandbox_core::SimTick;
use commandbox_proxy::{CommandComputer, CommandHost, ExecOutcome, TaskComplete};
use commandbox_testkit::{JsonlSink, TranscriptRecord};
use std::path::Path;
use tracing::{debug, warn};

use crate::commands::BuiltinInterpreter;
use crate::config::ProxyConfig;
use crate::world::{SandboxHost, SandboxWorld, Session};

pub struct Runtime {
    pub world: SandboxWorld,
    pub host: SandboxHost,
    pub computer: CommandComputer,
    pub session: Session,
    interpreter: BuiltinInterpreter,
    tick: SimTick,
    transcript: Option<JsonlSink>,
}

impl Runtime {
    pub fn new(config: &ProxyConfig, mut session: Session) -> Self {
        let mut computer = CommandComputer::new(
            config.computer.id,
            config.anchor(),
            config.computer_settings(),
        );
        computer.set_label(config.computer.label.clone());

        session.elevated |= config.elevated.contains(&session.name);

        Self {
            world: SandboxWorld::new(config.rules),
            host: SandboxHost {
                command_computers_enabled: config.enable_command_computers,
                operators: config.operators.clone(),
            },
            computer,
            session,
            interpreter: BuiltinInterpreter,
            tick: SimTick::ZERO,
            transcript: None,
        }
    }

    /// Record every finished command to a JSONL file at `path`.
    pub fn with_transcript(mut self, path: &Path) -> Result<Self> {
        let sink = JsonlSink::create(path)
            .with_context(|| format!("failed to create transcript {}", path.display()))?;
        self.transcript = Some(sink);
        Ok(self)
    }

    pub fn tick(&self) -> SimTick {
        self.tick
    }

    /// Whether the actor may open the computer (policy plus reach).
    pub fn actor_can_use(&mut self) -> bool {
        let host: &dyn CommandHost = &self.host;
        self.computer.is_usable(&mut self.session, Some(host), false)
    }

    /// Run `command` for the actor right away. `None` when the gate denies.
    pub fn submit(&mut self, command: &str) -> Option<ExecOutcome> {
        let host: &dyn CommandHost = &self.host;
        let outcome = self.computer.exec_for(
            &mut self.session,
            Some(host),
            &mut self.interpreter,
            &mut self.world,
            command,
        )?;
        self.record(command, &outcome);
        Some(outcome)
    }

    /// Queue `command` for the next tick. `None` when the gate denies.
    pub fn queue(&mut self, command: &str) -> Option<u64> {
        let host: &dyn CommandHost = &self.host;
        if !self
            .computer
            .settings()
            .gate
            .is_usable(&mut self.session, Some(host))
        {
            return None;
        }
        Some(self.computer.exec_async(command))
    }

    /// Advance the world by one tick and run queued commands.
    pub fn advance(&mut self) -> Vec<TaskComplete> {
        self.tick = self.tick.advance(1);
        self.world.advance();
        let completed = self
            .computer
            .tick(&mut self.interpreter, &mut self.world, self.tick);
        for task in &completed {
            self.record(&task.command, &task.outcome);
        }
        completed
    }

    pub fn command_names(&self) -> Vec<String> {
        self.computer.list::<SandboxWorld, _>(&self.interpreter)
    }

    fn record(&mut self, command: &str, outcome: &ExecOutcome) {
        debug!(tick = self.tick.0, command, success = outcome.success, "command finished");
        let Some(sink) = self.transcript.as_mut() else {
            return;
        };
        let record = TranscriptRecord::now(self.tick, self.computer.id(), command, outcome);
        if let Err(err) = sink.write(&record) {
            warn!("Failed to write transcript record: {err:#}");
        }
    }
}
