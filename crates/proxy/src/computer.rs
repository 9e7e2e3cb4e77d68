//! The command computer and its command API.

use crate::context::ExecutionContext;
use crate::gate::{Actor, CommandHost, PermissionGate};
use crate::sink::{CommandSink, CommandSource, PolicySource};
use commandbox_core::{BlockPos, PermissionLevel, SimTick};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use thiserror::Error;
use tracing::{debug, trace};

/// Host-side command interpreter the computer delegates to.
pub trait CommandInterpreter<W: ?Sized> {
    /// Run `command`, writing output through `ctx`. Returns the command's
    /// result count (`0` means nothing happened).
    fn execute(
        &mut self,
        ctx: &mut ExecutionContext<'_, W>,
        command: &str,
    ) -> Result<i32, InterpreterError>;

    /// Names of the commands this interpreter understands.
    fn commands(&self) -> Vec<String>;
}

/// Failures reported by a [`CommandInterpreter`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpreterError {
    /// No command with that name.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    /// The command was recognised but its arguments were not.
    #[error("{0}")]
    Syntax(String),
    /// The source's tier is too low.
    #[error("Permission level {required} required (source has {actual})")]
    InsufficientPermission {
        /// Tier the command needs.
        required: u8,
        /// Tier the source runs with.
        actual: u8,
    },
    /// The command ran and failed.
    #[error("{0}")]
    Failed(String),
}

/// Per-computer settings supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputerSettings {
    /// Tier commands run with.
    pub permission_level: PermissionLevel,
    /// Gate used for [`CommandComputer::is_usable`].
    pub gate: PermissionGate,
}

impl Default for ComputerSettings {
    fn default() -> Self {
        Self {
            permission_level: PermissionLevel::GAME_MASTER,
            gate: PermissionGate::default(),
        }
    }
}

/// Result of one `exec` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecOutcome {
    /// Whether the command reported a positive result.
    pub success: bool,
    /// Lines the command produced, in order.
    pub output: Vec<String>,
    /// Raw result count returned by the interpreter.
    pub result: i32,
}

/// Completion event for a command queued with [`CommandComputer::exec_async`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskComplete {
    /// Id handed out by `exec_async`.
    pub id: u64,
    /// Tick the command ran on.
    pub tick: u64,
    /// Command text.
    pub command: String,
    /// What happened.
    pub outcome: ExecOutcome,
}

#[derive(Debug)]
struct PendingCommand {
    id: u64,
    command: String,
}

/// A computer that runs commands through a host interpreter and keeps their
/// output in a [`CommandSink`].
#[derive(Debug)]
pub struct CommandComputer {
    id: u32,
    label: Option<String>,
    anchor: BlockPos,
    settings: ComputerSettings,
    sink: CommandSink,
    pending: VecDeque<PendingCommand>,
    next_task_id: u64,
}

impl CommandComputer {
    /// Create a computer placed at `anchor`.
    pub fn new(id: u32, anchor: BlockPos, settings: ComputerSettings) -> Self {
        Self {
            id,
            label: None,
            anchor,
            settings,
            sink: CommandSink::default(),
            pending: VecDeque::new(),
            next_task_id: 1,
        }
    }

    /// Host-assigned computer id.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Current label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Set or remove the label. The label is kept exactly as given.
    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    /// Anchor position of the computer.
    pub fn position(&self) -> BlockPos {
        self.anchor
    }

    /// Settings the computer was created with.
    pub fn settings(&self) -> &ComputerSettings {
        &self.settings
    }

    /// Drop everything the last command printed.
    pub fn clear_output(&mut self) {
        self.sink.clear();
    }

    /// Live view of the output buffer.
    pub fn output(&self) -> &BTreeMap<u32, String> {
        self.sink.read()
    }

    /// Copy of the output buffer that survives later runs.
    pub fn copy_output(&self) -> BTreeMap<u32, String> {
        self.sink.snapshot()
    }

    /// Output sink, including the policy last applied to it.
    pub fn sink(&self) -> &CommandSink {
        &self.sink
    }

    /// Whether `actor` may use this computer. Denials are reported to the
    /// actor as status messages.
    pub fn is_usable<A: Actor + ?Sized>(
        &self,
        actor: &mut A,
        host: Option<&dyn CommandHost>,
        ignore_range: bool,
    ) -> bool {
        self.settings
            .gate
            .is_usable_within(actor, host, self.anchor, ignore_range)
    }

    /// Context for running one command against `world`.
    pub fn build_execution_context<'a, W: ?Sized>(
        &'a mut self,
        world: &'a mut W,
    ) -> ExecutionContext<'a, W> {
        ExecutionContext::build(
            self.label.as_deref(),
            self.anchor,
            world,
            self.settings.permission_level,
            &mut self.sink,
        )
    }

    /// Run `command` now and collect its output.
    ///
    /// The buffer is cleared first and the policy refreshed from `world`.
    /// Interpreter errors are written into the buffer and reported as an
    /// unsuccessful outcome.
    pub fn exec<W, I>(&mut self, interpreter: &mut I, world: &mut W, command: &str) -> ExecOutcome
    where
        W: PolicySource + ?Sized,
        I: CommandInterpreter<W> + ?Sized,
    {
        self.sink.clear();
        self.sink.set_policy(world.policy());
        debug!(computer = self.id, command, "executing command");

        let result = {
            let mut ctx = self.build_execution_context(world);
            let result = interpreter.execute(&mut ctx, command);
            if let Err(err) = &result {
                if ctx.wants_errors() {
                    ctx.send_message(err.to_string());
                }
            }
            result
        };

        let output = self.sink.lines().map(str::to_owned).collect();
        match result {
            Ok(count) => ExecOutcome {
                success: count > 0,
                output,
                result: count,
            },
            Err(err) => {
                debug!(computer = self.id, command, %err, "command failed");
                ExecOutcome {
                    success: false,
                    output,
                    result: 0,
                }
            }
        }
    }

    /// Gate `actor` first, then run `command`. Returns `None` when denied.
    pub fn exec_for<A, W, I>(
        &mut self,
        actor: &mut A,
        host: Option<&dyn CommandHost>,
        interpreter: &mut I,
        world: &mut W,
        command: &str,
    ) -> Option<ExecOutcome>
    where
        A: Actor + ?Sized,
        W: PolicySource + ?Sized,
        I: CommandInterpreter<W> + ?Sized,
    {
        if !self.settings.gate.is_usable(actor, host) {
            return None;
        }
        Some(self.exec(interpreter, world, command))
    }

    /// Queue `command` for the next [`CommandComputer::tick`]. Returns its task id.
    pub fn exec_async(&mut self, command: impl Into<String>) -> u64 {
        let id = self.next_task_id;
        self.next_task_id += 1;
        let command = command.into();
        trace!(computer = self.id, id, command = %command, "queued command");
        self.pending.push_back(PendingCommand { id, command });
        id
    }

    /// Number of queued commands.
    pub fn pending_tasks(&self) -> usize {
        self.pending.len()
    }

    /// Run every queued command in submission order.
    pub fn tick<W, I>(
        &mut self,
        interpreter: &mut I,
        world: &mut W,
        tick: SimTick,
    ) -> Vec<TaskComplete>
    where
        W: PolicySource + ?Sized,
        I: CommandInterpreter<W> + ?Sized,
    {
        let mut completed = Vec::with_capacity(self.pending.len());
        while let Some(task) = self.pending.pop_front() {
            let outcome = self.exec(interpreter, world, &task.command);
            completed.push(TaskComplete {
                id: task.id,
                tick: tick.0,
                command: task.command,
                outcome,
            });
        }
        completed
    }

    /// Sorted, de-duplicated command names offered by `interpreter`.
    pub fn list<W, I>(&self, interpreter: &I) -> Vec<String>
    where
        W: ?Sized,
        I: CommandInterpreter<W> + ?Sized,
    {
        let mut names = interpreter.commands();
        names.sort();
        names.dedup();
        names
    }
}
