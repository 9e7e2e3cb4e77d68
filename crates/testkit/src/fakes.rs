//! In-memory stand-ins for the host collaborators.

use commandbox_core::Vec3;
use commandbox_proxy::{
    Actor, CommandHost, CommandInterpreter, Denial, ExecutionContext, InterpreterError,
};
use std::collections::{BTreeSet, HashMap};

/// Actor that records every status message it is shown.
#[derive(Debug, Clone)]
pub struct FakeActor {
    /// Profile name.
    pub name: String,
    /// Holds the elevated role.
    pub elevated: bool,
    /// Current position.
    pub position: Vec3,
    /// Alive flag.
    pub alive: bool,
    /// Status messages received so far.
    pub status: Vec<Denial>,
}

impl FakeActor {
    /// A living, non-elevated actor at the origin.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elevated: false,
            position: Vec3::ZERO,
            alive: true,
            status: Vec::new(),
        }
    }

    /// Grant the elevated role.
    pub fn elevated(mut self) -> Self {
        self.elevated = true;
        self
    }

    /// Move the actor.
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }
}

impl Actor for FakeActor {
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
        self.status.push(denial);
    }
}

/// Host with a command switch and an operator list.
#[derive(Debug, Clone, Default)]
pub struct FakeHost {
    /// Server-wide command switch.
    pub commands_enabled: bool,
    /// Names allowed to send commands.
    pub operators: BTreeSet<String>,
}

impl FakeHost {
    /// Host with commands enabled and no operators.
    pub fn enabled() -> Self {
        Self {
            commands_enabled: true,
            operators: BTreeSet::new(),
        }
    }

    /// Add an operator.
    pub fn with_operator(mut self, name: impl Into<String>) -> Self {
        self.operators.insert(name.into());
        self
    }
}

impl CommandHost for FakeHost {
    fn commands_enabled(&self) -> bool {
        self.commands_enabled
    }

    fn can_send_commands(&self, actor: &str) -> bool {
        self.operators.contains(actor)
    }
}

/// Canned reply for [`ScriptedInterpreter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Emit the lines as feedback and return the count.
    Lines(Vec<String>, i32),
    /// Fail with the given error.
    Fail(InterpreterError),
}

/// Interpreter answering from a fixed table and remembering what it ran.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInterpreter {
    replies: HashMap<String, Reply>,
    /// Commands executed, in order.
    pub seen: Vec<String>,
}

impl ScriptedInterpreter {
    /// Reply to `command` with feedback `lines` and result `result`.
    pub fn reply(mut self, command: &str, lines: &[&str], result: i32) -> Self {
        let lines = lines.iter().map(|line| line.to_string()).collect();
        self.replies
            .insert(command.to_string(), Reply::Lines(lines, result));
        self
    }

    /// Fail `command` with `error`.
    pub fn fail(mut self, command: &str, error: InterpreterError) -> Self {
        self.replies.insert(command.to_string(), Reply::Fail(error));
        self
    }
}

impl<W: ?Sized> CommandInterpreter<W> for ScriptedInterpreter {
    fn execute(
        &mut self,
        ctx: &mut ExecutionContext<'_, W>,
        command: &str,
    ) -> Result<i32, InterpreterError> {
        self.seen.push(command.to_string());
        match self.replies.get(command) {
            Some(Reply::Lines(lines, result)) => {
                for line in lines {
                    ctx.send_feedback(line.clone());
                }
                Ok(*result)
            }
            Some(Reply::Fail(err)) => Err(err.clone()),
            None => Err(InterpreterError::UnknownCommand(command.to_string())),
        }
    }

    fn commands(&self) -> Vec<String> {
        self.replies.keys().cloned().collect()
    }
}
