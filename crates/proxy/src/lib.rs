#![warn(missing_docs)]
//! Sandboxed command proxy: a command computer that runs textual commands
//! through a host interpreter and buffers everything they print.
//!
//! The pieces compose without inheritance:
//! - [`CommandSink`] buffers output lines under 1-based sequence numbers.
//! - [`PermissionGate`] decides whether an actor may use a computer at all.
//! - [`ExecutionContext`] is the per-invocation bundle handed to a
//!   [`CommandInterpreter`].
//! - [`CommandComputer`] owns one sink and exposes the command API.

mod computer;
mod context;
mod gate;
mod sink;

pub use computer::{
    CommandComputer, CommandInterpreter, ComputerSettings, ExecOutcome, InterpreterError,
    TaskComplete,
};
pub use context::{ExecutionContext, DEFAULT_SOURCE_NAME};
pub use gate::{
    authorize, Actor, CommandHost, Denial, PermissionGate, Rights, DEFAULT_INTERACT_RANGE,
};
pub use sink::{CommandSink, CommandSource, PermissionPolicy, PolicySource};
