//! Per-invocation execution context.

use crate::sink::{CommandSink, CommandSource, PermissionPolicy};
use commandbox_core::{BlockPos, PermissionLevel, Rotation, Vec3};
use tracing::info;

/// Name used when the computer has no label.
pub const DEFAULT_SOURCE_NAME: &str = "@";

/// Everything an interpreter needs to run one command on behalf of a computer.
///
/// Built fresh for every invocation and dropped when the command returns.
pub struct ExecutionContext<'a, W: ?Sized> {
    name: String,
    position: Vec3,
    rotation: Rotation,
    permission_level: PermissionLevel,
    sink: &'a mut CommandSink,
    world: &'a mut W,
}

impl<'a, W: ?Sized> ExecutionContext<'a, W> {
    /// Assemble a context. The source is placed at the centre of `anchor`,
    /// facing [`Rotation::ZERO`], and named after `label` or
    /// [`DEFAULT_SOURCE_NAME`].
    pub fn build(
        label: Option<&str>,
        anchor: BlockPos,
        world: &'a mut W,
        permission_level: PermissionLevel,
        sink: &'a mut CommandSink,
    ) -> Self {
        Self {
            name: label.unwrap_or(DEFAULT_SOURCE_NAME).to_string(),
            position: anchor.center(),
            rotation: Rotation::ZERO,
            permission_level,
            sink,
            world,
        }
    }

    /// Source name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name shown in chat. Identical to [`ExecutionContext::name`].
    pub fn display_name(&self) -> &str {
        &self.name
    }

    /// Source position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Source orientation.
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Tier the command runs with.
    pub fn permission_level(&self) -> PermissionLevel {
        self.permission_level
    }

    /// Policy the output sink reports.
    pub fn policy(&self) -> PermissionPolicy {
        self.sink.policy()
    }

    /// Shared world state.
    pub fn world(&self) -> &W {
        &*self.world
    }

    /// Mutable world state.
    pub fn world_mut(&mut self) -> &mut W {
        &mut *self.world
    }

    /// Report a success line: logged when the policy allows logging,
    /// buffered when it allows feedback.
    pub fn send_feedback(&mut self, line: impl Into<String>) {
        let line = line.into();
        if self.wants_logging() {
            info!(source = %self.name, "{line}");
        }
        if self.wants_feedback() {
            self.sink.record(line);
        }
    }

    /// Report an error line.
    pub fn send_error(&mut self, line: impl Into<String>) {
        if self.wants_errors() {
            self.sink.record(line);
        }
    }
}

impl<W: ?Sized> CommandSource for ExecutionContext<'_, W> {
    fn send_message(&mut self, line: String) {
        self.sink.send_message(line);
    }

    fn wants_feedback(&self) -> bool {
        self.sink.wants_feedback()
    }

    fn wants_errors(&self) -> bool {
        self.sink.wants_errors()
    }

    fn wants_logging(&self) -> bool {
        self.sink.wants_logging()
    }
}
