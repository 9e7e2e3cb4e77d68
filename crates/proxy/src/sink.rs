//! Buffered command output.

use std::collections::BTreeMap;

/// Host rules deciding which command output a source wants to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionPolicy {
    /// Successful command feedback is delivered (`sendCommandFeedback`).
    pub feedback_enabled: bool,
    /// Command results are broadcast to the server log (`commandBlockOutput`).
    pub logging_enabled: bool,
}

impl Default for PermissionPolicy {
    fn default() -> Self {
        Self {
            feedback_enabled: true,
            logging_enabled: true,
        }
    }
}

/// Read-only provider of the current [`PermissionPolicy`].
pub trait PolicySource {
    /// Policy in force right now.
    fn policy(&self) -> PermissionPolicy;
}

impl PolicySource for PermissionPolicy {
    fn policy(&self) -> PermissionPolicy {
        *self
    }
}

/// Recipient of text produced by a command interpreter.
pub trait CommandSource {
    /// Deliver one line of output.
    fn send_message(&mut self, line: String);

    /// Whether successful feedback should be delivered.
    fn wants_feedback(&self) -> bool;

    /// Whether errors should be delivered.
    fn wants_errors(&self) -> bool;

    /// Whether results should also be written to the server log.
    fn wants_logging(&self) -> bool;
}

/// Ordered output buffer owned by a single command computer.
///
/// Lines are keyed `1..=n` in arrival order; numbering restarts after
/// [`CommandSink::clear`].
#[derive(Debug, Clone, Default)]
pub struct CommandSink {
    output: BTreeMap<u32, String>,
    policy: PermissionPolicy,
}

impl CommandSink {
    /// Create an empty sink governed by `policy`.
    pub fn new(policy: PermissionPolicy) -> Self {
        Self {
            output: BTreeMap::new(),
            policy,
        }
    }

    /// Drop every buffered line.
    pub fn clear(&mut self) {
        self.output.clear();
    }

    /// Append `line` at the next sequence number.
    pub fn record(&mut self, line: impl Into<String>) {
        let seq = self.output.len() as u32 + 1;
        self.output.insert(seq, line.into());
    }

    /// Live view of the buffer.
    pub fn read(&self) -> &BTreeMap<u32, String> {
        &self.output
    }

    /// Independent copy of the buffer.
    pub fn snapshot(&self) -> BTreeMap<u32, String> {
        self.output.clone()
    }

    /// Buffered lines in sequence order.
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.output.values().map(String::as_str)
    }

    /// Number of buffered lines.
    pub fn len(&self) -> usize {
        self.output.len()
    }

    /// Whether nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Policy the sink currently reports.
    pub fn policy(&self) -> PermissionPolicy {
        self.policy
    }

    /// Replace the policy, typically refreshed from the host before a run.
    pub fn set_policy(&mut self, policy: PermissionPolicy) {
        self.policy = policy;
    }
}

impl CommandSource for CommandSink {
    fn send_message(&mut self, line: String) {
        self.record(line);
    }

    fn wants_feedback(&self) -> bool {
        self.policy.feedback_enabled
    }

    // Errors are always surfaced, independent of the host rules.
    fn wants_errors(&self) -> bool {
        true
    }

    fn wants_logging(&self) -> bool {
        self.policy.logging_enabled
    }
}
