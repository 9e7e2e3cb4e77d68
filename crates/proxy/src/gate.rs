//! Decides whether an actor may use a command computer.

use commandbox_core::{BlockPos, Vec3};
use std::fmt;
use tracing::debug;

/// Default interaction reach, in blocks.
pub const DEFAULT_INTERACT_RANGE: f64 = 8.0;

/// Why an actor was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Denial {
    /// Command execution is disabled server-wide (or there is no server).
    NotEnabled,
    /// The actor lacks the right the current policy asks for.
    NotAllowed,
}

impl Denial {
    /// Translation key a client renders the status message from.
    pub fn translation_key(self) -> &'static str {
        match self {
            Self::NotEnabled => "advMode.notEnabled",
            Self::NotAllowed => "advMode.notAllowed",
        }
    }

    /// Untranslated fallback text.
    pub fn message(self) -> &'static str {
        match self {
            Self::NotEnabled => "feature not enabled",
            Self::NotAllowed => "not permitted",
        }
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Someone trying to use a command computer.
pub trait Actor {
    /// Profile name, used for the server's command-rights lookup.
    fn name(&self) -> &str;

    /// Whether the actor holds the elevated role (creative mode in a game host).
    fn has_elevated_role(&self) -> bool;

    /// Current position, used for the reach check.
    fn position(&self) -> Vec3;

    /// Dead or disconnected actors never pass the reach check.
    fn is_alive(&self) -> bool {
        true
    }

    /// Show a transient status line to the actor. Never persisted.
    fn send_status_message(&mut self, denial: Denial);
}

/// Server-side command configuration.
pub trait CommandHost {
    /// Whether command execution is enabled at all.
    fn commands_enabled(&self) -> bool;

    /// Whether the named actor may send commands (operator list lookup).
    fn can_send_commands(&self, actor: &str) -> bool;
}

/// Flattened inputs to [`authorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rights {
    /// Server-wide command execution switch.
    pub server_commands_enabled: bool,
    /// Policy demands the elevated role instead of general send rights.
    pub requires_elevated_role: bool,
    /// Actor holds the elevated role.
    pub has_elevated_role: bool,
    /// Actor may send commands.
    pub can_send_commands: bool,
}

/// Pure authorization predicate.
pub fn authorize(rights: Rights) -> Result<(), Denial> {
    if !rights.server_commands_enabled {
        return Err(Denial::NotEnabled);
    }
    let permitted = if rights.requires_elevated_role {
        rights.has_elevated_role
    } else {
        rights.can_send_commands
    };
    if !permitted {
        return Err(Denial::NotAllowed);
    }
    Ok(())
}

/// Stateless gate configured with the host's command policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PermissionGate {
    require_elevated_role: bool,
    interact_range: f64,
}

impl Default for PermissionGate {
    fn default() -> Self {
        Self::new(false)
    }
}

impl PermissionGate {
    /// Create a gate. When `require_elevated_role` is set, actors need the
    /// elevated role rather than operator send rights.
    pub fn new(require_elevated_role: bool) -> Self {
        Self {
            require_elevated_role,
            interact_range: DEFAULT_INTERACT_RANGE,
        }
    }

    /// Override the reach used by [`PermissionGate::within_reach`].
    pub fn with_interact_range(mut self, range: f64) -> Self {
        self.interact_range = range.max(0.0);
        self
    }

    /// Whether the elevated role is required.
    pub fn requires_elevated_role(&self) -> bool {
        self.require_elevated_role
    }

    /// Evaluate the policy without side effects.
    pub fn check<A: Actor + ?Sized>(
        &self,
        actor: &A,
        host: Option<&dyn CommandHost>,
    ) -> Result<(), Denial> {
        let Some(host) = host else {
            return Err(Denial::NotEnabled);
        };
        // Only consult the rights the policy actually asks about.
        let (has_elevated_role, can_send_commands) = if self.require_elevated_role {
            (actor.has_elevated_role(), false)
        } else {
            (false, host.can_send_commands(actor.name()))
        };
        authorize(Rights {
            server_commands_enabled: host.commands_enabled(),
            requires_elevated_role: self.require_elevated_role,
            has_elevated_role,
            can_send_commands,
        })
    }

    /// Evaluate the policy; on denial, tell the actor why and return false.
    pub fn is_usable<A: Actor + ?Sized>(
        &self,
        actor: &mut A,
        host: Option<&dyn CommandHost>,
    ) -> bool {
        match self.check(actor, host) {
            Ok(()) => true,
            Err(denial) => {
                debug!(actor = actor.name(), %denial, "command computer use denied");
                actor.send_status_message(denial);
                false
            }
        }
    }

    /// Whether the actor is alive and close enough to `anchor`.
    pub fn within_reach<A: Actor + ?Sized>(
        &self,
        actor: &A,
        anchor: BlockPos,
        ignore_range: bool,
    ) -> bool {
        if !actor.is_alive() {
            return false;
        }
        ignore_range
            || actor.position().distance_squared(anchor.center())
                <= self.interact_range * self.interact_range
    }

    /// Policy check followed by the reach check. The reach check is skipped
    /// once the policy denies.
    pub fn is_usable_within<A: Actor + ?Sized>(
        &self,
        actor: &mut A,
        host: Option<&dyn CommandHost>,
        anchor: BlockPos,
        ignore_range: bool,
    ) -> bool {
        self.is_usable(actor, host) && self.within_reach(actor, anchor, ignore_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Player {
        name: &'static str,
        elevated: bool,
        position: Vec3,
        alive: bool,
        status: Vec<Denial>,
    }

    impl Player {
        fn at(position: Vec3) -> Self {
            Self {
                name: "steve",
                elevated: false,
                position,
                alive: true,
                status: Vec::new(),
            }
        }
    }

    impl Actor for Player {
        fn name(&self) -> &str {
            self.name
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

    struct Server {
        enabled: bool,
        ops: &'static [&'static str],
    }

    impl CommandHost for Server {
        fn commands_enabled(&self) -> bool {
            self.enabled
        }

        fn can_send_commands(&self, actor: &str) -> bool {
            self.ops.iter().any(|op| *op == actor)
        }
    }

    #[test]
    fn authorize_checks_server_switch_first() {
        let rights = Rights {
            server_commands_enabled: false,
            requires_elevated_role: false,
            has_elevated_role: true,
            can_send_commands: true,
        };
        assert_eq!(authorize(rights), Err(Denial::NotEnabled));
    }

    #[test]
    fn elevated_policy_ignores_send_rights() {
        let rights = Rights {
            server_commands_enabled: true,
            requires_elevated_role: true,
            has_elevated_role: false,
            can_send_commands: true,
        };
        assert_eq!(authorize(rights), Err(Denial::NotAllowed));
    }

    #[test]
    fn missing_server_is_reported_as_not_enabled() {
        let gate = PermissionGate::default();
        let mut player = Player::at(Vec3::ZERO);
        assert!(!gate.is_usable(&mut player, None));
        assert_eq!(player.status, vec![Denial::NotEnabled]);
    }

    #[test]
    fn operators_pass_the_default_policy() {
        let gate = PermissionGate::default();
        let server = Server {
            enabled: true,
            ops: &["steve"],
        };
        let mut player = Player::at(Vec3::ZERO);
        assert!(gate.is_usable(&mut player, Some(&server)));
        assert!(player.status.is_empty());
    }

    #[test]
    fn reach_is_measured_from_the_block_center() {
        let gate = PermissionGate::default();
        let anchor = BlockPos::new(0, 0, 0);
        let near = Player::at(Vec3::new(8.5, 0.5, 0.5));
        let far = Player::at(Vec3::new(8.6, 0.5, 0.5));
        assert!(gate.within_reach(&near, anchor, false));
        assert!(!gate.within_reach(&far, anchor, false));
        assert!(gate.within_reach(&far, anchor, true));
    }

    #[test]
    fn dead_actors_are_never_in_reach() {
        let gate = PermissionGate::default();
        let mut player = Player::at(Vec3::new(0.5, 0.5, 0.5));
        player.alive = false;
        assert!(!gate.within_reach(&player, BlockPos::default(), true));
    }

    #[test]
    fn reach_is_not_checked_after_a_denial() {
        let gate = PermissionGate::new(true);
        let server = Server {
            enabled: true,
            ops: &[],
        };
        let mut player = Player::at(Vec3::new(100.0, 0.0, 0.0));
        assert!(!gate.is_usable_within(&mut player, Some(&server), BlockPos::default(), false));
        assert_eq!(player.status, vec![Denial::NotAllowed]);
    }

    #[test]
    fn denial_keys_and_messages() {
        assert_eq!(Denial::NotEnabled.translation_key(), "advMode.notEnabled");
        assert_eq!(Denial::NotAllowed.to_string(), "not permitted");
    }
}
