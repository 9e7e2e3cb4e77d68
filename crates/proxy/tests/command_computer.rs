//! Command computer scenarios driven through the testkit fakes.

use commandbox_core::{BlockPos, PermissionLevel, SimTick, Vec3};
use commandbox_proxy::{
    CommandComputer, ComputerSettings, Denial, InterpreterError, PermissionGate,
    PermissionPolicy,
};
use commandbox_testkit::{FakeActor, FakeHost, ScriptedInterpreter};

fn computer(require_elevated: bool) -> CommandComputer {
    let settings = ComputerSettings {
        permission_level: PermissionLevel::GAME_MASTER,
        gate: PermissionGate::new(require_elevated),
    };
    CommandComputer::new(3, BlockPos::new(10, 64, -4), settings)
}

#[test]
fn empty_computer_exposes_empty_output() {
    let computer = computer(false);
    assert!(computer.copy_output().is_empty());
    assert!(computer.output().is_empty());
    assert_eq!(computer.position(), BlockPos::new(10, 64, -4));
}

#[test]
fn operator_runs_commands_and_reads_output() {
    let mut computer = computer(false);
    let host = FakeHost::enabled().with_operator("alex");
    let mut actor = FakeActor::new("alex").at(Vec3::new(10.0, 64.0, -4.0));
    let mut interpreter = ScriptedInterpreter::default().reply(
        "/time set day",
        &["Time set to tick 1000"],
        1,
    );
    let mut policy = PermissionPolicy::default();

    assert!(computer.is_usable(&mut actor, Some(&host), false));
    let outcome = computer
        .exec_for(&mut actor, Some(&host), &mut interpreter, &mut policy, "/time set day")
        .expect("operator is allowed");

    assert!(outcome.success);
    assert_eq!(outcome.output, vec!["Time set to tick 1000".to_string()]);
    assert_eq!(
        computer.output().get(&1).map(String::as_str),
        Some("Time set to tick 1000")
    );
    assert!(actor.status.is_empty());
}

#[test]
fn denied_actor_never_reaches_the_interpreter() {
    let mut computer = computer(true);
    let host = FakeHost::enabled().with_operator("alex");
    let mut actor = FakeActor::new("alex");
    let mut interpreter = ScriptedInterpreter::default().reply("/help", &["Commands:"], 1);
    let mut policy = PermissionPolicy::default();

    let outcome = computer.exec_for(&mut actor, Some(&host), &mut interpreter, &mut policy, "/help");
    assert!(outcome.is_none());
    assert!(interpreter.seen.is_empty());
    assert_eq!(actor.status, vec![Denial::NotAllowed]);
}

#[test]
fn feedback_rule_suppresses_success_lines_but_not_errors() {
    let mut computer = computer(false);
    let mut interpreter = ScriptedInterpreter::default()
        .reply("/weather rain", &["Weather set to Rain"], 1)
        .fail(
            "/weather hail",
            InterpreterError::Syntax("Usage: /weather <clear|rain|thunder>".into()),
        );
    let mut policy = PermissionPolicy {
        feedback_enabled: false,
        logging_enabled: true,
    };

    let quiet = computer.exec(&mut interpreter, &mut policy, "/weather rain");
    assert!(quiet.success);
    assert!(quiet.output.is_empty());

    let loud = computer.exec(&mut interpreter, &mut policy, "/weather hail");
    assert!(!loud.success);
    assert_eq!(
        loud.output,
        vec!["Usage: /weather <clear|rain|thunder>".to_string()]
    );
}

#[test]
fn unknown_commands_report_their_name() {
    let mut computer = computer(false);
    let mut interpreter = ScriptedInterpreter::default();
    let mut policy = PermissionPolicy::default();

    let outcome = computer.exec(&mut interpreter, &mut policy, "/fly");
    assert_eq!(outcome.output, vec!["Unknown command: /fly".to_string()]);
    assert_eq!(outcome.result, 0);
}

#[test]
fn async_commands_run_on_the_next_tick() {
    let mut computer = computer(false);
    let mut interpreter = ScriptedInterpreter::default()
        .reply("a", &["first"], 1)
        .reply("b", &["second", "third"], 2);
    let mut policy = PermissionPolicy::default();

    let first = computer.exec_async("a");
    let second = computer.exec_async("b");
    assert!(interpreter.seen.is_empty());

    let done = computer.tick(&mut interpreter, &mut policy, SimTick(9));
    assert_eq!(interpreter.seen, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(done.iter().map(|task| task.id).collect::<Vec<_>>(), vec![first, second]);
    assert_eq!(done[1].outcome.output, vec!["second".to_string(), "third".to_string()]);
    assert_eq!(done[1].outcome.result, 2);

    // The live buffer holds the last task's output.
    assert_eq!(computer.output().len(), 2);
    assert!(computer.tick(&mut interpreter, &mut policy, SimTick(10)).is_empty());
}

#[test]
fn out_of_reach_actor_is_rejected_without_a_status_message() {
    let computer = computer(false);
    let host = FakeHost::enabled().with_operator("alex");
    let mut actor = FakeActor::new("alex").at(Vec3::new(100.0, 64.0, 100.0));

    assert!(!computer.is_usable(&mut actor, Some(&host), false));
    assert!(computer.is_usable(&mut actor, Some(&host), true));
    assert!(actor.status.is_empty());
}
