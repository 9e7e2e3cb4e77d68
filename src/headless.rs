use anyhow::Result;
use std::io::Write;
use tracing::{info, warn};

use crate::command_script::{CommandScriptPlayer, StepResult};
use crate::runtime::Runtime;

pub struct HeadlessConfig {
    pub max_ticks: Option<u64>,
    /// Echo every outcome to stdout.
    pub echo: bool,
}

/// Drive `runtime` from `script` until the script is finished and the queue is
/// empty, or `max_ticks` is reached.
pub fn run<W: Write>(
    runtime: &mut Runtime,
    mut script: CommandScriptPlayer,
    cfg: &HeadlessConfig,
    out: &mut W,
) -> Result<()> {
    loop {
        for step in script.drain_ready_commands(runtime.tick()) {
            match step.dispatch(runtime) {
                StepResult::Ran(outcome) if cfg.echo => {
                    writeln!(out, "> {}", step.command)?;
                    for line in &outcome.output {
                        writeln!(out, "{line}")?;
                    }
                }
                StepResult::Ran(_) | StepResult::Queued(_) => {}
                StepResult::Denied => warn!(command = %step.command, "command denied"),
            }
        }

        if script.is_finished() && runtime.computer.pending_tasks() == 0 {
            break;
        }
        if cfg.max_ticks.is_some_and(|max| runtime.tick().0 >= max) {
            info!(tick = runtime.tick().0, "max ticks reached");
            break;
        }

        for task in runtime.advance() {
            if cfg.echo {
                writeln!(out, "> {} (task {})", task.command, task.id)?;
                for line in &task.outcome.output {
                    writeln!(out, "{line}")?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyConfig;
    use crate::world::{Session, WeatherState};

    fn runtime() -> Runtime {
        let mut config = ProxyConfig {
            enable_command_computers: true,
            ..ProxyConfig::default()
        };
        config.operators.insert("admin".to_string());
        let spawn = config.actor_spawn();
        Runtime::new(&config, Session::new("admin", false, spawn))
    }

    #[test]
    fn script_runs_sync_and_queued_steps() {
        let script = CommandScriptPlayer::from_str(
            r#"{
                "steps": [
                    {"tick": 0, "command": "/time set day"},
                    {"tick": 2, "command": "/weather rain", "async": true}
                ]
            }"#,
        )
        .expect("script parses");
        let mut runtime = runtime();
        let mut out = Vec::new();
        let cfg = HeadlessConfig {
            max_ticks: None,
            echo: true,
        };
        run(&mut runtime, script, &cfg, &mut out).expect("script runs");

        assert_eq!(runtime.tick().0, 3);
        assert_eq!(runtime.world.weather, WeatherState::Rain);
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "> /time set day\nTime set to tick 1000\n> /weather rain (task 1)\nWeather set to Rain\n"
        );
    }

    #[test]
    fn max_ticks_stops_long_scripts() {
        let script = CommandScriptPlayer::from_str(
            r#"{"steps": [{"tick": 100, "command": "/summon cow"}]}"#,
        )
        .expect("script parses");
        let mut runtime = runtime();
        let cfg = HeadlessConfig {
            max_ticks: Some(5),
            echo: false,
        };
        run(&mut runtime, script, &cfg, &mut std::io::sink()).expect("script runs");
        assert_eq!(runtime.tick().0, 5);
        assert!(runtime.world.mobs.is_empty());
    }
}
