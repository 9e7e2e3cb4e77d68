//! Line-oriented console: one command per line, output echoed back.

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::runtime::Runtime;
use crate::world::TICKS_PER_DAY;

/// Upper bound for a single `.ticks N` request.
const MAX_TICKS_PER_STEP: u64 = TICKS_PER_DAY;

/// Read commands from `input` until EOF and write results to `out`.
///
/// Lines starting with `&` are queued and complete on the next line read.
/// `.ticks N` advances the clock (at most one day per line), `.list` prints
/// the command set.
pub fn run<R: BufRead, W: Write>(runtime: &mut Runtime, input: R, out: &mut W) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        let line = line.trim();

        report_completed(runtime, out)?;
        if line.is_empty() {
            continue;
        }

        let mut words = line.split_whitespace();
        if words.next() == Some(".ticks") {
            let count = words
                .next()
                .and_then(|count| count.parse::<u64>().ok())
                .unwrap_or(1)
                .min(MAX_TICKS_PER_STEP);
            for _ in 0..count {
                report_completed(runtime, out)?;
            }
            continue;
        }
        if line == ".list" {
            writeln!(out, "{}", runtime.command_names().join(" "))?;
            continue;
        }

        if let Some(command) = line.strip_prefix('&') {
            match runtime.queue(command.trim()) {
                Some(id) => writeln!(out, "queued task {id}")?,
                None => report_denial(runtime, out)?,
            }
            continue;
        }

        match runtime.submit(line) {
            Some(outcome) => {
                for line in &outcome.output {
                    writeln!(out, "{line}")?;
                }
                writeln!(
                    out,
                    "{} ({})",
                    if outcome.success { "ok" } else { "failed" },
                    outcome.result
                )?;
            }
            None => report_denial(runtime, out)?,
        }
    }
    report_completed(runtime, out)?;
    Ok(())
}

fn report_completed<W: Write>(runtime: &mut Runtime, out: &mut W) -> Result<()> {
    for task in runtime.advance() {
        writeln!(
            out,
            "task {} {}: {}",
            task.id,
            if task.outcome.success { "ok" } else { "failed" },
            task.outcome.output.join(" | ")
        )?;
    }
    Ok(())
}

fn report_denial<W: Write>(runtime: &Runtime, out: &mut W) -> Result<()> {
    match runtime.session.last_status() {
        Some(denial) => writeln!(out, "denied: {denial}")?,
        None => writeln!(out, "denied")?,
    }
    Ok(())
}
