use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::process::Command;

use crate::payload::Attachment;

/// Outcome of a command run through `jarjar run`.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub command: String,
    /// `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn summary(&self) -> String {
        if self.succeeded() {
            format!("`{}` finished.", self.command)
        } else {
            format!("`{}` failed.", self.command)
        }
    }

    pub fn attachment(&self) -> Attachment {
        let status = match self.exit_code {
            Some(code) => code.to_string(),
            None => "killed by signal".to_string(),
        };
        Attachment::new()
            .with("command", self.command.as_str())
            .with("exit status", status)
            .with("elapsed", format!("{:.2}s", self.elapsed.as_secs_f64()))
    }
}

/// Resolve `program` on PATH, run it with inherited stdio and wait for it.
pub async fn run_command(program: &str, args: &[String]) -> Result<RunReport> {
    let bin = which::which(program).with_context(|| format!("Command '{program}' not found"))?;
    let command = std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");

    tracing::info!(%command, "running");
    let start = Instant::now();
    let status = Command::new(&bin)
        .args(args)
        .status()
        .await
        .with_context(|| format!("Running {}", bin.display()))?;

    let report = RunReport {
        command,
        exit_code: status.code(),
        elapsed: start.elapsed(),
    };
    tracing::info!(exit_code = ?report.exit_code, elapsed = ?report.elapsed, "command finished");
    Ok(report)
}
