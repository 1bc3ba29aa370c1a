use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use super::{CommandOutput, Executor, ExitOutcome};

/// Runs commands as local child processes.
pub struct ProcessExecutor;

impl ProcessExecutor {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self { Self }
}

#[async_trait::async_trait]
impl Executor for ProcessExecutor {
    async fn run_command(
        &self,
        program: &str,
        args: &[String],
        work_dir: &Path,
        env: &HashMap<String, String>,
    ) -> CommandOutput {
        let start = Instant::now();
        let mut cmd = tokio::process::Command::new(program);
        cmd.args(args);
        cmd.current_dir(work_dir);
        cmd.stdin(Stdio::null());
        for (k, v) in env {
            cmd.env(k, v);
        }
        let result = cmd.output().await;
        let duration = start.elapsed();
        match result {
            Ok(output) => {
                let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&output.stderr));
                let outcome = if output.status.success() {
                    ExitOutcome::Success
                } else {
                    match output.status.code() {
                        Some(code) => ExitOutcome::Exited { code },
                        None => ExitOutcome::Terminated,
                    }
                };
                CommandOutput { outcome, output: combined, duration }
            }
            Err(e) => CommandOutput {
                outcome: ExitOutcome::LaunchFailed {
                    message: format!("failed to launch {program}: {e}"),
                },
                output: String::new(),
                duration,
            },
        }
    }
}
