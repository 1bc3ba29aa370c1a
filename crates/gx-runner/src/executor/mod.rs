pub mod process;

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// How a spawned command ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    Success,
    /// The process ran and exited with a non-zero code.
    Exited { code: i32 },
    /// The process ran but was stopped without an exit code (e.g. a signal).
    Terminated,
    /// The process could not be started at all.
    LaunchFailed { message: String },
}

impl ExitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Exited { .. } => "exited",
            Self::Terminated => "terminated",
            Self::LaunchFailed { .. } => "launch-failed",
        }
    }
}

impl std::fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "exit status 0"),
            Self::Exited { code } => write!(f, "exit status {code}"),
            Self::Terminated => write!(f, "process terminated without an exit status"),
            Self::LaunchFailed { message } => write!(f, "{message}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub outcome: ExitOutcome,
    /// Combined stdout and stderr.
    pub output: String,
    pub duration: Duration,
}

#[async_trait::async_trait]
pub trait Executor: Send + Sync {
    /// Run `program` with `args` in `work_dir`. `env` is overlaid on the
    /// inherited environment of the child only.
    async fn run_command(
        &self,
        program: &str,
        args: &[String],
        work_dir: &Path,
        env: &HashMap<String, String>,
    ) -> CommandOutput;
}
