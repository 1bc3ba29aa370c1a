use std::collections::HashMap;
use std::path::PathBuf;

use gx_core::GradleTask;

pub const GRADLE_COMMAND: &str = "gradle";
pub const WRAPPER_SCRIPT: &str = "gradlew";
pub const NO_DAEMON_FLAG: &str = "--no-daemon";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Executable {
    /// A `gradle` found on the host's `PATH`.
    Gradle,
    /// The project's own `gradlew`.
    Wrapper,
}

impl Executable {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gradle => GRADLE_COMMAND,
            Self::Wrapper => "./gradlew",
        }
    }
}

/// Everything needed to launch one Gradle run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    /// Directory holding `settings.gradle(.kts)`; reports are read from here.
    pub project_dir: PathBuf,
    /// Directory the process is started in.
    pub work_dir: PathBuf,
    pub executable: Executable,
    pub args: Vec<String>,
    pub task: GradleTask,
    pub env: HashMap<String, String>,
}

impl RunPlan {
    /// The program to spawn. The wrapper is addressed relative to the
    /// process directory, or by absolute path when that is not the project.
    /// A bare `./gradlew` launched from a separate working directory would
    /// pick up that directory's wrapper, or none, instead of the detected one.
    pub fn program(&self) -> String {
        match self.executable {
            Executable::Gradle => GRADLE_COMMAND.to_string(),
            Executable::Wrapper if self.work_dir == self.project_dir => {
                Executable::Wrapper.as_str().to_string()
            }
            Executable::Wrapper => self.project_dir.join(WRAPPER_SCRIPT).display().to_string(),
        }
    }

    pub fn report_dir(&self) -> PathBuf {
        self.project_dir.join("build").join("test-results")
    }
}
