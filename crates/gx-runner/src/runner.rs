use std::io::ErrorKind;

use gx_core::{Error, Execution, ExecutionResult, ExecutionStatus, Result};
use tracing::{info, warn};

use crate::config::RunnerConfig;
use crate::executor::process::ProcessExecutor;
use crate::executor::{Executor, ExitOutcome};
use crate::plan::resolve_plan;
use crate::report;
use crate::secret::EnvManager;

/// Error message reported when Gradle ran but exited non-zero.
pub const BUILD_FAILED_MESSAGE: &str = "build failed with an exception";

pub const OUTPUT_TYPE_TEXT: &str = "text/plain";

/// Runs Gradle builds for executions and turns their JUnit reports into
/// step results.
pub struct GradleRunner {
    config: RunnerConfig,
    executor: Box<dyn Executor>,
}

impl GradleRunner {
    pub fn new(config: RunnerConfig, executor: Box<dyn Executor>) -> Self {
        info!("preparing test runner");
        Self { config, executor }
    }

    pub fn with_process_executor(config: RunnerConfig) -> Self {
        Self::new(config, Box::new(ProcessExecutor::new()))
    }

    /// Run one execution.
    ///
    /// `Err` means the executor itself is misconfigured (the data directory
    /// is missing) and no result should be reported. Every build-level
    /// problem comes back as a failed `ExecutionResult` instead.
    pub async fn run(&self, execution: &Execution) -> Result<ExecutionResult> {
        info!(execution = %execution.id, name = %execution.name, "preparing for test run");

        let data_dir = &self.config.data_dir;
        if let Err(e) = tokio::fs::metadata(data_dir).await {
            if e.kind() == ErrorKind::NotFound {
                warn!("data directory {} does not exist", data_dir.display());
                return Err(Error::DataDirNotFound(data_dir.clone()));
            }
        }

        let mut env_manager = EnvManager::new(execution.variables.clone());
        env_manager.resolve_secrets();

        let mut result = ExecutionResult::default();

        let plan = match resolve_plan(data_dir, execution, env_manager.env()) {
            Ok(plan) => plan,
            Err(e) => {
                warn!("{e}");
                return Ok(result.err(e.to_string()));
            }
        };

        let program = plan.program();
        info!(
            task = %plan.task,
            program = %program,
            args = ?plan.args,
            project_dir = %plan.project_dir.display(),
            work_dir = %plan.work_dir.display(),
            "running gradle"
        );
        let out = self
            .executor
            .run_command(&program, &plan.args, &plan.work_dir, &plan.env)
            .await;
        let output = env_manager.obfuscate(&out.output);

        match &out.outcome {
            ExitOutcome::Success => {
                info!(duration = ?out.duration, "test execution passed");
                result.status = ExecutionStatus::Passed;
            }
            ExitOutcome::Exited { code } => {
                // A non-zero exit usually means failing tests; reports may
                // still be there.
                warn!(code, duration = ?out.duration, "test execution failed");
                result.status = ExecutionStatus::Failed;
                result.error_message = BUILD_FAILED_MESSAGE.to_string();
            }
            ExitOutcome::Terminated | ExitOutcome::LaunchFailed { .. } => {
                let message = env_manager.obfuscate(&out.outcome.to_string());
                warn!(outcome = out.outcome.as_str(), "gradle did not run to completion: {message}");
                return Ok(result.err(message));
            }
        }

        result.output = output;
        result.output_type = OUTPUT_TYPE_TEXT.to_string();

        let report_dir = plan.report_dir();
        if let Err(e) = report::collect_steps_into(&report_dir, &mut result.steps) {
            warn!("could not process reports in {}: {e}", report_dir.display());
            return Ok(result.err(e.to_string()));
        }

        info!(steps = result.steps.len(), status = %result.status, "test run finished");
        Ok(result)
    }
}
