use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use gx_core::{Execution, GradleTask, TestType};
use thiserror::Error;

use super::types::*;

const SETTINGS_FILES: &[&str] = &["settings.gradle", "settings.gradle.kts"];

/// Reasons a run is refused before anything is launched. These end up as
/// the failed result's error message.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("executor only supports git-dir based tests")]
    FileContent,

    #[error("execution content has no repository")]
    MissingRepository,

    #[error("no settings.gradle or settings.gradle.kts found")]
    NoSettings,

    #[error(transparent)]
    InvalidTestType(#[from] gx_core::Error),
}

/// `<data_dir>/repo/<rel>`. Leading separators in `rel` do not escape the
/// checkout root.
pub fn repo_path(data_dir: &Path, rel: &str) -> PathBuf {
    let mut path = data_dir.join("repo");
    for component in Path::new(rel).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::ParentDir => path.push(".."),
            _ => {}
        }
    }
    path
}

fn is_missing(path: &Path) -> bool {
    matches!(std::fs::metadata(path), Err(e) if e.kind() == ErrorKind::NotFound)
}

/// Work out where and how Gradle is launched for `execution`.
///
/// `variables` is the already materialized variable environment; the
/// execution's raw `envs` are laid over it.
pub fn resolve_plan(
    data_dir: &Path,
    execution: &Execution,
    variables: HashMap<String, String>,
) -> Result<RunPlan, PlanError> {
    if execution.content.is_file() {
        return Err(PlanError::FileContent);
    }
    let repository = execution
        .content
        .repository
        .as_ref()
        .ok_or(PlanError::MissingRepository)?;

    let project_dir = repo_path(data_dir, &repository.path);
    if SETTINGS_FILES.iter().all(|f| is_missing(&project_dir.join(f))) {
        return Err(PlanError::NoSettings);
    }

    let executable = if std::fs::metadata(project_dir.join(WRAPPER_SCRIPT)).is_ok() {
        Executable::Wrapper
    } else {
        Executable::Gradle
    };

    let mut env = variables;
    env.extend(execution.envs.iter().map(|(k, v)| (k.clone(), v.clone())));

    let test_type: TestType = execution.test_type.parse()?;

    let mut args = vec![NO_DAEMON_FLAG.to_string()];
    args.extend(execution.args.iter().cloned());
    if let GradleTask::Named(task) = &test_type.task {
        args.push(task.clone());
    }

    let work_dir = if !repository.working_dir.is_empty() && repository.working_dir != repository.path {
        args.push("-p".to_string());
        args.push(project_dir.display().to_string());
        repo_path(data_dir, &repository.working_dir)
    } else {
        project_dir.clone()
    };

    Ok(RunPlan {
        project_dir,
        work_dir,
        executable,
        args,
        task: test_type.task,
        env,
    })
}
