use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::Error;

// ── Content ──
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    String,
    FileUri,
    GitFile,
    GitDir,
    Git,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::String => "string",
            Self::FileUri => "file-uri",
            Self::GitFile => "git-file",
            Self::GitDir => "git-dir",
            Self::Git => "git",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    #[serde(default)]
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    /// Checkout-relative path of the Gradle project.
    #[serde(default)]
    pub path: String,
    /// Checkout-relative directory Gradle is launched from, when it differs
    /// from `path`.
    #[serde(default)]
    pub working_dir: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestContent {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl TestContent {
    pub fn git_dir(repository: Repository) -> Self {
        Self {
            content_type: ContentType::GitDir,
            repository: Some(repository),
            data: None,
            uri: None,
        }
    }

    pub fn inline(data: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::String,
            repository: None,
            data: Some(data.into()),
            uri: None,
        }
    }

    /// True for content delivered as a single inline file rather than a
    /// checked-out repository.
    pub fn is_file(&self) -> bool {
        matches!(self.content_type, ContentType::String | ContentType::FileUri)
    }
}

// ── Variables ──
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    #[default]
    Basic,
    Secret,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, rename = "type")]
    pub var_type: VariableType,
}

impl Variable {
    pub fn basic(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into(), var_type: VariableType::Basic }
    }

    pub fn secret(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into(), var_type: VariableType::Secret }
    }

    pub fn is_secret(&self) -> bool {
        self.var_type == VariableType::Secret
    }
}

// ── Execution request ──
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub test_type: String,
    pub content: TestContent,
    #[serde(default)]
    pub envs: BTreeMap<String, String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl Execution {
    pub fn new(test_type: impl Into<String>, content: TestContent) -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            test_type: test_type.into(),
            content,
            envs: BTreeMap::new(),
            args: Vec::new(),
            variables: Vec::new(),
        }
    }
}

// ── Test type ──

/// The Gradle task a test type selects. `Project` runs the build's default
/// tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradleTask {
    Project,
    Named(String),
}

impl GradleTask {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Project => None,
            Self::Named(task) => Some(task),
        }
    }
}

impl std::fmt::Display for GradleTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Project => write!(f, "project"),
            Self::Named(task) => write!(f, "{task}"),
        }
    }
}

/// A parsed `<framework>/<subtype>` test type, e.g. `gradle/test`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestType {
    pub framework: String,
    pub task: GradleTask,
}

impl FromStr for TestType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (framework, subtype) = s
            .split_once('/')
            .ok_or_else(|| Error::InvalidTestType(s.to_string()))?;
        // Only the second component selects the task; anything after a
        // further '/' is ignored.
        let subtype = subtype.split('/').next().unwrap_or_default().trim();
        if framework.trim().is_empty() || subtype.is_empty() {
            return Err(Error::InvalidTestType(s.to_string()));
        }
        let task = if subtype.eq_ignore_ascii_case("project") {
            GradleTask::Project
        } else {
            GradleTask::Named(subtype.to_string())
        };
        Ok(Self { framework: framework.trim().to_string(), task })
    }
}

// ── Execution result ──
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    #[default]
    Pending,
    Passed,
    Failed,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub name: String,
    pub duration: String,
    pub status: ExecutionStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    #[serde(default)]
    pub error_message: String,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub output_type: String,
    #[serde(default)]
    pub steps: Vec<StepResult>,
}

impl ExecutionResult {
    /// Mark the result failed with `message`, keeping whatever output and
    /// steps were already recorded.
    pub fn err(mut self, message: impl Into<String>) -> Self {
        self.status = ExecutionStatus::Failed;
        self.error_message = message.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_named_task() {
        let tt: TestType = "gradle/test".parse().unwrap();
        assert_eq!(tt.framework, "gradle");
        assert_eq!(tt.task, GradleTask::Named("test".into()));
        assert_eq!(tt.task.name(), Some("test"));
    }

    #[test]
    fn test_type_project_is_case_insensitive() {
        for raw in ["gradle/project", "gradle/Project", "gradle/PROJECT"] {
            let tt: TestType = raw.parse().unwrap();
            assert_eq!(tt.task, GradleTask::Project, "{raw}");
            assert_eq!(tt.task.name(), None);
        }
    }

    #[test]
    fn test_type_keeps_task_case() {
        let tt: TestType = "gradle/integrationTest".parse().unwrap();
        assert_eq!(tt.task, GradleTask::Named("integrationTest".into()));
    }

    #[test]
    fn test_type_uses_second_component_only() {
        let tt: TestType = "gradle/test/extra".parse().unwrap();
        assert_eq!(tt.task, GradleTask::Named("test".into()));
    }

    #[test]
    fn test_type_rejects_malformed() {
        for raw in ["gradle", "", "gradle/", "/test", "gradle/ "] {
            let err = raw.parse::<TestType>().unwrap_err();
            assert!(matches!(err, Error::InvalidTestType(_)), "{raw}");
        }
    }

    #[test]
    fn inline_content_is_file() {
        assert!(TestContent::inline("x").is_file());
        let mut uri = TestContent::inline("x");
        uri.content_type = ContentType::FileUri;
        assert!(uri.is_file());
        assert!(!TestContent::git_dir(Repository::default()).is_file());
    }

    #[test]
    fn err_keeps_steps() {
        let result = ExecutionResult {
            status: ExecutionStatus::Passed,
            steps: vec![StepResult {
                name: "s - t".into(),
                duration: "1ms".into(),
                status: ExecutionStatus::Passed,
            }],
            ..Default::default()
        };
        let result = result.err("boom");
        assert_eq!(result.status, ExecutionStatus::Failed);
        assert_eq!(result.error_message, "boom");
        assert_eq!(result.steps.len(), 1);
    }

    #[test]
    fn execution_deserializes_camel_case() {
        let json = r#"{
            "id": "abc",
            "testType": "gradle/test",
            "content": {
                "type": "git-dir",
                "repository": { "uri": "https://example.com/r.git", "path": "hello", "workingDir": "" }
            },
            "envs": { "RUNNER_ENV_TEST": "true" },
            "args": ["--info"],
            "variables": [ { "name": "TOKEN", "value": "s3cr3t", "type": "secret" } ]
        }"#;
        let exec: Execution = serde_json::from_str(json).unwrap();
        assert_eq!(exec.content.content_type, ContentType::GitDir);
        assert_eq!(exec.content.repository.as_ref().unwrap().path, "hello");
        assert_eq!(exec.envs.get("RUNNER_ENV_TEST").map(String::as_str), Some("true"));
        assert!(exec.variables[0].is_secret());
        assert!(exec.name.is_empty());
    }

    #[test]
    fn result_serializes_orchestrator_fields() {
        let result = ExecutionResult::default().err("no settings.gradle or settings.gradle.kts found");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["errorMessage"], "no settings.gradle or settings.gradle.kts found");
        assert_eq!(value["outputType"], "");
        assert!(value["steps"].as_array().unwrap().is_empty());
    }
}
