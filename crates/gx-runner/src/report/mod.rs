pub mod duration;
pub mod junit;

use std::path::{Path, PathBuf};

use gx_core::{ExecutionStatus, StepResult};
use tracing::debug;
use walkdir::WalkDir;

use self::junit::{JunitStatus, Suite};

/// Collapse a JUnit status onto the two step statuses the orchestrator
/// shows. Skipped and errored tests count as failed.
pub fn map_status(status: JunitStatus) -> ExecutionStatus {
    match status {
        JunitStatus::Passed => ExecutionStatus::Passed,
        JunitStatus::Skipped | JunitStatus::Failed | JunitStatus::Error => ExecutionStatus::Failed,
    }
}

pub fn suite_steps(suite: &Suite) -> impl Iterator<Item = StepResult> + '_ {
    suite.tests.iter().map(move |test| StepResult {
        name: format!("{} - {}", suite.name, test.name),
        duration: duration::humanize(test.duration),
        status: map_status(test.status),
    })
}

/// Walk `root` and append one step per test case found in `*.xml` reports.
///
/// Reports that fail to parse are skipped. A traversal error stops the walk
/// and is returned; steps appended before it stay in `steps`.
pub fn collect_steps_into(root: &Path, steps: &mut Vec<StepResult>) -> Result<(), walkdir::Error> {
    let files = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        });
    append_reports(files, steps)
}

/// Parse `*.xml` files in the order given, stopping at the first error.
pub fn append_reports<I, E>(files: I, steps: &mut Vec<StepResult>) -> Result<(), E>
where
    I: IntoIterator<Item = Result<PathBuf, E>>,
{
    for file in files {
        let path = file?;
        if path.extension().and_then(|e| e.to_str()) != Some("xml") {
            continue;
        }
        match junit::parse_file(&path) {
            Ok(suites) => {
                for suite in &suites {
                    steps.extend(suite_steps(suite));
                }
            }
            Err(e) => debug!(path = %path.display(), error = %e, "skipping unreadable report"),
        }
    }
    Ok(())
}

pub fn collect_steps(root: &Path) -> Result<Vec<StepResult>, walkdir::Error> {
    let mut steps = Vec::new();
    collect_steps_into(root, &mut steps)?;
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn report(suite: &str, test: &str, outcome: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuite name="{suite}" tests="1"><testcase name="{test}" classname="{suite}" time="0.5">{outcome}</testcase></testsuite>"#
        )
    }

    #[test]
    fn test_map_status_collapses_non_passing() {
        assert_eq!(map_status(JunitStatus::Passed), ExecutionStatus::Passed);
        assert_eq!(map_status(JunitStatus::Failed), ExecutionStatus::Failed);
        assert_eq!(map_status(JunitStatus::Skipped), ExecutionStatus::Failed);
        assert_eq!(map_status(JunitStatus::Error), ExecutionStatus::Failed);
    }

    #[test]
    fn test_collects_nested_reports_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("test")).unwrap();
        fs::create_dir_all(root.join("integrationTest")).unwrap();
        fs::write(root.join("test/TEST-b.xml"), report("B", "second", "<failure/>")).unwrap();
        fs::write(root.join("test/TEST-a.xml"), report("A", "first", "")).unwrap();
        fs::write(root.join("integrationTest/TEST-c.xml"), report("C", "third", "<skipped/>")).unwrap();

        let steps = collect_steps(root).unwrap();
        let names: Vec<_> = steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["C - third", "A - first", "B - second"]);
        assert_eq!(steps[0].status, ExecutionStatus::Failed);
        assert_eq!(steps[1].status, ExecutionStatus::Passed);
        assert_eq!(steps[1].duration, "500ms");
        assert_eq!(steps[2].status, ExecutionStatus::Failed);
    }

    #[test]
    fn test_skips_malformed_and_non_xml_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("TEST-ok.xml"), report("S", "t", "")).unwrap();
        fs::write(root.join("TEST-broken.xml"), "<testsuite name=\"x\"><testcase").unwrap();
        fs::write(root.join("output.bin"), [0u8, 159, 146, 150]).unwrap();
        fs::write(root.join("notes.XML"), report("Upper", "t", "")).unwrap();

        let steps = collect_steps(root).unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "S - t");
    }

    #[test]
    fn test_missing_root_is_walk_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut steps = Vec::new();
        let err = collect_steps_into(&dir.path().join("absent"), &mut steps);
        assert!(err.is_err());
        assert!(steps.is_empty());
    }

    #[test]
    fn test_walk_error_keeps_earlier_steps() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("TEST-a.xml"), report("A", "first", "")).unwrap();
        fs::write(root.join("TEST-b.xml"), report("B", "second", "")).unwrap();

        let files = vec![
            Ok(root.join("TEST-a.xml")),
            Err("permission denied"),
            Ok(root.join("TEST-b.xml")),
        ];
        let mut steps = Vec::new();
        let err = append_reports(files, &mut steps).unwrap_err();
        assert_eq!(err, "permission denied");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "A - first");

        let result = gx_core::ExecutionResult { steps, ..Default::default() }.err(err);
        assert_eq!(result.status, ExecutionStatus::Failed);
        assert_eq!(result.error_message, "permission denied");
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.steps[0].status, ExecutionStatus::Passed);
    }
}
