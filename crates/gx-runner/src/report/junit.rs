//! Minimal JUnit XML reader covering what Gradle's test task writes.

use std::path::Path;
use std::time::Duration;

use quick_xml::events::attributes::AttrError;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JunitError {
    #[error("failed to read report: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attr(#[from] AttrError),

    #[error("report ended inside <{0}>")]
    Truncated(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JunitStatus {
    Passed,
    Skipped,
    Failed,
    Error,
}

impl JunitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
            Self::Error => "error",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Passed => 0,
            Self::Skipped => 1,
            Self::Failed => 2,
            Self::Error => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub name: String,
    pub classname: String,
    pub duration: Duration,
    pub status: JunitStatus,
    /// Message of the `<failure>`, `<error>` or `<skipped>` element, if any.
    pub message: Option<String>,
    pub system_out: String,
    pub system_err: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Suite {
    pub name: String,
    pub package: String,
    pub duration: Duration,
    pub tests: Vec<TestCase>,
    pub system_out: String,
    pub system_err: String,
}

pub fn parse_file(path: &Path) -> Result<Vec<Suite>, JunitError> {
    let content = std::fs::read_to_string(path)?;
    parse_str(&content)
}

#[derive(Clone, Copy)]
enum TextTarget {
    None,
    SuiteOut,
    SuiteErr,
    TestOut,
    TestErr,
    TestOutcome,
}

/// Parse a JUnit document. Both a `<testsuites>` root and a bare
/// `<testsuite>` root are accepted; nested suites are flattened in document
/// order. A document without suites yields an empty list.
pub fn parse_str(xml: &str) -> Result<Vec<Suite>, JunitError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut suites: Vec<Suite> = Vec::new();
    let mut open_suites: Vec<usize> = Vec::new();
    let mut current: Option<TestCase> = None;
    let mut target = TextTarget::None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"testsuite" => {
                    suites.push(suite_from(&e)?);
                    open_suites.push(suites.len() - 1);
                }
                b"testcase" if !open_suites.is_empty() => current = Some(test_from(&e)?),
                b"failure" | b"error" | b"skipped" => {
                    if let Some(test) = current.as_mut() {
                        apply_outcome(test, &e)?;
                        target = TextTarget::TestOutcome;
                    }
                }
                b"system-out" => {
                    target = if current.is_some() { TextTarget::TestOut } else { TextTarget::SuiteOut };
                }
                b"system-err" => {
                    target = if current.is_some() { TextTarget::TestErr } else { TextTarget::SuiteErr };
                }
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"testsuite" => suites.push(suite_from(&e)?),
                b"testcase" => {
                    if let Some(&idx) = open_suites.last() {
                        let test = test_from(&e)?;
                        suites[idx].tests.push(test);
                    }
                }
                b"failure" | b"error" | b"skipped" => {
                    if let Some(test) = current.as_mut() {
                        apply_outcome(test, &e)?;
                    }
                }
                _ => {}
            },
            Event::Text(t) => {
                let text = t.unescape()?;
                push_text(&mut suites, &open_suites, current.as_mut(), target, &text);
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c);
                push_text(&mut suites, &open_suites, current.as_mut(), target, &text);
            }
            Event::End(e) => match e.name().as_ref() {
                b"testsuite" => {
                    open_suites.pop();
                }
                b"testcase" => {
                    if let (Some(test), Some(&idx)) = (current.take(), open_suites.last()) {
                        suites[idx].tests.push(test);
                    }
                }
                b"failure" | b"error" | b"skipped" | b"system-out" | b"system-err" => {
                    target = TextTarget::None;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if current.is_some() {
        return Err(JunitError::Truncated("testcase".to_string()));
    }
    if !open_suites.is_empty() {
        return Err(JunitError::Truncated("testsuite".to_string()));
    }
    Ok(suites)
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, JunitError> {
    for a in e.attributes() {
        let a = a?;
        if a.key.as_ref() == key {
            return Ok(Some(a.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// JUnit times are seconds as a decimal; some writers add thousands
/// separators. Unparseable values count as zero.
fn parse_time(raw: Option<String>) -> Duration {
    raw.and_then(|s| s.replace(',', "").trim().parse::<f64>().ok())
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .unwrap_or_default()
}

fn suite_from(e: &BytesStart<'_>) -> Result<Suite, JunitError> {
    Ok(Suite {
        name: attr(e, b"name")?.unwrap_or_default(),
        package: attr(e, b"package")?.unwrap_or_default(),
        duration: parse_time(attr(e, b"time")?),
        ..Default::default()
    })
}

fn test_from(e: &BytesStart<'_>) -> Result<TestCase, JunitError> {
    Ok(TestCase {
        name: attr(e, b"name")?.unwrap_or_default(),
        classname: attr(e, b"classname")?.unwrap_or_default(),
        duration: parse_time(attr(e, b"time")?),
        status: JunitStatus::Passed,
        message: None,
        system_out: String::new(),
        system_err: String::new(),
    })
}

fn apply_outcome(test: &mut TestCase, e: &BytesStart<'_>) -> Result<(), JunitError> {
    let status = match e.name().as_ref() {
        b"failure" => JunitStatus::Failed,
        b"error" => JunitStatus::Error,
        _ => JunitStatus::Skipped,
    };
    if status.rank() > test.status.rank() {
        test.status = status;
        test.message = attr(e, b"message")?;
    }
    Ok(())
}

fn push_text(
    suites: &mut [Suite],
    open_suites: &[usize],
    test: Option<&mut TestCase>,
    target: TextTarget,
    text: &str,
) {
    match (target, test) {
        (TextTarget::TestOut, Some(t)) => t.system_out.push_str(text),
        (TextTarget::TestErr, Some(t)) => t.system_err.push_str(text),
        (TextTarget::TestOutcome, Some(t)) => {
            if t.message.is_none() {
                t.message = Some(text.to_string());
            }
        }
        (TextTarget::SuiteOut, _) => {
            if let Some(&idx) = open_suites.last() {
                suites[idx].system_out.push_str(text);
            }
        }
        (TextTarget::SuiteErr, _) => {
            if let Some(&idx) = open_suites.last() {
                suites[idx].system_err.push_str(text);
            }
        }
        _ => {}
    }
}
