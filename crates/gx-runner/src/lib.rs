#![allow(clippy::new_without_default)]

pub mod config;
pub mod executor;
pub mod plan;
pub mod report;
pub mod runner;
pub mod secret;

pub use config::RunnerConfig;
pub use executor::{CommandOutput, Executor, ExitOutcome};
pub use plan::{Executable, RunPlan};
pub use runner::GradleRunner;
