pub mod resolver;
pub mod types;

pub use resolver::{resolve_plan, PlanError};
pub use types::{Executable, RunPlan};
