//! Use case layer: application workflows and orchestration.

pub mod bootstrap;
pub mod context;
pub mod list_resources;
pub mod site_stack;
pub mod synth;

/// Returns the usecases module name for smoke checks.
pub fn module_name() -> &'static str {
    "usecases"
}
