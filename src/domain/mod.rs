//! Domain layer: the construct kit that declares resources into a stack.

pub mod access_control;
pub mod asset;
pub mod bucket;
pub mod deployment;
pub mod distribution;
pub mod error;
pub mod handler;
pub mod logical_id;
pub mod overrides;
pub mod policy;
pub mod stack;
pub mod template;

pub use error::StackError;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
