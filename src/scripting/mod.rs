//! The dynamic-scope evaluator and the machinery around it: the two-level
//! environment, the capability modules injected into every evaluation,
//! pending-value plumbing, and result formatting.

pub mod api;
mod engine;
mod format;
mod pending;
pub mod scope;

pub use api::Docs;
pub use engine::{Library, ScriptEngine};
pub use format::format_value;
pub use pending::{Pending, Settler};
