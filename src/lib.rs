//! Scriptable note-editing core: a dynamic-scope evaluator wired to buffer
//! motions, a note store, prompts, and external processes.
//!
//! The embedding host supplies an [`editor::Editor`], a [`host::Host`] of
//! collaborators, and drives a [`Session`]; scripts then see the live buffer
//! and session state as free variables.

pub mod command;
pub mod editor;
pub mod error;
pub mod history;
pub mod host;
pub mod scripting;
pub mod session;

pub use error::Error;
pub use session::Session;
