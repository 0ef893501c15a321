//! Live HTTP adapters for voxtask.
//!
//! Implements the action engine's ports against real services: the Todoist
//! REST API as the task store, the interpreter worker, and the diagnostics
//! log endpoint.

pub mod diagnostics;
pub mod http;
pub mod interpreter;
pub mod todoist;

pub use diagnostics::HttpDiagnosticsSink;
pub use interpreter::HttpInterpreter;
pub use todoist::TodoistClient;
