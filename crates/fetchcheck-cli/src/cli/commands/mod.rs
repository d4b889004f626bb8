//! CLI command handlers. Each command is in its own file.

mod completions;
mod fetch;
mod reference;
mod run;

pub use completions::run_completions;
pub use fetch::run_fetch;
pub use reference::run_reference;
pub use run::{run_verify, RunOptions};
