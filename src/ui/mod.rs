pub mod highlight;
pub mod output;
pub mod repl;

pub use highlight::MarkdownRenderer;
pub use output::{display_error, display_key_status, display_message, display_models, display_turn_error};
pub use repl::{Command, Repl};
