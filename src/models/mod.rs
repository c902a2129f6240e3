mod generation;
mod message;

pub use generation::GenerationConfig;
pub use message::{Message, Role};
