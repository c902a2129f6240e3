mod conversation;
mod manager;
mod registry;

pub use conversation::ConversationLog;
pub use manager::{project_history, SessionManager};
pub use registry::{Session, SessionRegistry};
