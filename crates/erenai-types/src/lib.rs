//! Shared types for the ErenAI terminal assistant.

mod chat;
mod intent;
mod interaction;
mod session;
mod settings;

pub use chat::*;
pub use intent::*;
pub use interaction::*;
pub use session::*;
pub use settings::*;
