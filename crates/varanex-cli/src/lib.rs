// Library interface for varanex-cli
// This allows integration tests to reach the command parser and renderer.

pub mod app;
pub mod commands;
pub mod render;
pub mod theme;

// Re-export commonly used items for easier testing
pub use commands::{handle_command, resolve_conversation, CommandResult};
pub use render::render_markdown;
pub use theme::Palette;
