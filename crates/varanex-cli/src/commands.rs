use varanex_core::{ConversationSet, ThemeName};

/// Result of processing a slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Quit the application.
    Quit,
    /// Start a fresh conversation.
    NewConversation,
    /// List saved conversations.
    ListConversations,
    /// Switch to a conversation by list number or id.
    OpenConversation(String),
    /// Delete a conversation by list number or id; `None` means the active one.
    DeleteConversation(Option<String>),
    /// Change the theme.
    ThemeChanged(String),
    /// Show status (conversation count, theme, pending request).
    ShowStatus,
    /// Not a command - treat as regular input.
    NotACommand,
}

pub fn handle_command(input: &str) -> CommandResult {
    let input = input.trim();
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,
        "/new" => CommandResult::NewConversation,

        // Conversation commands
        "/list" | "/chats" => CommandResult::ListConversations,
        "/open" => {
            if arg.is_empty() {
                CommandResult::Message("Usage: /open <number-or-id>".into())
            } else {
                CommandResult::OpenConversation(arg.to_string())
            }
        }
        "/delete" | "/rm" => {
            if arg.is_empty() {
                CommandResult::DeleteConversation(None)
            } else {
                CommandResult::DeleteConversation(Some(arg.to_string()))
            }
        }

        // Display commands
        "/theme" => {
            if arg.is_empty() {
                CommandResult::Message(format!(
                    "Available themes: {}\nUsage: /theme <theme-name>",
                    theme_names()
                ))
            } else {
                CommandResult::ThemeChanged(arg.to_string())
            }
        }
        "/themes" => CommandResult::Message(format!("Available themes: {}", theme_names())),
        "/status" => CommandResult::ShowStatus,
        "/version" => {
            CommandResult::Message(format!("VaraNex CLI v{}", env!("CARGO_PKG_VERSION")))
        }

        // Unknown command
        _ => {
            if input.starts_with('/') {
                CommandResult::Message(format!("Unknown command: {cmd}. Type /help for commands."))
            } else {
                CommandResult::NotACommand
            }
        }
    }
}

/// Resolve a 1-based list number or a literal id against the current set.
pub fn resolve_conversation(set: &ConversationSet, reference: &str) -> Option<String> {
    let reference = reference.trim();
    if set.contains(reference) {
        return Some(reference.to_string());
    }
    let index: usize = reference.parse().ok()?;
    set.conversations()
        .get(index.checked_sub(1)?)
        .map(|c| c.id.clone())
}

fn theme_names() -> String {
    ThemeName::ALL
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn show_help() -> CommandResult {
    let help_text = "\
╭─ VaraNex Commands ───────────────────────────────────────────╮

  CONVERSATIONS
    /new                      Start a fresh conversation
    /list, /chats             List saved conversations
    /open <n|id>              Switch to a conversation
    /delete [n|id], /rm       Delete a conversation (default: current)

  DISPLAY
    /theme <name>             Change color theme
    /themes                   List available themes
    /status                   Show status

  OTHER
    /help, /h                 Show this help message
    /version                  Show version information
    /exit, /quit, /q          Quit

  Anything else is sent to the answer service.

╰──────────────────────────────────────────────────────────────╯";

    CommandResult::Message(help_text.into())
}
