/// Centralized constants for VaraNex.
/// Storage keys, endpoints and fixed strings live here.

// ─── Storage Keys ─────────────────────────────────────────────────────────────

pub mod keys {
    /// JSON array of conversations, shared with the web client's layout.
    pub const CHATS: &str = "chats";
    /// JSON string holding the active conversation id.
    pub const ACTIVE_CHAT_ID: &str = "activeChatId";
    /// Plain theme name.
    pub const THEME: &str = "theme";
}

// ─── API Endpoints ────────────────────────────────────────────────────────────

pub mod endpoints {
    pub const DEFAULT_API_URL: &str = "http://localhost:5000";
    pub const ASK_PATH: &str = "/ask";
    /// Environment variable overriding the configured base URL.
    pub const API_URL_ENV: &str = "VARANEX_API_URL";
}

// ─── Conversations ────────────────────────────────────────────────────────────

pub mod chat {
    pub const NEW_CHAT_TITLE: &str = "New Chat";
    /// Length of the title derived from the first user message, in characters.
    pub const TITLE_MAX_CHARS: usize = 30;
    /// Recorded as the assistant reply when the answer service fails.
    pub const ERROR_REPLY: &str = "❌ Error: Could not get response. Please try again.";
}

// ─── Config Paths ─────────────────────────────────────────────────────────────

pub mod paths {
    pub const CONFIG_DIR: &str = "varanex";
    pub const CONFIG_FILE: &str = "config.toml";
    pub const DATA_DIR: &str = "varanex";
}
