use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use crossterm::style::Stylize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use varanex_core::{
    ChatApp, ChatView, Conversation, IgnoreReason, Message, Role, SubmitOutcome, ThemeName,
};

use crate::commands::{handle_command, resolve_conversation, CommandResult};
use crate::render::render_markdown;
use crate::theme::Palette;

/// Terminal output settings shared by every printer below.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    palette: Option<Palette>,
}

impl Output {
    pub fn new(theme: ThemeName, color: bool) -> Self {
        Self {
            palette: color.then(|| Palette::for_theme(theme)),
        }
    }

    fn set_theme(&mut self, theme: ThemeName) {
        if self.palette.is_some() {
            self.palette = Some(Palette::for_theme(theme));
        }
    }

    fn accent(&self, text: &str) -> String {
        match self.palette {
            Some(p) => text.with(p.accent).bold().to_string(),
            None => text.to_string(),
        }
    }

    fn muted(&self, text: &str) -> String {
        match self.palette {
            Some(p) => text.with(p.muted).to_string(),
            None => text.to_string(),
        }
    }

    fn error(&self, text: &str) -> String {
        match self.palette {
            Some(p) => text.with(p.error).to_string(),
            None => text.to_string(),
        }
    }

    pub fn format_message(&self, message: &Message) -> String {
        match message.role {
            Role::User => {
                let label = match self.palette {
                    Some(p) => "you ›".with(p.user_color).bold().to_string(),
                    None => "you ›".to_string(),
                };
                format!("{label} {}", message.content)
            }
            Role::Assistant => {
                let label = match self.palette {
                    Some(p) => "varanex ›".with(p.assistant_color).bold().to_string(),
                    None => "varanex ›".to_string(),
                };
                let body = render_markdown(&message.content, self.palette.as_ref());
                format!("{label}\n{body}")
            }
        }
    }
}

/// Completed sends, reported back to the input loop.
struct Completion {
    conversation_id: String,
    outcome: SubmitOutcome,
}

enum Flow {
    Continue,
    Quit,
}

// ── Single prompt ───────────────────────────────────────────────────────

/// Ask one question in a new conversation, print the reply and return.
pub async fn run_single_prompt(app: &ChatApp, prompt: &str, output: Output) -> Result<()> {
    let conversation = app.create_conversation();
    let outcome = app.submit(prompt).await;

    match outcome {
        SubmitOutcome::Answered | SubmitOutcome::Failed => {
            let view = app.view();
            if let Some(reply) = view
                .conversations
                .get(&conversation.id)
                .and_then(Conversation::last_message)
            {
                println!("{}", render_markdown(&reply.content, output.palette.as_ref()));
            }
            if outcome == SubmitOutcome::Failed {
                anyhow::bail!("the answer service did not respond");
            }
        }
        SubmitOutcome::Ignored(reason) => {
            // The conversation was created for this prompt only.
            app.delete_conversation(&conversation.id);
            anyhow::bail!("nothing sent: {}", describe_ignore(reason));
        }
    }
    Ok(())
}

// ── Interactive loop ────────────────────────────────────────────────────

pub async fn run_repl(app: Arc<ChatApp>, mut output: Output) -> Result<()> {
    print_banner(&app.view(), &output);

    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut waiting = false;

    loop {
        prompt(&output)?;

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match handle_command(&line) {
                    CommandResult::NotACommand => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        if waiting || app.is_busy() {
                            println!("{}", output.muted("Still waiting for the previous answer…"));
                            continue;
                        }
                        let conversation_id = match app.view().active_id {
                            Some(id) => id,
                            None => {
                                let conversation = app.create_conversation();
                                println!("{}", output.muted("Started a new conversation."));
                                conversation.id
                            }
                        };

                        waiting = true;
                        println!("{}", output.muted("…"));
                        let app = Arc::clone(&app);
                        let done_tx = done_tx.clone();
                        tokio::spawn(async move {
                            let outcome = app.submit(&line).await;
                            let _ = done_tx.send(Completion { conversation_id, outcome });
                        });
                    }
                    other => {
                        if let Flow::Quit = apply_command(&app, other, &mut output) {
                            break;
                        }
                    }
                }
            }
            Some(done) = done_rx.recv() => {
                waiting = false;
                print_completion(&app.view(), &done, &output);
            }
        }
    }

    // Requests cannot be cancelled; let the outstanding one land in history.
    if waiting {
        println!("{}", output.muted("Waiting for the outstanding answer…"));
        if let Some(done) = done_rx.recv().await {
            print_completion(&app.view(), &done, &output);
        }
    }

    Ok(())
}

fn prompt(output: &Output) -> Result<()> {
    print!("{} ", output.accent("›"));
    std::io::stdout().flush()?;
    Ok(())
}

fn print_banner(view: &ChatView, output: &Output) {
    println!("{}", output.accent("VaraNex AI"));
    println!(
        "{}",
        output.muted("Type a message and press Enter. /help lists commands.")
    );
    match view.active() {
        Some(conversation) => print_conversation(conversation, output),
        None => println!("{}", output.muted("No conversations yet. Your first message starts one.")),
    }
}

fn print_conversation(conversation: &Conversation, output: &Output) {
    println!();
    println!("{}", output.accent(&format!("── {} ──", conversation.title)));
    if conversation.messages.is_empty() {
        println!("{}", output.muted("Start a conversation. Ask me anything!"));
    }
    for message in &conversation.messages {
        println!("{}\n", output.format_message(message));
    }
}

fn print_completion(view: &ChatView, done: &Completion, output: &Output) {
    let Some(conversation) = view.conversations.get(&done.conversation_id) else {
        println!("{}", output.muted("(the conversation was deleted before the answer arrived)"));
        return;
    };

    if view.active_id.as_deref() != Some(done.conversation_id.as_str()) {
        println!(
            "{}",
            output.muted(&format!("(reply added to \"{}\")", conversation.title))
        );
        return;
    }

    if let Some(reply) = conversation.last_message() {
        let text = output.format_message(reply);
        if done.outcome == SubmitOutcome::Failed {
            println!("{}", output.error(&text));
        } else {
            println!("{text}");
        }
    }
}

fn apply_command(app: &ChatApp, result: CommandResult, output: &mut Output) -> Flow {
    match result {
        CommandResult::Message(msg) => println!("{msg}"),
        CommandResult::Quit => return Flow::Quit,
        CommandResult::NewConversation => {
            let conversation = app.create_conversation();
            print_conversation(&conversation, output);
        }
        CommandResult::ListConversations => print_list(&app.view(), output),
        CommandResult::OpenConversation(reference) => {
            let view = app.view();
            match resolve_conversation(&view.conversations, &reference) {
                Some(id) if app.select_conversation(&id) => {
                    if let Some(conversation) = app.view().active() {
                        print_conversation(conversation, output);
                    }
                }
                _ => println!("{}", output.error(&format!("No conversation '{reference}'. Try /list."))),
            }
        }
        CommandResult::DeleteConversation(reference) => {
            let view = app.view();
            let target = match reference {
                Some(ref r) => resolve_conversation(&view.conversations, r),
                None => view.active_id.clone(),
            };
            match target.and_then(|id| view.conversations.get(&id).map(|c| (id, c.title.clone()))) {
                Some((id, title)) => {
                    app.delete_conversation(&id);
                    println!("{}", output.muted(&format!("Deleted \"{title}\".")));
                    match app.view().active() {
                        Some(active) => print_conversation(active, output),
                        None => println!("{}", output.muted("No conversations left.")),
                    }
                }
                None => println!("{}", output.error("Nothing to delete.")),
            }
        }
        CommandResult::ThemeChanged(name) => match name.parse::<ThemeName>() {
            Ok(theme) => {
                if let Err(e) = app.set_theme(theme) {
                    tracing::warn!("Failed to save theme: {e}");
                }
                output.set_theme(theme);
                println!("{}", output.accent(&format!("Theme set to {theme}.")));
            }
            Err(e) => println!("{}", output.error(&e.to_string())),
        },
        CommandResult::ShowStatus => {
            let view = app.view();
            let active = view
                .active()
                .map(|c| format!("{} ({} messages)", c.title, c.messages.len()))
                .unwrap_or_else(|| "none".to_string());
            println!("Conversations: {}", view.conversations.len());
            println!("Active:        {active}");
            println!("Theme:         {}", view.theme);
            println!("Waiting:       {}", if view.busy { "yes" } else { "no" });
        }
        CommandResult::NotACommand => {}
    }
    Flow::Continue
}

fn print_list(view: &ChatView, output: &Output) {
    if view.conversations.is_empty() {
        println!("{}", output.muted("No conversations yet"));
        return;
    }
    for (i, conversation) in view.conversations.conversations().iter().enumerate() {
        let marker = if view.active_id.as_deref() == Some(conversation.id.as_str()) {
            "*"
        } else {
            " "
        };
        let created = conversation
            .created_at()
            .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "{marker} {:>2}. {}  {}",
            i + 1,
            conversation.title,
            output.muted(&format!("{created}  {} msgs", conversation.messages.len()))
        );
    }
}

fn describe_ignore(reason: IgnoreReason) -> &'static str {
    match reason {
        IgnoreReason::EmptyInput => "the prompt is empty",
        IgnoreReason::NoActiveConversation => "no conversation is selected",
        IgnoreReason::Busy => "another request is still outstanding",
    }
}
