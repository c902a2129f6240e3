use super::highlight::MarkdownRenderer;
use super::output::{
    display_config, display_error, display_help, display_message, display_models,
    display_turn_error,
};
use crate::error::Result;
use crate::models::GenerationConfig;
use crate::session::Session;
use colored::*;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Submit(String),
    Clear,
    Model(Option<String>),
    Models,
    Temperature(String),
    MaxTokens(String),
    Config,
    History,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }

        let Some(rest) = line.strip_prefix('/') else {
            return Command::Submit(line.to_string());
        };

        // `//text` sends `/text` as a message
        if rest.starts_with('/') {
            return Command::Submit(rest.to_string());
        }

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim().to_string())),
            None => (rest, None),
        };
        let arg = arg.filter(|a| !a.is_empty());

        match name {
            "clear" => Command::Clear,
            "model" => Command::Model(arg),
            "models" => Command::Models,
            "temperature" | "temp" => Command::Temperature(arg.unwrap_or_default()),
            "max-tokens" => Command::MaxTokens(arg.unwrap_or_default()),
            "config" => Command::Config,
            "history" => Command::History,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            // Paths such as `/etc/hosts` are text, not commands
            other if other.contains('/') => Command::Submit(line.to_string()),
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Resolve a `/model` argument, either a 1-based index or a listed name.
pub fn select_model(models: &[String], arg: &str) -> Option<String> {
    if let Ok(index) = arg.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| models.get(i))
            .cloned();
    }
    models.iter().find(|m| m.as_str() == arg).cloned()
}

/// Interactive chat over stdin/stdout for one session.
pub struct Repl<'a> {
    session: &'a mut Session,
    generation: GenerationConfig,
    models: Vec<String>,
    renderer: MarkdownRenderer,
}

impl<'a> Repl<'a> {
    pub fn new(
        session: &'a mut Session,
        generation: GenerationConfig,
        models: Vec<String>,
    ) -> Self {
        Self {
            session,
            generation,
            models,
            renderer: MarkdownRenderer::new(),
        }
    }

    fn prompt() -> io::Result<()> {
        print!("{} ", "›".green().bold());
        io::stdout().flush()
    }

    pub async fn run(&mut self) -> Result<()> {
        println!("{}", "🤖 LLM Chat Assistant".bold());
        println!("{}", "Type a message, or /help for commands.".dimmed());

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        Self::prompt()?;

        while let Some(line) = lines.next_line().await? {
            if !self.handle(Command::parse(&line)).await {
                break;
            }
            Self::prompt()?;
        }

        println!();
        Ok(())
    }

    /// Apply one command. Returns false when the user asked to quit.
    pub async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Empty => {}
            Command::Submit(text) => {
                println!("{}", "Thinking...".dimmed());
                match self.session.manager.submit(text, &self.generation).await {
                    Ok(reply) => display_message(&self.renderer, &reply),
                    Err(e) => display_turn_error(&e),
                }
            }
            Command::Clear => {
                self.session.manager.clear();
                println!("{}", "🗑️ Chat cleared.".green());
            }
            Command::Model(None) => display_config(&self.generation),
            Command::Model(Some(arg)) => match select_model(&self.models, &arg) {
                Some(model) => match self.generation.set_model(model) {
                    Ok(()) => println!(
                        "{}",
                        format!("Using model {}", self.generation.model()).green()
                    ),
                    Err(e) => display_error(&e.to_string()),
                },
                None => {
                    display_error(&format!("Unknown model '{}'. Available models:", arg));
                    display_models(&self.models, self.generation.model());
                }
            },
            Command::Models => display_models(&self.models, self.generation.model()),
            Command::Temperature(arg) => match arg.parse::<f32>() {
                Ok(value) => match self.generation.set_temperature(value) {
                    Ok(()) => println!("{}", format!("Temperature set to {:.1}", value).green()),
                    Err(e) => display_error(&e.to_string()),
                },
                Err(_) => display_error("Usage: /temperature <0.0-2.0>"),
            },
            Command::MaxTokens(arg) => match arg.parse::<u32>() {
                Ok(value) => match self.generation.set_max_output_tokens(value) {
                    Ok(()) => println!("{}", format!("Max output tokens set to {}", value).green()),
                    Err(e) => display_error(&e.to_string()),
                },
                Err(_) => display_error("Usage: /max-tokens <100-8192>"),
            },
            Command::Config => display_config(&self.generation),
            Command::History => {
                println!(
                    "{}",
                    format!(
                        "Session {} started {}",
                        self.session.session_id,
                        self.session.started_at.format("%Y-%m-%d %H:%M:%S")
                    )
                    .dimmed()
                );
                if self.session.manager.log().is_empty() {
                    println!("{}", "No messages yet.".dimmed());
                }
                for message in self.session.manager.log() {
                    display_message(&self.renderer, message);
                }
            }
            Command::Help => display_help(),
            Command::Quit => return false,
            Command::Unknown(name) => {
                display_error(&format!(
                    "Unknown command '/{}'. Type /help, or start with // to send it as a message.",
                    name
                ))
            }
        }
        true
    }
}
