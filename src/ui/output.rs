use super::highlight::MarkdownRenderer;
use crate::error::TurnError;
use crate::models::{GenerationConfig, Message, Role};
use colored::*;
use std::io::{self, Write};

pub fn display_message(renderer: &MarkdownRenderer, message: &Message) {
    match message.role() {
        Role::User => println!("{} {}", "you ›".green().bold(), message.content()),
        Role::Assistant => {
            println!("{}", "gemini ›".cyan().bold());
            let rendered = renderer.render(message.content());
            print!("{}", rendered.trim_end());
            println!();
        }
    }
    let _ = io::stdout().flush();
}

pub fn display_turn_error(error: &TurnError) {
    match error {
        TurnError::Configuration(msg) => {
            eprintln!("{} {}", "⚠️".yellow(), msg.yellow());
            eprintln!(
                "{}",
                "Set GEMINI_API_KEY or add it to ~/.config/gemchat/secrets.yaml to use the chat."
                    .dimmed()
            );
        }
        TurnError::Generation(e) => eprintln!("{} {}", "❌ Error:".red(), e),
    }
}

pub fn display_error(msg: &str) {
    eprintln!("{} {}", "Error:".red(), msg);
}

pub fn display_key_status(configured: bool) {
    if configured {
        println!("{}", "API key loaded.".green());
    } else {
        println!(
            "{}",
            "Missing GEMINI_API_KEY in the environment or secrets file.".red()
        );
    }
}

pub fn display_config(config: &GenerationConfig) {
    println!("{}", format!("Model:             {}", config.model()).cyan());
    println!(
        "{}",
        format!("Temperature:       {:.1}", config.temperature()).dimmed()
    );
    println!(
        "{}",
        format!("Max output tokens: {}", config.max_output_tokens()).dimmed()
    );
}

pub fn display_models(models: &[String], selected: &str) {
    for (index, model) in models.iter().enumerate() {
        if model == selected {
            println!("{}", format!("* [{}] {}", index + 1, model).green());
        } else {
            println!("  [{}] {}", index + 1, model);
        }
    }
}

pub fn display_help() {
    println!("{}", "Commands:".bold());
    for (command, help) in [
        ("/clear", "Clear the conversation"),
        ("/model [name|number]", "Show or select the model"),
        ("/models", "List available models"),
        ("/temperature <0.0-2.0>", "Set the sampling temperature"),
        ("/max-tokens <100-8192>", "Set the maximum reply length"),
        ("/config", "Show the current generation settings"),
        ("/history", "Show the conversation so far"),
        ("/help", "Show this help"),
        ("/quit", "Exit"),
    ] {
        println!("  {} {}", format!("{:<24}", command).cyan(), help.dimmed());
    }
}
